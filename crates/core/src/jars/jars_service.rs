use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use super::jars_model::{Jar, JarUpdate, NewJar};
use super::jars_traits::{JarRepositoryTrait, JarServiceTrait};
use crate::cache::{jars_key, read_through, Cache, CacheInvalidator, EntityChange};
use crate::constants::CACHE_TTL_LONG_SECS;
use crate::errors::{Error, Result};
use crate::users::UserRepositoryTrait;

/// Service for savings jars.
pub struct JarService {
    repository: Arc<dyn JarRepositoryTrait>,
    users: Arc<dyn UserRepositoryTrait>,
    cache: Arc<dyn Cache>,
    invalidator: CacheInvalidator,
}

impl JarService {
    pub fn new(
        repository: Arc<dyn JarRepositoryTrait>,
        users: Arc<dyn UserRepositoryTrait>,
        cache: Arc<dyn Cache>,
        invalidator: CacheInvalidator,
    ) -> Self {
        Self {
            repository,
            users,
            cache,
            invalidator,
        }
    }

    fn require_user_id(&self, email: &str) -> Result<String> {
        self.users
            .find_by_email(email)?
            .map(|u| u.id)
            .ok_or_else(|| Error::not_found("User not found"))
    }

    fn validate_movement(amount: f64) -> Result<()> {
        if !amount.is_finite() || amount <= 0.0 {
            return Err(Error::invalid_input("Amount must be a positive number"));
        }
        Ok(())
    }
}

#[async_trait]
impl JarServiceTrait for JarService {
    async fn create(&self, email: &str, new_jar: NewJar) -> Result<Jar> {
        if new_jar.jar_name.trim().len() < 2 {
            return Err(Error::invalid_input("Jar name is required"));
        }
        if !new_jar.goal_amount.is_finite() || new_jar.goal_amount <= 0.0 {
            return Err(Error::invalid_input(
                "Goal amount must be a positive number",
            ));
        }
        let user_id = self.require_user_id(email)?;
        let jar = self.repository.insert(&user_id, new_jar).await?;
        self.invalidator.purge(email, &[EntityChange::Jars]).await;
        Ok(jar)
    }

    async fn list(&self, email: &str) -> Result<Vec<Jar>> {
        let user_id = self.require_user_id(email)?;
        let key = jars_key(email);
        let ttl = Duration::from_secs(CACHE_TTL_LONG_SECS);
        read_through(self.cache.as_ref(), &key, ttl, || {
            self.repository.list(&user_id)
        })
        .await
    }

    async fn update(&self, email: &str, jar_id: &str, update: JarUpdate) -> Result<Jar> {
        if let Some(name) = &update.jar_name {
            if name.trim().len() < 2 {
                return Err(Error::invalid_input("Jar name is required"));
            }
        }
        if let Some(goal) = update.goal_amount {
            if !goal.is_finite() || goal <= 0.0 {
                return Err(Error::invalid_input(
                    "Goal amount must be a positive number",
                ));
            }
        }
        let user_id = self.require_user_id(email)?;
        let jar = self.repository.update(&user_id, jar_id, update).await?;
        self.invalidator.purge(email, &[EntityChange::Jars]).await;
        Ok(jar)
    }

    async fn deposit(&self, email: &str, jar_id: &str, amount: f64) -> Result<Jar> {
        Self::validate_movement(amount)?;
        let user_id = self.require_user_id(email)?;
        let jar = self.repository.deposit(&user_id, jar_id, amount).await?;
        // The deposit recorded a ledger transaction as a side-effect.
        self.invalidator
            .purge(email, &[EntityChange::Jars, EntityChange::Transactions])
            .await;
        Ok(jar)
    }

    async fn withdraw(&self, email: &str, jar_id: &str, amount: f64) -> Result<Jar> {
        Self::validate_movement(amount)?;
        let user_id = self.require_user_id(email)?;
        let jar = self.repository.withdraw(&user_id, jar_id, amount).await?;
        self.invalidator
            .purge(email, &[EntityChange::Jars, EntityChange::Transactions])
            .await;
        Ok(jar)
    }

    async fn delete(&self, email: &str, jar_id: &str) -> Result<()> {
        let user_id = self.require_user_id(email)?;
        let deleted = self.repository.delete(&user_id, jar_id).await?;
        if deleted == 0 {
            return Err(Error::not_found("Jar not found or access denied."));
        }
        self.invalidator.purge(email, &[EntityChange::Jars]).await;
        Ok(())
    }
}
