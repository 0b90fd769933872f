use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDateTime;

use super::charges_model::{ChargeStatus, ChargeUpdate, NewCharge, UpcomingCharge};
use super::charges_traits::{ChargeRepositoryTrait, ChargeServiceTrait};
use crate::cache::{charges_key, read_through, Cache, CacheInvalidator, EntityChange};
use crate::constants::CACHE_TTL_LONG_SECS;
use crate::errors::{Error, Result};
use crate::users::UserRepositoryTrait;

/// Service for upcoming bill charges.
pub struct ChargeService {
    repository: Arc<dyn ChargeRepositoryTrait>,
    users: Arc<dyn UserRepositoryTrait>,
    cache: Arc<dyn Cache>,
    invalidator: CacheInvalidator,
}

impl ChargeService {
    pub fn new(
        repository: Arc<dyn ChargeRepositoryTrait>,
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

    /// Applies the Upcoming→Due sweep before a read. If anything changed,
    /// the cached status lists are stale and must go before the cache-aside
    /// lookup, so the read observes the transition.
    async fn sweep_overdue(&self, email: &str, user_id: &str, now: NaiveDateTime) -> Result<()> {
        let swept = self.repository.mark_overdue(user_id, now).await?;
        if swept > 0 {
            self.invalidator
                .purge(email, &[EntityChange::Charges])
                .await;
        }
        Ok(())
    }

    async fn list_by_status(
        &self,
        email: &str,
        user_id: &str,
        status: ChargeStatus,
        now: NaiveDateTime,
    ) -> Result<Vec<UpcomingCharge>> {
        self.sweep_overdue(email, user_id, now).await?;

        let key = charges_key(email, status.as_str());
        let ttl = Duration::from_secs(CACHE_TTL_LONG_SECS);
        let user_id = user_id.to_string();
        read_through(self.cache.as_ref(), &key, ttl, || {
            self.repository.list(&user_id, status)
        })
        .await
    }
}

#[async_trait]
impl ChargeServiceTrait for ChargeService {
    async fn create(&self, email: &str, new_charge: NewCharge) -> Result<UpcomingCharge> {
        if new_charge.charge_name.trim().len() < 2 {
            return Err(Error::invalid_input("Charge name is required"));
        }
        if new_charge.field.trim().len() < 2 {
            return Err(Error::invalid_input("Field/category is required"));
        }
        if !new_charge.amount.is_finite() || new_charge.amount <= 0.0 {
            return Err(Error::invalid_input("Amount must be a positive number"));
        }
        let user_id = self.require_user_id(email)?;
        let charge = self.repository.insert(&user_id, new_charge).await?;
        self.invalidator
            .purge(email, &[EntityChange::Charges])
            .await;
        Ok(charge)
    }

    async fn list(
        &self,
        email: &str,
        status: Option<String>,
        now: NaiveDateTime,
    ) -> Result<Vec<UpcomingCharge>> {
        let status = match status {
            Some(s) => ChargeStatus::parse(&s)
                .ok_or_else(|| Error::invalid_input("Status must be Upcoming, Due, or Paid"))?,
            None => ChargeStatus::Upcoming,
        };
        let user_id = self.require_user_id(email)?;
        self.list_by_status(email, &user_id, status, now).await
    }

    async fn dues(&self, email: &str, now: NaiveDateTime) -> Result<Vec<UpcomingCharge>> {
        let user_id = self.require_user_id(email)?;
        self.list_by_status(email, &user_id, ChargeStatus::Due, now)
            .await
    }

    async fn update(
        &self,
        email: &str,
        charge_id: &str,
        update: ChargeUpdate,
    ) -> Result<UpcomingCharge> {
        if let Some(name) = &update.charge_name {
            if name.trim().len() < 2 {
                return Err(Error::invalid_input("Charge name is required"));
            }
        }
        if let Some(field) = &update.field {
            if field.trim().len() < 2 {
                return Err(Error::invalid_input("Field/category is required"));
            }
        }
        if let Some(amount) = update.amount {
            if !amount.is_finite() || amount <= 0.0 {
                return Err(Error::invalid_input("Amount must be a positive number"));
            }
        }
        let user_id = self.require_user_id(email)?;
        let charge = self.repository.update(&user_id, charge_id, update).await?;
        self.invalidator
            .purge(email, &[EntityChange::Charges])
            .await;
        Ok(charge)
    }

    async fn mark_paid(
        &self,
        email: &str,
        charge_id: &str,
        now: NaiveDateTime,
    ) -> Result<UpcomingCharge> {
        let user_id = self.require_user_id(email)?;
        let charge = self.repository.set_paid(&user_id, charge_id, now).await?;
        // Paying a charge recorded a linked expense transaction.
        self.invalidator
            .purge(email, &[EntityChange::Charges, EntityChange::Transactions])
            .await;
        Ok(charge)
    }

    async fn mark_not_paid(
        &self,
        email: &str,
        charge_id: &str,
        now: NaiveDateTime,
    ) -> Result<UpcomingCharge> {
        let user_id = self.require_user_id(email)?;
        let charge = self
            .repository
            .set_not_paid(&user_id, charge_id, now)
            .await?;
        self.invalidator
            .purge(email, &[EntityChange::Charges, EntityChange::Transactions])
            .await;
        Ok(charge)
    }

    async fn delete(&self, email: &str, charge_id: &str) -> Result<()> {
        let user_id = self.require_user_id(email)?;
        let deleted = self.repository.delete(&user_id, charge_id).await?;
        if deleted == 0 {
            return Err(Error::not_found("Charge not found or access denied."));
        }
        self.invalidator
            .purge(email, &[EntityChange::Charges])
            .await;
        Ok(())
    }
}
