use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use super::goals_model::{Goal, GoalUpdate, NewGoal};
use super::goals_traits::{GoalRepositoryTrait, GoalServiceTrait};
use crate::cache::{goal_key, goals_key, read_through, Cache, CacheInvalidator, EntityChange};
use crate::constants::CACHE_TTL_LONG_SECS;
use crate::errors::{Error, Result};
use crate::users::UserRepositoryTrait;

const GOAL_NOT_FOUND: &str = "Goal not found or access denied.";

/// Service for savings goals.
pub struct GoalService {
    repository: Arc<dyn GoalRepositoryTrait>,
    users: Arc<dyn UserRepositoryTrait>,
    cache: Arc<dyn Cache>,
    invalidator: CacheInvalidator,
}

impl GoalService {
    pub fn new(
        repository: Arc<dyn GoalRepositoryTrait>,
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

    async fn purge_goal(&self, email: &str, goal_id: &str) {
        self.invalidator
            .purge(
                email,
                &[EntityChange::Goals {
                    goal_id: Some(goal_id.to_string()),
                }],
            )
            .await;
    }
}

#[async_trait]
impl GoalServiceTrait for GoalService {
    async fn create(&self, email: &str, new_goal: NewGoal) -> Result<Goal> {
        if new_goal.goal_name.trim().len() < 3 {
            return Err(Error::invalid_input("Goal name is required"));
        }
        if !new_goal.target_amount.is_finite() || new_goal.target_amount <= 0.0 {
            return Err(Error::invalid_input(
                "Target amount must be a positive number",
            ));
        }
        let user_id = self.require_user_id(email)?;
        let goal = self.repository.insert(&user_id, new_goal).await?;
        self.invalidator
            .purge(email, &[EntityChange::Goals { goal_id: None }])
            .await;
        Ok(goal)
    }

    async fn list(&self, email: &str) -> Result<Vec<Goal>> {
        let user_id = self.require_user_id(email)?;
        let key = goals_key(email);
        let ttl = Duration::from_secs(CACHE_TTL_LONG_SECS);
        read_through(self.cache.as_ref(), &key, ttl, || {
            self.repository.list(&user_id)
        })
        .await
    }

    async fn get(&self, email: &str, goal_id: &str) -> Result<Goal> {
        let user_id = self.require_user_id(email)?;
        let key = goal_key(goal_id);
        let ttl = Duration::from_secs(CACHE_TTL_LONG_SECS);
        let goal = read_through(self.cache.as_ref(), &key, ttl, || {
            self.repository
                .find(&user_id, goal_id)?
                .ok_or_else(|| Error::not_found(GOAL_NOT_FOUND))
        })
        .await?;

        // The single-goal key is scoped by goal id, not owner; re-check
        // ownership on hits so one user can never read another's goal.
        if goal.user_id != user_id {
            return Err(Error::not_found(GOAL_NOT_FOUND));
        }
        Ok(goal)
    }

    async fn update(&self, email: &str, goal_id: &str, update: GoalUpdate) -> Result<Goal> {
        if let Some(name) = &update.goal_name {
            if name.trim().len() < 3 {
                return Err(Error::invalid_input("Goal name is required"));
            }
        }
        if let Some(target) = update.target_amount {
            if !target.is_finite() || target <= 0.0 {
                return Err(Error::invalid_input(
                    "Target amount must be a positive number",
                ));
            }
        }
        let user_id = self.require_user_id(email)?;
        let goal = self.repository.update(&user_id, goal_id, update).await?;
        self.purge_goal(email, goal_id).await;
        Ok(goal)
    }

    async fn contribute(&self, email: &str, goal_id: &str, amount: f64) -> Result<Goal> {
        if !amount.is_finite() || amount <= 0.0 {
            return Err(Error::invalid_input(
                "Contribution amount must be a positive number",
            ));
        }
        let user_id = self.require_user_id(email)?;
        let goal = self.repository.contribute(&user_id, goal_id, amount).await?;
        self.purge_goal(email, goal_id).await;
        Ok(goal)
    }

    async fn delete(&self, email: &str, goal_id: &str) -> Result<()> {
        let user_id = self.require_user_id(email)?;
        let deleted = self.repository.delete(&user_id, goal_id).await?;
        if deleted == 0 {
            return Err(Error::not_found(GOAL_NOT_FOUND));
        }
        self.purge_goal(email, goal_id).await;
        Ok(())
    }
}
