use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Datelike, NaiveDateTime};
use log::debug;

use super::recurring_traits::{RecurringSyncServiceTrait, SyncJobRepositoryTrait};
use crate::cache::{CacheInvalidator, EntityChange};
use crate::errors::{Error, Result};
use crate::users::UserRepositoryTrait;

/// Lazily materializes each user's standing income/expense profile into
/// transactions, at most once per calendar month.
///
/// There is no scheduler: the check runs on profile access and the job stamp
/// makes it idempotent within a month.
pub struct RecurringSyncService {
    users: Arc<dyn UserRepositoryTrait>,
    jobs: Arc<dyn SyncJobRepositoryTrait>,
    invalidator: CacheInvalidator,
}

impl RecurringSyncService {
    pub fn new(
        users: Arc<dyn UserRepositoryTrait>,
        jobs: Arc<dyn SyncJobRepositoryTrait>,
        invalidator: CacheInvalidator,
    ) -> Self {
        Self {
            users,
            jobs,
            invalidator,
        }
    }
}

#[async_trait]
impl RecurringSyncServiceTrait for RecurringSyncService {
    async fn ensure_synced(&self, email: &str, now: NaiveDateTime) -> Result<bool> {
        let user = self
            .users
            .find_by_email(email)?
            .ok_or_else(|| Error::not_found("User not found"))?;

        let income_total: f64 = user.monthly_income
            + self
                .users
                .list_income_sources(&user.id)?
                .iter()
                .map(|s| s.amount)
                .sum::<f64>();
        let expense_total: f64 = self
            .users
            .list_recurring_expenses(&user.id)?
            .iter()
            .map(|e| e.amount)
            .sum();

        let synced = self
            .jobs
            .run_monthly_sync(
                &user.id,
                now.month() as i32,
                now.year(),
                income_total,
                expense_total,
                now,
            )
            .await?;

        if synced {
            debug!(
                "materialized recurring profile for {} ({}/{})",
                email,
                now.month(),
                now.year()
            );
            self.invalidator
                .purge(email, &[EntityChange::Transactions])
                .await;
        }
        Ok(synced)
    }
}
