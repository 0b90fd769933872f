use async_trait::async_trait;
use chrono::NaiveDateTime;

use crate::errors::Result;
use crate::recurring::recurring_model::SyncJob;

/// Trait for recurring-sync job storage.
#[async_trait]
pub trait SyncJobRepositoryTrait: Send + Sync {
    fn find(&self, user_id: &str) -> Result<Option<SyncJob>>;

    /// Materializes one month of recurring income/expense, idempotently.
    ///
    /// In a single store transaction: if the job stamp already matches
    /// `(month, year)` nothing happens and `false` is returned; otherwise one
    /// `RecurringIncome` transaction (for `income_total`) and one
    /// `RecurringExpense` transaction (for `expense_total`) are inserted —
    /// zero-amount sides are skipped — and the stamp is upserted.
    #[allow(clippy::too_many_arguments)]
    async fn run_monthly_sync(
        &self,
        user_id: &str,
        month: i32,
        year: i32,
        income_total: f64,
        expense_total: f64,
        now: NaiveDateTime,
    ) -> Result<bool>;

    /// Upserts the job stamp without materializing anything. Used by
    /// onboarding, which inserts its own transactions for the current month.
    async fn stamp(&self, user_id: &str, month: i32, year: i32, now: NaiveDateTime) -> Result<()>;
}

/// Trait for the recurring-sync service.
#[async_trait]
pub trait RecurringSyncServiceTrait: Send + Sync {
    /// Ensures the user's recurring profile is materialized for the month
    /// containing `now`. Returns whether a sync ran.
    async fn ensure_synced(&self, email: &str, now: NaiveDateTime) -> Result<bool>;
}
