use async_trait::async_trait;
use chrono::NaiveDateTime;

use crate::charges::charges_model::{ChargeStatus, ChargeUpdate, NewCharge, UpcomingCharge};
use crate::errors::Result;

/// Trait for upcoming-charge repository operations.
///
/// `set_paid` also records the linked Expense transaction (carrying the
/// charge id), and `set_not_paid` deletes it, each inside one store
/// transaction.
#[async_trait]
pub trait ChargeRepositoryTrait: Send + Sync {
    async fn insert(&self, user_id: &str, new_charge: NewCharge) -> Result<UpcomingCharge>;
    fn list(&self, user_id: &str, status: ChargeStatus) -> Result<Vec<UpcomingCharge>>;
    async fn update(
        &self,
        user_id: &str,
        charge_id: &str,
        update: ChargeUpdate,
    ) -> Result<UpcomingCharge>;
    async fn set_paid(
        &self,
        user_id: &str,
        charge_id: &str,
        now: NaiveDateTime,
    ) -> Result<UpcomingCharge>;
    async fn set_not_paid(
        &self,
        user_id: &str,
        charge_id: &str,
        now: NaiveDateTime,
    ) -> Result<UpcomingCharge>;
    async fn delete(&self, user_id: &str, charge_id: &str) -> Result<usize>;
    /// Transitions every unpaid, overdue `Upcoming` charge to `Due`;
    /// returns how many rows changed.
    async fn mark_overdue(&self, user_id: &str, now: NaiveDateTime) -> Result<usize>;
    fn count_by_status(&self, user_id: &str, status: ChargeStatus) -> Result<i64>;
}

/// Trait for upcoming-charge service operations.
#[async_trait]
pub trait ChargeServiceTrait: Send + Sync {
    async fn create(&self, email: &str, new_charge: NewCharge) -> Result<UpcomingCharge>;
    async fn list(
        &self,
        email: &str,
        status: Option<String>,
        now: NaiveDateTime,
    ) -> Result<Vec<UpcomingCharge>>;
    async fn dues(&self, email: &str, now: NaiveDateTime) -> Result<Vec<UpcomingCharge>>;
    async fn update(
        &self,
        email: &str,
        charge_id: &str,
        update: ChargeUpdate,
    ) -> Result<UpcomingCharge>;
    async fn mark_paid(
        &self,
        email: &str,
        charge_id: &str,
        now: NaiveDateTime,
    ) -> Result<UpcomingCharge>;
    async fn mark_not_paid(
        &self,
        email: &str,
        charge_id: &str,
        now: NaiveDateTime,
    ) -> Result<UpcomingCharge>;
    async fn delete(&self, email: &str, charge_id: &str) -> Result<()>;
}
