use async_trait::async_trait;
use chrono::NaiveDateTime;

use crate::errors::Result;
use crate::transactions::transactions_model::{
    NewTransaction, NewTransactionRecord, SpendingPoint, Transaction, TransactionPage,
    TransactionSummary, TransactionUpdate,
};

/// Trait for transaction repository operations.
#[async_trait]
pub trait TransactionRepositoryTrait: Send + Sync {
    async fn insert(&self, user_id: &str, record: NewTransactionRecord) -> Result<Transaction>;
    /// Returns one page (newest first) plus the total row count for the
    /// same filters.
    fn search(
        &self,
        user_id: &str,
        type_filter: Option<&str>,
        range: Option<(NaiveDateTime, NaiveDateTime)>,
        page: i64,
        limit: i64,
    ) -> Result<(Vec<Transaction>, i64)>;
    fn find(&self, user_id: &str, transaction_id: &str) -> Result<Option<Transaction>>;
    async fn update(
        &self,
        user_id: &str,
        transaction_id: &str,
        update: TransactionUpdate,
    ) -> Result<Transaction>;
    async fn delete(&self, user_id: &str, transaction_id: &str) -> Result<usize>;
    fn summary_totals(
        &self,
        user_id: &str,
        range: (NaiveDateTime, NaiveDateTime),
    ) -> Result<TransactionSummary>;
    fn expenses_in_range(
        &self,
        user_id: &str,
        range: (NaiveDateTime, NaiveDateTime),
    ) -> Result<Vec<Transaction>>;
}

/// Trait for transaction service operations.
#[async_trait]
pub trait TransactionServiceTrait: Send + Sync {
    async fn create(&self, email: &str, new_transaction: NewTransaction) -> Result<Transaction>;
    #[allow(clippy::too_many_arguments)]
    async fn list(
        &self,
        email: &str,
        page: i64,
        limit: i64,
        type_filter: Option<String>,
        month: Option<u32>,
        year: Option<i32>,
    ) -> Result<TransactionPage>;
    async fn summary(
        &self,
        email: &str,
        month: Option<u32>,
        year: Option<i32>,
        now: NaiveDateTime,
    ) -> Result<TransactionSummary>;
    fn get(&self, email: &str, transaction_id: &str) -> Result<Transaction>;
    async fn update(
        &self,
        email: &str,
        transaction_id: &str,
        update: TransactionUpdate,
    ) -> Result<Transaction>;
    async fn delete(&self, email: &str, transaction_id: &str) -> Result<()>;
    fn spending_trend(&self, email: &str, now: NaiveDateTime) -> Result<Vec<SpendingPoint>>;
}
