use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{Datelike, NaiveDateTime, Utc};

use super::transactions_model::{
    NewTransaction, NewTransactionRecord, SpendingPoint, Transaction, TransactionPage,
    TransactionSummary, TransactionType, TransactionUpdate,
};
use super::transactions_traits::{TransactionRepositoryTrait, TransactionServiceTrait};
use crate::cache::{
    read_through, summary_key, transactions_key, Cache, CacheInvalidator, EntityChange,
};
use crate::constants::{CACHE_TTL_SHORT_SECS, DEFAULT_PAGE_SIZE, DEFAULT_TRANSACTION_CATEGORY};
use crate::errors::{Error, Result};
use crate::users::UserRepositoryTrait;
use crate::utils::{days_in_month, month_range};

/// Service for ad-hoc and recurring financial events.
pub struct TransactionService {
    repository: Arc<dyn TransactionRepositoryTrait>,
    users: Arc<dyn UserRepositoryTrait>,
    cache: Arc<dyn Cache>,
    invalidator: CacheInvalidator,
}

impl TransactionService {
    pub fn new(
        repository: Arc<dyn TransactionRepositoryTrait>,
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
}

#[async_trait]
impl TransactionServiceTrait for TransactionService {
    async fn create(&self, email: &str, new_transaction: NewTransaction) -> Result<Transaction> {
        if !new_transaction.amount.is_finite() || new_transaction.amount <= 0.0 {
            return Err(Error::invalid_input("Amount must be a positive number"));
        }
        if !matches!(
            new_transaction.transaction_type,
            TransactionType::Income | TransactionType::Expense
        ) {
            return Err(Error::invalid_input("Type must be Income or Expense"));
        }
        if let Some(category) = &new_transaction.category {
            if category.trim().len() < 2 {
                return Err(Error::invalid_input("Category is required"));
            }
        }

        let user_id = self.require_user_id(email)?;
        let record = NewTransactionRecord {
            amount: new_transaction.amount,
            transaction_type: new_transaction.transaction_type,
            category: new_transaction
                .category
                .unwrap_or_else(|| DEFAULT_TRANSACTION_CATEGORY.to_string()),
            description: new_transaction.description,
            transaction_date: new_transaction
                .transaction_date
                .map(|d| d.naive_utc())
                .unwrap_or_else(|| Utc::now().naive_utc()),
            charge_id: None,
        };
        let created = self.repository.insert(&user_id, record).await?;
        self.invalidator
            .purge(email, &[EntityChange::Transactions])
            .await;
        Ok(created)
    }

    async fn list(
        &self,
        email: &str,
        page: i64,
        limit: i64,
        type_filter: Option<String>,
        month: Option<u32>,
        year: Option<i32>,
    ) -> Result<TransactionPage> {
        let user_id = self.require_user_id(email)?;
        let page = page.max(1);
        let limit = if limit > 0 { limit } else { DEFAULT_PAGE_SIZE };

        // A month filter only applies together with a year.
        let range = match (month, year) {
            (Some(m), Some(y)) => Some(month_range(y, m)?),
            _ => None,
        };

        let key = transactions_key(email, page, limit, type_filter.as_deref(), month, year);
        let ttl = Duration::from_secs(CACHE_TTL_SHORT_SECS);
        read_through(self.cache.as_ref(), &key, ttl, || {
            let (items, total) =
                self.repository
                    .search(&user_id, type_filter.as_deref(), range, page, limit)?;
            Ok(TransactionPage {
                items,
                total_pages: (total + limit - 1) / limit,
                current_page: page,
            })
        })
        .await
    }

    async fn summary(
        &self,
        email: &str,
        month: Option<u32>,
        year: Option<i32>,
        now: NaiveDateTime,
    ) -> Result<TransactionSummary> {
        let user_id = self.require_user_id(email)?;
        let target_month = month.unwrap_or_else(|| now.month());
        let target_year = year.unwrap_or_else(|| now.year());
        let range = month_range(target_year, target_month)?;

        let key = summary_key(email, target_month, target_year);
        let ttl = Duration::from_secs(CACHE_TTL_SHORT_SECS);
        read_through(self.cache.as_ref(), &key, ttl, || {
            self.repository.summary_totals(&user_id, range)
        })
        .await
    }

    fn get(&self, email: &str, transaction_id: &str) -> Result<Transaction> {
        let user_id = self.require_user_id(email)?;
        self.repository
            .find(&user_id, transaction_id)?
            .ok_or_else(|| {
                Error::not_found(
                    "Transaction not found or you do not have permission to view it.",
                )
            })
    }

    async fn update(
        &self,
        email: &str,
        transaction_id: &str,
        update: TransactionUpdate,
    ) -> Result<Transaction> {
        if let Some(amount) = update.amount {
            if !amount.is_finite() || amount <= 0.0 {
                return Err(Error::invalid_input("Amount must be a positive number"));
            }
        }
        let user_id = self.require_user_id(email)?;
        let updated = self
            .repository
            .update(&user_id, transaction_id, update)
            .await?;
        self.invalidator
            .purge(email, &[EntityChange::Transactions])
            .await;
        Ok(updated)
    }

    async fn delete(&self, email: &str, transaction_id: &str) -> Result<()> {
        let user_id = self.require_user_id(email)?;
        let deleted = self.repository.delete(&user_id, transaction_id).await?;
        if deleted == 0 {
            return Err(Error::not_found(
                "Transaction not found or you do not have permission to delete it.",
            ));
        }
        self.invalidator
            .purge(email, &[EntityChange::Transactions])
            .await;
        Ok(())
    }

    fn spending_trend(&self, email: &str, now: NaiveDateTime) -> Result<Vec<SpendingPoint>> {
        let user_id = self.require_user_id(email)?;
        let range = month_range(now.year(), now.month())?;
        let expenses = self.repository.expenses_in_range(&user_id, range)?;

        let mut per_day: HashMap<u32, f64> = HashMap::new();
        for tx in expenses {
            *per_day.entry(tx.transaction_date.day()).or_insert(0.0) += tx.amount;
        }

        // Zero-filled series covering every day of the month.
        Ok((1..=days_in_month(now.date()))
            .map(|day| SpendingPoint {
                day: day.to_string(),
                amount: per_day.get(&day).copied().unwrap_or(0.0),
            })
            .collect())
    }
}
