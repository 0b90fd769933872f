use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};

use crate::cache::{CacheInvalidator, MemoryCache};
use crate::errors::{Error, Result};
use crate::test_support::{test_user, ts, MockUserRepository};
use crate::transactions::{
    NewTransaction, NewTransactionRecord, Transaction, TransactionPage,
    TransactionRepositoryTrait, TransactionService, TransactionServiceTrait, TransactionSummary,
    TransactionType, TransactionUpdate,
};

const EMAIL: &str = "john@x.com";
const USER_ID: &str = "user-1";

struct MockTransactionRepository {
    transactions: Mutex<Vec<Transaction>>,
}

impl MockTransactionRepository {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            transactions: Mutex::new(Vec::new()),
        })
    }

    fn matching(
        &self,
        user_id: &str,
        type_filter: Option<&str>,
        range: Option<(NaiveDateTime, NaiveDateTime)>,
    ) -> Vec<Transaction> {
        let mut rows: Vec<Transaction> = self
            .transactions
            .lock()
            .unwrap()
            .iter()
            .filter(|t| t.user_id == user_id)
            .filter(|t| type_filter.is_none_or(|f| t.transaction_type.as_str() == f))
            .filter(|t| {
                range.is_none_or(|(start, end)| {
                    t.transaction_date >= start && t.transaction_date <= end
                })
            })
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.transaction_date.cmp(&a.transaction_date));
        rows
    }
}

#[async_trait]
impl TransactionRepositoryTrait for MockTransactionRepository {
    async fn insert(&self, user_id: &str, record: NewTransactionRecord) -> Result<Transaction> {
        let mut transactions = self.transactions.lock().unwrap();
        let tx = Transaction {
            id: format!("tx-{}", transactions.len() + 1),
            user_id: user_id.to_string(),
            amount: record.amount,
            transaction_type: record.transaction_type,
            category: record.category,
            description: record.description,
            transaction_date: record.transaction_date,
            charge_id: record.charge_id,
            created_at: ts(2026, 7, 1),
            updated_at: ts(2026, 7, 1),
        };
        transactions.push(tx.clone());
        Ok(tx)
    }

    fn search(
        &self,
        user_id: &str,
        type_filter: Option<&str>,
        range: Option<(NaiveDateTime, NaiveDateTime)>,
        page: i64,
        limit: i64,
    ) -> Result<(Vec<Transaction>, i64)> {
        let rows = self.matching(user_id, type_filter, range);
        let total = rows.len() as i64;
        let start = ((page - 1) * limit) as usize;
        let items = rows.into_iter().skip(start).take(limit as usize).collect();
        Ok((items, total))
    }

    fn find(&self, user_id: &str, transaction_id: &str) -> Result<Option<Transaction>> {
        Ok(self
            .transactions
            .lock()
            .unwrap()
            .iter()
            .find(|t| t.user_id == user_id && t.id == transaction_id)
            .cloned())
    }

    async fn update(
        &self,
        user_id: &str,
        transaction_id: &str,
        update: TransactionUpdate,
    ) -> Result<Transaction> {
        let mut transactions = self.transactions.lock().unwrap();
        let tx = transactions
            .iter_mut()
            .find(|t| t.user_id == user_id && t.id == transaction_id)
            .ok_or_else(|| {
                Error::not_found("Transaction not found or you do not have permission to update it.")
            })?;
        if let Some(amount) = update.amount {
            tx.amount = amount;
        }
        if let Some(tt) = update.transaction_type {
            tx.transaction_type = tt;
        }
        if let Some(category) = update.category {
            tx.category = category;
        }
        if let Some(description) = update.description {
            tx.description = Some(description);
        }
        if let Some(date) = update.transaction_date {
            tx.transaction_date = date.naive_utc();
        }
        Ok(tx.clone())
    }

    async fn delete(&self, user_id: &str, transaction_id: &str) -> Result<usize> {
        let mut transactions = self.transactions.lock().unwrap();
        let before = transactions.len();
        transactions.retain(|t| !(t.user_id == user_id && t.id == transaction_id));
        Ok(before - transactions.len())
    }

    fn summary_totals(
        &self,
        user_id: &str,
        range: (NaiveDateTime, NaiveDateTime),
    ) -> Result<TransactionSummary> {
        let rows = self.matching(user_id, None, Some(range));
        let mut summary = TransactionSummary::default();
        for tx in rows {
            match tx.transaction_type {
                TransactionType::Income => summary.total_income += tx.amount,
                TransactionType::Expense => summary.total_expense += tx.amount,
                _ => {}
            }
        }
        Ok(summary)
    }

    fn expenses_in_range(
        &self,
        user_id: &str,
        range: (NaiveDateTime, NaiveDateTime),
    ) -> Result<Vec<Transaction>> {
        Ok(self.matching(user_id, Some("Expense"), Some(range)))
    }
}

fn service() -> (TransactionService, Arc<MockTransactionRepository>) {
    let users = MockUserRepository::with_user(test_user(USER_ID, EMAIL));
    let repo = MockTransactionRepository::new();
    let cache = Arc::new(MemoryCache::new(64));
    let service = TransactionService::new(
        repo.clone(),
        users,
        cache.clone(),
        CacheInvalidator::new(cache),
    );
    (service, repo)
}

fn expense(amount: f64, date: NaiveDateTime) -> NewTransaction {
    NewTransaction {
        amount,
        transaction_type: TransactionType::Expense,
        category: Some("Food".to_string()),
        description: None,
        transaction_date: Some(DateTime::from_naive_utc_and_offset(date, Utc)),
    }
}

#[tokio::test]
async fn create_rejects_invalid_input() {
    let (service, _) = service();

    let err = service
        .create(EMAIL, expense(-10.0, ts(2026, 7, 1)))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Validation(_)));

    let mut recurring = expense(10.0, ts(2026, 7, 1));
    recurring.transaction_type = TransactionType::RecurringExpense;
    let err = service.create(EMAIL, recurring).await.unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
}

#[tokio::test]
async fn create_defaults_category() {
    let (service, _) = service();
    let mut tx = expense(10.0, ts(2026, 7, 1));
    tx.category = None;
    let created = service.create(EMAIL, tx).await.unwrap();
    assert_eq!(created.category, "General");
}

#[tokio::test]
async fn list_paginates_newest_first() {
    let (service, _) = service();
    for day in 1..=7 {
        service
            .create(EMAIL, expense(day as f64, ts(2026, 7, day)))
            .await
            .unwrap();
    }

    let TransactionPage {
        items,
        total_pages,
        current_page,
    } = service.list(EMAIL, 1, 3, None, None, None).await.unwrap();
    assert_eq!(items.len(), 3);
    assert_eq!(items[0].transaction_date, ts(2026, 7, 7));
    assert_eq!(total_pages, 3); // ceil(7 / 3)
    assert_eq!(current_page, 1);

    let page3 = service.list(EMAIL, 3, 3, None, None, None).await.unwrap();
    assert_eq!(page3.items.len(), 1);
    assert_eq!(page3.items[0].transaction_date, ts(2026, 7, 1));
}

#[tokio::test]
async fn list_filters_by_month_and_type() {
    let (service, _) = service();
    service
        .create(EMAIL, expense(10.0, ts(2026, 6, 15)))
        .await
        .unwrap();
    service
        .create(EMAIL, expense(20.0, ts(2026, 7, 15)))
        .await
        .unwrap();
    let mut income = expense(30.0, ts(2026, 7, 20));
    income.transaction_type = TransactionType::Income;
    service.create(EMAIL, income).await.unwrap();

    let july_expenses = service
        .list(
            EMAIL,
            1,
            10,
            Some("Expense".to_string()),
            Some(7),
            Some(2026),
        )
        .await
        .unwrap();
    assert_eq!(july_expenses.items.len(), 1);
    assert_eq!(july_expenses.items[0].amount, 20.0);
}

#[tokio::test]
async fn mutations_force_a_cache_miss_for_lists_and_summaries() {
    let (service, _) = service();
    service
        .create(EMAIL, expense(10.0, ts(2026, 7, 1)))
        .await
        .unwrap();

    // Prime list and summary caches.
    assert_eq!(
        service
            .list(EMAIL, 1, 10, None, None, None)
            .await
            .unwrap()
            .items
            .len(),
        1
    );
    assert_eq!(
        service
            .summary(EMAIL, Some(7), Some(2026), ts(2026, 7, 15))
            .await
            .unwrap()
            .total_expense,
        10.0
    );

    service
        .create(EMAIL, expense(5.0, ts(2026, 7, 2)))
        .await
        .unwrap();

    // Both reads observe the new row immediately.
    assert_eq!(
        service
            .list(EMAIL, 1, 10, None, None, None)
            .await
            .unwrap()
            .items
            .len(),
        2
    );
    assert_eq!(
        service
            .summary(EMAIL, Some(7), Some(2026), ts(2026, 7, 15))
            .await
            .unwrap()
            .total_expense,
        15.0
    );
}

#[tokio::test]
async fn summary_counts_only_adhoc_income_and_expense() {
    let (service, repo) = service();
    service
        .create(EMAIL, expense(25.0, ts(2026, 7, 3)))
        .await
        .unwrap();
    // Materialized recurring rows are excluded from the summary.
    repo.insert(
        USER_ID,
        NewTransactionRecord {
            amount: 5000.0,
            transaction_type: TransactionType::RecurringIncome,
            category: "Income".to_string(),
            description: None,
            transaction_date: ts(2026, 7, 1),
            charge_id: None,
        },
    )
    .await
    .unwrap();

    let summary = service
        .summary(EMAIL, None, None, ts(2026, 7, 15))
        .await
        .unwrap();
    assert_eq!(summary.total_expense, 25.0);
    assert_eq!(summary.total_income, 0.0);
}

#[tokio::test]
async fn spending_trend_zero_fills_every_day() {
    let (service, _) = service();
    service
        .create(EMAIL, expense(10.0, ts(2026, 7, 3)))
        .await
        .unwrap();
    service
        .create(EMAIL, expense(7.0, ts(2026, 7, 3)))
        .await
        .unwrap();

    let trend = service.spending_trend(EMAIL, ts(2026, 7, 15)).unwrap();
    assert_eq!(trend.len(), 31);
    assert_eq!(trend[2].day, "3");
    assert_eq!(trend[2].amount, 17.0);
    assert_eq!(trend[3].amount, 0.0);
}

#[tokio::test]
async fn delete_of_foreign_transaction_is_not_found() {
    let (service, _) = service();
    let err = service.delete(EMAIL, "tx-999").await.unwrap_err();
    assert!(matches!(err, Error::Database(_)));
}
