//! Transaction domain models.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// Classification of a financial event.
///
/// `RecurringIncome` / `RecurringExpense` are only created internally (by the
/// monthly sync and onboarding); clients may create `Income` and `Expense`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionType {
    Income,
    Expense,
    RecurringIncome,
    RecurringExpense,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Income => "Income",
            TransactionType::Expense => "Expense",
            TransactionType::RecurringIncome => "RecurringIncome",
            TransactionType::RecurringExpense => "RecurringExpense",
        }
    }

    /// Parses a stored value, defaulting to `Expense` for unknown input.
    pub fn parse(s: &str) -> Self {
        match s {
            "Income" => TransactionType::Income,
            "RecurringIncome" => TransactionType::RecurringIncome,
            "RecurringExpense" => TransactionType::RecurringExpense,
            _ => TransactionType::Expense,
        }
    }
}

/// An immutable financial event attributed to exactly one user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    pub user_id: String,
    pub amount: f64,
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    pub category: String,
    pub description: Option<String>,
    pub transaction_date: NaiveDateTime,
    /// Set when this transaction was created by paying an upcoming charge.
    pub charge_id: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Client input for creating a transaction.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTransaction {
    pub amount: f64,
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    pub category: Option<String>,
    pub description: Option<String>,
    pub transaction_date: Option<DateTime<Utc>>,
}

/// Fully-resolved insert record, used by services and internal flows
/// (recurring sync, charge payment, jar ledger entries).
#[derive(Debug, Clone)]
pub struct NewTransactionRecord {
    pub amount: f64,
    pub transaction_type: TransactionType,
    pub category: String,
    pub description: Option<String>,
    pub transaction_date: NaiveDateTime,
    pub charge_id: Option<String>,
}

/// Partial transaction update; absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionUpdate {
    pub amount: Option<f64>,
    #[serde(rename = "type")]
    pub transaction_type: Option<TransactionType>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub transaction_date: Option<DateTime<Utc>>,
}

/// One page of a transaction listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionPage {
    pub items: Vec<Transaction>,
    pub total_pages: i64,
    pub current_page: i64,
}

/// Income/expense totals for one calendar month.
///
/// Only ad-hoc `Income` and `Expense` events count; the materialized
/// recurring pair is excluded.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionSummary {
    pub total_income: f64,
    pub total_expense: f64,
}

/// One day of the current month's spending trend.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpendingPoint {
    pub day: String,
    pub amount: f64,
}
