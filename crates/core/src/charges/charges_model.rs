//! Upcoming-charge domain models.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle state of a scheduled bill.
///
/// `Upcoming → Due` happens lazily: every charge read sweeps the user's
/// unpaid, overdue charges first. `Paid` is entered (and left) explicitly via
/// mark-paid / mark-not-paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChargeStatus {
    Upcoming,
    Due,
    Paid,
}

impl ChargeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChargeStatus::Upcoming => "Upcoming",
            ChargeStatus::Due => "Due",
            ChargeStatus::Paid => "Paid",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Upcoming" => Some(ChargeStatus::Upcoming),
            "Due" => Some(ChargeStatus::Due),
            "Paid" => Some(ChargeStatus::Paid),
            _ => None,
        }
    }
}

/// A scheduled bill owned by one user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpcomingCharge {
    pub id: String,
    pub user_id: String,
    pub charge_name: String,
    /// Spending category the bill belongs to.
    pub field: String,
    pub due_date: NaiveDateTime,
    pub amount: f64,
    pub is_paid: bool,
    pub status: ChargeStatus,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Input model for creating a charge.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCharge {
    pub charge_name: String,
    pub field: String,
    pub due_date: DateTime<Utc>,
    pub amount: f64,
}

/// Partial charge update; absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChargeUpdate {
    pub charge_name: Option<String>,
    pub field: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
    pub amount: Option<f64>,
}
