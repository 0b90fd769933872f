//! Jar domain models.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A named savings bucket with a running balance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Jar {
    pub id: String,
    pub user_id: String,
    pub jar_name: String,
    pub goal_amount: f64,
    /// Running balance. Never negative: withdrawals are checked against it
    /// atomically.
    pub amount_saved: f64,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Input model for creating a jar.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewJar {
    pub jar_name: String,
    pub goal_amount: f64,
}

/// Partial jar update; absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JarUpdate {
    pub jar_name: Option<String>,
    pub goal_amount: Option<f64>,
}
