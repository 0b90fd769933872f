//! Recurring-sync job marker.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Per-user marker recording the last calendar month for which the standing
/// income/expense profile was materialized into transactions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncJob {
    pub user_id: String,
    pub last_synced_month: i32,
    pub last_synced_year: i32,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}
