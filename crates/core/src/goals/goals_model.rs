//! Goal domain models.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle state of a goal. `Completed` is terminal: it is reached exactly
/// when the saved amount meets the target, and never reverts automatically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GoalStatus {
    #[serde(rename = "In Progress")]
    InProgress,
    Completed,
}

impl GoalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            GoalStatus::InProgress => "In Progress",
            GoalStatus::Completed => "Completed",
        }
    }

    /// Parses a stored value, defaulting to `In Progress` for unknown input.
    pub fn parse(s: &str) -> Self {
        match s {
            "Completed" => GoalStatus::Completed,
            _ => GoalStatus::InProgress,
        }
    }
}

/// A savings target with a deadline, tracked independently of jars.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    pub id: String,
    pub user_id: String,
    pub goal_name: String,
    pub target_amount: f64,
    pub amount_saved: f64,
    pub target_date: NaiveDateTime,
    pub status: GoalStatus,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Input model for creating a goal.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewGoal {
    pub goal_name: String,
    pub target_amount: f64,
    pub target_date: DateTime<Utc>,
}

/// Partial goal update; absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalUpdate {
    pub goal_name: Option<String>,
    pub target_amount: Option<f64>,
    pub target_date: Option<DateTime<Utc>>,
}
