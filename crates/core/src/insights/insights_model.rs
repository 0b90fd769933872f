//! Insight domain models.

use serde::{Deserialize, Serialize};

/// Tone of an insight; the client maps these to its own styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightKind {
    Positive,
    Tip,
    Suggestion,
    Reminder,
}

/// One short piece of generated financial advice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Insight {
    pub title: String,
    pub description: String,
    pub kind: InsightKind,
}

/// Snapshot of a user's financial state, rendered into natural-language
/// facts for the generator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialFacts {
    /// Ad-hoc income recorded this month.
    pub month_income: f64,
    /// Ad-hoc spending recorded this month.
    pub month_expense: f64,
    /// Standing monthly income from the profile.
    pub monthly_income: f64,
    /// Sum of standing recurring expenses.
    pub recurring_expense_total: f64,
    pub jars: Vec<JarFact>,
    pub goals: Vec<GoalFact>,
    /// Unpaid charges already past their due date.
    pub due_charge_count: i64,
    pub finance_tips_opt_in: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JarFact {
    pub jar_name: String,
    pub goal_amount: f64,
    pub amount_saved: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalFact {
    pub goal_name: String,
    pub target_amount: f64,
    pub amount_saved: f64,
    pub completed: bool,
}
