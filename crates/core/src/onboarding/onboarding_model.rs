//! Onboarding submission payload.

use std::collections::HashMap;

use serde::Deserialize;

use crate::users::IncomeType;

/// The one-shot onboarding payload collected by the app's setup wizard.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OnboardingSubmission {
    pub income: OnboardingIncome,
    pub expenses: OnboardingExpenses,
    pub goals: OnboardingGoals,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OnboardingIncome {
    pub monthly_income: f64,
    pub income_type: OnboardingIncomeType,
    #[serde(default)]
    pub additional_sources: Vec<NamedAmount>,
}

/// Income type as the wizard sends it (lowercase).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OnboardingIncomeType {
    Monthly,
    Irregular,
}

impl From<OnboardingIncomeType> for IncomeType {
    fn from(t: OnboardingIncomeType) -> Self {
        match t {
            OnboardingIncomeType::Monthly => IncomeType::Monthly,
            OnboardingIncomeType::Irregular => IncomeType::Irregular,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NamedAmount {
    pub name: String,
    pub amount: f64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OnboardingExpenses {
    /// Amounts keyed by predefined expense id (rent, groceries, ...).
    #[serde(default)]
    pub predefined_expenses: HashMap<String, f64>,
    #[serde(default)]
    pub custom_expenses: Vec<NamedAmount>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OnboardingGoals {
    /// Targets keyed by predefined goal id (laptop, trip, ...).
    #[serde(default)]
    pub predefined_goals: HashMap<String, PredefinedGoal>,
    #[serde(default)]
    pub custom_goals: Vec<CustomGoal>,
    pub finance_tips: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredefinedGoal {
    pub amount: f64,
    pub date: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomGoal {
    pub name: String,
    pub amount: f64,
    pub date: Option<String>,
}

/// Display names for the wizard's predefined goal ids.
pub fn predefined_goal_name(id: &str) -> &'static str {
    match id {
        "laptop" => "New Laptop",
        "trip" => "Weekend Trip",
        "emergency" => "Build Emergency Fund",
        "invest" => "Invest in Stocks",
        _ => "Goal",
    }
}
