//! User domain models.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// How a user's main income arrives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IncomeType {
    Monthly,
    Irregular,
}

impl IncomeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            IncomeType::Monthly => "Monthly",
            IncomeType::Irregular => "Irregular",
        }
    }

    /// Parses a stored value, defaulting to `Monthly` for unknown input.
    pub fn parse(s: &str) -> Self {
        match s {
            "Irregular" => IncomeType::Irregular,
            _ => IncomeType::Monthly,
        }
    }
}

/// Full user record, including credentials. Never serialized to clients;
/// the outward-facing view is [`UserProfile`].
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: String,
    pub full_name: String,
    pub email: String,
    pub password_hash: String,
    pub otp: Option<String>,
    pub otp_expires: Option<NaiveDateTime>,
    pub monthly_income: f64,
    pub income_type: IncomeType,
    pub finance_tips_opt_in: bool,
    pub onboarding_done: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Input model for signup.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub full_name: String,
    pub email: String,
    pub password_hash: String,
}

/// Partial profile update; absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    pub full_name: Option<String>,
    pub monthly_income: Option<f64>,
    pub income_type: Option<IncomeType>,
    pub finance_tips_opt_in: Option<bool>,
}

/// A named extra income stream owned by a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncomeSource {
    pub id: String,
    pub user_id: String,
    pub source_name: String,
    pub amount: f64,
}

/// Input model for creating or replacing an income source.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewIncomeSource {
    pub source_name: String,
    pub amount: f64,
}

/// A named standing monthly expense owned by a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecurringExpense {
    pub id: String,
    pub user_id: String,
    pub expense_name: String,
    pub amount: f64,
}

/// Input model for creating or replacing a recurring expense.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRecurringExpense {
    pub expense_name: String,
    pub amount: f64,
}

/// The user document served to clients: everything except credentials and
/// OTP state, with the owned sub-entities embedded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: String,
    pub full_name: String,
    pub email: String,
    pub monthly_income: f64,
    pub income_type: IncomeType,
    pub income_sources: Vec<IncomeSource>,
    pub recurring_expenses: Vec<RecurringExpense>,
    pub finance_tips_opt_in: bool,
    pub onboarding_done: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl UserProfile {
    /// Assembles the outward-facing profile from a user row and its
    /// sub-entities.
    pub fn assemble(
        user: User,
        income_sources: Vec<IncomeSource>,
        recurring_expenses: Vec<RecurringExpense>,
    ) -> Self {
        Self {
            id: user.id,
            full_name: user.full_name,
            email: user.email,
            monthly_income: user.monthly_income,
            income_type: user.income_type,
            income_sources,
            recurring_expenses,
            finance_tips_opt_in: user.finance_tips_opt_in,
            onboarding_done: user.onboarding_done,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}
