//! Database models for users and their owned sub-entities.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use moneta_core::users::{IncomeSource, IncomeType, RecurringExpense, User};

#[derive(Queryable, Identifiable, Selectable, Debug, Clone)]
#[diesel(table_name = crate::schema::users)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct UserDB {
    pub id: String,
    pub full_name: String,
    pub email: String,
    pub password_hash: String,
    pub otp: Option<String>,
    pub otp_expires: Option<NaiveDateTime>,
    pub monthly_income: f64,
    pub income_type: String,
    pub finance_tips_opt_in: bool,
    pub onboarding_done: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::users)]
pub struct NewUserDB {
    pub id: String,
    pub full_name: String,
    pub email: String,
    pub password_hash: String,
    pub monthly_income: f64,
    pub income_type: String,
    pub finance_tips_opt_in: bool,
    pub onboarding_done: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Changeset for partial profile updates; `None` fields are left untouched.
#[derive(AsChangeset, Debug, Clone, Default)]
#[diesel(table_name = crate::schema::users)]
pub struct ProfileChangesDB {
    pub full_name: Option<String>,
    pub monthly_income: Option<f64>,
    pub income_type: Option<String>,
    pub finance_tips_opt_in: Option<bool>,
    pub updated_at: Option<NaiveDateTime>,
}

#[derive(Queryable, Identifiable, Insertable, Selectable, Debug, Clone)]
#[diesel(table_name = crate::schema::income_sources)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct IncomeSourceDB {
    pub id: String,
    pub user_id: String,
    pub source_name: String,
    pub amount: f64,
    pub position: i32,
}

#[derive(Queryable, Identifiable, Insertable, Selectable, Debug, Clone)]
#[diesel(table_name = crate::schema::recurring_expenses)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct RecurringExpenseDB {
    pub id: String,
    pub user_id: String,
    pub expense_name: String,
    pub amount: f64,
    pub position: i32,
}

impl From<UserDB> for User {
    fn from(db: UserDB) -> Self {
        Self {
            id: db.id,
            full_name: db.full_name,
            email: db.email,
            password_hash: db.password_hash,
            otp: db.otp,
            otp_expires: db.otp_expires,
            monthly_income: db.monthly_income,
            income_type: IncomeType::parse(&db.income_type),
            finance_tips_opt_in: db.finance_tips_opt_in,
            onboarding_done: db.onboarding_done,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}

impl From<IncomeSourceDB> for IncomeSource {
    fn from(db: IncomeSourceDB) -> Self {
        Self {
            id: db.id,
            user_id: db.user_id,
            source_name: db.source_name,
            amount: db.amount,
        }
    }
}

impl From<RecurringExpenseDB> for RecurringExpense {
    fn from(db: RecurringExpenseDB) -> Self {
        Self {
            id: db.id,
            user_id: db.user_id,
            expense_name: db.expense_name,
            amount: db.amount,
        }
    }
}
