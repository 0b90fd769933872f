//! Shared mocks and fixtures for service unit tests.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};

use crate::errors::{DatabaseError, Error, Result};
use crate::users::{
    IncomeSource, IncomeType, NewIncomeSource, NewRecurringExpense, NewUser, ProfileUpdate,
    RecurringExpense, User, UserRepositoryTrait,
};

pub fn ts(year: i32, month: u32, day: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(year, month, day)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap()
}

pub fn test_user(id: &str, email: &str) -> User {
    User {
        id: id.to_string(),
        full_name: "John Doe".to_string(),
        email: email.to_string(),
        password_hash: "hash".to_string(),
        otp: None,
        otp_expires: None,
        monthly_income: 0.0,
        income_type: IncomeType::Monthly,
        finance_tips_opt_in: false,
        onboarding_done: false,
        created_at: ts(2026, 1, 1),
        updated_at: ts(2026, 1, 1),
    }
}

/// In-memory `UserRepositoryTrait` used across service tests.
#[derive(Default)]
pub struct MockUserRepository {
    pub users: Mutex<Vec<User>>,
    pub income_sources: Mutex<Vec<IncomeSource>>,
    pub recurring_expenses: Mutex<Vec<RecurringExpense>>,
}

impl MockUserRepository {
    pub fn with_user(user: User) -> Arc<Self> {
        let repo = Self::default();
        repo.users.lock().unwrap().push(user);
        Arc::new(repo)
    }

    pub fn add_income_source_row(&self, user_id: &str, name: &str, amount: f64) {
        let mut sources = self.income_sources.lock().unwrap();
        let id = format!("src-{}", sources.len() + 1);
        sources.push(IncomeSource {
            id,
            user_id: user_id.to_string(),
            source_name: name.to_string(),
            amount,
        });
    }

    pub fn add_recurring_expense_row(&self, user_id: &str, name: &str, amount: f64) {
        let mut expenses = self.recurring_expenses.lock().unwrap();
        let id = format!("exp-{}", expenses.len() + 1);
        expenses.push(RecurringExpense {
            id,
            user_id: user_id.to_string(),
            expense_name: name.to_string(),
            amount,
        });
    }
}

#[async_trait]
impl UserRepositoryTrait for MockUserRepository {
    fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn insert(&self, new_user: NewUser) -> Result<User> {
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|u| u.email == new_user.email) {
            return Err(Error::Database(DatabaseError::UniqueViolation(
                "users.email".to_string(),
            )));
        }
        let mut user = test_user(&format!("user-{}", users.len() + 1), &new_user.email);
        user.full_name = new_user.full_name;
        user.password_hash = new_user.password_hash;
        users.push(user.clone());
        Ok(user)
    }

    async fn update_profile(&self, user_id: &str, update: ProfileUpdate) -> Result<User> {
        let mut users = self.users.lock().unwrap();
        let user = users
            .iter_mut()
            .find(|u| u.id == user_id)
            .ok_or_else(|| Error::not_found("User not found"))?;
        if let Some(name) = update.full_name {
            user.full_name = name;
        }
        if let Some(income) = update.monthly_income {
            user.monthly_income = income;
        }
        if let Some(income_type) = update.income_type {
            user.income_type = income_type;
        }
        if let Some(opt_in) = update.finance_tips_opt_in {
            user.finance_tips_opt_in = opt_in;
        }
        Ok(user.clone())
    }

    async fn set_otp(&self, user_id: &str, otp: &str, expires: NaiveDateTime) -> Result<()> {
        let mut users = self.users.lock().unwrap();
        let user = users
            .iter_mut()
            .find(|u| u.id == user_id)
            .ok_or_else(|| Error::not_found("User not found"))?;
        user.otp = Some(otp.to_string());
        user.otp_expires = Some(expires);
        Ok(())
    }

    async fn take_otp(&self, email: &str, otp: &str, now: NaiveDateTime) -> Result<Option<User>> {
        let mut users = self.users.lock().unwrap();
        let Some(user) = users.iter_mut().find(|u| {
            u.email == email
                && u.otp.as_deref() == Some(otp)
                && u.otp_expires.is_some_and(|e| e > now)
        }) else {
            return Ok(None);
        };
        user.otp = None;
        user.otp_expires = None;
        Ok(Some(user.clone()))
    }

    async fn set_onboarded(&self, user_id: &str, finance_tips_opt_in: bool) -> Result<User> {
        let mut users = self.users.lock().unwrap();
        let user = users
            .iter_mut()
            .find(|u| u.id == user_id)
            .ok_or_else(|| Error::not_found("User not found"))?;
        user.finance_tips_opt_in = finance_tips_opt_in;
        user.onboarding_done = true;
        Ok(user.clone())
    }

    fn list_income_sources(&self, user_id: &str) -> Result<Vec<IncomeSource>> {
        Ok(self
            .income_sources
            .lock()
            .unwrap()
            .iter()
            .filter(|s| s.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn add_income_source(
        &self,
        user_id: &str,
        source: NewIncomeSource,
    ) -> Result<IncomeSource> {
        self.add_income_source_row(user_id, &source.source_name, source.amount);
        Ok(self.income_sources.lock().unwrap().last().cloned().unwrap())
    }

    async fn update_income_source(
        &self,
        user_id: &str,
        source_id: &str,
        source: NewIncomeSource,
    ) -> Result<IncomeSource> {
        let mut sources = self.income_sources.lock().unwrap();
        let row = sources
            .iter_mut()
            .find(|s| s.user_id == user_id && s.id == source_id)
            .ok_or_else(|| Error::not_found("Income source not found"))?;
        row.source_name = source.source_name;
        row.amount = source.amount;
        Ok(row.clone())
    }

    async fn delete_income_source(&self, user_id: &str, source_id: &str) -> Result<usize> {
        let mut sources = self.income_sources.lock().unwrap();
        let before = sources.len();
        sources.retain(|s| !(s.user_id == user_id && s.id == source_id));
        Ok(before - sources.len())
    }

    async fn replace_income_sources(
        &self,
        user_id: &str,
        sources: Vec<NewIncomeSource>,
    ) -> Result<()> {
        self.income_sources
            .lock()
            .unwrap()
            .retain(|s| s.user_id != user_id);
        for source in sources {
            self.add_income_source_row(user_id, &source.source_name, source.amount);
        }
        Ok(())
    }

    fn list_recurring_expenses(&self, user_id: &str) -> Result<Vec<RecurringExpense>> {
        Ok(self
            .recurring_expenses
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn add_recurring_expense(
        &self,
        user_id: &str,
        expense: NewRecurringExpense,
    ) -> Result<RecurringExpense> {
        self.add_recurring_expense_row(user_id, &expense.expense_name, expense.amount);
        Ok(self
            .recurring_expenses
            .lock()
            .unwrap()
            .last()
            .cloned()
            .unwrap())
    }

    async fn update_recurring_expense(
        &self,
        user_id: &str,
        expense_id: &str,
        expense: NewRecurringExpense,
    ) -> Result<RecurringExpense> {
        let mut expenses = self.recurring_expenses.lock().unwrap();
        let row = expenses
            .iter_mut()
            .find(|e| e.user_id == user_id && e.id == expense_id)
            .ok_or_else(|| Error::not_found("Expense not found"))?;
        row.expense_name = expense.expense_name;
        row.amount = expense.amount;
        Ok(row.clone())
    }

    async fn delete_recurring_expense(&self, user_id: &str, expense_id: &str) -> Result<usize> {
        let mut expenses = self.recurring_expenses.lock().unwrap();
        let before = expenses.len();
        expenses.retain(|e| !(e.user_id == user_id && e.id == expense_id));
        Ok(before - expenses.len())
    }

    async fn replace_recurring_expenses(
        &self,
        user_id: &str,
        expenses: Vec<NewRecurringExpense>,
    ) -> Result<()> {
        self.recurring_expenses
            .lock()
            .unwrap()
            .retain(|e| e.user_id != user_id);
        for expense in expenses {
            self.add_recurring_expense_row(user_id, &expense.expense_name, expense.amount);
        }
        Ok(())
    }
}
