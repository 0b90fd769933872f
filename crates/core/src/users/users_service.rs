use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, NaiveDateTime};
use rand::Rng;

use super::users_model::{
    NewIncomeSource, NewRecurringExpense, NewUser, ProfileUpdate, User, UserProfile,
};
use super::users_traits::{UserRepositoryTrait, UserServiceTrait};
use crate::cache::{profile_key, read_through, Cache, CacheInvalidator, EntityChange};
use crate::constants::{CACHE_TTL_LONG_SECS, OTP_VALIDITY_MINUTES};
use crate::errors::{DatabaseError, Error, Result};

/// Service for accounts and financial profiles.
pub struct UserService {
    repository: Arc<dyn UserRepositoryTrait>,
    cache: Arc<dyn Cache>,
    invalidator: CacheInvalidator,
}

impl UserService {
    pub fn new(
        repository: Arc<dyn UserRepositoryTrait>,
        cache: Arc<dyn Cache>,
        invalidator: CacheInvalidator,
    ) -> Self {
        Self {
            repository,
            cache,
            invalidator,
        }
    }

    fn load_profile(&self, email: &str) -> Result<UserProfile> {
        let user = self.require_user(email)?;
        let sources = self.repository.list_income_sources(&user.id)?;
        let expenses = self.repository.list_recurring_expenses(&user.id)?;
        Ok(UserProfile::assemble(user, sources, expenses))
    }

    fn require_user(&self, email: &str) -> Result<User> {
        self.repository
            .find_by_email(email)?
            .ok_or_else(|| Error::not_found("User not found"))
    }

    /// Fresh profile for mutation responses, with the stale cache purged.
    async fn profile_after_change(&self, email: &str) -> Result<UserProfile> {
        self.invalidator
            .purge(email, &[EntityChange::Profile])
            .await;
        self.load_profile(email)
    }
}

fn validate_name(name: &str, what: &str) -> Result<()> {
    if name.trim().len() < 2 {
        return Err(Error::invalid_input(format!(
            "{} must be at least 2 characters long",
            what
        )));
    }
    Ok(())
}

fn validate_amount(amount: f64, what: &str) -> Result<()> {
    if !amount.is_finite() || amount < 0.0 {
        return Err(Error::invalid_input(format!(
            "{} must be a non-negative number",
            what
        )));
    }
    Ok(())
}

#[async_trait]
impl UserServiceTrait for UserService {
    async fn register(&self, new_user: NewUser) -> Result<User> {
        validate_name(&new_user.full_name, "Full name")?;
        if !new_user.email.contains('@') || new_user.email.trim().len() < 3 {
            return Err(Error::invalid_input("Please provide a valid email address"));
        }

        let new_user = NewUser {
            full_name: new_user.full_name.trim().to_string(),
            email: new_user.email.trim().to_lowercase(),
            password_hash: new_user.password_hash,
        };
        match self.repository.insert(new_user).await {
            Err(Error::Database(DatabaseError::UniqueViolation(_))) => Err(Error::business(
                "User with this email already exists.",
            )),
            other => other,
        }
    }

    fn get_by_email(&self, email: &str) -> Result<User> {
        self.require_user(email)
    }

    async fn issue_otp(&self, email: &str, now: NaiveDateTime) -> Result<(User, String)> {
        let user = self.require_user(email)?;
        let otp = format!("{:06}", rand::thread_rng().gen_range(0..1_000_000u32));
        let expires = now + ChronoDuration::minutes(OTP_VALIDITY_MINUTES);
        self.repository.set_otp(&user.id, &otp, expires).await?;
        Ok((user, otp))
    }

    async fn verify_otp(&self, email: &str, otp: &str, now: NaiveDateTime) -> Result<User> {
        self.repository
            .take_otp(email, otp, now)
            .await?
            .ok_or_else(|| {
                Error::business("Invalid or expired OTP. Please try logging in again.")
            })
    }

    async fn get_profile(&self, email: &str) -> Result<UserProfile> {
        let key = profile_key(email);
        let ttl = Duration::from_secs(CACHE_TTL_LONG_SECS);
        read_through(self.cache.as_ref(), &key, ttl, || self.load_profile(email)).await
    }

    async fn update_profile(&self, email: &str, update: ProfileUpdate) -> Result<UserProfile> {
        if let Some(name) = &update.full_name {
            validate_name(name, "Full name")?;
        }
        if let Some(income) = update.monthly_income {
            validate_amount(income, "Monthly income")?;
        }
        let user = self.require_user(email)?;
        self.repository.update_profile(&user.id, update).await?;
        self.profile_after_change(email).await
    }

    async fn add_income_source(
        &self,
        email: &str,
        source: NewIncomeSource,
    ) -> Result<UserProfile> {
        validate_name(&source.source_name, "Source name")?;
        validate_amount(source.amount, "Amount")?;
        let user = self.require_user(email)?;
        self.repository.add_income_source(&user.id, source).await?;
        self.profile_after_change(email).await
    }

    async fn update_income_source(
        &self,
        email: &str,
        source_id: &str,
        source: NewIncomeSource,
    ) -> Result<UserProfile> {
        validate_name(&source.source_name, "Source name")?;
        validate_amount(source.amount, "Amount")?;
        let user = self.require_user(email)?;
        self.repository
            .update_income_source(&user.id, source_id, source)
            .await?;
        self.profile_after_change(email).await
    }

    async fn delete_income_source(&self, email: &str, source_id: &str) -> Result<UserProfile> {
        let user = self.require_user(email)?;
        let deleted = self
            .repository
            .delete_income_source(&user.id, source_id)
            .await?;
        if deleted == 0 {
            return Err(Error::not_found("Income source not found"));
        }
        self.profile_after_change(email).await
    }

    async fn add_recurring_expense(
        &self,
        email: &str,
        expense: NewRecurringExpense,
    ) -> Result<UserProfile> {
        validate_name(&expense.expense_name, "Expense name")?;
        validate_amount(expense.amount, "Amount")?;
        let user = self.require_user(email)?;
        self.repository
            .add_recurring_expense(&user.id, expense)
            .await?;
        self.profile_after_change(email).await
    }

    async fn update_recurring_expense(
        &self,
        email: &str,
        expense_id: &str,
        expense: NewRecurringExpense,
    ) -> Result<UserProfile> {
        validate_name(&expense.expense_name, "Expense name")?;
        validate_amount(expense.amount, "Amount")?;
        let user = self.require_user(email)?;
        self.repository
            .update_recurring_expense(&user.id, expense_id, expense)
            .await?;
        self.profile_after_change(email).await
    }

    async fn delete_recurring_expense(
        &self,
        email: &str,
        expense_id: &str,
    ) -> Result<UserProfile> {
        let user = self.require_user(email)?;
        let deleted = self
            .repository
            .delete_recurring_expense(&user.id, expense_id)
            .await?;
        if deleted == 0 {
            return Err(Error::not_found("Expense not found"));
        }
        self.profile_after_change(email).await
    }
}
