use async_trait::async_trait;
use chrono::NaiveDateTime;

use crate::errors::Result;
use crate::users::users_model::{
    IncomeSource, NewIncomeSource, NewRecurringExpense, NewUser, ProfileUpdate, RecurringExpense,
    User, UserProfile,
};

/// Trait for user repository operations.
#[async_trait]
pub trait UserRepositoryTrait: Send + Sync {
    fn find_by_email(&self, email: &str) -> Result<Option<User>>;
    async fn insert(&self, new_user: NewUser) -> Result<User>;
    async fn update_profile(&self, user_id: &str, update: ProfileUpdate) -> Result<User>;
    async fn set_otp(&self, user_id: &str, otp: &str, expires: NaiveDateTime) -> Result<()>;
    /// Atomically consumes a matching, unexpired OTP: clears it and returns
    /// the user, or returns `None` when no user/OTP pair matches.
    async fn take_otp(&self, email: &str, otp: &str, now: NaiveDateTime) -> Result<Option<User>>;
    async fn set_onboarded(&self, user_id: &str, finance_tips_opt_in: bool) -> Result<User>;

    fn list_income_sources(&self, user_id: &str) -> Result<Vec<IncomeSource>>;
    async fn add_income_source(
        &self,
        user_id: &str,
        source: NewIncomeSource,
    ) -> Result<IncomeSource>;
    async fn update_income_source(
        &self,
        user_id: &str,
        source_id: &str,
        source: NewIncomeSource,
    ) -> Result<IncomeSource>;
    async fn delete_income_source(&self, user_id: &str, source_id: &str) -> Result<usize>;
    async fn replace_income_sources(
        &self,
        user_id: &str,
        sources: Vec<NewIncomeSource>,
    ) -> Result<()>;

    fn list_recurring_expenses(&self, user_id: &str) -> Result<Vec<RecurringExpense>>;
    async fn add_recurring_expense(
        &self,
        user_id: &str,
        expense: NewRecurringExpense,
    ) -> Result<RecurringExpense>;
    async fn update_recurring_expense(
        &self,
        user_id: &str,
        expense_id: &str,
        expense: NewRecurringExpense,
    ) -> Result<RecurringExpense>;
    async fn delete_recurring_expense(&self, user_id: &str, expense_id: &str) -> Result<usize>;
    async fn replace_recurring_expenses(
        &self,
        user_id: &str,
        expenses: Vec<NewRecurringExpense>,
    ) -> Result<()>;
}

/// Trait for user service operations.
#[async_trait]
pub trait UserServiceTrait: Send + Sync {
    async fn register(&self, new_user: NewUser) -> Result<User>;
    /// Resolves the authenticated principal's record; 404 when absent.
    fn get_by_email(&self, email: &str) -> Result<User>;
    /// Generates, stores, and returns a fresh OTP for the user.
    async fn issue_otp(&self, email: &str, now: NaiveDateTime) -> Result<(User, String)>;
    async fn verify_otp(&self, email: &str, otp: &str, now: NaiveDateTime) -> Result<User>;

    async fn get_profile(&self, email: &str) -> Result<UserProfile>;
    async fn update_profile(&self, email: &str, update: ProfileUpdate) -> Result<UserProfile>;

    async fn add_income_source(
        &self,
        email: &str,
        source: NewIncomeSource,
    ) -> Result<UserProfile>;
    async fn update_income_source(
        &self,
        email: &str,
        source_id: &str,
        source: NewIncomeSource,
    ) -> Result<UserProfile>;
    async fn delete_income_source(&self, email: &str, source_id: &str) -> Result<UserProfile>;

    async fn add_recurring_expense(
        &self,
        email: &str,
        expense: NewRecurringExpense,
    ) -> Result<UserProfile>;
    async fn update_recurring_expense(
        &self,
        email: &str,
        expense_id: &str,
        expense: NewRecurringExpense,
    ) -> Result<UserProfile>;
    async fn delete_recurring_expense(&self, email: &str, expense_id: &str)
        -> Result<UserProfile>;
}
