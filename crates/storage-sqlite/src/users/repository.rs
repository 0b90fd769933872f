use std::sync::Arc;

use async_trait::async_trait;
use chrono::{NaiveDateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::model::{
    IncomeSourceDB, NewUserDB, ProfileChangesDB, RecurringExpenseDB, UserDB,
};
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::IntoCore;
use crate::schema::{income_sources, recurring_expenses, users};
use moneta_core::errors::{Error, Result};
use moneta_core::users::{
    IncomeSource, NewIncomeSource, NewRecurringExpense, NewUser, ProfileUpdate, RecurringExpense,
    User, UserRepositoryTrait,
};

pub struct UserRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl UserRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        UserRepository { pool, writer }
    }
}

fn load_user(conn: &mut SqliteConnection, user_id: &str) -> Result<User> {
    let db = users::table
        .find(user_id)
        .first::<UserDB>(conn)
        .optional()
        .into_core()?
        .ok_or_else(|| Error::not_found("User not found"))?;
    Ok(User::from(db))
}

fn next_position(current_max: Option<i32>) -> i32 {
    current_max.map_or(0, |p| p + 1)
}

#[async_trait]
impl UserRepositoryTrait for UserRepository {
    fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let mut conn = get_connection(&self.pool)?;
        let db = users::table
            .filter(users::email.eq(email))
            .first::<UserDB>(&mut conn)
            .optional()
            .into_core()?;
        Ok(db.map(User::from))
    }

    async fn insert(&self, new_user: NewUser) -> Result<User> {
        self.writer
            .exec(move |conn| {
                let now = Utc::now().naive_utc();
                let row = NewUserDB {
                    id: Uuid::new_v4().to_string(),
                    full_name: new_user.full_name,
                    email: new_user.email,
                    password_hash: new_user.password_hash,
                    monthly_income: 0.0,
                    income_type: "Monthly".to_string(),
                    finance_tips_opt_in: false,
                    onboarding_done: false,
                    created_at: now,
                    updated_at: now,
                };
                let db = diesel::insert_into(users::table)
                    .values(&row)
                    .returning(UserDB::as_returning())
                    .get_result(conn)
                    .into_core()?;
                Ok(User::from(db))
            })
            .await
    }

    async fn update_profile(&self, user_id: &str, update: ProfileUpdate) -> Result<User> {
        let user_id = user_id.to_string();
        self.writer
            .exec(move |conn| {
                let changes = ProfileChangesDB {
                    full_name: update.full_name,
                    monthly_income: update.monthly_income,
                    income_type: update.income_type.map(|t| t.as_str().to_string()),
                    finance_tips_opt_in: update.finance_tips_opt_in,
                    updated_at: Some(Utc::now().naive_utc()),
                };
                let affected = diesel::update(users::table.find(&user_id))
                    .set(&changes)
                    .execute(conn)
                    .into_core()?;
                if affected == 0 {
                    return Err(Error::not_found("User not found"));
                }
                load_user(conn, &user_id)
            })
            .await
    }

    async fn set_otp(&self, user_id: &str, otp: &str, expires: NaiveDateTime) -> Result<()> {
        let user_id = user_id.to_string();
        let otp = otp.to_string();
        self.writer
            .exec(move |conn| {
                let affected = diesel::update(users::table.find(&user_id))
                    .set((
                        users::otp.eq(Some(otp)),
                        users::otp_expires.eq(Some(expires)),
                        users::updated_at.eq(Utc::now().naive_utc()),
                    ))
                    .execute(conn)
                    .into_core()?;
                if affected == 0 {
                    return Err(Error::not_found("User not found"));
                }
                Ok(())
            })
            .await
    }

    async fn take_otp(&self, email: &str, otp: &str, now: NaiveDateTime) -> Result<Option<User>> {
        let email = email.to_string();
        let otp = otp.to_string();
        self.writer
            .exec(move |conn| {
                let found = users::table
                    .filter(users::email.eq(&email))
                    .filter(users::otp.eq(Some(otp.as_str())))
                    .filter(users::otp_expires.gt(Some(now)))
                    .first::<UserDB>(conn)
                    .optional()
                    .into_core()?;
                let Some(db) = found else {
                    return Ok(None);
                };
                diesel::update(users::table.find(&db.id))
                    .set((
                        users::otp.eq(None::<String>),
                        users::otp_expires.eq(None::<NaiveDateTime>),
                        users::updated_at.eq(Utc::now().naive_utc()),
                    ))
                    .execute(conn)
                    .into_core()?;
                load_user(conn, &db.id).map(Some)
            })
            .await
    }

    async fn set_onboarded(&self, user_id: &str, finance_tips_opt_in: bool) -> Result<User> {
        let user_id = user_id.to_string();
        self.writer
            .exec(move |conn| {
                let affected = diesel::update(users::table.find(&user_id))
                    .set((
                        users::finance_tips_opt_in.eq(finance_tips_opt_in),
                        users::onboarding_done.eq(true),
                        users::updated_at.eq(Utc::now().naive_utc()),
                    ))
                    .execute(conn)
                    .into_core()?;
                if affected == 0 {
                    return Err(Error::not_found("User not found"));
                }
                load_user(conn, &user_id)
            })
            .await
    }

    fn list_income_sources(&self, user_id: &str) -> Result<Vec<IncomeSource>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = income_sources::table
            .filter(income_sources::user_id.eq(user_id))
            .order(income_sources::position.asc())
            .load::<IncomeSourceDB>(&mut conn)
            .into_core()?;
        Ok(rows.into_iter().map(IncomeSource::from).collect())
    }

    async fn add_income_source(
        &self,
        user_id: &str,
        source: NewIncomeSource,
    ) -> Result<IncomeSource> {
        let user_id = user_id.to_string();
        self.writer
            .exec(move |conn| {
                let max: Option<i32> = income_sources::table
                    .filter(income_sources::user_id.eq(&user_id))
                    .select(diesel::dsl::max(income_sources::position))
                    .first(conn)
                    .into_core()?;
                let row = IncomeSourceDB {
                    id: Uuid::new_v4().to_string(),
                    user_id,
                    source_name: source.source_name,
                    amount: source.amount,
                    position: next_position(max),
                };
                let db = diesel::insert_into(income_sources::table)
                    .values(&row)
                    .returning(IncomeSourceDB::as_returning())
                    .get_result(conn)
                    .into_core()?;
                Ok(IncomeSource::from(db))
            })
            .await
    }

    async fn update_income_source(
        &self,
        user_id: &str,
        source_id: &str,
        source: NewIncomeSource,
    ) -> Result<IncomeSource> {
        let user_id = user_id.to_string();
        let source_id = source_id.to_string();
        self.writer
            .exec(move |conn| {
                let affected = diesel::update(
                    income_sources::table
                        .filter(income_sources::id.eq(&source_id))
                        .filter(income_sources::user_id.eq(&user_id)),
                )
                .set((
                    income_sources::source_name.eq(&source.source_name),
                    income_sources::amount.eq(source.amount),
                ))
                .execute(conn)
                .into_core()?;
                if affected == 0 {
                    return Err(Error::not_found("Income source not found"));
                }
                let db = income_sources::table
                    .find(&source_id)
                    .first::<IncomeSourceDB>(conn)
                    .into_core()?;
                Ok(IncomeSource::from(db))
            })
            .await
    }

    async fn delete_income_source(&self, user_id: &str, source_id: &str) -> Result<usize> {
        let user_id = user_id.to_string();
        let source_id = source_id.to_string();
        self.writer
            .exec(move |conn| {
                diesel::delete(
                    income_sources::table
                        .filter(income_sources::id.eq(&source_id))
                        .filter(income_sources::user_id.eq(&user_id)),
                )
                .execute(conn)
                .into_core()
            })
            .await
    }

    async fn replace_income_sources(
        &self,
        user_id: &str,
        sources: Vec<NewIncomeSource>,
    ) -> Result<()> {
        let user_id = user_id.to_string();
        self.writer
            .exec(move |conn| {
                diesel::delete(
                    income_sources::table.filter(income_sources::user_id.eq(&user_id)),
                )
                .execute(conn)
                .into_core()?;
                let rows: Vec<IncomeSourceDB> = sources
                    .into_iter()
                    .enumerate()
                    .map(|(i, s)| IncomeSourceDB {
                        id: Uuid::new_v4().to_string(),
                        user_id: user_id.clone(),
                        source_name: s.source_name,
                        amount: s.amount,
                        position: i as i32,
                    })
                    .collect();
                diesel::insert_into(income_sources::table)
                    .values(&rows)
                    .execute(conn)
                    .into_core()?;
                Ok(())
            })
            .await
    }

    fn list_recurring_expenses(&self, user_id: &str) -> Result<Vec<RecurringExpense>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = recurring_expenses::table
            .filter(recurring_expenses::user_id.eq(user_id))
            .order(recurring_expenses::position.asc())
            .load::<RecurringExpenseDB>(&mut conn)
            .into_core()?;
        Ok(rows.into_iter().map(RecurringExpense::from).collect())
    }

    async fn add_recurring_expense(
        &self,
        user_id: &str,
        expense: NewRecurringExpense,
    ) -> Result<RecurringExpense> {
        let user_id = user_id.to_string();
        self.writer
            .exec(move |conn| {
                let max: Option<i32> = recurring_expenses::table
                    .filter(recurring_expenses::user_id.eq(&user_id))
                    .select(diesel::dsl::max(recurring_expenses::position))
                    .first(conn)
                    .into_core()?;
                let row = RecurringExpenseDB {
                    id: Uuid::new_v4().to_string(),
                    user_id,
                    expense_name: expense.expense_name,
                    amount: expense.amount,
                    position: next_position(max),
                };
                let db = diesel::insert_into(recurring_expenses::table)
                    .values(&row)
                    .returning(RecurringExpenseDB::as_returning())
                    .get_result(conn)
                    .into_core()?;
                Ok(RecurringExpense::from(db))
            })
            .await
    }

    async fn update_recurring_expense(
        &self,
        user_id: &str,
        expense_id: &str,
        expense: NewRecurringExpense,
    ) -> Result<RecurringExpense> {
        let user_id = user_id.to_string();
        let expense_id = expense_id.to_string();
        self.writer
            .exec(move |conn| {
                let affected = diesel::update(
                    recurring_expenses::table
                        .filter(recurring_expenses::id.eq(&expense_id))
                        .filter(recurring_expenses::user_id.eq(&user_id)),
                )
                .set((
                    recurring_expenses::expense_name.eq(&expense.expense_name),
                    recurring_expenses::amount.eq(expense.amount),
                ))
                .execute(conn)
                .into_core()?;
                if affected == 0 {
                    return Err(Error::not_found("Expense not found"));
                }
                let db = recurring_expenses::table
                    .find(&expense_id)
                    .first::<RecurringExpenseDB>(conn)
                    .into_core()?;
                Ok(RecurringExpense::from(db))
            })
            .await
    }

    async fn delete_recurring_expense(&self, user_id: &str, expense_id: &str) -> Result<usize> {
        let user_id = user_id.to_string();
        let expense_id = expense_id.to_string();
        self.writer
            .exec(move |conn| {
                diesel::delete(
                    recurring_expenses::table
                        .filter(recurring_expenses::id.eq(&expense_id))
                        .filter(recurring_expenses::user_id.eq(&user_id)),
                )
                .execute(conn)
                .into_core()
            })
            .await
    }

    async fn replace_recurring_expenses(
        &self,
        user_id: &str,
        expenses: Vec<NewRecurringExpense>,
    ) -> Result<()> {
        let user_id = user_id.to_string();
        self.writer
            .exec(move |conn| {
                diesel::delete(
                    recurring_expenses::table.filter(recurring_expenses::user_id.eq(&user_id)),
                )
                .execute(conn)
                .into_core()?;
                let rows: Vec<RecurringExpenseDB> = expenses
                    .into_iter()
                    .enumerate()
                    .map(|(i, e)| RecurringExpenseDB {
                        id: Uuid::new_v4().to_string(),
                        user_id: user_id.clone(),
                        expense_name: e.expense_name,
                        amount: e.amount,
                        position: i as i32,
                    })
                    .collect();
                diesel::insert_into(recurring_expenses::table)
                    .values(&rows)
                    .execute(conn)
                    .into_core()?;
                Ok(())
            })
            .await
    }
}
