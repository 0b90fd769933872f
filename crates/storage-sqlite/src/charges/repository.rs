use std::sync::Arc;

use async_trait::async_trait;
use chrono::{NaiveDateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::model::{ChargeChangesDB, ChargeDB, NewChargeDB};
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::IntoCore;
use crate::schema::{transactions, upcoming_charges};
use crate::transactions::transaction_row;
use moneta_core::charges::{
    ChargeRepositoryTrait, ChargeStatus, ChargeUpdate, NewCharge, UpcomingCharge,
};
use moneta_core::errors::{Error, Result};
use moneta_core::transactions::{NewTransactionRecord, TransactionType};

const CHARGE_NOT_FOUND: &str = "Charge not found or access denied.";

pub struct ChargeRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl ChargeRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        ChargeRepository { pool, writer }
    }
}

fn find_owned(conn: &mut SqliteConnection, user_id: &str, charge_id: &str) -> Result<ChargeDB> {
    upcoming_charges::table
        .filter(upcoming_charges::id.eq(charge_id))
        .filter(upcoming_charges::user_id.eq(user_id))
        .first::<ChargeDB>(conn)
        .optional()
        .into_core()?
        .ok_or_else(|| Error::not_found(CHARGE_NOT_FOUND))
}

#[async_trait]
impl ChargeRepositoryTrait for ChargeRepository {
    async fn insert(&self, user_id: &str, new_charge: NewCharge) -> Result<UpcomingCharge> {
        let now = Utc::now().naive_utc();
        let row = NewChargeDB {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            charge_name: new_charge.charge_name,
            field: new_charge.field,
            due_date: new_charge.due_date.naive_utc(),
            amount: new_charge.amount,
            is_paid: false,
            status: ChargeStatus::Upcoming.as_str().to_string(),
            created_at: now,
            updated_at: now,
        };
        self.writer
            .exec(move |conn| {
                let db = diesel::insert_into(upcoming_charges::table)
                    .values(&row)
                    .returning(ChargeDB::as_returning())
                    .get_result(conn)
                    .into_core()?;
                Ok(UpcomingCharge::from(db))
            })
            .await
    }

    fn list(&self, user_id: &str, status: ChargeStatus) -> Result<Vec<UpcomingCharge>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = upcoming_charges::table
            .filter(upcoming_charges::user_id.eq(user_id))
            .filter(upcoming_charges::status.eq(status.as_str()))
            .order(upcoming_charges::due_date.asc())
            .load::<ChargeDB>(&mut conn)
            .into_core()?;
        Ok(rows.into_iter().map(UpcomingCharge::from).collect())
    }

    async fn update(
        &self,
        user_id: &str,
        charge_id: &str,
        update: ChargeUpdate,
    ) -> Result<UpcomingCharge> {
        let user_id = user_id.to_string();
        let charge_id = charge_id.to_string();
        self.writer
            .exec(move |conn| {
                let changes = ChargeChangesDB {
                    charge_name: update.charge_name,
                    field: update.field,
                    due_date: update.due_date.map(|d| d.naive_utc()),
                    amount: update.amount,
                    updated_at: Some(Utc::now().naive_utc()),
                };
                let affected = diesel::update(
                    upcoming_charges::table
                        .filter(upcoming_charges::id.eq(&charge_id))
                        .filter(upcoming_charges::user_id.eq(&user_id)),
                )
                .set(&changes)
                .execute(conn)
                .into_core()?;
                if affected == 0 {
                    return Err(Error::not_found(CHARGE_NOT_FOUND));
                }
                let db = upcoming_charges::table
                    .find(&charge_id)
                    .first::<ChargeDB>(conn)
                    .into_core()?;
                Ok(UpcomingCharge::from(db))
            })
            .await
    }

    async fn set_paid(
        &self,
        user_id: &str,
        charge_id: &str,
        now: NaiveDateTime,
    ) -> Result<UpcomingCharge> {
        let user_id = user_id.to_string();
        let charge_id = charge_id.to_string();
        self.writer
            .exec(move |conn| {
                let charge = find_owned(conn, &user_id, &charge_id)?;

                let updated = diesel::update(upcoming_charges::table.find(&charge.id))
                    .set((
                        upcoming_charges::is_paid.eq(true),
                        upcoming_charges::status.eq(ChargeStatus::Paid.as_str()),
                        upcoming_charges::updated_at.eq(now),
                    ))
                    .returning(ChargeDB::as_returning())
                    .get_result(conn)
                    .into_core()?;

                // The payment itself, linked back to the charge by id.
                let ledger = transaction_row(
                    &user_id,
                    NewTransactionRecord {
                        amount: charge.amount,
                        transaction_type: TransactionType::Expense,
                        category: charge.field.clone(),
                        description: Some(format!("Paid charge: {}", charge.charge_name)),
                        transaction_date: now,
                        charge_id: Some(charge.id.clone()),
                    },
                );
                diesel::insert_into(transactions::table)
                    .values(&ledger)
                    .execute(conn)
                    .into_core()?;

                Ok(UpcomingCharge::from(updated))
            })
            .await
    }

    async fn set_not_paid(
        &self,
        user_id: &str,
        charge_id: &str,
        now: NaiveDateTime,
    ) -> Result<UpcomingCharge> {
        let user_id = user_id.to_string();
        let charge_id = charge_id.to_string();
        self.writer
            .exec(move |conn| {
                let charge = find_owned(conn, &user_id, &charge_id)?;

                let reverted_status = if charge.due_date < now {
                    ChargeStatus::Due
                } else {
                    ChargeStatus::Upcoming
                };
                let updated = diesel::update(upcoming_charges::table.find(&charge.id))
                    .set((
                        upcoming_charges::is_paid.eq(false),
                        upcoming_charges::status.eq(reverted_status.as_str()),
                        upcoming_charges::updated_at.eq(now),
                    ))
                    .returning(ChargeDB::as_returning())
                    .get_result(conn)
                    .into_core()?;

                // Drop the payment transaction recorded by mark-paid.
                diesel::delete(
                    transactions::table
                        .filter(transactions::user_id.eq(&user_id))
                        .filter(transactions::charge_id.eq(Some(charge.id.as_str()))),
                )
                .execute(conn)
                .into_core()?;

                Ok(UpcomingCharge::from(updated))
            })
            .await
    }

    async fn delete(&self, user_id: &str, charge_id: &str) -> Result<usize> {
        let user_id = user_id.to_string();
        let charge_id = charge_id.to_string();
        self.writer
            .exec(move |conn| {
                diesel::delete(
                    upcoming_charges::table
                        .filter(upcoming_charges::id.eq(&charge_id))
                        .filter(upcoming_charges::user_id.eq(&user_id)),
                )
                .execute(conn)
                .into_core()
            })
            .await
    }

    async fn mark_overdue(&self, user_id: &str, now: NaiveDateTime) -> Result<usize> {
        let user_id = user_id.to_string();
        self.writer
            .exec(move |conn| {
                diesel::update(
                    upcoming_charges::table
                        .filter(upcoming_charges::user_id.eq(&user_id))
                        .filter(upcoming_charges::due_date.lt(now))
                        .filter(upcoming_charges::is_paid.eq(false))
                        .filter(upcoming_charges::status.eq(ChargeStatus::Upcoming.as_str())),
                )
                .set((
                    upcoming_charges::status.eq(ChargeStatus::Due.as_str()),
                    upcoming_charges::updated_at.eq(now),
                ))
                .execute(conn)
                .into_core()
            })
            .await
    }

    fn count_by_status(&self, user_id: &str, status: ChargeStatus) -> Result<i64> {
        let mut conn = get_connection(&self.pool)?;
        upcoming_charges::table
            .filter(upcoming_charges::user_id.eq(user_id))
            .filter(upcoming_charges::status.eq(status.as_str()))
            .count()
            .get_result(&mut conn)
            .into_core()
    }
}
