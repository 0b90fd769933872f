use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use uuid::Uuid;

use super::model::{JarChangesDB, JarDB, NewJarDB};
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::IntoCore;
use crate::schema::{jars, transactions};
use crate::transactions::transaction_row;
use moneta_core::errors::{Error, Result};
use moneta_core::jars::{Jar, JarRepositoryTrait, JarUpdate, NewJar};
use moneta_core::transactions::{NewTransactionRecord, TransactionType};

const JAR_NOT_FOUND: &str = "Jar not found or access denied.";

pub struct JarRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl JarRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        JarRepository { pool, writer }
    }
}

fn new_jar_row(user_id: &str, new_jar: NewJar) -> NewJarDB {
    let now = Utc::now().naive_utc();
    NewJarDB {
        id: Uuid::new_v4().to_string(),
        user_id: user_id.to_string(),
        jar_name: new_jar.jar_name,
        goal_amount: new_jar.goal_amount,
        amount_saved: 0.0,
        created_at: now,
        updated_at: now,
    }
}

fn find_owned(conn: &mut SqliteConnection, user_id: &str, jar_id: &str) -> Result<JarDB> {
    jars::table
        .filter(jars::id.eq(jar_id))
        .filter(jars::user_id.eq(user_id))
        .first::<JarDB>(conn)
        .optional()
        .into_core()?
        .ok_or_else(|| Error::not_found(JAR_NOT_FOUND))
}

/// Applies a balance delta and records the matching ledger transaction.
/// Runs inside the caller's writer transaction.
fn shift_balance(
    conn: &mut SqliteConnection,
    jar: &JarDB,
    delta: f64,
) -> Result<Jar> {
    let now = Utc::now().naive_utc();
    let updated = diesel::update(jars::table.find(&jar.id))
        .set((
            jars::amount_saved.eq(jar.amount_saved + delta),
            jars::updated_at.eq(now),
        ))
        .returning(JarDB::as_returning())
        .get_result(conn)
        .into_core()?;

    let (transaction_type, verb) = if delta >= 0.0 {
        (TransactionType::Expense, "Deposit to")
    } else {
        (TransactionType::Income, "Withdrawal from")
    };
    let ledger = transaction_row(
        &jar.user_id,
        NewTransactionRecord {
            amount: delta.abs(),
            transaction_type,
            category: "Savings".to_string(),
            description: Some(format!("{} jar: {}", verb, jar.jar_name)),
            transaction_date: now,
            charge_id: None,
        },
    );
    diesel::insert_into(transactions::table)
        .values(&ledger)
        .execute(conn)
        .into_core()?;

    Ok(Jar::from(updated))
}

#[async_trait]
impl JarRepositoryTrait for JarRepository {
    async fn insert(&self, user_id: &str, new_jar: NewJar) -> Result<Jar> {
        let row = new_jar_row(user_id, new_jar);
        self.writer
            .exec(move |conn| {
                let db = diesel::insert_into(jars::table)
                    .values(&row)
                    .returning(JarDB::as_returning())
                    .get_result(conn)
                    .into_core()?;
                Ok(Jar::from(db))
            })
            .await
    }

    async fn insert_many(&self, user_id: &str, new_jars: Vec<NewJar>) -> Result<usize> {
        let rows: Vec<NewJarDB> = new_jars
            .into_iter()
            .map(|j| new_jar_row(user_id, j))
            .collect();
        self.writer
            .exec(move |conn| {
                diesel::insert_into(jars::table)
                    .values(&rows)
                    .execute(conn)
                    .into_core()
            })
            .await
    }

    fn list(&self, user_id: &str) -> Result<Vec<Jar>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = jars::table
            .filter(jars::user_id.eq(user_id))
            .order(jars::created_at.asc())
            .load::<JarDB>(&mut conn)
            .into_core()?;
        Ok(rows.into_iter().map(Jar::from).collect())
    }

    async fn update(&self, user_id: &str, jar_id: &str, update: JarUpdate) -> Result<Jar> {
        let user_id = user_id.to_string();
        let jar_id = jar_id.to_string();
        self.writer
            .exec(move |conn| {
                let changes = JarChangesDB {
                    jar_name: update.jar_name,
                    goal_amount: update.goal_amount,
                    updated_at: Some(Utc::now().naive_utc()),
                };
                let affected = diesel::update(
                    jars::table
                        .filter(jars::id.eq(&jar_id))
                        .filter(jars::user_id.eq(&user_id)),
                )
                .set(&changes)
                .execute(conn)
                .into_core()?;
                if affected == 0 {
                    return Err(Error::not_found(JAR_NOT_FOUND));
                }
                let db = jars::table.find(&jar_id).first::<JarDB>(conn).into_core()?;
                Ok(Jar::from(db))
            })
            .await
    }

    async fn deposit(&self, user_id: &str, jar_id: &str, amount: f64) -> Result<Jar> {
        let user_id = user_id.to_string();
        let jar_id = jar_id.to_string();
        self.writer
            .exec(move |conn| {
                let jar = find_owned(conn, &user_id, &jar_id)?;
                shift_balance(conn, &jar, amount)
            })
            .await
    }

    async fn withdraw(&self, user_id: &str, jar_id: &str, amount: f64) -> Result<Jar> {
        let user_id = user_id.to_string();
        let jar_id = jar_id.to_string();
        self.writer
            .exec(move |conn| {
                let jar = find_owned(conn, &user_id, &jar_id)?;
                // Balance check and update share the transaction, so two
                // concurrent withdrawals cannot both pass the check.
                if jar.amount_saved < amount {
                    return Err(Error::business(
                        "Withdrawal amount cannot be greater than the saved amount.",
                    ));
                }
                shift_balance(conn, &jar, -amount)
            })
            .await
    }

    async fn delete(&self, user_id: &str, jar_id: &str) -> Result<usize> {
        let user_id = user_id.to_string();
        let jar_id = jar_id.to_string();
        self.writer
            .exec(move |conn| {
                diesel::delete(
                    jars::table
                        .filter(jars::id.eq(&jar_id))
                        .filter(jars::user_id.eq(&user_id)),
                )
                .execute(conn)
                .into_core()
            })
            .await
    }
}
