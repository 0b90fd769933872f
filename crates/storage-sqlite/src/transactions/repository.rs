use std::sync::Arc;

use async_trait::async_trait;
use chrono::{NaiveDateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::model::{NewTransactionDB, TransactionChangesDB, TransactionDB};
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::IntoCore;
use crate::schema::transactions;
use moneta_core::errors::{Error, Result};
use moneta_core::transactions::{
    NewTransactionRecord, Transaction, TransactionRepositoryTrait, TransactionSummary,
    TransactionType, TransactionUpdate,
};

pub struct TransactionRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl TransactionRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        TransactionRepository { pool, writer }
    }
}

/// Builds an insertable row from a resolved record. Shared with the jar and
/// charge repositories, which write ledger rows inside their own
/// transactions.
pub(crate) fn transaction_row(user_id: &str, record: NewTransactionRecord) -> NewTransactionDB {
    let now = Utc::now().naive_utc();
    NewTransactionDB {
        id: Uuid::new_v4().to_string(),
        user_id: user_id.to_string(),
        amount: record.amount,
        transaction_type: record.transaction_type.as_str().to_string(),
        category: record.category,
        description: record.description,
        transaction_date: record.transaction_date,
        charge_id: record.charge_id,
        created_at: now,
        updated_at: now,
    }
}

type BoxedQuery<'a> = transactions::BoxedQuery<'a, diesel::sqlite::Sqlite>;

fn filtered<'a>(
    user_id: &'a str,
    type_filter: Option<&'a str>,
    range: Option<(NaiveDateTime, NaiveDateTime)>,
) -> BoxedQuery<'a> {
    let mut query = transactions::table
        .filter(transactions::user_id.eq(user_id))
        .into_boxed();
    if let Some(t) = type_filter {
        query = query.filter(transactions::transaction_type.eq(t));
    }
    if let Some((start, end)) = range {
        query = query.filter(transactions::transaction_date.between(start, end));
    }
    query
}

#[async_trait]
impl TransactionRepositoryTrait for TransactionRepository {
    async fn insert(&self, user_id: &str, record: NewTransactionRecord) -> Result<Transaction> {
        let row = transaction_row(user_id, record);
        self.writer
            .exec(move |conn| {
                let db = diesel::insert_into(transactions::table)
                    .values(&row)
                    .returning(TransactionDB::as_returning())
                    .get_result(conn)
                    .into_core()?;
                Ok(Transaction::from(db))
            })
            .await
    }

    fn search(
        &self,
        user_id: &str,
        type_filter: Option<&str>,
        range: Option<(NaiveDateTime, NaiveDateTime)>,
        page: i64,
        limit: i64,
    ) -> Result<(Vec<Transaction>, i64)> {
        let mut conn = get_connection(&self.pool)?;

        let total: i64 = filtered(user_id, type_filter, range)
            .count()
            .get_result(&mut conn)
            .into_core()?;

        let rows = filtered(user_id, type_filter, range)
            .order(transactions::transaction_date.desc())
            .limit(limit)
            .offset((page - 1) * limit)
            .load::<TransactionDB>(&mut conn)
            .into_core()?;

        Ok((rows.into_iter().map(Transaction::from).collect(), total))
    }

    fn find(&self, user_id: &str, transaction_id: &str) -> Result<Option<Transaction>> {
        let mut conn = get_connection(&self.pool)?;
        let db = transactions::table
            .filter(transactions::id.eq(transaction_id))
            .filter(transactions::user_id.eq(user_id))
            .first::<TransactionDB>(&mut conn)
            .optional()
            .into_core()?;
        Ok(db.map(Transaction::from))
    }

    async fn update(
        &self,
        user_id: &str,
        transaction_id: &str,
        update: TransactionUpdate,
    ) -> Result<Transaction> {
        let user_id = user_id.to_string();
        let transaction_id = transaction_id.to_string();
        self.writer
            .exec(move |conn| {
                let changes = TransactionChangesDB {
                    amount: update.amount,
                    transaction_type: update.transaction_type.map(|t| t.as_str().to_string()),
                    category: update.category,
                    description: update.description,
                    transaction_date: update.transaction_date.map(|d| d.naive_utc()),
                    updated_at: Some(Utc::now().naive_utc()),
                };
                let affected = diesel::update(
                    transactions::table
                        .filter(transactions::id.eq(&transaction_id))
                        .filter(transactions::user_id.eq(&user_id)),
                )
                .set(&changes)
                .execute(conn)
                .into_core()?;
                if affected == 0 {
                    return Err(Error::not_found(
                        "Transaction not found or you do not have permission to update it.",
                    ));
                }
                let db = transactions::table
                    .find(&transaction_id)
                    .first::<TransactionDB>(conn)
                    .into_core()?;
                Ok(Transaction::from(db))
            })
            .await
    }

    async fn delete(&self, user_id: &str, transaction_id: &str) -> Result<usize> {
        let user_id = user_id.to_string();
        let transaction_id = transaction_id.to_string();
        self.writer
            .exec(move |conn| {
                diesel::delete(
                    transactions::table
                        .filter(transactions::id.eq(&transaction_id))
                        .filter(transactions::user_id.eq(&user_id)),
                )
                .execute(conn)
                .into_core()
            })
            .await
    }

    fn summary_totals(
        &self,
        user_id: &str,
        range: (NaiveDateTime, NaiveDateTime),
    ) -> Result<TransactionSummary> {
        let mut conn = get_connection(&self.pool)?;

        let total_of = |conn: &mut SqliteConnection, t: TransactionType| -> Result<f64> {
            let sum: Option<f64> = transactions::table
                .filter(transactions::user_id.eq(user_id))
                .filter(transactions::transaction_type.eq(t.as_str()))
                .filter(transactions::transaction_date.between(range.0, range.1))
                .select(diesel::dsl::sum(transactions::amount))
                .first(conn)
                .into_core()?;
            Ok(sum.unwrap_or(0.0))
        };

        Ok(TransactionSummary {
            total_income: total_of(&mut conn, TransactionType::Income)?,
            total_expense: total_of(&mut conn, TransactionType::Expense)?,
        })
    }

    fn expenses_in_range(
        &self,
        user_id: &str,
        range: (NaiveDateTime, NaiveDateTime),
    ) -> Result<Vec<Transaction>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = filtered(user_id, Some(TransactionType::Expense.as_str()), Some(range))
            .order(transactions::transaction_date.asc())
            .load::<TransactionDB>(&mut conn)
            .into_core()?;
        Ok(rows.into_iter().map(Transaction::from).collect())
    }
}
