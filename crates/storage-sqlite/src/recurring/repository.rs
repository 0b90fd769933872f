use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDateTime;
use diesel::prelude::*;

use super::model::SyncJobDB;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::IntoCore;
use crate::schema::{sync_jobs, transactions};
use crate::transactions::transaction_row;
use moneta_core::errors::Result;
use moneta_core::recurring::{SyncJob, SyncJobRepositoryTrait};
use moneta_core::transactions::{NewTransactionRecord, TransactionType};

pub struct SyncJobRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl SyncJobRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        SyncJobRepository { pool, writer }
    }
}

fn upsert_stamp(
    conn: &mut SqliteConnection,
    user_id: &str,
    month: i32,
    year: i32,
    now: NaiveDateTime,
) -> Result<()> {
    let row = SyncJobDB {
        user_id: user_id.to_string(),
        last_synced_month: month,
        last_synced_year: year,
        created_at: now,
        updated_at: now,
    };
    diesel::insert_into(sync_jobs::table)
        .values(&row)
        .on_conflict(sync_jobs::user_id)
        .do_update()
        .set((
            sync_jobs::last_synced_month.eq(month),
            sync_jobs::last_synced_year.eq(year),
            sync_jobs::updated_at.eq(now),
        ))
        .execute(conn)
        .into_core()?;
    Ok(())
}

#[async_trait]
impl SyncJobRepositoryTrait for SyncJobRepository {
    fn find(&self, user_id: &str) -> Result<Option<SyncJob>> {
        let mut conn = get_connection(&self.pool)?;
        let db = sync_jobs::table
            .find(user_id)
            .first::<SyncJobDB>(&mut conn)
            .optional()
            .into_core()?;
        Ok(db.map(SyncJob::from))
    }

    async fn run_monthly_sync(
        &self,
        user_id: &str,
        month: i32,
        year: i32,
        income_total: f64,
        expense_total: f64,
        now: NaiveDateTime,
    ) -> Result<bool> {
        let user_id = user_id.to_string();
        self.writer
            .exec(move |conn| {
                // Stamp check, inserts, and re-stamp are one transaction:
                // a crash cannot leave transactions without the stamp, and
                // concurrent triggers serialize on the writer.
                let stamp = sync_jobs::table
                    .find(&user_id)
                    .first::<SyncJobDB>(conn)
                    .optional()
                    .into_core()?;
                if let Some(stamp) = stamp {
                    if stamp.last_synced_month == month && stamp.last_synced_year == year {
                        return Ok(false);
                    }
                }

                let mut rows = Vec::new();
                if income_total > 0.0 {
                    rows.push(transaction_row(
                        &user_id,
                        NewTransactionRecord {
                            amount: income_total,
                            transaction_type: TransactionType::RecurringIncome,
                            category: "Income".to_string(),
                            description: Some("Monthly recurring income".to_string()),
                            transaction_date: now,
                            charge_id: None,
                        },
                    ));
                }
                if expense_total > 0.0 {
                    rows.push(transaction_row(
                        &user_id,
                        NewTransactionRecord {
                            amount: expense_total,
                            transaction_type: TransactionType::RecurringExpense,
                            category: "Recurring".to_string(),
                            description: Some("Monthly recurring expenses".to_string()),
                            transaction_date: now,
                            charge_id: None,
                        },
                    ));
                }
                if !rows.is_empty() {
                    diesel::insert_into(transactions::table)
                        .values(&rows)
                        .execute(conn)
                        .into_core()?;
                }

                upsert_stamp(conn, &user_id, month, year, now)?;
                Ok(true)
            })
            .await
    }

    async fn stamp(&self, user_id: &str, month: i32, year: i32, now: NaiveDateTime) -> Result<()> {
        let user_id = user_id.to_string();
        self.writer
            .exec(move |conn| upsert_stamp(conn, &user_id, month, year, now))
            .await
    }
}
