//! Database models for transactions.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use moneta_core::transactions::{Transaction, TransactionType};

#[derive(Queryable, Identifiable, Selectable, Debug, Clone)]
#[diesel(table_name = crate::schema::transactions)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct TransactionDB {
    pub id: String,
    pub user_id: String,
    pub amount: f64,
    pub transaction_type: String,
    pub category: String,
    pub description: Option<String>,
    pub transaction_date: NaiveDateTime,
    pub charge_id: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::transactions)]
pub struct NewTransactionDB {
    pub id: String,
    pub user_id: String,
    pub amount: f64,
    pub transaction_type: String,
    pub category: String,
    pub description: Option<String>,
    pub transaction_date: NaiveDateTime,
    pub charge_id: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Changeset for partial transaction updates.
#[derive(AsChangeset, Debug, Clone, Default)]
#[diesel(table_name = crate::schema::transactions)]
pub struct TransactionChangesDB {
    pub amount: Option<f64>,
    pub transaction_type: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub transaction_date: Option<NaiveDateTime>,
    pub updated_at: Option<NaiveDateTime>,
}

impl From<TransactionDB> for Transaction {
    fn from(db: TransactionDB) -> Self {
        Self {
            id: db.id,
            user_id: db.user_id,
            amount: db.amount,
            transaction_type: TransactionType::parse(&db.transaction_type),
            category: db.category,
            description: db.description,
            transaction_date: db.transaction_date,
            charge_id: db.charge_id,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}
