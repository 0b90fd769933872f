//! Database models for upcoming charges.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use moneta_core::charges::{ChargeStatus, UpcomingCharge};

#[derive(Queryable, Identifiable, Selectable, Debug, Clone)]
#[diesel(table_name = crate::schema::upcoming_charges)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct ChargeDB {
    pub id: String,
    pub user_id: String,
    pub charge_name: String,
    pub field: String,
    pub due_date: NaiveDateTime,
    pub amount: f64,
    pub is_paid: bool,
    pub status: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::upcoming_charges)]
pub struct NewChargeDB {
    pub id: String,
    pub user_id: String,
    pub charge_name: String,
    pub field: String,
    pub due_date: NaiveDateTime,
    pub amount: f64,
    pub is_paid: bool,
    pub status: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Changeset for partial charge updates. Paid state moves only through the
/// mark-paid / mark-not-paid operations.
#[derive(AsChangeset, Debug, Clone, Default)]
#[diesel(table_name = crate::schema::upcoming_charges)]
pub struct ChargeChangesDB {
    pub charge_name: Option<String>,
    pub field: Option<String>,
    pub due_date: Option<NaiveDateTime>,
    pub amount: Option<f64>,
    pub updated_at: Option<NaiveDateTime>,
}

impl From<ChargeDB> for UpcomingCharge {
    fn from(db: ChargeDB) -> Self {
        Self {
            id: db.id,
            user_id: db.user_id,
            charge_name: db.charge_name,
            field: db.field,
            due_date: db.due_date,
            amount: db.amount,
            is_paid: db.is_paid,
            status: ChargeStatus::parse(&db.status).unwrap_or(ChargeStatus::Upcoming),
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}
