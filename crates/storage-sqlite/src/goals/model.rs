//! Database models for goals.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use moneta_core::goals::{Goal, GoalStatus};

#[derive(Queryable, Identifiable, Selectable, Debug, Clone)]
#[diesel(table_name = crate::schema::goals)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct GoalDB {
    pub id: String,
    pub user_id: String,
    pub goal_name: String,
    pub target_amount: f64,
    pub amount_saved: f64,
    pub target_date: NaiveDateTime,
    pub status: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::goals)]
pub struct NewGoalDB {
    pub id: String,
    pub user_id: String,
    pub goal_name: String,
    pub target_amount: f64,
    pub amount_saved: f64,
    pub target_date: NaiveDateTime,
    pub status: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Changeset for partial goal updates. Status is deliberately absent:
/// completion is only ever set by `contribute`.
#[derive(AsChangeset, Debug, Clone, Default)]
#[diesel(table_name = crate::schema::goals)]
pub struct GoalChangesDB {
    pub goal_name: Option<String>,
    pub target_amount: Option<f64>,
    pub target_date: Option<NaiveDateTime>,
    pub updated_at: Option<NaiveDateTime>,
}

impl From<GoalDB> for Goal {
    fn from(db: GoalDB) -> Self {
        Self {
            id: db.id,
            user_id: db.user_id,
            goal_name: db.goal_name,
            target_amount: db.target_amount,
            amount_saved: db.amount_saved,
            target_date: db.target_date,
            status: GoalStatus::parse(&db.status),
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}
