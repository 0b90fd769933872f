//! Database models for jars.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use moneta_core::jars::Jar;

#[derive(Queryable, Identifiable, Selectable, Debug, Clone)]
#[diesel(table_name = crate::schema::jars)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct JarDB {
    pub id: String,
    pub user_id: String,
    pub jar_name: String,
    pub goal_amount: f64,
    pub amount_saved: f64,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::jars)]
pub struct NewJarDB {
    pub id: String,
    pub user_id: String,
    pub jar_name: String,
    pub goal_amount: f64,
    pub amount_saved: f64,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Changeset for partial jar updates.
#[derive(AsChangeset, Debug, Clone, Default)]
#[diesel(table_name = crate::schema::jars)]
pub struct JarChangesDB {
    pub jar_name: Option<String>,
    pub goal_amount: Option<f64>,
    pub updated_at: Option<NaiveDateTime>,
}

impl From<JarDB> for Jar {
    fn from(db: JarDB) -> Self {
        Self {
            id: db.id,
            user_id: db.user_id,
            jar_name: db.jar_name,
            goal_amount: db.goal_amount,
            amount_saved: db.amount_saved,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}
