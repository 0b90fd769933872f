//! Database model for the recurring-sync job marker.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use moneta_core::recurring::SyncJob;

#[derive(Queryable, Insertable, Identifiable, Selectable, Debug, Clone)]
#[diesel(table_name = crate::schema::sync_jobs)]
#[diesel(primary_key(user_id))]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct SyncJobDB {
    pub user_id: String,
    pub last_synced_month: i32,
    pub last_synced_year: i32,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<SyncJobDB> for SyncJob {
    fn from(db: SyncJobDB) -> Self {
        Self {
            user_id: db.user_id,
            last_synced_month: db.last_synced_month,
            last_synced_year: db.last_synced_year,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}
