use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use uuid::Uuid;

use super::model::{GoalChangesDB, GoalDB, NewGoalDB};
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::IntoCore;
use crate::schema::goals;
use moneta_core::errors::{Error, Result};
use moneta_core::goals::{Goal, GoalRepositoryTrait, GoalStatus, GoalUpdate, NewGoal};

const GOAL_NOT_FOUND: &str = "Goal not found or access denied.";

pub struct GoalRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl GoalRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        GoalRepository { pool, writer }
    }
}

fn new_goal_row(user_id: &str, new_goal: NewGoal) -> NewGoalDB {
    let now = Utc::now().naive_utc();
    NewGoalDB {
        id: Uuid::new_v4().to_string(),
        user_id: user_id.to_string(),
        goal_name: new_goal.goal_name,
        target_amount: new_goal.target_amount,
        amount_saved: 0.0,
        target_date: new_goal.target_date.naive_utc(),
        status: GoalStatus::InProgress.as_str().to_string(),
        created_at: now,
        updated_at: now,
    }
}

#[async_trait]
impl GoalRepositoryTrait for GoalRepository {
    async fn insert(&self, user_id: &str, new_goal: NewGoal) -> Result<Goal> {
        let row = new_goal_row(user_id, new_goal);
        self.writer
            .exec(move |conn| {
                let db = diesel::insert_into(goals::table)
                    .values(&row)
                    .returning(GoalDB::as_returning())
                    .get_result(conn)
                    .into_core()?;
                Ok(Goal::from(db))
            })
            .await
    }

    async fn insert_many(&self, user_id: &str, new_goals: Vec<NewGoal>) -> Result<usize> {
        let rows: Vec<NewGoalDB> = new_goals
            .into_iter()
            .map(|g| new_goal_row(user_id, g))
            .collect();
        self.writer
            .exec(move |conn| {
                diesel::insert_into(goals::table)
                    .values(&rows)
                    .execute(conn)
                    .into_core()
            })
            .await
    }

    fn list(&self, user_id: &str) -> Result<Vec<Goal>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = goals::table
            .filter(goals::user_id.eq(user_id))
            .order(goals::target_date.asc())
            .load::<GoalDB>(&mut conn)
            .into_core()?;
        Ok(rows.into_iter().map(Goal::from).collect())
    }

    fn find(&self, user_id: &str, goal_id: &str) -> Result<Option<Goal>> {
        let mut conn = get_connection(&self.pool)?;
        let db = goals::table
            .filter(goals::id.eq(goal_id))
            .filter(goals::user_id.eq(user_id))
            .first::<GoalDB>(&mut conn)
            .optional()
            .into_core()?;
        Ok(db.map(Goal::from))
    }

    async fn update(&self, user_id: &str, goal_id: &str, update: GoalUpdate) -> Result<Goal> {
        let user_id = user_id.to_string();
        let goal_id = goal_id.to_string();
        self.writer
            .exec(move |conn| {
                let changes = GoalChangesDB {
                    goal_name: update.goal_name,
                    target_amount: update.target_amount,
                    target_date: update.target_date.map(|d| d.naive_utc()),
                    updated_at: Some(Utc::now().naive_utc()),
                };
                let affected = diesel::update(
                    goals::table
                        .filter(goals::id.eq(&goal_id))
                        .filter(goals::user_id.eq(&user_id)),
                )
                .set(&changes)
                .execute(conn)
                .into_core()?;
                if affected == 0 {
                    return Err(Error::not_found(GOAL_NOT_FOUND));
                }
                let db = goals::table
                    .find(&goal_id)
                    .first::<GoalDB>(conn)
                    .into_core()?;
                Ok(Goal::from(db))
            })
            .await
    }

    async fn contribute(&self, user_id: &str, goal_id: &str, amount: f64) -> Result<Goal> {
        let user_id = user_id.to_string();
        let goal_id = goal_id.to_string();
        self.writer
            .exec(move |conn| {
                let db = goals::table
                    .filter(goals::id.eq(&goal_id))
                    .filter(goals::user_id.eq(&user_id))
                    .first::<GoalDB>(conn)
                    .optional()
                    .into_core()?
                    .ok_or_else(|| Error::not_found(GOAL_NOT_FOUND))?;

                // Completion check and update share the transaction.
                if GoalStatus::parse(&db.status) == GoalStatus::Completed {
                    return Err(Error::business("This goal has already been completed."));
                }
                let new_saved = db.amount_saved + amount;
                let new_status = if new_saved >= db.target_amount {
                    GoalStatus::Completed
                } else {
                    GoalStatus::InProgress
                };
                let updated = diesel::update(goals::table.find(&goal_id))
                    .set((
                        goals::amount_saved.eq(new_saved),
                        goals::status.eq(new_status.as_str()),
                        goals::updated_at.eq(Utc::now().naive_utc()),
                    ))
                    .returning(GoalDB::as_returning())
                    .get_result(conn)
                    .into_core()?;
                Ok(Goal::from(updated))
            })
            .await
    }

    async fn delete(&self, user_id: &str, goal_id: &str) -> Result<usize> {
        let user_id = user_id.to_string();
        let goal_id = goal_id.to_string();
        self.writer
            .exec(move |conn| {
                diesel::delete(
                    goals::table
                        .filter(goals::id.eq(&goal_id))
                        .filter(goals::user_id.eq(&user_id)),
                )
                .execute(conn)
                .into_core()
            })
            .await
    }
}
