use async_trait::async_trait;

use crate::errors::Result;
use crate::goals::goals_model::{Goal, GoalUpdate, NewGoal};

/// Trait for goal repository operations.
///
/// `contribute` is an atomic read-validate-write: the completed-status check,
/// the balance update, and the completion transition happen in one store
/// transaction.
#[async_trait]
pub trait GoalRepositoryTrait: Send + Sync {
    async fn insert(&self, user_id: &str, new_goal: NewGoal) -> Result<Goal>;
    async fn insert_many(&self, user_id: &str, goals: Vec<NewGoal>) -> Result<usize>;
    fn list(&self, user_id: &str) -> Result<Vec<Goal>>;
    fn find(&self, user_id: &str, goal_id: &str) -> Result<Option<Goal>>;
    async fn update(&self, user_id: &str, goal_id: &str, update: GoalUpdate) -> Result<Goal>;
    async fn contribute(&self, user_id: &str, goal_id: &str, amount: f64) -> Result<Goal>;
    async fn delete(&self, user_id: &str, goal_id: &str) -> Result<usize>;
}

/// Trait for goal service operations.
#[async_trait]
pub trait GoalServiceTrait: Send + Sync {
    async fn create(&self, email: &str, new_goal: NewGoal) -> Result<Goal>;
    async fn list(&self, email: &str) -> Result<Vec<Goal>>;
    async fn get(&self, email: &str, goal_id: &str) -> Result<Goal>;
    async fn update(&self, email: &str, goal_id: &str, update: GoalUpdate) -> Result<Goal>;
    async fn contribute(&self, email: &str, goal_id: &str, amount: f64) -> Result<Goal>;
    async fn delete(&self, email: &str, goal_id: &str) -> Result<()>;
}
