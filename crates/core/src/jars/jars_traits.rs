use async_trait::async_trait;

use crate::errors::Result;
use crate::jars::jars_model::{Jar, JarUpdate, NewJar};

/// Trait for jar repository operations.
///
/// `deposit` and `withdraw` are atomic read-validate-write operations: the
/// balance check, the balance update, and the ledger transaction they record
/// all happen in one store transaction.
#[async_trait]
pub trait JarRepositoryTrait: Send + Sync {
    async fn insert(&self, user_id: &str, new_jar: NewJar) -> Result<Jar>;
    async fn insert_many(&self, user_id: &str, jars: Vec<NewJar>) -> Result<usize>;
    fn list(&self, user_id: &str) -> Result<Vec<Jar>>;
    async fn update(&self, user_id: &str, jar_id: &str, update: JarUpdate) -> Result<Jar>;
    async fn deposit(&self, user_id: &str, jar_id: &str, amount: f64) -> Result<Jar>;
    async fn withdraw(&self, user_id: &str, jar_id: &str, amount: f64) -> Result<Jar>;
    async fn delete(&self, user_id: &str, jar_id: &str) -> Result<usize>;
}

/// Trait for jar service operations.
#[async_trait]
pub trait JarServiceTrait: Send + Sync {
    async fn create(&self, email: &str, new_jar: NewJar) -> Result<Jar>;
    async fn list(&self, email: &str) -> Result<Vec<Jar>>;
    async fn update(&self, email: &str, jar_id: &str, update: JarUpdate) -> Result<Jar>;
    async fn deposit(&self, email: &str, jar_id: &str, amount: f64) -> Result<Jar>;
    async fn withdraw(&self, email: &str, jar_id: &str, amount: f64) -> Result<Jar>;
    async fn delete(&self, email: &str, jar_id: &str) -> Result<()>;
}
