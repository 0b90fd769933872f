use async_trait::async_trait;
use chrono::NaiveDateTime;

use crate::errors::Result;
use crate::insights::insights_model::{FinancialFacts, Insight};

/// Trait for turning a user's financial facts into short textual insights.
///
/// Implemented by the generative-model client in `moneta-ai`, and by its
/// deterministic rule-based fallback.
#[async_trait]
pub trait InsightGeneratorTrait: Send + Sync {
    async fn generate(&self, facts: &FinancialFacts) -> Result<Vec<Insight>>;
}

/// Trait for the insight service.
#[async_trait]
pub trait InsightServiceTrait: Send + Sync {
    async fn get_insights(&self, email: &str, now: NaiveDateTime) -> Result<Vec<Insight>>;
}
