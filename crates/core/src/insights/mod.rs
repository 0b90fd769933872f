//! Insights module - AI-generated textual observations over a user's
//! financial state.

mod insights_model;
mod insights_service;
mod insights_traits;

#[cfg(test)]
mod insights_service_tests;

pub use insights_model::{FinancialFacts, GoalFact, Insight, InsightKind, JarFact};
pub use insights_service::InsightService;
pub use insights_traits::{InsightGeneratorTrait, InsightServiceTrait};
