//! Moneta AI - generative insight text.
//!
//! Implements `moneta_core::insights::InsightGeneratorTrait` two ways:
//! [`RigInsightGenerator`] calls a configured LLM provider through rig-core,
//! [`FallbackInsightGenerator`] derives deterministic rule-based insights
//! when no provider is configured.

mod error;
mod fallback;
mod generator;

pub use error::AiError;
pub use fallback::FallbackInsightGenerator;
pub use generator::{ProviderConfig, RigInsightGenerator};
