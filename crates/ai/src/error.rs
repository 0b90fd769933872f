//! Insight generation error types.

use thiserror::Error;

use moneta_core::Error as CoreError;

/// Errors from the generative insight pipeline.
#[derive(Debug, Error)]
pub enum AiError {
    /// Missing API key for a provider.
    #[error("Missing API key for provider {0}")]
    MissingApiKey(String),

    /// Provider error (from rig-core or the API itself).
    #[error("Provider error: {0}")]
    Provider(String),

    /// The model's reply could not be parsed into insights.
    #[error("Unparseable model response: {0}")]
    BadResponse(String),
}

impl From<AiError> for CoreError {
    fn from(err: AiError) -> Self {
        CoreError::Insight(err.to_string())
    }
}
