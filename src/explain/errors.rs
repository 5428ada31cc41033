//! # Explanation Errors
//!
//! These never reach a workflow caller; [`Explainer::generate`](super::Explainer)
//! turns every one of them into fallback text.

use thiserror::Error;

/// Result type for provider calls
pub type ExplainResult<T> = Result<T, ExplainError>;

#[derive(Debug, Error)]
pub enum ExplainError {
    /// No API key configured
    #[error("AI provider API key is not configured")]
    MissingApiKey,

    /// HTTP client could not be constructed
    #[error("Failed to build HTTP client: {0}")]
    Client(String),

    /// Network failure or timeout
    #[error("AI provider request failed: {0}")]
    Transport(String),

    /// Provider answered with a non-success status
    #[error("AI provider returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// Response did not contain a completion
    #[error("AI provider response had no content")]
    EmptyResponse,
}
