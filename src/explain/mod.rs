//! # Explanation Generator
//!
//! Expands a student's short reason into a formal justification for the
//! warden. Generation is infallible from the caller's side: provider
//! failures become [`FALLBACK_EXPLANATION`].

pub mod errors;
pub mod openai;

pub use errors::{ExplainError, ExplainResult};
pub use openai::{build_prompt, ExplainConfig, OpenAiExplainer, FALLBACK_EXPLANATION};

/// Produces natural-language justification text
pub trait Explainer: Send + Sync {
    /// Never fails; degraded providers yield fallback text
    fn generate(&self, reason: &str) -> String;
}

/// Returns the same text for every reason
#[derive(Debug, Clone)]
pub struct StaticExplainer {
    text: String,
}

impl StaticExplainer {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Behaves like a provider that is always down
    pub fn unavailable() -> Self {
        Self::new(FALLBACK_EXPLANATION)
    }
}

impl Explainer for StaticExplainer {
    fn generate(&self, _reason: &str) -> String {
        self.text.clone()
    }
}
