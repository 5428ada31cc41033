//! OpenAI chat-completions client
//!
//! One blocking POST per request. Callers run it off the async runtime.

use std::time::Duration;

use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};

use super::errors::{ExplainError, ExplainResult};
use super::Explainer;
use crate::observability::{Event, Logger};

/// Text used whenever the provider cannot produce an explanation
pub const FALLBACK_EXPLANATION: &str = "AI response unavailable.";

/// Provider configuration
#[derive(Debug, Clone)]
pub struct ExplainConfig {
    /// Bearer key; `None` skips the network entirely
    pub api_key: Option<String>,

    /// Chat model name
    pub model: String,

    /// Base URL, without the `/chat/completions` suffix
    pub api_base: String,

    /// Upper bound on one provider call
    pub timeout: Duration,
}

impl Default for ExplainConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: "gpt-3.5-turbo".to_string(),
            api_base: "https://api.openai.com/v1".to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Prompt sent for a student's short reason
pub fn build_prompt(reason: &str) -> String {
    format!(
        "Generate a formal outpass request explanation for the reason: {}",
        reason
    )
}

/// Explanation generator backed by the OpenAI API
pub struct OpenAiExplainer {
    config: ExplainConfig,
    client: Client,
}

impl OpenAiExplainer {
    pub fn new(config: ExplainConfig) -> ExplainResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ExplainError::Client(e.to_string()))?;
        Ok(Self { config, client })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/chat/completions",
            self.config.api_base.trim_end_matches('/')
        )
    }

    /// Fallible provider call
    pub fn try_generate(&self, reason: &str) -> ExplainResult<String> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or(ExplainError::MissingApiKey)?;

        let payload = ChatRequest {
            model: &self.config.model,
            messages: vec![ChatMessage {
                role: "user",
                content: build_prompt(reason),
            }],
        };

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(api_key)
            .json(&payload)
            .send()
            .map_err(|e| ExplainError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(ExplainError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChatResponse = response
            .json()
            .map_err(|e| ExplainError::Transport(e.to_string()))?;

        extract_content(parsed)
    }
}

fn extract_content(response: ChatResponse) -> ExplainResult<String> {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .map(|content| content.trim().to_string())
        .filter(|content| !content.is_empty())
        .ok_or(ExplainError::EmptyResponse)
}

impl Explainer for OpenAiExplainer {
    fn generate(&self, reason: &str) -> String {
        match self.try_generate(reason) {
            Ok(text) => text,
            Err(e) => {
                let error = e.to_string();
                Logger::warn(
                    Event::ExplanationUnavailable,
                    &[("error", error.as_str()), ("model", self.config.model.as_str())],
                );
                FALLBACK_EXPLANATION.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_embeds_reason() {
        assert_eq!(
            build_prompt("medical appointment"),
            "Generate a formal outpass request explanation for the reason: medical appointment"
        );
    }

    #[test]
    fn test_missing_key_falls_back_without_network() {
        let explainer = OpenAiExplainer::new(ExplainConfig::default()).unwrap();

        assert!(matches!(
            explainer.try_generate("home visit"),
            Err(ExplainError::MissingApiKey)
        ));
        assert_eq!(explainer.generate("home visit"), FALLBACK_EXPLANATION);
    }

    #[test]
    fn test_unreachable_provider_falls_back() {
        let explainer = OpenAiExplainer::new(ExplainConfig {
            api_key: Some("sk-test".to_string()),
            // Port 9 (discard) on loopback refuses connections
            api_base: "http://127.0.0.1:9/v1".to_string(),
            timeout: Duration::from_secs(2),
            ..Default::default()
        })
        .unwrap();

        assert_eq!(explainer.generate("home visit"), FALLBACK_EXPLANATION);
    }

    #[test]
    fn test_endpoint_joins_base() {
        let explainer = OpenAiExplainer::new(ExplainConfig {
            api_base: "https://api.example.com/v1/".to_string(),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(explainer.endpoint(), "https://api.example.com/v1/chat/completions");
    }

    #[test]
    fn test_extract_content() {
        let parsed: ChatResponse = serde_json::from_str(
            r#"{"choices":[{"message":{"role":"assistant","content":"  Dear Warden, ...  "}}]}"#,
        )
        .unwrap();
        assert_eq!(extract_content(parsed).unwrap(), "Dear Warden, ...");

        let empty: ChatResponse = serde_json::from_str(r#"{"choices":[]}"#).unwrap();
        assert!(matches!(extract_content(empty), Err(ExplainError::EmptyResponse)));
    }
}
