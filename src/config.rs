//! Application configuration
//!
//! Sources, later wins: built-in defaults, an optional JSON file, process
//! environment, then command-line flags. Credentials are not validated at
//! startup; a missing SMTP user or API key only degrades the affected feature.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::explain::ExplainConfig;
use crate::http_server::HttpServerConfig;
use crate::notify::EmailConfig;
use crate::workflow::WorkflowSettings;

/// Result type for configuration loading
pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config JSON in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid value for {key}: '{value}'")]
    InvalidValue { key: String, value: String },
}

/// Service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Host to bind to
    pub host: String,

    /// Port to bind to
    pub port: u16,

    /// Public URL the warden's action links point at
    pub base_url: String,

    /// JSON data file holding every request
    pub data_file: PathBuf,

    /// Warden address
    pub approver_email: String,

    pub smtp_host: String,
    pub smtp_port: u16,
    pub smtp_user: String,
    #[serde(skip_serializing)]
    pub smtp_password: String,

    /// Sender address; falls back to `smtp_user` when empty
    pub from_email: String,
    pub from_name: String,

    #[serde(skip_serializing)]
    pub openai_api_key: Option<String>,
    pub openai_model: String,
    pub openai_api_base: String,
    pub ai_timeout_secs: u64,

    /// CORS allowed origins; empty is permissive
    pub cors_origins: Vec<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        let explain = ExplainConfig::default();
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            base_url: "http://localhost:5000".to_string(),
            data_file: PathBuf::from("outpass_requests.json"),
            approver_email: "warden@example.com".to_string(),
            smtp_host: "smtp.gmail.com".to_string(),
            smtp_port: 587,
            smtp_user: String::new(),
            smtp_password: String::new(),
            from_email: String::new(),
            from_name: "Hostel Management".to_string(),
            openai_api_key: None,
            openai_model: explain.model,
            openai_api_base: explain.api_base,
            ai_timeout_secs: explain.timeout.as_secs(),
            cors_origins: Vec::new(),
        }
    }
}

impl AppConfig {
    /// Defaults, then `path` if given, then the process environment
    pub fn load(path: Option<&Path>) -> ConfigResult<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Read a JSON config file; absent keys keep their defaults
    pub fn from_file(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Overlay environment variables read through `lookup`
    pub fn apply_env<F>(&mut self, lookup: F) -> ConfigResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("MAIL_SERVER") {
            self.smtp_host = v;
        }
        if let Some(v) = lookup("MAIL_PORT") {
            self.smtp_port = parse_value("MAIL_PORT", &v)?;
        }
        if let Some(v) = lookup("MAIL_USERNAME") {
            self.smtp_user = v;
        }
        if let Some(v) = lookup("MAIL_PASSWORD") {
            self.smtp_password = v;
        }
        if let Some(v) = lookup("MAIL_DEFAULT_SENDER") {
            self.from_email = v;
        }
        if let Some(v) = lookup("OPENAI_API_KEY") {
            self.openai_api_key = Some(v);
        }
        if let Some(v) = lookup("OPENAI_MODEL") {
            self.openai_model = v;
        }
        if let Some(v) = lookup("OPENAI_API_BASE") {
            self.openai_api_base = v;
        }
        if let Some(v) = lookup("OUTPASS_APPROVER_EMAIL") {
            self.approver_email = v;
        }
        if let Some(v) = lookup("OUTPASS_DATA_FILE") {
            self.data_file = PathBuf::from(v);
        }
        if let Some(v) = lookup("OUTPASS_BASE_URL") {
            self.base_url = v;
        }
        if let Some(v) = lookup("OUTPASS_HOST") {
            self.host = v;
        }
        if let Some(v) = lookup("OUTPASS_PORT") {
            self.port = parse_value("OUTPASS_PORT", &v)?;
        }
        Ok(())
    }

    /// Server bind settings
    pub fn server(&self) -> HttpServerConfig {
        HttpServerConfig {
            host: self.host.clone(),
            port: self.port,
            cors_origins: self.cors_origins.clone(),
        }
    }

    /// SMTP settings
    pub fn email(&self) -> EmailConfig {
        let from_email = if self.from_email.is_empty() {
            self.smtp_user.clone()
        } else {
            self.from_email.clone()
        };

        EmailConfig {
            smtp_host: self.smtp_host.clone(),
            smtp_port: self.smtp_port,
            smtp_user: self.smtp_user.clone(),
            smtp_password: self.smtp_password.clone(),
            from_email,
            from_name: self.from_name.clone(),
        }
    }

    /// AI provider settings
    pub fn explain(&self) -> ExplainConfig {
        ExplainConfig {
            api_key: self.openai_api_key.clone(),
            model: self.openai_model.clone(),
            api_base: self.openai_api_base.clone(),
            timeout: Duration::from_secs(self.ai_timeout_secs.max(1)),
        }
    }

    /// Workflow settings
    pub fn workflow(&self) -> WorkflowSettings {
        WorkflowSettings {
            approver_email: self.approver_email.clone(),
            base_url: self.base_url.clone(),
        }
    }
}

fn parse_value<T: std::str::FromStr>(key: &str, value: &str) -> ConfigResult<T> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    })
}
