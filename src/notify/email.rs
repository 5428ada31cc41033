//! # Email Delivery
//!
//! SMTP sending for outpass notifications, plus a recording sender for tests.

use std::sync::RwLock;

use super::errors::{NotifyError, NotifyResult};
use super::message::OutboundEmail;

/// Email configuration
#[derive(Debug, Clone)]
pub struct EmailConfig {
    /// SMTP server host
    pub smtp_host: String,

    /// SMTP server port
    pub smtp_port: u16,

    /// SMTP username; empty means an unauthenticated local relay
    pub smtp_user: String,

    /// SMTP password
    pub smtp_password: String,

    /// From email address
    pub from_email: String,

    /// From name
    pub from_name: String,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            smtp_host: "localhost".to_string(),
            smtp_port: 1025,
            smtp_user: String::new(),
            smtp_password: String::new(),
            from_email: "noreply@example.com".to_string(),
            from_name: "Hostel Management".to_string(),
        }
    }
}

/// Notification gateway
pub trait Notifier: Send + Sync {
    /// Send one message to all of its recipients
    fn send(&self, email: &OutboundEmail) -> NotifyResult<()>;
}

/// Recording sender for testing
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    sent: RwLock<Vec<OutboundEmail>>,
    failing: bool,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// A sender whose every delivery fails with a transport error
    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    /// Get number of sent emails
    pub fn sent_count(&self) -> usize {
        self.sent.read().map(|s| s.len()).unwrap_or(0)
    }

    /// Snapshot of every message sent so far
    pub fn sent(&self) -> Vec<OutboundEmail> {
        self.sent.read().map(|s| s.clone()).unwrap_or_default()
    }
}

impl Notifier for RecordingNotifier {
    fn send(&self, email: &OutboundEmail) -> NotifyResult<()> {
        if self.failing {
            return Err(NotifyError::Transport("connection refused".to_string()));
        }
        if email.recipients.is_empty() {
            return Err(NotifyError::NoRecipients);
        }
        if let Ok(mut sent) = self.sent.write() {
            sent.push(email.clone());
        }
        Ok(())
    }
}

/// SMTP email sender
pub struct SmtpNotifier {
    config: EmailConfig,
}

impl SmtpNotifier {
    pub fn new(config: EmailConfig) -> Self {
        Self { config }
    }

    fn build_message(&self, email: &OutboundEmail) -> NotifyResult<lettre::Message> {
        use lettre::message::{header::ContentType, Mailbox};

        if email.recipients.is_empty() {
            return Err(NotifyError::NoRecipients);
        }

        let from = format!("{} <{}>", self.config.from_name, self.config.from_email);
        let from: Mailbox = from.parse().map_err(|e| NotifyError::InvalidAddress {
            address: from.clone(),
            reason: format!("{}", e),
        })?;

        let mut builder = lettre::Message::builder()
            .from(from)
            .subject(email.subject.clone())
            .header(ContentType::TEXT_PLAIN);

        for recipient in &email.recipients {
            let to: Mailbox = recipient.parse().map_err(|e| NotifyError::InvalidAddress {
                address: recipient.clone(),
                reason: format!("{}", e),
            })?;
            builder = builder.to(to);
        }

        builder
            .body(email.body.clone())
            .map_err(|e| NotifyError::Build(e.to_string()))
    }
}

impl Notifier for SmtpNotifier {
    fn send(&self, email: &OutboundEmail) -> NotifyResult<()> {
        use lettre::{transport::smtp::authentication::Credentials, SmtpTransport, Transport};

        let message = self.build_message(email)?;

        let mailer = if self.config.smtp_user.is_empty() {
            // No authentication (for local development SMTP servers)
            SmtpTransport::builder_dangerous(&self.config.smtp_host)
                .port(self.config.smtp_port)
                .build()
        } else {
            let creds = Credentials::new(
                self.config.smtp_user.clone(),
                self.config.smtp_password.clone(),
            );

            SmtpTransport::starttls_relay(&self.config.smtp_host)
                .map_err(|e| NotifyError::Transport(format!("SMTP relay error: {}", e)))?
                .credentials(creds)
                .port(self.config.smtp_port)
                .build()
        };

        mailer
            .send(&message)
            .map_err(|e| NotifyError::Transport(format!("Failed to send email: {}", e)))?;

        Ok(())
    }
}
