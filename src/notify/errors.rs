//! # Notification Errors

use thiserror::Error;

/// Result type for notification operations
pub type NotifyResult<T> = Result<T, NotifyError>;

/// Email delivery errors
#[derive(Debug, Clone, Error)]
pub enum NotifyError {
    /// Message has nobody to go to
    #[error("Email has no recipients")]
    NoRecipients,

    /// Sender or recipient address failed to parse
    #[error("Invalid address {address}: {reason}")]
    InvalidAddress { address: String, reason: String },

    /// Message could not be assembled
    #[error("Failed to build email: {0}")]
    Build(String),

    /// SMTP relay or delivery failure
    #[error("SMTP transport error: {0}")]
    Transport(String),
}
