//! # Notification Gateway
//!
//! Renders outpass emails and hands them to an SMTP transport. Callers treat
//! every delivery failure as non-fatal.

pub mod email;
pub mod errors;
pub mod message;

pub use email::{EmailConfig, Notifier, RecordingNotifier, SmtpNotifier};
pub use errors::{NotifyError, NotifyResult};
pub use message::{action_links, EmailTemplate, OutboundEmail};
