//! Observable events in the outpass service
//!
//! Events are explicit and typed.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Lifecycle
    /// Configuration resolved from file, environment and flags
    ConfigLoaded,
    /// Data file read into memory
    StoreLoaded,
    /// HTTP listener bound
    ServerStart,
    /// HTTP listener shut down
    ServerStop,
    /// Startup failed (FATAL)
    StartupFailed,

    // Workflow
    /// New request persisted as Pending
    RequestSubmitted,
    /// Submission failed before a redirect could be issued
    SubmitFailed,
    /// Pending request moved to a terminal status
    RequestDecided,
    /// Decision skipped (index out of range or already decided)
    DecisionIgnored,

    // Collaborators
    /// AI provider failed, fallback text used
    ExplanationUnavailable,
    /// Warden email delivered
    ApproverNotified,
    /// Warden email failed
    ApproverNotifyFailed,
    /// Student email delivered
    StudentNotified,
    /// Student email failed
    StudentNotifyFailed,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::StoreLoaded => "STORE_LOADED",
            Event::ServerStart => "SERVER_START",
            Event::ServerStop => "SERVER_STOP",
            Event::StartupFailed => "STARTUP_FAILED",

            Event::RequestSubmitted => "REQUEST_SUBMITTED",
            Event::SubmitFailed => "SUBMIT_FAILED",
            Event::RequestDecided => "REQUEST_DECIDED",
            Event::DecisionIgnored => "DECISION_IGNORED",

            Event::ExplanationUnavailable => "EXPLANATION_UNAVAILABLE",
            Event::ApproverNotified => "APPROVER_NOTIFIED",
            Event::ApproverNotifyFailed => "APPROVER_NOTIFY_FAILED",
            Event::StudentNotified => "STUDENT_NOTIFIED",
            Event::StudentNotifyFailed => "STUDENT_NOTIFY_FAILED",
        }
    }

    /// Returns true if this event indicates a fatal condition
    pub fn is_fatal(&self) -> bool {
        matches!(self, Event::StartupFailed)
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
