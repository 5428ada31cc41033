//! Outpass request records
//!
//! A record's identity is its position in the persisted array. The index is
//! never written to disk; it is recovered from ordering on load.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Positional identifier of a request within the store
pub type RequestIndex = usize;

/// Lifecycle status of an outpass request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RequestStatus {
    /// Awaiting a warden decision
    #[default]
    Pending,
    /// Warden approved (terminal)
    Approved,
    /// Warden rejected (terminal)
    Rejected,
}

impl RequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestStatus::Pending => "Pending",
            RequestStatus::Approved => "Approved",
            RequestStatus::Rejected => "Rejected",
        }
    }

    /// Approved and Rejected admit no further transitions
    pub fn is_terminal(&self) -> bool {
        !matches!(self, RequestStatus::Pending)
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A warden's verdict on a pending request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Approve,
    Reject,
}

impl Decision {
    /// Status the record moves to
    pub fn target_status(&self) -> RequestStatus {
        match self {
            Decision::Approve => RequestStatus::Approved,
            Decision::Reject => RequestStatus::Rejected,
        }
    }

    /// Past-tense word used in student notifications
    pub fn verb(&self) -> &'static str {
        match self {
            Decision::Approve => "approved",
            Decision::Reject => "rejected",
        }
    }
}

/// A single outpass request as persisted in the data file
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OutpassRequest {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub student_name: String,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub roll_number: String,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub student_mobile: String,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub parent_mobile: String,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub reason: String,

    #[serde(default)]
    pub status: RequestStatus,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub student_email: String,
}

/// Older data files hold `null` where a form field was missing.
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// A record paired with its position, for listings
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndexedRequest {
    pub index: RequestIndex,
    #[serde(flatten)]
    pub request: OutpassRequest,
}
