//! Outpass email templates
//!
//! Two messages leave the system: the warden's approval request with action
//! links, and the student's status update.

use crate::store::{Decision, OutpassRequest, RequestIndex};

/// A rendered email ready for a [`Notifier`](super::Notifier)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundEmail {
    pub recipients: Vec<String>,
    pub subject: String,
    pub body: String,
}

impl OutboundEmail {
    /// Build a message; duplicate recipients collapse to one.
    pub fn new(
        recipients: impl IntoIterator<Item = impl Into<String>>,
        subject: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        let mut unique: Vec<String> = Vec::new();
        for recipient in recipients {
            let recipient = recipient.into();
            if !unique.contains(&recipient) {
                unique.push(recipient);
            }
        }

        Self {
            recipients: unique,
            subject: subject.into(),
            body: body.into(),
        }
    }
}

/// Email template types
#[derive(Debug, Clone)]
pub enum EmailTemplate<'a> {
    /// New request awaiting the warden
    ApprovalRequest {
        approver: &'a str,
        request: &'a OutpassRequest,
        index: RequestIndex,
        explanation: &'a str,
        base_url: &'a str,
    },

    /// Decision outcome for the student
    StatusUpdate {
        request: &'a OutpassRequest,
        decision: Decision,
    },
}

impl EmailTemplate<'_> {
    pub fn render(&self) -> OutboundEmail {
        match self {
            EmailTemplate::ApprovalRequest {
                approver,
                request,
                index,
                explanation,
                base_url,
            } => {
                let (approve_url, reject_url) = action_links(base_url, *index);
                let subject = format!("Outpass Request from {}", request.student_name);
                let body = format!(
                    "New Outpass Request:\n\n\
                    Name: {}\n\
                    Roll Number: {}\n\
                    Student Mobile: {}\n\
                    Parent Mobile: {}\n\
                    Reason: {}\n\n\
                    AI-Suggested Message:\n{}\n\n\
                    Approve: {}\n\
                    Reject: {}\n",
                    request.student_name,
                    request.roll_number,
                    request.student_mobile,
                    request.parent_mobile,
                    request.reason,
                    explanation,
                    approve_url,
                    reject_url,
                );
                OutboundEmail::new([*approver], subject, body)
            }
            EmailTemplate::StatusUpdate { request, decision } => {
                let body = format!(
                    "Hello {},\n\n\
                    Your outpass request has been {}.\n\n\
                    Regards,\n\
                    Hostel Management",
                    request.student_name,
                    decision.verb(),
                );
                OutboundEmail::new(
                    [request.student_email.as_str()],
                    "Outpass Request Status",
                    body,
                )
            }
        }
    }
}

/// Absolute approve and reject URLs for a request
pub fn action_links(base_url: &str, index: RequestIndex) -> (String, String) {
    let base = base_url.trim_end_matches('/');
    (
        format!("{}/approve/{}", base, index),
        format!("{}/reject/{}", base, index),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> OutpassRequest {
        OutpassRequest {
            student_name: "Asha".to_string(),
            roll_number: "21CS042".to_string(),
            student_mobile: "9000000001".to_string(),
            parent_mobile: "9000000002".to_string(),
            reason: "medical appointment".to_string(),
            student_email: "asha@example.com".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_approval_request_rendering() {
        let request = request();
        let email = EmailTemplate::ApprovalRequest {
            approver: "warden@example.com",
            request: &request,
            index: 7,
            explanation: "Formal explanation.",
            base_url: "http://hostel.local/",
        }
        .render();

        assert_eq!(email.recipients, vec!["warden@example.com"]);
        assert_eq!(email.subject, "Outpass Request from Asha");
        assert!(email.body.contains("Reason: medical appointment"));
        assert!(email.body.contains("AI-Suggested Message:\nFormal explanation."));
        assert!(email.body.contains("Approve: http://hostel.local/approve/7\n"));
        assert!(email.body.contains("Reject: http://hostel.local/reject/7\n"));
    }

    #[test]
    fn test_status_update_rendering() {
        let request = request();
        let email = EmailTemplate::StatusUpdate {
            request: &request,
            decision: Decision::Reject,
        }
        .render();

        assert_eq!(email.recipients, vec!["asha@example.com"]);
        assert_eq!(email.subject, "Outpass Request Status");
        assert!(email.body.starts_with("Hello Asha,"));
        assert!(email.body.contains("has been rejected."));
    }

    #[test]
    fn test_recipients_deduplicated() {
        let email = OutboundEmail::new(["a@example.com", "a@example.com", "b@example.com"], "s", "b");
        assert_eq!(email.recipients, vec!["a@example.com", "b@example.com"]);
    }
}
