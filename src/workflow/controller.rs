//! Outpass request lifecycle
//!
//! All reads and writes of the collection go through one mutex that owns
//! both the cached records and the store handle, so mutate-then-save is a
//! single unit. The lock is never held across mail or AI provider calls.

use std::sync::{Arc, Mutex, MutexGuard};

use super::errors::{WorkflowError, WorkflowResult};
use crate::explain::Explainer;
use crate::notify::{EmailTemplate, Notifier};
use crate::observability::{Event, Logger};
use crate::store::{
    Decision, IndexedRequest, OutpassRequest, RecordStore, RequestIndex, RequestStatus,
};

/// Fields posted by the submission form. Every field is optional.
#[derive(Debug, Clone, Default)]
pub struct SubmissionForm {
    pub student_name: String,
    pub roll_number: String,
    pub student_mobile: String,
    pub parent_mobile: String,
    pub reason: String,
    pub student_email: String,
}

impl SubmissionForm {
    /// Build a form from decoded key/value pairs.
    ///
    /// The first value of a repeated key wins; unknown keys are ignored.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut form = Self::default();
        let mut seen: Vec<String> = Vec::new();

        for (key, value) in pairs {
            if seen.contains(&key) {
                continue;
            }
            let slot = match key.as_str() {
                "studentName" => &mut form.student_name,
                "rollNumber" => &mut form.roll_number,
                "studentMobile" => &mut form.student_mobile,
                "parentMobile" => &mut form.parent_mobile,
                "reason" => &mut form.reason,
                "studentEmail" => &mut form.student_email,
                _ => continue,
            };
            *slot = value;
            seen.push(key);
        }

        form
    }

    fn into_request(self) -> OutpassRequest {
        OutpassRequest {
            student_name: self.student_name,
            roll_number: self.roll_number,
            student_mobile: self.student_mobile,
            parent_mobile: self.parent_mobile,
            reason: self.reason,
            status: RequestStatus::Pending,
            student_email: self.student_email,
        }
    }
}

/// Deployment-specific values the workflow needs
#[derive(Debug, Clone)]
pub struct WorkflowSettings {
    /// Warden address receiving approval requests
    pub approver_email: String,

    /// Public base URL used to build approve/reject links
    pub base_url: String,
}

impl Default for WorkflowSettings {
    fn default() -> Self {
        Self {
            approver_email: "warden@example.com".to_string(),
            base_url: "http://localhost:5000".to_string(),
        }
    }
}

/// Result of a warden decision
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecisionOutcome {
    /// Status changed and persisted; student notification attempted
    Applied(RequestStatus),
    /// No record at that index
    OutOfRange,
    /// Record was already terminal; nothing changed and nothing was sent
    AlreadyDecided(RequestStatus),
}

struct Ledger {
    store: RecordStore,
    records: Vec<OutpassRequest>,
}

/// Single owner of the outpass collection
pub struct OutpassWorkflow {
    ledger: Mutex<Ledger>,
    explainer: Arc<dyn Explainer>,
    notifier: Arc<dyn Notifier>,
    settings: WorkflowSettings,
}

impl OutpassWorkflow {
    /// Load the collection once and take ownership of the store
    pub fn open(
        store: RecordStore,
        explainer: Arc<dyn Explainer>,
        notifier: Arc<dyn Notifier>,
        settings: WorkflowSettings,
    ) -> WorkflowResult<Self> {
        let records = store.load_all()?;

        let path = store.path().display().to_string();
        let count = records.len().to_string();
        Logger::info(
            Event::StoreLoaded,
            &[("path", path.as_str()), ("records", count.as_str())],
        );

        Ok(Self {
            ledger: Mutex::new(Ledger { store, records }),
            explainer,
            notifier,
            settings,
        })
    }

    fn lock(&self) -> WorkflowResult<MutexGuard<'_, Ledger>> {
        self.ledger.lock().map_err(|_| WorkflowError::LockPoisoned)
    }

    /// Persist a new Pending request, then ask the warden to decide.
    ///
    /// The record is durable before the explanation or email is attempted;
    /// neither of those can fail the submission.
    pub fn submit(&self, form: SubmissionForm) -> WorkflowResult<RequestIndex> {
        let request = form.into_request();

        let index = {
            let mut ledger = self.lock()?;
            let index = ledger.records.len();
            ledger.records.push(request.clone());

            let Ledger { store, records } = &mut *ledger;
            if let Err(e) = store.save_all(records.as_slice()) {
                records.pop();
                return Err(e.into());
            }
            index
        };

        let index_field = index.to_string();
        Logger::info(
            Event::RequestSubmitted,
            &[
                ("index", index_field.as_str()),
                ("roll_number", request.roll_number.as_str()),
            ],
        );

        let explanation = self.explainer.generate(&request.reason);

        let email = EmailTemplate::ApprovalRequest {
            approver: &self.settings.approver_email,
            request: &request,
            index,
            explanation: &explanation,
            base_url: &self.settings.base_url,
        }
        .render();

        match self.notifier.send(&email) {
            Ok(()) => Logger::info(
                Event::ApproverNotified,
                &[
                    ("index", index_field.as_str()),
                    ("recipient", self.settings.approver_email.as_str()),
                ],
            ),
            Err(e) => {
                let error = e.to_string();
                Logger::warn(
                    Event::ApproverNotifyFailed,
                    &[("error", error.as_str()), ("index", index_field.as_str())],
                );
            }
        }

        Ok(index)
    }

    /// Move a Pending request to Approved or Rejected and tell the student.
    ///
    /// Out-of-range indices and already-decided records are silent no-ops.
    pub fn decide(
        &self,
        index: RequestIndex,
        decision: Decision,
    ) -> WorkflowResult<DecisionOutcome> {
        let index_field = index.to_string();
        let target = decision.target_status();

        let request = {
            let mut ledger = self.lock()?;
            let Ledger { store, records } = &mut *ledger;

            let Some(record) = records.get_mut(index) else {
                Logger::info(
                    Event::DecisionIgnored,
                    &[("index", index_field.as_str()), ("reason", "out_of_range")],
                );
                return Ok(DecisionOutcome::OutOfRange);
            };

            if record.status.is_terminal() {
                let current = record.status;
                Logger::info(
                    Event::DecisionIgnored,
                    &[
                        ("index", index_field.as_str()),
                        ("reason", "already_decided"),
                        ("status", current.as_str()),
                    ],
                );
                return Ok(DecisionOutcome::AlreadyDecided(current));
            }

            record.status = target;
            let snapshot = record.clone();

            if let Err(e) = store.save_all(records.as_slice()) {
                records[index].status = RequestStatus::Pending;
                return Err(e.into());
            }
            snapshot
        };

        Logger::info(
            Event::RequestDecided,
            &[("index", index_field.as_str()), ("status", target.as_str())],
        );

        let email = EmailTemplate::StatusUpdate {
            request: &request,
            decision,
        }
        .render();

        match self.notifier.send(&email) {
            Ok(()) => Logger::info(
                Event::StudentNotified,
                &[
                    ("index", index_field.as_str()),
                    ("recipient", request.student_email.as_str()),
                ],
            ),
            Err(e) => {
                let error = e.to_string();
                Logger::warn(
                    Event::StudentNotifyFailed,
                    &[("error", error.as_str()), ("index", index_field.as_str())],
                );
            }
        }

        Ok(DecisionOutcome::Applied(target))
    }

    /// Every request in submission order
    pub fn list_all(&self) -> WorkflowResult<Vec<IndexedRequest>> {
        let ledger = self.lock()?;
        Ok(ledger
            .records
            .iter()
            .cloned()
            .enumerate()
            .map(|(index, request)| IndexedRequest { index, request })
            .collect())
    }

    /// A single request by position
    pub fn get(&self, index: RequestIndex) -> WorkflowResult<Option<OutpassRequest>> {
        Ok(self.lock()?.records.get(index).cloned())
    }

    pub fn len(&self) -> WorkflowResult<usize> {
        Ok(self.lock()?.records.len())
    }
}
