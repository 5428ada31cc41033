//! # Workflow Controller
//!
//! Orchestrates the outpass lifecycle: submit → Pending → warden decision →
//! Approved | Rejected, with email side effects at each step.

pub mod controller;
pub mod errors;

pub use controller::{
    DecisionOutcome, OutpassWorkflow, SubmissionForm, WorkflowSettings,
};
pub use errors::{WorkflowError, WorkflowResult};
