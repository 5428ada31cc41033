//! outpass - Hostel outpass requests with warden approval by email
//!
//! A student submits a leave request, the warden receives it with an
//! AI-drafted justification and approve/reject links, and the student is
//! told the outcome. State lives in a single JSON file.

pub mod cli;
pub mod config;
pub mod explain;
pub mod http_server;
pub mod notify;
pub mod observability;
pub mod store;
pub mod workflow;
