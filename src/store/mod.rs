//! # Record Store
//!
//! Durable ordered collection of outpass requests, persisted as a single
//! JSON file with load-all / save-all semantics.

pub mod errors;
pub mod file;
pub mod record;

pub use errors::{StoreError, StoreResult};
pub use file::RecordStore;
pub use record::{Decision, IndexedRequest, OutpassRequest, RequestIndex, RequestStatus};
