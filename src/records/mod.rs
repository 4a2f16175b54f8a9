//! Delivery of completed registrations to the remote records API.
//!
//! `SubmissionClient::submit` validates a record, posts it through a
//! `RecordsTransport`, and folds every result into a `SubmissionOutcome`.
//! Connectivity failures are retried with exponential backoff; everything
//! else, including non-2xx statuses, ends the submission immediately.

pub mod classify;
pub mod client;
pub mod outcome;
pub mod transport;

pub use classify::{ErrorClass, classify};
pub use client::SubmissionClient;
pub use outcome::{SubmissionOutcome, SubmissionResponse};
pub use transport::{HttpRecordsTransport, RecordsTransport, TransportResponse};
