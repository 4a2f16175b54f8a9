//! Patient Intake: registration validation and resilient submission.

pub mod config;
pub mod error;
pub mod records;
pub mod registration;
pub mod tools;
