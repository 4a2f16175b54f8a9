//! Submission client: validate, then deliver with bounded retries.

use std::sync::Arc;

use tracing::{debug, error, info, warn};

use crate::config::RetryPolicy;
use crate::error::TransportError;
use crate::registration::model::PatientRecord;
use crate::registration::validate::validate;

use super::classify::classify;
use super::outcome::SubmissionOutcome;
use super::transport::{RecordsTransport, TransportResponse};

/// Submits completed patient records to the records API.
///
/// Holds no per-call state; every `submit` owns its own attempt counter and
/// timers, so one client can be shared freely.
#[derive(Clone)]
pub struct SubmissionClient {
    transport: Arc<dyn RecordsTransport>,
    policy: RetryPolicy,
}

impl SubmissionClient {
    pub fn new(transport: Arc<dyn RecordsTransport>, policy: RetryPolicy) -> Self {
        Self { transport, policy }
    }

    /// Validate `record` and, if complete, deliver it.
    ///
    /// Never returns an error: every failure is folded into the outcome.
    /// Only failures classified as transient are retried; a non-2xx status
    /// ends the loop on the attempt that received it.
    pub async fn submit(&self, record: &PatientRecord) -> SubmissionOutcome {
        let missing = validate(record);
        if !missing.is_empty() {
            warn!(
                missing = missing.len(),
                fields = ?missing,
                "Patient record incomplete, not submitting"
            );
            return SubmissionOutcome::ValidationFailed {
                missing_fields: missing,
            };
        }

        let max_attempts = self.policy.max_attempts.max(1);
        let mut last_error = String::new();

        for attempt in 1..=max_attempts {
            debug!(attempt, max_attempts, "Submitting patient record");

            let failure = match self.attempt(record).await {
                Ok(response) => return self.finish(response, attempt),
                Err(e) => e.to_string(),
            };

            if !classify(&failure).is_transient() {
                error!(attempt, error = %failure, "Submission failed with non-retryable error");
                return SubmissionOutcome::SubmissionFailed {
                    message: failure,
                    is_network_error: false,
                };
            }

            warn!(attempt, max_attempts, error = %failure, "Submission attempt failed on network");
            last_error = failure;

            if attempt < max_attempts {
                let delay = self.policy.backoff_delay(attempt);
                info!(
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    "Retrying submission after backoff"
                );
                tokio::time::sleep(delay).await;
            }
        }

        error!(max_attempts, error = %last_error, "Submission retries exhausted");
        SubmissionOutcome::SubmissionFailed {
            message: format!("Failed to submit after {max_attempts} attempts: {last_error}"),
            is_network_error: true,
        }
    }

    /// One request/response cycle under the per-attempt timeout.
    ///
    /// On timeout the transport future is dropped, which aborts the request
    /// and releases its timer.
    async fn attempt(&self, record: &PatientRecord) -> Result<TransportResponse, TransportError> {
        let timeout = self.policy.attempt_timeout;
        match tokio::time::timeout(timeout, self.transport.post_record(record)).await {
            Ok(result) => result,
            Err(_) => Err(TransportError::Timeout(timeout)),
        }
    }

    fn finish(&self, response: TransportResponse, attempt: u32) -> SubmissionOutcome {
        if !response.is_success() {
            let message = status_message(&response);
            error!(attempt, status = response.status, "Records API rejected submission");
            return SubmissionOutcome::SubmissionFailed {
                message,
                is_network_error: false,
            };
        }

        match success_body(&response) {
            Ok(body) => {
                info!(attempt, status = response.status, "Patient record submitted");
                SubmissionOutcome::Submitted { response: body }
            }
            Err(e) => {
                error!(attempt, error = %e, "Records API returned unreadable success body");
                SubmissionOutcome::SubmissionFailed {
                    message: format!("Invalid response from records API: {e}"),
                    is_network_error: false,
                }
            }
        }
    }
}

/// Failure text for a non-2xx response, with the body as diagnostics.
fn status_message(response: &TransportResponse) -> String {
    let reason = reqwest::StatusCode::from_u16(response.status)
        .ok()
        .and_then(|s| s.canonical_reason())
        .unwrap_or("");
    let head = format!("HTTP {} {}", response.status, reason);
    let body = response.body.trim();
    if body.is_empty() {
        head.trim_end().to_string()
    } else {
        format!("{}: {}", head.trim_end(), body)
    }
}

/// Parse a 2xx body. JSON bodies are parsed; anything else becomes a bare
/// success marker.
fn success_body(response: &TransportResponse) -> Result<serde_json::Value, serde_json::Error> {
    if response.body.trim().is_empty() || !response.is_json() {
        return Ok(serde_json::json!({ "success": true }));
    }
    serde_json::from_str(&response.body)
}
