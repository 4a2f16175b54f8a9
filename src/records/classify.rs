//! Network-vs-application classification of failed attempts.

/// Lowercase fragments that mark a failure as connectivity-related.
///
/// Covers the phrasing of reqwest/hyper cause chains, OS socket errors,
/// and generic browser-style fetch failures.
const NETWORK_ERROR_SIGNATURES: &[&str] = &[
    "network error",
    "networkerror",
    "failed to fetch",
    "fetch failed",
    "network request failed",
    "error sending request",
    "connection refused",
    "connection reset",
    "connection closed",
    "connection aborted",
    "econnrefused",
    "econnreset",
    "enotfound",
    "etimedout",
    "dns error",
    "failed to lookup address",
    "name or service not known",
    "no such host",
    "timed out",
    "timeout",
];

/// How the retry loop should treat a failed attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Connectivity or timeout failure; worth another attempt.
    Transient,
    /// Anything else; retrying would not help.
    Terminal,
}

impl ErrorClass {
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Transient)
    }
}

/// Classify a failure by its message text.
pub fn classify(message: &str) -> ErrorClass {
    let lower = message.to_lowercase();
    if NETWORK_ERROR_SIGNATURES
        .iter()
        .any(|signature| lower.contains(signature))
    {
        ErrorClass::Transient
    } else {
        ErrorClass::Terminal
    }
}
