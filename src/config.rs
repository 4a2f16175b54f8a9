//! Configuration types.

use std::time::Duration;

use secrecy::SecretString;

use crate::error::ConfigError;

/// Intake service configuration.
#[derive(Debug, Clone)]
pub struct IntakeConfig {
    /// Base URL of the remote records API, without trailing slash.
    pub records_url: String,
    /// Path of the record-creation endpoint on the records API.
    pub records_path: String,
    /// Bearer token for the records API, if it requires one.
    pub records_token: Option<SecretString>,
    /// Retry and timeout settings for submissions.
    pub retry: RetryPolicy,
    /// Port the intake API listens on.
    pub port: u16,
}

impl Default for IntakeConfig {
    fn default() -> Self {
        Self {
            records_url: "http://localhost:5000".to_string(),
            records_path: "/api/patients".to_string(),
            records_token: None,
            retry: RetryPolicy::default(),
            port: 8080,
        }
    }
}

impl IntakeConfig {
    /// Load configuration from `INTAKE_*` environment variables.
    ///
    /// `INTAKE_RECORDS_URL` is required; everything else has a default.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let records_url = lookup("INTAKE_RECORDS_URL")
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar("INTAKE_RECORDS_URL".to_string()))?
            .trim_end_matches('/')
            .to_string();

        let records_path = match lookup("INTAKE_RECORDS_PATH") {
            Some(path) if path.starts_with('/') => path,
            Some(path) => format!("/{path}"),
            None => defaults.records_path,
        };

        let records_token = lookup("INTAKE_RECORDS_TOKEN")
            .filter(|s| !s.is_empty())
            .map(SecretString::from);

        let timeout_secs: u64 = parse_or(&lookup, "INTAKE_ATTEMPT_TIMEOUT_SECS", 30)?;
        let max_attempts: u32 = parse_or(&lookup, "INTAKE_MAX_ATTEMPTS", 3)?;
        let base_backoff_ms: u64 = parse_or(&lookup, "INTAKE_BASE_BACKOFF_MS", 1000)?;
        let port: u16 = parse_or(&lookup, "INTAKE_PORT", defaults.port)?;

        if max_attempts == 0 {
            return Err(ConfigError::InvalidValue {
                key: "INTAKE_MAX_ATTEMPTS".to_string(),
                message: "must be at least 1".to_string(),
            });
        }

        Ok(Self {
            records_url,
            records_path,
            records_token,
            retry: RetryPolicy {
                max_attempts,
                attempt_timeout: Duration::from_secs(timeout_secs),
                base_backoff: Duration::from_millis(base_backoff_ms),
            },
            port,
        })
    }

    /// Full URL of the record-creation endpoint.
    pub fn endpoint(&self) -> String {
        format!("{}{}", self.records_url, self.records_path)
    }
}

/// How a submission retries transient failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first one.
    pub max_attempts: u32,
    /// Budget for a single request/response cycle.
    pub attempt_timeout: Duration,
    /// Delay before the first retry; doubles for each later retry.
    pub base_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            attempt_timeout: Duration::from_secs(30),
            base_backoff: Duration::from_millis(1000),
        }
    }
}

impl RetryPolicy {
    /// Delay to wait after failed attempt number `attempt` (1-based).
    pub fn backoff_delay(&self, attempt: u32) -> Duration {
        let shift = attempt.saturating_sub(1).min(16);
        self.base_backoff.saturating_mul(1u32 << shift)
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::InvalidValue {
            key: key.to_string(),
            message: format!("{raw:?}: {e}"),
        }),
        None => Ok(default),
    }
}
