//! Registration state machine: a confirmed record is submitted at most once.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::RegistrationError;

/// Where a registration is in its submission lifecycle.
///
/// Unsubmitted → Submitting → Submitted | Failed. Submitting may also fall
/// back to Unsubmitted when the record turned out to be incomplete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegistrationPhase {
    Unsubmitted,
    Submitting,
    Submitted,
    Failed,
}

impl RegistrationPhase {
    /// Check if a transition from `self` to `target` is valid.
    pub fn can_transition_to(&self, target: RegistrationPhase) -> bool {
        use RegistrationPhase::*;
        matches!(
            (self, target),
            (Unsubmitted, Submitting)
                | (Submitting, Submitted)
                | (Submitting, Failed)
                | (Submitting, Unsubmitted)
        )
    }

    /// Whether the registration is finished (no further submission allowed).
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Submitted | Self::Failed)
    }
}

impl Default for RegistrationPhase {
    fn default() -> Self {
        Self::Unsubmitted
    }
}

impl std::fmt::Display for RegistrationPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Unsubmitted => "unsubmitted",
            Self::Submitting => "submitting",
            Self::Submitted => "submitted",
            Self::Failed => "failed",
        };
        write!(f, "{s}")
    }
}

/// Lifecycle record for one registration. Carries no patient data.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationState {
    pub id: Uuid,
    pub phase: RegistrationPhase,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Outcome kind of the last submission, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_outcome: Option<String>,
}

impl RegistrationState {
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            phase: RegistrationPhase::default(),
            created_at: now,
            updated_at: now,
            last_outcome: None,
        }
    }

    /// Move to `target`, rejecting transitions the lifecycle does not allow.
    pub fn transition_to(&mut self, target: RegistrationPhase) -> Result<(), RegistrationError> {
        if !self.phase.can_transition_to(target) {
            return Err(RegistrationError::InvalidTransition {
                id: self.id,
                from: self.phase.to_string(),
                to: target.to_string(),
            });
        }
        self.phase = target;
        self.updated_at = Utc::now();
        Ok(())
    }
}

impl Default for RegistrationState {
    fn default() -> Self {
        Self::new()
    }
}
