//! RegistrationDesk gates confirmed records so each is submitted once.

use std::collections::HashMap;

use tokio::sync::RwLock;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::RegistrationError;
use crate::records::{SubmissionClient, SubmissionOutcome};

use super::model::PatientRecord;
use super::state::{RegistrationPhase, RegistrationState};

struct Entry {
    state: RegistrationState,
    /// Held only until the record leaves for the records API.
    record: Option<PatientRecord>,
}

/// Finished registrations kept for status lookups by default.
pub const DEFAULT_RETAINED_FINISHED: usize = 1024;

/// Tracks confirmed registrations and submits each one at most once.
///
/// The submission client itself is stateless; this is where the caller-side
/// "submit once" guarantee lives. Once a registration is `Submitted` or
/// `Failed` only its state is kept, and only for the most recent
/// `retain_finished` of them.
pub struct RegistrationDesk {
    client: SubmissionClient,
    entries: RwLock<HashMap<Uuid, Entry>>,
    retain_finished: usize,
}

impl RegistrationDesk {
    pub fn new(client: SubmissionClient) -> Self {
        Self::with_retention(client, DEFAULT_RETAINED_FINISHED)
    }

    /// Like `new`, keeping at most `retain_finished` finished registrations.
    pub fn with_retention(client: SubmissionClient, retain_finished: usize) -> Self {
        Self {
            client,
            entries: RwLock::new(HashMap::new()),
            retain_finished,
        }
    }

    /// Open a registration for a confirmed record.
    pub async fn open(&self, record: PatientRecord) -> Uuid {
        let state = RegistrationState::new();
        let id = state.id;
        self.entries.write().await.insert(
            id,
            Entry {
                state,
                record: Some(record),
            },
        );
        info!(registration = %id, "Registration opened");
        id
    }

    /// Replace the record of a registration that has not been submitted yet.
    pub async fn amend(&self, id: Uuid, record: PatientRecord) -> Result<(), RegistrationError> {
        let mut entries = self.entries.write().await;
        let entry = entries.get_mut(&id).ok_or(RegistrationError::NotFound(id))?;
        if entry.state.phase != RegistrationPhase::Unsubmitted {
            return Err(RegistrationError::AlreadySubmitted {
                id,
                state: entry.state.phase.to_string(),
            });
        }
        entry.record = Some(record);
        Ok(())
    }

    /// Submit a registration.
    ///
    /// Refuses anything not in `Unsubmitted`, including a registration whose
    /// submission is still in flight. An incomplete record returns the
    /// registration to `Unsubmitted` so the caller can amend it.
    pub async fn submit(&self, id: Uuid) -> Result<SubmissionOutcome, RegistrationError> {
        let record = {
            let mut entries = self.entries.write().await;
            let entry = entries.get_mut(&id).ok_or(RegistrationError::NotFound(id))?;
            if entry.state.phase != RegistrationPhase::Unsubmitted {
                warn!(
                    registration = %id,
                    phase = %entry.state.phase,
                    "Duplicate submission refused"
                );
                return Err(RegistrationError::AlreadySubmitted {
                    id,
                    state: entry.state.phase.to_string(),
                });
            }
            let record = entry.record.take().ok_or(RegistrationError::NotFound(id))?;
            entry.state.transition_to(RegistrationPhase::Submitting)?;
            record
        };

        let outcome = self.client.submit(&record).await;

        let mut entries = self.entries.write().await;
        let entry = entries.get_mut(&id).ok_or(RegistrationError::NotFound(id))?;
        let next = match outcome {
            SubmissionOutcome::ValidationFailed { .. } => {
                entry.record = Some(record);
                RegistrationPhase::Unsubmitted
            }
            SubmissionOutcome::Submitted { .. } => RegistrationPhase::Submitted,
            SubmissionOutcome::SubmissionFailed { .. } => RegistrationPhase::Failed,
        };
        entry.state.transition_to(next)?;
        entry.state.last_outcome = Some(outcome.kind().to_string());
        info!(registration = %id, phase = %next, "Registration submission finished");

        if next.is_terminal() {
            prune_finished(&mut entries, self.retain_finished);
        }

        Ok(outcome)
    }

    /// Open and immediately submit a record.
    ///
    /// Returns the registration id unless the record was incomplete. An
    /// incomplete record cannot be amended through this path, so the
    /// registration and its patient data are dropped right away.
    pub async fn register(&self, record: PatientRecord) -> (Option<Uuid>, SubmissionOutcome) {
        let id = self.open(record).await;
        let outcome = match self.submit(id).await {
            Ok(outcome) => outcome,
            // Freshly opened, so only an internal inconsistency lands here.
            Err(e) => SubmissionOutcome::SubmissionFailed {
                message: e.to_string(),
                is_network_error: false,
            },
        };

        if let SubmissionOutcome::ValidationFailed { .. } = outcome {
            self.entries.write().await.remove(&id);
            debug!(registration = %id, "Incomplete registration discarded");
            return (None, outcome);
        }
        (Some(id), outcome)
    }

    /// Lifecycle state of a registration.
    pub async fn status(&self, id: Uuid) -> Option<RegistrationState> {
        self.entries.read().await.get(&id).map(|e| e.state.clone())
    }

    #[cfg(test)]
    async fn tracked(&self) -> usize {
        self.entries.read().await.len()
    }

    #[cfg(test)]
    async fn held_records(&self) -> usize {
        self.entries
            .read()
            .await
            .values()
            .filter(|e| e.record.is_some())
            .count()
    }
}

/// Drop the oldest finished registrations beyond `keep`.
fn prune_finished(entries: &mut HashMap<Uuid, Entry>, keep: usize) {
    let mut finished: Vec<_> = entries
        .iter()
        .filter(|(_, e)| e.state.phase.is_terminal())
        .map(|(id, e)| (e.state.updated_at, *id))
        .collect();
    if finished.len() <= keep {
        return;
    }

    finished.sort_unstable();
    let surplus = finished.len() - keep;
    for (_, id) in finished.into_iter().take(surplus) {
        entries.remove(&id);
    }
    debug!(dropped = surplus, kept = keep, "Pruned finished registrations");
}
