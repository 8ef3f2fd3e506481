// Committing grid gestures
//
// A released drag is applied to the local copy first, then written through.
// If the write fails the local copy goes back to where it was and the
// outcome says which placement to draw.

use super::Clinic;
use crate::models::appointment::Appointment;
use crate::scheduler::{AppointmentDraft, PendingCommit, Placement, PointerPos};
use crate::services::appointment::AppointmentService;

#[derive(Debug, Clone, PartialEq)]
pub enum CommitOutcome {
    /// Stored; the appointment now sits at this placement
    Saved(Placement),
    /// Not stored; the appointment is drawn back at its original placement
    Reverted { placement: Placement, reason: String },
}

impl CommitOutcome {
    pub fn placement(&self) -> &Placement {
        match self {
            CommitOutcome::Saved(placement) => placement,
            CommitOutcome::Reverted { placement, .. } => placement,
        }
    }

    pub fn is_saved(&self) -> bool {
        matches!(self, CommitOutcome::Saved(_))
    }
}

impl Clinic {
    /// Pointer moved over the grid during an appointment drag.
    pub fn drag_to(&mut self, pointer: PointerPos) -> Option<Placement> {
        let columns = self.column_ids();
        self.scheduler.drag_to(pointer, &columns).cloned()
    }

    /// Pointer released during an appointment drag.
    ///
    /// Returns `None` when no drag was active or nothing changed; in that
    /// case no backend call is made.
    pub fn release_drag(&mut self) -> Option<CommitOutcome> {
        let commit = self.scheduler.end_drag()?;
        Some(self.commit_drag(commit))
    }

    /// Pointer released during a cell selection; the draft opens the
    /// creation form.
    pub fn release_selection(&mut self) -> Option<AppointmentDraft> {
        self.scheduler.end_selection()
    }

    /// Write a moved or resized appointment back to the backend.
    pub fn commit_drag(&mut self, commit: PendingCommit) -> CommitOutcome {
        let Some(index) = self
            .appointments
            .iter()
            .position(|a| a.id.as_deref() == Some(commit.appointment_id.as_str()))
        else {
            log::warn!("Dropped appointment {} is no longer loaded", commit.appointment_id);
            return CommitOutcome::Reverted {
                placement: commit.original,
                reason: "appointment is no longer loaded".to_string(),
            };
        };

        let original: Appointment = self.appointments[index].clone();
        let moved = match commit.proposed.apply_to(&original) {
            Ok(moved) => moved,
            Err(e) => {
                log::error!("Cannot place appointment {}: {}", commit.appointment_id, e);
                return CommitOutcome::Reverted {
                    placement: commit.original,
                    reason: e.to_string(),
                };
            }
        };
        self.appointments[index] = moved.clone();

        match AppointmentService::new(self.backend()).update(&moved) {
            Ok(_) => {
                if commit.changes_vet() {
                    log::info!(
                        "Appointment {} reassigned from {} to {}; linked waitlist and order records are unchanged",
                        commit.appointment_id,
                        commit.original.vet_id,
                        commit.proposed.vet_id
                    );
                }
                log::debug!(
                    "Appointment {} moved to {} {}-{}",
                    commit.appointment_id,
                    commit.proposed.vet_id,
                    commit.proposed.start(),
                    commit.proposed.end()
                );
                self.refresh();
                CommitOutcome::Saved(commit.proposed)
            }
            Err(e) => {
                log::error!("Failed to update appointment {}: {:#}", commit.appointment_id, e);
                self.appointments[index] = original;
                CommitOutcome::Reverted {
                    placement: commit.original,
                    reason: format!("{:#}", e),
                }
            }
        }
    }
}
