// Applying drag-and-drop between views
//
// The carrier says what is being dragged, `route_drop` says what the drop
// means, and this module performs it.

use super::Clinic;
use crate::models::waitlist::WaitlistEntry;
use crate::scheduler::{route_drop, AppointmentDraft, DragPayload, DropAction, DropTarget};
use crate::services::order::OrderService;
use crate::services::waitlist::WaitlistService;

#[derive(Debug, Clone, PartialEq)]
pub enum DropOutcome {
    /// A waitlist entry moved lanes
    Reassigned { entry_id: String, vet_id: Option<String> },
    /// A patient was queued on the waitlist
    Enqueued { patient_id: String },
    /// The creation form should open with this draft
    Draft(AppointmentDraft),
    /// An order was marked completed
    Completed { order_id: String },
    /// The write failed; it was logged and nothing changed
    Failed(String),
    /// Nothing to do for this drop
    Ignored,
}

impl Clinic {
    /// Start dragging `payload` from one of the views.
    pub fn begin_item_drag(&mut self, payload: DragPayload) {
        self.carrier.begin(payload);
    }

    /// Drag ended without a drop.
    pub fn cancel_item_drag(&mut self) {
        self.carrier.end();
    }

    /// Drop the current payload on `target`.
    ///
    /// `native` reads the platform drag data and is only consulted when the
    /// carrier lost track of the payload.
    pub fn drop_on<F>(&mut self, target: &DropTarget, native: F) -> DropOutcome
    where
        F: Fn(&str) -> Option<String>,
    {
        let Some(payload) = self.carrier.take_for_drop(native) else {
            log::debug!("Drop with no payload on {:?}", target);
            return DropOutcome::Ignored;
        };

        match route_drop(&payload, target, self.view) {
            DropAction::ReassignWaitlist { entry_id, vet_id } => {
                self.reassign_waitlist(entry_id, vet_id)
            }
            DropAction::EnqueuePatient {
                patient_id,
                vet_id,
                entry_type,
            } => self.enqueue_patient(patient_id, vet_id, entry_type),
            DropAction::DraftAppointment { source, cell } => {
                let patient_id = match &source {
                    DragPayload::Patient(id) => Some(id.clone()),
                    DragPayload::WaitlistEntry(id) => {
                        self.waitlist_entry(id).map(|e| e.patient_id.clone())
                    }
                    DragPayload::OrderItem(_) => None,
                };
                match patient_id {
                    Some(patient_id) => DropOutcome::Draft(
                        AppointmentDraft::at_cell(&cell, self.options.drop_duration)
                            .with_patient(patient_id),
                    ),
                    None => {
                        log::warn!("Cannot resolve a patient for {:?}", source);
                        DropOutcome::Ignored
                    }
                }
            }
            DropAction::CompleteOrder { order_id } => {
                match OrderService::new(self.backend()).complete(&order_id) {
                    Ok(()) => {
                        self.refresh();
                        DropOutcome::Completed { order_id }
                    }
                    Err(e) => failed("complete order", e),
                }
            }
            DropAction::Ignore => DropOutcome::Ignored,
        }
    }

    fn reassign_waitlist(&mut self, entry_id: String, vet_id: Option<String>) -> DropOutcome {
        match WaitlistService::new(self.backend()).assign(&entry_id, vet_id.as_deref()) {
            Ok(()) => {
                log::info!("Waitlist entry {} moved to {:?}", entry_id, vet_id);
                self.refresh();
                DropOutcome::Reassigned { entry_id, vet_id }
            }
            Err(e) => failed("reassign waitlist entry", e),
        }
    }

    fn enqueue_patient(
        &mut self,
        patient_id: String,
        vet_id: Option<String>,
        entry_type: &str,
    ) -> DropOutcome {
        let Some(entry) = self
            .patient(&patient_id)
            .and_then(|patient| WaitlistEntry::for_patient(patient, vet_id, entry_type))
        else {
            log::warn!("Dropped patient {} is not loaded", patient_id);
            return DropOutcome::Ignored;
        };

        match WaitlistService::new(self.backend()).add(entry) {
            Ok(_) => {
                self.refresh();
                DropOutcome::Enqueued { patient_id }
            }
            Err(e) => failed("queue patient", e),
        }
    }
}

fn failed(what: &str, err: anyhow::Error) -> DropOutcome {
    log::error!("Failed to {}: {:#}", what, err);
    DropOutcome::Failed(format!("{:#}", err))
}
