// Drag-and-drop bridge
//
// Carries the item being dragged between views (patient search results,
// waitlist cards, department order cards) and decides what a drop on a
// practitioner lane, a calendar cell or the completion zone means.

use super::selection::GridCell;

/// Native drag-data key holding the dragged id.
pub const NATIVE_ID_KEY: &str = "drag-id";
/// Native drag-data key holding the payload kind.
pub const NATIVE_KIND_KEY: &str = "drag-type";
/// Plain-text fallback; holds the id only.
pub const NATIVE_TEXT_KEY: &str = "text/plain";

/// The item currently being dragged.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DragPayload {
    Patient(String),
    WaitlistEntry(String),
    OrderItem(String),
}

impl DragPayload {
    pub fn id(&self) -> &str {
        match self {
            DragPayload::Patient(id) | DragPayload::WaitlistEntry(id) | DragPayload::OrderItem(id) => id,
        }
    }

    /// Kind tag used in the native drag data
    pub fn kind(&self) -> &'static str {
        match self {
            DragPayload::Patient(_) => "patient",
            DragPayload::WaitlistEntry(_) => "waitlist",
            DragPayload::OrderItem(_) => "order",
        }
    }

    pub fn from_parts(kind: &str, id: &str) -> Option<Self> {
        if id.is_empty() {
            return None;
        }
        let id = id.to_string();
        match kind {
            "patient" => Some(DragPayload::Patient(id)),
            "waitlist" => Some(DragPayload::WaitlistEntry(id)),
            "order" => Some(DragPayload::OrderItem(id)),
            _ => None,
        }
    }

    /// Entries to mirror into the platform's drag data.
    pub fn to_native(&self) -> Vec<(&'static str, String)> {
        vec![
            (NATIVE_ID_KEY, self.id().to_string()),
            (NATIVE_KIND_KEY, self.kind().to_string()),
            (NATIVE_TEXT_KEY, self.id().to_string()),
        ]
    }

    /// Rebuild a payload from native drag data.
    ///
    /// Both the id and the kind must be present; the plain-text entry alone
    /// is not enough to know what was dragged.
    pub fn from_native<F>(lookup: F) -> Option<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let kind = lookup(NATIVE_KIND_KEY)?;
        let id = lookup(NATIVE_ID_KEY).or_else(|| lookup(NATIVE_TEXT_KEY))?;
        Self::from_parts(&kind, &id)
    }
}

/// Holds the single in-flight drag payload for the views below it.
#[derive(Clone, Debug, Default)]
pub struct DragCarrier {
    current: Option<DragPayload>,
}

impl DragCarrier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&mut self, payload: DragPayload) {
        log::debug!("Drag start: {} {}", payload.kind(), payload.id());
        self.current = Some(payload);
    }

    /// Drag ended without a successful drop.
    pub fn end(&mut self) {
        self.current = None;
    }

    pub fn current(&self) -> Option<&DragPayload> {
        self.current.as_ref()
    }

    /// Take the payload for a drop, falling back to native drag data when
    /// the drag started in another component.
    pub fn take_for_drop<F>(&mut self, native: F) -> Option<DragPayload>
    where
        F: Fn(&str) -> Option<String>,
    {
        self.current.take().or_else(|| DragPayload::from_native(native))
    }
}

/// Where the payload was released.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DropTarget {
    /// A practitioner's waitlist lane; `None` is the unassigned lane
    Practitioner(Option<String>),
    /// A cell of the day grid
    CalendarCell(GridCell),
    /// The "drag to complete" zone of the examination worklist
    CompleteZone,
}

/// Top-level views of the clinic app.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClinicView {
    Reception,
    Consultation,
    Examination,
    Appointment,
    Billing,
}

impl ClinicView {
    /// Entry type given to waitlist entries created by a drop in this view
    pub fn default_entry_type(&self) -> &'static str {
        match self {
            ClinicView::Examination => "Examination",
            ClinicView::Appointment => "Appointment",
            ClinicView::Reception | ClinicView::Consultation | ClinicView::Billing => "Consultation",
        }
    }

    pub fn has_complete_zone(&self) -> bool {
        matches!(self, ClinicView::Examination)
    }

    pub fn has_calendar(&self) -> bool {
        matches!(self, ClinicView::Appointment)
    }
}

/// What a drop should do, before any backend call is made.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DropAction {
    ReassignWaitlist {
        entry_id: String,
        vet_id: Option<String>,
    },
    EnqueuePatient {
        patient_id: String,
        vet_id: Option<String>,
        entry_type: &'static str,
    },
    /// Open the creation form at `cell`; the source is a patient or a
    /// waitlist entry still to be resolved to its patient
    DraftAppointment {
        source: DragPayload,
        cell: GridCell,
    },
    CompleteOrder {
        order_id: String,
    },
    Ignore,
}

/// Decide what dropping `payload` on `target` means in `view`.
pub fn route_drop(payload: &DragPayload, target: &DropTarget, view: ClinicView) -> DropAction {
    match (target, payload) {
        (DropTarget::Practitioner(vet_id), DragPayload::WaitlistEntry(id)) => {
            DropAction::ReassignWaitlist {
                entry_id: id.clone(),
                vet_id: vet_id.clone(),
            }
        }
        (DropTarget::Practitioner(vet_id), DragPayload::Patient(id)) => DropAction::EnqueuePatient {
            patient_id: id.clone(),
            vet_id: vet_id.clone(),
            entry_type: view.default_entry_type(),
        },
        (DropTarget::CalendarCell(cell), DragPayload::Patient(_) | DragPayload::WaitlistEntry(_))
            if view.has_calendar() =>
        {
            DropAction::DraftAppointment {
                source: payload.clone(),
                cell: cell.clone(),
            }
        }
        (DropTarget::CompleteZone, DragPayload::OrderItem(id)) if view.has_complete_zone() => {
            DropAction::CompleteOrder {
                order_id: id.clone(),
            }
        }
        _ => DropAction::Ignore,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use test_case::test_case;

    #[test]
    fn test_native_round_trip() {
        let payload = DragPayload::WaitlistEntry("w-1".to_string());
        let native: HashMap<&str, String> = payload.to_native().into_iter().collect();
        let restored = DragPayload::from_native(|key| native.get(key).cloned());
        assert_eq!(restored, Some(payload));
    }

    #[test]
    fn test_native_text_only_is_not_enough() {
        let restored = DragPayload::from_native(|key| {
            (key == NATIVE_TEXT_KEY).then(|| "p-1".to_string())
        });
        assert_eq!(restored, None);
    }

    #[test]
    fn test_carrier_prefers_own_payload() {
        let mut carrier = DragCarrier::new();
        carrier.begin(DragPayload::Patient("p-1".to_string()));
        let taken = carrier.take_for_drop(|_| Some("order".to_string()));
        assert_eq!(taken, Some(DragPayload::Patient("p-1".to_string())));
        assert!(carrier.current().is_none());
    }

    #[test]
    fn test_carrier_falls_back_to_native() {
        let mut carrier = DragCarrier::new();
        let taken = carrier.take_for_drop(|key| match key {
            NATIVE_KIND_KEY => Some("order".to_string()),
            NATIVE_ID_KEY => Some("o-9".to_string()),
            _ => None,
        });
        assert_eq!(taken, Some(DragPayload::OrderItem("o-9".to_string())));
    }

    #[test]
    fn test_carrier_end_clears() {
        let mut carrier = DragCarrier::new();
        carrier.begin(DragPayload::OrderItem("o-1".to_string()));
        carrier.end();
        assert!(carrier.current().is_none());
    }

    #[test_case(ClinicView::Reception, "Consultation")]
    #[test_case(ClinicView::Consultation, "Consultation")]
    #[test_case(ClinicView::Examination, "Examination")]
    #[test_case(ClinicView::Appointment, "Appointment")]
    fn test_patient_on_lane_enqueues(view: ClinicView, expected: &'static str) {
        let action = route_drop(
            &DragPayload::Patient("p-1".to_string()),
            &DropTarget::Practitioner(Some("V1".to_string())),
            view,
        );
        assert_eq!(
            action,
            DropAction::EnqueuePatient {
                patient_id: "p-1".to_string(),
                vet_id: Some("V1".to_string()),
                entry_type: expected,
            }
        );
    }

    #[test]
    fn test_waitlist_on_unassigned_lane() {
        let action = route_drop(
            &DragPayload::WaitlistEntry("w-1".to_string()),
            &DropTarget::Practitioner(None),
            ClinicView::Reception,
        );
        assert_eq!(
            action,
            DropAction::ReassignWaitlist {
                entry_id: "w-1".to_string(),
                vet_id: None,
            }
        );
    }

    #[test]
    fn test_calendar_drop_drafts() {
        let cell = GridCell::parse("V2", "14:00").unwrap();
        let payload = DragPayload::WaitlistEntry("w-1".to_string());
        let action = route_drop(&payload, &DropTarget::CalendarCell(cell.clone()), ClinicView::Appointment);
        assert_eq!(action, DropAction::DraftAppointment { source: payload, cell });
    }

    #[test]
    fn test_order_completion_only_in_examination() {
        let payload = DragPayload::OrderItem("o-1".to_string());
        assert_eq!(
            route_drop(&payload, &DropTarget::CompleteZone, ClinicView::Examination),
            DropAction::CompleteOrder { order_id: "o-1".to_string() }
        );
        assert_eq!(
            route_drop(&payload, &DropTarget::CompleteZone, ClinicView::Reception),
            DropAction::Ignore
        );
    }

    #[test]
    fn test_unhandled_kinds_are_ignored() {
        let cell = GridCell::parse("V1", "10:00").unwrap();
        let order = DragPayload::OrderItem("o-1".to_string());
        assert_eq!(
            route_drop(&order, &DropTarget::CalendarCell(cell), ClinicView::Appointment),
            DropAction::Ignore
        );
        assert_eq!(
            route_drop(&order, &DropTarget::Practitioner(None), ClinicView::Examination),
            DropAction::Ignore
        );
        assert_eq!(
            route_drop(
                &DragPayload::Patient("p-1".to_string()),
                &DropTarget::CompleteZone,
                ClinicView::Examination
            ),
            DropAction::Ignore
        );
    }
}
