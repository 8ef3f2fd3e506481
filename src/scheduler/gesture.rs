//! Gesture state machine for the day grid.
//!
//! Selection and appointment drags share one tagged state, so at most one
//! gesture can be live on the grid at a time. Calls that do not fit the
//! current state are ignored rather than reported.

use super::interaction::{AppointmentDrag, DragKind, PendingCommit, Placement, PointerPos};
use super::selection::{AppointmentDraft, GridCell, Selection};
use super::GridGeometry;
use crate::models::appointment::Appointment;

/// Current pointer gesture on the grid.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum GridGesture {
    #[default]
    Idle,
    Selecting(Selection),
    Dragging(AppointmentDrag),
}

/// Owns the live gesture for one day grid.
#[derive(Clone, Debug, Default)]
pub struct DayScheduler {
    gesture: GridGesture,
    geometry: GridGeometry,
}

impl DayScheduler {
    pub fn new(geometry: GridGeometry) -> Self {
        Self {
            gesture: GridGesture::Idle,
            geometry,
        }
    }

    pub fn geometry(&self) -> &GridGeometry {
        &self.geometry
    }

    pub fn gesture(&self) -> &GridGesture {
        &self.gesture
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.gesture, GridGesture::Idle)
    }

    /// Pointer pressed on an empty cell.
    pub fn begin_selection(&mut self, cell: GridCell) -> bool {
        if !self.is_idle() {
            return false;
        }
        self.gesture = GridGesture::Selecting(Selection::new(cell));
        true
    }

    /// Pointer entered another cell while selecting.
    pub fn extend_selection(&mut self, cell: GridCell) -> bool {
        match &mut self.gesture {
            GridGesture::Selecting(selection) => selection.extend(cell),
            _ => false,
        }
    }

    /// Pointer released while selecting; yields the creation draft.
    pub fn end_selection(&mut self) -> Option<AppointmentDraft> {
        match std::mem::take(&mut self.gesture) {
            GridGesture::Selecting(selection) => Some(selection.to_draft()),
            other => {
                self.gesture = other;
                None
            }
        }
    }

    pub fn active_selection(&self) -> Option<&Selection> {
        match &self.gesture {
            GridGesture::Selecting(selection) => Some(selection),
            _ => None,
        }
    }

    /// Pointer pressed on an appointment block or its resize handle.
    ///
    /// Unsaved appointments cannot be dragged.
    pub fn begin_drag(
        &mut self,
        appointment: &Appointment,
        kind: DragKind,
        pointer: PointerPos,
    ) -> bool {
        if !self.is_idle() {
            return false;
        }
        match AppointmentDrag::new(appointment, kind, pointer) {
            Ok(drag) => {
                log::debug!("Begin {:?} of appointment {}", kind, drag.appointment_id);
                self.gesture = GridGesture::Dragging(drag);
                true
            }
            Err(err) => {
                log::warn!("Cannot drag appointment: {}", err);
                false
            }
        }
    }

    /// Pointer moved while dragging; returns the live proposed placement.
    pub fn drag_to<S: AsRef<str>>(
        &mut self,
        pointer: PointerPos,
        columns: &[S],
    ) -> Option<&Placement> {
        let geometry = self.geometry;
        match &mut self.gesture {
            GridGesture::Dragging(drag) => Some(drag.track(pointer, columns, &geometry)),
            _ => None,
        }
    }

    /// Pointer released while dragging.
    ///
    /// The gesture is cleared in every case; a commit is returned only when
    /// the placement actually changed.
    pub fn end_drag(&mut self) -> Option<PendingCommit> {
        match std::mem::take(&mut self.gesture) {
            GridGesture::Dragging(drag) if drag.is_changed() => Some(drag.into()),
            GridGesture::Dragging(_) => None,
            other => {
                self.gesture = other;
                None
            }
        }
    }

    pub fn active_drag(&self) -> Option<&AppointmentDrag> {
        match &self.gesture {
            GridGesture::Dragging(drag) => Some(drag),
            _ => None,
        }
    }

    /// Placement to draw for `appointment_id` while it is being dragged.
    pub fn proposed_placement(&self, appointment_id: &str) -> Option<&Placement> {
        self.active_drag()
            .filter(|drag| drag.appointment_id == appointment_id)
            .map(|drag| &drag.proposed)
    }
}
