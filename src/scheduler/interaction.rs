// Appointment interaction
//
// Move and resize gestures on an existing appointment block.
// - Move: vertical displacement shifts the start (duration fixed), horizontal
//   displacement switches practitioner columns
// - Resize: only the end boundary follows the pointer

use super::time_grid::{
    snap_steps, to_time_string, DAY_END_MINUTES, DAY_START_MINUTES, MIN_DURATION_MINUTES,
    SLOT_INTERVAL,
};
use super::{GridError, GridGeometry};
use crate::models::appointment::Appointment;

/// Which gesture is active on the appointment block
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DragKind {
    /// Whole block follows the pointer
    Move,
    /// Bottom handle adjusts the end time
    Resize,
}

/// Screen coordinates of the pointer
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct PointerPos {
    pub x: f32,
    pub y: f32,
}

impl PointerPos {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Column and time span of an appointment on the grid.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Placement {
    pub vet_id: String,
    pub start_minutes: u32,
    pub end_minutes: u32,
}

impl Placement {
    pub fn of(appointment: &Appointment) -> Self {
        Self {
            vet_id: appointment.vet_id.clone(),
            start_minutes: appointment.start_minutes(),
            end_minutes: appointment.end_minutes(),
        }
    }

    pub fn duration(&self) -> u32 {
        self.end_minutes.saturating_sub(self.start_minutes)
    }

    pub fn start(&self) -> String {
        to_time_string(self.start_minutes)
    }

    pub fn end(&self) -> String {
        to_time_string(self.end_minutes)
    }

    /// Copy of `appointment` moved to this placement.
    pub fn apply_to(&self, appointment: &Appointment) -> Result<Appointment, GridError> {
        let mut updated = appointment.clone();
        updated.vet_id = self.vet_id.clone();
        updated.start_time = super::time_grid::clock_time(self.start_minutes)?;
        updated.end_time = super::time_grid::clock_time(self.end_minutes)?;
        Ok(updated)
    }
}

/// Context for an active move or resize
#[derive(Clone, Debug, PartialEq)]
pub struct AppointmentDrag {
    pub appointment_id: String,
    pub kind: DragKind,
    /// Committed placement at gesture start
    pub original: Placement,
    /// Pointer position at gesture start
    pub pointer_start: PointerPos,
    /// Live placement following the pointer
    pub proposed: Placement,
}

impl AppointmentDrag {
    /// Snapshot `appointment` at the start of a gesture.
    pub fn new(
        appointment: &Appointment,
        kind: DragKind,
        pointer: PointerPos,
    ) -> Result<Self, GridError> {
        let appointment_id = appointment.id.clone().ok_or(GridError::MissingId)?;
        let original = Placement::of(appointment);
        Ok(Self {
            appointment_id,
            kind,
            proposed: original.clone(),
            original,
            pointer_start: pointer,
        })
    }

    /// Recompute the proposed placement for the current pointer position.
    ///
    /// `columns` are the practitioner ids in display order.
    pub fn track<S: AsRef<str>>(
        &mut self,
        pointer: PointerPos,
        columns: &[S],
        geometry: &GridGeometry,
    ) -> &Placement {
        let slots_moved = snap_steps(pointer.y - self.pointer_start.y, geometry.slot_height);
        let minutes_moved = slots_moved as i64 * SLOT_INTERVAL as i64;

        self.proposed = match self.kind {
            DragKind::Move => {
                let cols_moved = snap_steps(pointer.x - self.pointer_start.x, geometry.column_width);
                self.moved(minutes_moved, cols_moved, columns)
            }
            DragKind::Resize => self.resized(minutes_moved),
        };
        &self.proposed
    }

    fn moved<S: AsRef<str>>(&self, minutes_moved: i64, cols_moved: i32, columns: &[S]) -> Placement {
        let original = &self.original;
        let duration = original.duration() as i64;

        let vet_id = match columns.iter().position(|c| c.as_ref() == original.vet_id) {
            Some(index) => {
                let last = columns.len() as i64 - 1;
                let target = (index as i64 + cols_moved as i64).min(last).max(0);
                columns[target as usize].as_ref().to_string()
            }
            // Block is not on a visible column; keep its practitioner
            None => original.vet_id.clone(),
        };

        let latest_start = DAY_END_MINUTES as i64 - duration;
        let start = (original.start_minutes as i64 + minutes_moved)
            .min(latest_start)
            .max(DAY_START_MINUTES as i64);

        Placement {
            vet_id,
            start_minutes: start as u32,
            end_minutes: (start + duration) as u32,
        }
    }

    fn resized(&self, minutes_moved: i64) -> Placement {
        let original = &self.original;
        let shortest = original.start_minutes as i64 + MIN_DURATION_MINUTES as i64;
        let end = (original.end_minutes as i64 + minutes_moved)
            .max(shortest)
            .min(DAY_END_MINUTES as i64);

        Placement {
            end_minutes: end as u32,
            ..original.clone()
        }
    }

    /// Whether releasing now would change the stored appointment.
    pub fn is_changed(&self) -> bool {
        self.proposed != self.original
    }
}

/// A released gesture that still has to be persisted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PendingCommit {
    pub appointment_id: String,
    pub original: Placement,
    pub proposed: Placement,
}

impl PendingCommit {
    pub fn changes_vet(&self) -> bool {
        self.original.vet_id != self.proposed.vet_id
    }
}

impl From<AppointmentDrag> for PendingCommit {
    fn from(drag: AppointmentDrag) -> Self {
        Self {
            appointment_id: drag.appointment_id,
            original: drag.original,
            proposed: drag.proposed,
        }
    }
}
