// Cell selection
//
// Drag-to-select over grid cells within one practitioner column. The
// selection seeds a creation draft; it never touches the backend.

use chrono::NaiveDate;

use super::time_grid::{
    self, to_minutes, to_time_string, DAY_END_MINUTES, SLOT_INTERVAL,
};
use super::GridError;
use crate::models::appointment::Appointment;

/// One cell of the grid: a practitioner column and the slot start time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridCell {
    pub vet_id: String,
    pub minutes: u32,
}

impl GridCell {
    pub fn new(vet_id: impl Into<String>, minutes: u32) -> Self {
        Self {
            vet_id: vet_id.into(),
            minutes,
        }
    }

    /// Build a cell from an `HH:MM` label.
    pub fn parse(vet_id: impl Into<String>, time: &str) -> Result<Self, GridError> {
        Ok(Self::new(vet_id, to_minutes(time)?))
    }

    pub fn time(&self) -> String {
        to_time_string(self.minutes)
    }
}

/// Proposed but unsaved appointment bounds used to pre-fill the edit form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppointmentDraft {
    pub vet_id: String,
    pub patient_id: Option<String>,
    pub start_minutes: u32,
    pub end_minutes: u32,
}

impl AppointmentDraft {
    /// Draft starting at `cell` lasting `duration` minutes, cut off at closing time.
    pub fn at_cell(cell: &GridCell, duration: u32) -> Self {
        Self {
            vet_id: cell.vet_id.clone(),
            patient_id: None,
            start_minutes: cell.minutes,
            end_minutes: clamp_to_closing(cell.minutes + duration),
        }
    }

    pub fn with_patient(mut self, patient_id: impl Into<String>) -> Self {
        self.patient_id = Some(patient_id.into());
        self
    }

    pub fn start(&self) -> String {
        to_time_string(self.start_minutes)
    }

    pub fn end(&self) -> String {
        to_time_string(self.end_minutes)
    }

    /// Turn the draft into an unsaved appointment on `date`.
    pub fn to_appointment(
        &self,
        date: NaiveDate,
        reason: impl Into<String>,
        color: impl Into<String>,
    ) -> Result<Appointment, GridError> {
        let mut appointment = Appointment::new(
            self.vet_id.clone(),
            date,
            time_grid::clock_time(self.start_minutes)?,
            time_grid::clock_time(self.end_minutes)?,
        );
        appointment.patient_id = self.patient_id.clone();
        appointment.reason = reason.into();
        appointment.color = color.into();
        Ok(appointment)
    }
}

/// Closing-time clamp shared by selections and drops.
///
/// Once the hour reaches 20 the minute is forced to zero, so anything past
/// the boundary lands exactly on 20:00.
pub(crate) fn clamp_to_closing(minutes: u32) -> u32 {
    minutes.min(DAY_END_MINUTES)
}

/// An in-progress drag selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    anchor: GridCell,
    current: GridCell,
}

impl Selection {
    pub fn new(anchor: GridCell) -> Self {
        Self {
            current: anchor.clone(),
            anchor,
        }
    }

    pub fn vet_id(&self) -> &str {
        &self.anchor.vet_id
    }

    /// Move the free end of the selection.
    ///
    /// Cells in another column are ignored and the last valid end is kept.
    /// Returns whether the selection changed.
    pub fn extend(&mut self, cell: GridCell) -> bool {
        if cell.vet_id != self.anchor.vet_id || cell == self.current {
            return false;
        }
        self.current = cell;
        true
    }

    /// First and last selected cell start, in grid order.
    pub fn bounds(&self) -> (u32, u32) {
        let a = self.anchor.minutes;
        let b = self.current.minutes;
        (a.min(b), a.max(b))
    }

    /// Whether `cell` is highlighted by this selection.
    pub fn contains(&self, cell: &GridCell) -> bool {
        let (first, last) = self.bounds();
        cell.vet_id == self.anchor.vet_id && cell.minutes >= first && cell.minutes <= last
    }

    /// Normalised draft: the last cell counts as a whole slot.
    pub fn to_draft(&self) -> AppointmentDraft {
        let (first, last) = self.bounds();
        AppointmentDraft {
            vet_id: self.anchor.vet_id.clone(),
            patient_id: None,
            start_minutes: first,
            end_minutes: clamp_to_closing(last + SLOT_INTERVAL),
        }
    }
}
