//! Headless day scheduler.
//!
//! The time-grid model, the cell-selection and appointment-interaction
//! gestures, the drag-and-drop bridge and the layout contract consumed by a
//! renderer. Everything here is synchronous and free of I/O; persistence is
//! done by the caller through [`crate::state::Clinic`].

pub mod drag_drop;
pub mod gesture;
pub mod interaction;
pub mod layout;
pub mod selection;
pub mod time_grid;

use thiserror::Error;

pub use drag_drop::{route_drop, ClinicView, DragCarrier, DragPayload, DropAction, DropTarget};
pub use gesture::{DayScheduler, GridGesture};
pub use interaction::{AppointmentDrag, DragKind, PendingCommit, Placement, PointerPos};
pub use layout::{AppointmentBlock, DayLayout, LayoutColumn, SelectionHighlight, TimeRow};
pub use selection::{AppointmentDraft, GridCell, Selection};

/// Errors raised by grid arithmetic on malformed input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    #[error("invalid time '{0}', expected HH:MM")]
    InvalidTime(String),

    #[error("{0} minutes is not a time of day")]
    OutOfRange(u32),

    #[error("appointment has no id")]
    MissingId,
}

/// Pixel geometry of the rendered grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridGeometry {
    /// Height of one 15-minute row
    pub slot_height: f32,
    /// Width of one practitioner column
    pub column_width: f32,
    /// Width of the time label gutter
    pub time_column_width: f32,
}

impl Default for GridGeometry {
    fn default() -> Self {
        Self {
            slot_height: 64.0,
            column_width: 240.0,
            time_column_width: 80.0,
        }
    }
}
