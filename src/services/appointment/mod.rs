//! Appointment service entry point.
//! Backend-backed CRUD plus the weekly recurrence projection used by the
//! day view.

use crate::services::backend::Backend;

pub mod crud;
pub mod recurrence;

pub use recurrence::{appointments_for_day, occurs_on};

/// Service for appointments stored in the clinic backend.
pub struct AppointmentService<'a> {
    pub(crate) backend: &'a dyn Backend,
}

impl<'a> AppointmentService<'a> {
    pub fn new(backend: &'a dyn Backend) -> Self {
        Self { backend }
    }
}
