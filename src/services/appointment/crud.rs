use anyhow::{anyhow, Context, Result};

use super::AppointmentService;
use crate::models::appointment::Appointment;
use crate::services::backend::{fetch_records, from_row, to_row, Collection};

impl<'a> AppointmentService<'a> {
    /// Every stored appointment, recurring rows once.
    pub fn list_all(&self) -> Result<Vec<Appointment>> {
        fetch_records(self.backend, Collection::Appointments, None)
    }

    /// Validate and store a new appointment.
    pub fn create(&self, appointment: Appointment) -> Result<Appointment> {
        appointment.validate().map_err(|e| anyhow!(e))?;

        let stored = self
            .backend
            .insert(Collection::Appointments, vec![to_row(&appointment)?])
            .context("Failed to create appointment")?;
        let row = stored
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("Backend returned no appointment row"))?;
        from_row(row)
    }

    /// Write every field of `appointment` over the stored row.
    pub fn update(&self, appointment: &Appointment) -> Result<Appointment> {
        let id = appointment
            .id
            .as_deref()
            .ok_or_else(|| anyhow!("Appointment has no id"))?;
        appointment.validate().map_err(|e| anyhow!(e))?;

        let updated = self
            .backend
            .update(Collection::Appointments, id, to_row(appointment)?)
            .with_context(|| format!("Failed to update appointment {}", id))?;
        let row = updated
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("Appointment {} not found", id))?;
        from_row(row)
    }

    pub fn delete(&self, id: &str) -> Result<()> {
        self.backend
            .delete(Collection::Appointments, id)
            .with_context(|| format!("Failed to delete appointment {}", id))
    }
}
