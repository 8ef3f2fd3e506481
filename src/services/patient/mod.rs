//! Patient registration and lookup.

use anyhow::{anyhow, Context, Result};

use crate::models::patient::Patient;
use crate::services::backend::{fetch_records, from_row, to_row, Backend, Collection};

pub struct PatientService<'a> {
    backend: &'a dyn Backend,
}

impl<'a> PatientService<'a> {
    pub fn new(backend: &'a dyn Backend) -> Self {
        Self { backend }
    }

    /// All patients, by name.
    pub fn list_all(&self) -> Result<Vec<Patient>> {
        fetch_records(self.backend, Collection::Patients, Some("name"))
    }

    pub fn register(&self, patient: Patient) -> Result<Patient> {
        patient.validate().map_err(|e| anyhow!(e))?;
        let stored = self
            .backend
            .insert(Collection::Patients, vec![to_row(&patient)?])
            .context("Failed to register patient")?;
        let row = stored
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("Backend returned no patient row"))?;
        from_row(row)
    }

    pub fn update(&self, patient: &Patient) -> Result<Patient> {
        let id = patient
            .id
            .as_deref()
            .ok_or_else(|| anyhow!("Patient has no id"))?;
        patient.validate().map_err(|e| anyhow!(e))?;
        let updated = self
            .backend
            .update(Collection::Patients, id, to_row(patient)?)
            .with_context(|| format!("Failed to update patient {}", id))?;
        let row = updated
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("Patient {} not found", id))?;
        from_row(row)
    }
}
