//! Practitioner roster.

use anyhow::{anyhow, Context, Result};

use crate::models::veterinarian::Veterinarian;
use crate::services::backend::{fetch_records, to_row, Backend, Collection};

pub struct VeterinarianService<'a> {
    backend: &'a dyn Backend,
}

impl<'a> VeterinarianService<'a> {
    pub fn new(backend: &'a dyn Backend) -> Self {
        Self { backend }
    }

    /// Roster by name; this is also the column order of the day grid.
    pub fn list_all(&self) -> Result<Vec<Veterinarian>> {
        fetch_records(self.backend, Collection::Veterinarians, Some("name"))
    }

    pub fn add(&self, vet: &Veterinarian) -> Result<()> {
        if vet.id.trim().is_empty() || vet.name.trim().is_empty() {
            return Err(anyhow!("Veterinarian needs an id and a name"));
        }
        self.backend
            .insert(Collection::Veterinarians, vec![to_row(vet)?])
            .with_context(|| format!("Failed to add veterinarian {}", vet.id))?;
        Ok(())
    }

    pub fn remove(&self, vet_id: &str) -> Result<()> {
        self.backend
            .delete(Collection::Veterinarians, vet_id)
            .with_context(|| format!("Failed to remove veterinarian {}", vet_id))
    }
}
