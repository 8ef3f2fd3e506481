//! Clinic-wide settings kept in a single backend row.

use anyhow::{anyhow, Context, Result};

use crate::models::settings::ClinicSettings;
use crate::services::backend::{fetch_records, to_row, Backend, Collection};

pub struct SettingsService<'a> {
    backend: &'a dyn Backend,
}

impl<'a> SettingsService<'a> {
    pub fn new(backend: &'a dyn Backend) -> Self {
        Self { backend }
    }

    /// Stored settings, or the defaults when none were saved yet.
    pub fn get(&self) -> Result<ClinicSettings> {
        let rows: Vec<ClinicSettings> =
            fetch_records(self.backend, Collection::ClinicSettings, None)
                .context("Failed to load clinic settings")?;
        Ok(rows.into_iter().next().unwrap_or_default())
    }

    pub fn update(&self, settings: &ClinicSettings) -> Result<()> {
        settings
            .validate()
            .map_err(|e| anyhow!("Invalid settings: {}", e))?;
        self.backend
            .upsert_singleton(Collection::ClinicSettings, to_row(settings)?)
            .context("Failed to save clinic settings")
    }
}
