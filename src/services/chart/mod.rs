//! SOAP charts written during consultation.

use anyhow::{anyhow, Context, Result};
use serde_json::json;

use crate::models::chart::SoapRecord;
use crate::services::backend::{fetch_records, from_row, to_row, Backend, Collection};

pub struct ChartService<'a> {
    backend: &'a dyn Backend,
}

impl<'a> ChartService<'a> {
    pub fn new(backend: &'a dyn Backend) -> Self {
        Self { backend }
    }

    /// A patient's charts, oldest first.
    pub fn list_for_patient(&self, patient_id: &str) -> Result<Vec<SoapRecord>> {
        let records: Vec<SoapRecord> =
            fetch_records(self.backend, Collection::SoapRecords, Some("date"))?;
        Ok(records
            .into_iter()
            .filter(|r| r.patient_id == patient_id)
            .collect())
    }

    /// Insert a new chart or overwrite the stored one.
    pub fn save(&self, record: &SoapRecord) -> Result<SoapRecord> {
        record.validate().map_err(|e| anyhow!(e))?;
        let row = to_row(record)?;

        let saved = match record.id.as_deref() {
            Some(id) => self
                .backend
                .update(Collection::SoapRecords, id, row)
                .with_context(|| format!("Failed to save chart {}", id))?,
            None => self
                .backend
                .insert(Collection::SoapRecords, vec![row])
                .context("Failed to create chart")?,
        };
        let row = saved
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("Chart was not saved"))?;
        from_row(row)
    }

    /// Point a chart at the department order raised from it.
    pub fn link_order(&self, soap_id: &str, order_id: &str) -> Result<()> {
        self.backend
            .update(Collection::SoapRecords, soap_id, json!({ "order_id": order_id }))
            .with_context(|| format!("Failed to link chart {} to order {}", soap_id, order_id))?;
        Ok(())
    }
}
