// Chart module
// SOAP records written during consultation

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::utils::nullable::null_as_default;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SoapRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub patient_id: String,
    #[serde(default)]
    pub order_id: Option<String>,
    pub date: NaiveDate,
    /// Chief complaint
    #[serde(default, deserialize_with = "null_as_default")]
    pub cc: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub subjective: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub objective: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub assessment_problems: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub assessment_ddx: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub plan_tx: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub plan_rx: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub plan_summary: String,
}

impl SoapRecord {
    /// Blank chart for a patient
    pub fn new(patient_id: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            id: None,
            patient_id: patient_id.into(),
            order_id: None,
            date,
            cc: String::new(),
            subjective: String::new(),
            objective: String::new(),
            assessment_problems: String::new(),
            assessment_ddx: Vec::new(),
            plan_tx: String::new(),
            plan_rx: String::new(),
            plan_summary: String::new(),
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.patient_id.trim().is_empty() {
            return Err("Chart must reference a patient".to_string());
        }
        if self.cc.trim().is_empty() {
            return Err("Chief complaint is required".to_string());
        }
        Ok(())
    }

    /// Add a differential, ignoring blanks and duplicates
    pub fn add_differential(&mut self, diagnosis: &str) -> bool {
        let diagnosis = diagnosis.trim();
        if diagnosis.is_empty() || self.assessment_ddx.iter().any(|d| d.eq_ignore_ascii_case(diagnosis)) {
            return false;
        }
        self.assessment_ddx.push(diagnosis.to_string());
        true
    }
}
