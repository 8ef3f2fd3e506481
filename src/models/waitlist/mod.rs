// Waitlist module
// Patients queued for a practitioner but not yet booked

use chrono::{DateTime, Local};
use serde::{Deserialize, Deserializer, Serialize};

use crate::models::patient::Patient;
use crate::utils::date::clock_label;
use crate::utils::nullable::{non_blank, null_as_default};

/// Entry type used when none is recorded
pub const DEFAULT_ENTRY_TYPE: &str = "Consultation";

fn default_entry_type() -> String {
    DEFAULT_ENTRY_TYPE.to_string()
}

fn entry_type_or_default<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(non_blank(deserializer)?.unwrap_or_else(default_entry_type))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaitlistEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub patient_id: String,
    pub patient_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub breed: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub owner_name: String,
    #[serde(default)]
    pub vet_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Local>>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub memo: String,
    #[serde(
        rename = "type",
        default = "default_entry_type",
        deserialize_with = "entry_type_or_default"
    )]
    pub entry_type: String,
}

impl WaitlistEntry {
    /// New entry pre-filled from the patient's display fields.
    ///
    /// Returns `None` for a patient that has not been saved yet.
    pub fn for_patient(
        patient: &Patient,
        vet_id: Option<String>,
        entry_type: impl Into<String>,
    ) -> Option<Self> {
        Some(Self {
            id: None,
            patient_id: patient.id.clone()?,
            patient_name: patient.name.clone(),
            breed: patient.breed.clone(),
            owner_name: patient.owner.clone(),
            vet_id,
            created_at: None,
            memo: String::new(),
            entry_type: entry_type.into(),
        })
    }

    /// Assigned practitioner; blank ids count as unassigned.
    pub fn assigned_vet(&self) -> Option<&str> {
        self.vet_id.as_deref().filter(|id| !id.trim().is_empty())
    }

    /// Arrival time as shown on the waitlist card
    pub fn display_time(&self) -> String {
        self.created_at.map(clock_label).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::patient::Species;

    #[test]
    fn test_for_patient_copies_display_fields() {
        let mut patient = Patient::new("Coco", "Kim", Species::Dog);
        patient.id = Some("p1".to_string());
        patient.breed = "Maltese".to_string();

        let entry = WaitlistEntry::for_patient(&patient, Some("V1".to_string()), "Examination").unwrap();
        assert_eq!(entry.patient_id, "p1");
        assert_eq!(entry.breed, "Maltese");
        assert_eq!(entry.owner_name, "Kim");
        assert_eq!(entry.entry_type, "Examination");
    }

    #[test]
    fn test_for_unsaved_patient() {
        let patient = Patient::new("Coco", "Kim", Species::Dog);
        assert!(WaitlistEntry::for_patient(&patient, None, "Consultation").is_none());
    }

    #[test]
    fn test_blank_vet_is_unassigned() {
        let row = serde_json::json!({
            "id": "w1", "patient_id": "p1", "patient_name": "Coco", "vet_id": ""
        });
        let entry: WaitlistEntry = serde_json::from_value(row).unwrap();
        assert_eq!(entry.assigned_vet(), None);
        assert_eq!(entry.entry_type, DEFAULT_ENTRY_TYPE);
        assert_eq!(entry.display_time(), "");
    }

    #[test]
    fn test_type_column_name() {
        let row = serde_json::json!({
            "patient_id": "p1", "patient_name": "Coco", "type": "Appointment"
        });
        let entry: WaitlistEntry = serde_json::from_value(row).unwrap();
        assert_eq!(entry.entry_type, "Appointment");
        assert_eq!(serde_json::to_value(&entry).unwrap()["type"], "Appointment");
    }
}
