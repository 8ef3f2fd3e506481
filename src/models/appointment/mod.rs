// Appointment module
// A booked slot on one practitioner's column of the day grid

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Deserializer, Serialize};

use crate::scheduler::time_grid::{
    clock_minutes, is_aligned, to_time_string, DAY_END_MINUTES, DAY_START_MINUTES,
};
use crate::utils::date::hhmm;
use crate::utils::nullable::{non_blank, null_as_default};

/// Colour used when an appointment does not carry one.
pub const DEFAULT_COLOR: &str = "#3b82f6";

fn default_color() -> String {
    DEFAULT_COLOR.to_string()
}

fn color_or_default<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(non_blank(deserializer)?.unwrap_or_else(default_color))
}

/// Scheduled visit for a practitioner.
///
/// A recurring appointment is stored once; the dates it occupies are derived
/// by [`crate::services::appointment::recurrence::occurs_on`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appointment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub vet_id: String,
    #[serde(default)]
    pub patient_id: Option<String>,
    pub date: NaiveDate,
    #[serde(with = "hhmm")]
    pub start_time: NaiveTime,
    #[serde(with = "hhmm")]
    pub end_time: NaiveTime,
    #[serde(default, deserialize_with = "null_as_default")]
    pub reason: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_recurring: bool,
    #[serde(default = "default_color", deserialize_with = "color_or_default")]
    pub color: String,
}

impl Appointment {
    /// Create an unsaved, non-recurring appointment with the default colour.
    pub fn new(
        vet_id: impl Into<String>,
        date: NaiveDate,
        start_time: NaiveTime,
        end_time: NaiveTime,
    ) -> Self {
        Self {
            id: None,
            vet_id: vet_id.into(),
            patient_id: None,
            date,
            start_time,
            end_time,
            reason: String::new(),
            is_recurring: false,
            color: default_color(),
        }
    }

    /// Validate the appointment against the grid's operating window.
    pub fn validate(&self) -> Result<(), String> {
        if self.vet_id.trim().is_empty() {
            return Err("Appointment must be assigned to a practitioner".to_string());
        }

        let start = self.start_minutes();
        let end = self.end_minutes();
        if end <= start {
            return Err("Appointment end time must be after start time".to_string());
        }
        if start < DAY_START_MINUTES || end > DAY_END_MINUTES {
            return Err(format!(
                "Appointment must fall between {} and {}",
                to_time_string(DAY_START_MINUTES),
                to_time_string(DAY_END_MINUTES)
            ));
        }
        if !is_aligned(start) || !is_aligned(end) {
            return Err("Appointment times must align to 15-minute slots".to_string());
        }

        if !self.color.starts_with('#') || (self.color.len() != 7 && self.color.len() != 4) {
            return Err("Color must be in hex format (#RRGGBB or #RGB)".to_string());
        }

        Ok(())
    }

    pub fn start_minutes(&self) -> u32 {
        clock_minutes(self.start_time)
    }

    pub fn end_minutes(&self) -> u32 {
        clock_minutes(self.end_time)
    }

    pub fn duration_minutes(&self) -> u32 {
        self.end_minutes().saturating_sub(self.start_minutes())
    }

    /// Start time as `HH:MM`
    pub fn start_label(&self) -> String {
        to_time_string(self.start_minutes())
    }

    /// End time as `HH:MM`
    pub fn end_label(&self) -> String {
        to_time_string(self.end_minutes())
    }
}
