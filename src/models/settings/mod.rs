// Settings module
// Clinic-wide settings stored as a single backend row

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use crate::scheduler::time_grid::{clock_minutes, DAY_END_MINUTES, DAY_START_MINUTES};
use crate::utils::date::hhmm;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClinicSettings {
    #[serde(with = "hhmm")]
    pub lunch_start_time: NaiveTime,
    #[serde(with = "hhmm")]
    pub lunch_end_time: NaiveTime,
    pub is_lunch_enabled: bool,
    #[serde(default)]
    pub image_server_url: Option<String>,
}

impl Default for ClinicSettings {
    fn default() -> Self {
        Self {
            lunch_start_time: NaiveTime::from_hms_opt(13, 0, 0).unwrap_or_default(),
            lunch_end_time: NaiveTime::from_hms_opt(14, 0, 0).unwrap_or_default(),
            is_lunch_enabled: true,
            image_server_url: None,
        }
    }
}

impl ClinicSettings {
    pub fn validate(&self) -> Result<(), String> {
        let start = clock_minutes(self.lunch_start_time);
        let end = clock_minutes(self.lunch_end_time);
        if end <= start {
            return Err("Lunch break must end after it starts".to_string());
        }
        if start < DAY_START_MINUTES || end > DAY_END_MINUTES {
            return Err("Lunch break must fall inside opening hours".to_string());
        }
        if let Some(url) = &self.image_server_url {
            if !url.is_empty() && !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err("Image server URL must start with http:// or https://".to_string());
            }
        }
        Ok(())
    }

    /// Whether the slot starting at `minutes` falls in the lunch break
    pub fn is_lunch_slot(&self, minutes: u32) -> bool {
        self.is_lunch_enabled
            && minutes >= clock_minutes(self.lunch_start_time)
            && minutes < clock_minutes(self.lunch_end_time)
    }
}
