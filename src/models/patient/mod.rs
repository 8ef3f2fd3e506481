// Patient module
// Registered animals and their owners

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::utils::nullable::null_as_default;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Species {
    Dog,
    Cat,
    #[default]
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Patient {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub chart_number: Option<String>,
    pub name: String,
    pub owner: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub phone: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub species: Species,
    #[serde(default, deserialize_with = "null_as_default")]
    pub breed: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub gender: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub weight: f64,
    #[serde(default)]
    pub birth_date: Option<NaiveDate>,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub last_visit: Option<NaiveDate>,
    #[serde(default)]
    pub medical_memo: Option<String>,
}

impl Patient {
    pub fn new(name: impl Into<String>, owner: impl Into<String>, species: Species) -> Self {
        Self {
            id: None,
            chart_number: None,
            name: name.into(),
            owner: owner.into(),
            phone: String::new(),
            species,
            breed: String::new(),
            gender: String::new(),
            weight: 0.0,
            birth_date: None,
            avatar: None,
            last_visit: None,
            medical_memo: None,
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("Patient name cannot be empty".to_string());
        }
        if self.owner.trim().is_empty() {
            return Err("Owner name cannot be empty".to_string());
        }
        if self.weight < 0.0 {
            return Err("Weight cannot be negative".to_string());
        }
        Ok(())
    }

    /// Case-insensitive match on name, owner or chart number.
    ///
    /// `query` is expected to be trimmed and lowercased already.
    pub fn matches(&self, query: &str) -> bool {
        self.name.to_lowercase().contains(query)
            || self.owner.to_lowercase().contains(query)
            || self
                .chart_number
                .as_deref()
                .unwrap_or_default()
                .to_lowercase()
                .contains(query)
    }

    /// Avatar URL, falling back to a generated one keyed on the name
    pub fn avatar_url(&self) -> String {
        self.avatar
            .clone()
            .unwrap_or_else(|| format!("https://i.pravatar.cc/150?u={}", urlencoding::encode(&self.name)))
    }
}

/// Patients matching a free-text search; an empty query matches nothing.
pub fn search<'a>(patients: &'a [Patient], query: &str) -> Vec<&'a Patient> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return Vec::new();
    }
    patients.iter().filter(|p| p.matches(&query)).collect()
}
