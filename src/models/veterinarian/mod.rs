// Veterinarian module
// Practitioners shown as columns of the day grid and lanes of the waitlist

use serde::{Deserialize, Serialize};

use crate::utils::nullable::null_as_default;

/// Id of the "all practitioners" pseudo-entry. It is a filter choice in the
/// views, never a grid column.
pub const ALL_VETS_ID: &str = "ALL_VETS";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Veterinarian {
    pub id: String,
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub specialty: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub email: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub avatar: String,
}

impl Veterinarian {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            specialty: String::new(),
            email: String::new(),
            avatar: String::new(),
        }
    }

    pub fn is_pseudo_entry(&self) -> bool {
        self.id == ALL_VETS_ID
    }
}

/// Practitioners that get a column, in display order.
pub fn practitioner_columns(vets: &[Veterinarian]) -> Vec<&Veterinarian> {
    vets.iter().filter(|v| !v.is_pseudo_entry()).collect()
}
