//! Waitlist service and practitioner lanes.

use anyhow::{anyhow, Context, Result};
use serde_json::json;

use crate::models::veterinarian::{practitioner_columns, Veterinarian};
use crate::models::waitlist::WaitlistEntry;
use crate::services::backend::{fetch_records, from_row, to_row, Backend, Collection};

/// Field the waitlist is ordered by: arrival
pub const WAITLIST_ORDER: &str = "created_at";

pub struct WaitlistService<'a> {
    backend: &'a dyn Backend,
}

impl<'a> WaitlistService<'a> {
    pub fn new(backend: &'a dyn Backend) -> Self {
        Self { backend }
    }

    pub fn list_all(&self) -> Result<Vec<WaitlistEntry>> {
        fetch_records(self.backend, Collection::Waitlist, Some(WAITLIST_ORDER))
    }

    pub fn add(&self, entry: WaitlistEntry) -> Result<WaitlistEntry> {
        if entry.patient_id.trim().is_empty() {
            return Err(anyhow!("Waitlist entry must reference a patient"));
        }
        let stored = self
            .backend
            .insert(Collection::Waitlist, vec![to_row(&entry)?])
            .context("Failed to add waitlist entry")?;
        let row = stored
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("Backend returned no waitlist row"))?;
        from_row(row)
    }

    /// Move an entry to another lane; `None` puts it back to unassigned.
    pub fn assign(&self, entry_id: &str, vet_id: Option<&str>) -> Result<()> {
        let updated = self
            .backend
            .update(Collection::Waitlist, entry_id, json!({ "vet_id": vet_id }))
            .with_context(|| format!("Failed to reassign waitlist entry {}", entry_id))?;
        if updated.is_empty() {
            return Err(anyhow!("Waitlist entry {} not found", entry_id));
        }
        Ok(())
    }

    /// Overwrite the editable fields of an entry.
    pub fn update(&self, entry: &WaitlistEntry) -> Result<()> {
        let id = entry
            .id
            .as_deref()
            .ok_or_else(|| anyhow!("Waitlist entry has no id"))?;
        let updated = self
            .backend
            .update(Collection::Waitlist, id, to_row(entry)?)
            .with_context(|| format!("Failed to update waitlist entry {}", id))?;
        if updated.is_empty() {
            return Err(anyhow!("Waitlist entry {} not found", id));
        }
        Ok(())
    }

    pub fn remove(&self, entry_id: &str) -> Result<()> {
        self.backend
            .delete(Collection::Waitlist, entry_id)
            .with_context(|| format!("Failed to remove waitlist entry {}", entry_id))
    }
}

/// One practitioner's lane.
#[derive(Debug, Clone, PartialEq)]
pub struct WaitlistLane<'a> {
    pub vet: &'a Veterinarian,
    pub entries: Vec<&'a WaitlistEntry>,
}

/// The waitlist split into an unassigned pile and one lane per practitioner.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WaitlistBoard<'a> {
    pub unassigned: Vec<&'a WaitlistEntry>,
    pub lanes: Vec<WaitlistLane<'a>>,
}

impl<'a> WaitlistBoard<'a> {
    pub fn lane(&self, vet_id: &str) -> Option<&WaitlistLane<'a>> {
        self.lanes.iter().find(|lane| lane.vet.id == vet_id)
    }

    pub fn len(&self) -> usize {
        self.unassigned.len() + self.lanes.iter().map(|l| l.entries.len()).sum::<usize>()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Group `entries` by practitioner, keeping their order within each group.
///
/// Every entry lands in exactly one group. Entries with no practitioner, a
/// blank one, or one that has no lane go to `unassigned`.
pub fn group_by_vet<'a>(entries: &'a [WaitlistEntry], vets: &'a [Veterinarian]) -> WaitlistBoard<'a> {
    let mut board = WaitlistBoard {
        unassigned: Vec::new(),
        lanes: practitioner_columns(vets)
            .into_iter()
            .map(|vet| WaitlistLane {
                vet,
                entries: Vec::new(),
            })
            .collect(),
    };

    for entry in entries {
        let lane = entry
            .assigned_vet()
            .and_then(|vet_id| board.lanes.iter_mut().find(|lane| lane.vet.id == vet_id));
        match lane {
            Some(lane) => lane.entries.push(entry),
            None => board.unassigned.push(entry),
        }
    }

    board
}
