//! Clinic backend boundary.
//!
//! The clinic's data lives in a hosted table service: named collections of
//! JSON rows, a singleton settings row, change notifications per collection
//! and an object store for images. [`Backend`] is that surface; the
//! SQLite implementation serves local installs and tests, the REST one talks
//! to a PostgREST-style hosted service.

use std::fmt;
use std::sync::{Arc, Mutex, Weak};

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

pub mod rest;
pub mod sqlite;

pub use rest::RestBackend;
pub use sqlite::SqliteBackend;

/// Row key every collection is addressed by
pub const ID_FIELD: &str = "id";
/// Timestamp stamped on inserted rows that lack one
pub const CREATED_AT_FIELD: &str = "created_at";
/// Id of the singleton row in single-row collections
pub const SINGLETON_ID: &str = "1";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Patients,
    Veterinarians,
    Waitlist,
    Appointments,
    DepartmentOrders,
    SoapRecords,
    ClinicSettings,
}

impl Collection {
    /// Table name on the hosted service
    pub fn table_name(&self) -> &'static str {
        match self {
            Collection::Patients => "patients",
            Collection::Veterinarians => "veterinarians",
            Collection::Waitlist => "waitlist",
            Collection::Appointments => "appointments",
            Collection::DepartmentOrders => "department_orders",
            Collection::SoapRecords => "soap_records",
            Collection::ClinicSettings => "clinic_settings",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.table_name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Insert,
    Update,
    Delete,
}

/// Notification delivered to subscribers after a successful write
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEvent {
    pub collection: Collection,
    pub kind: ChangeKind,
    pub id: Option<String>,
}

pub type ChangeCallback = Arc<dyn Fn(&ChangeEvent) + Send + Sync>;

/// Hosted table service used by the clinic.
#[cfg_attr(test, mockall::automock)]
pub trait Backend {
    /// All rows of `collection`, ordered by `order_by` when given.
    fn fetch_all(&self, collection: Collection, order_by: Option<&'static str>) -> Result<Vec<Value>>;

    /// Insert rows; rows without an id get one. Returns the stored rows.
    fn insert(&self, collection: Collection, rows: Vec<Value>) -> Result<Vec<Value>>;

    /// Merge `patch` into the row with `id`. Returns the updated rows,
    /// which is empty when nothing matched.
    fn update(&self, collection: Collection, id: &str, patch: Value) -> Result<Vec<Value>>;

    fn delete(&self, collection: Collection, id: &str) -> Result<()>;

    /// Insert or merge the single row of a settings-style collection.
    fn upsert_singleton(&self, collection: Collection, row: Value) -> Result<()>;

    /// Register `callback` for changes to `collection`.
    fn subscribe(&self, collection: Collection, callback: ChangeCallback) -> Subscription;

    /// Store `bytes` at `path`; an existing object is never overwritten.
    fn upload(&self, bucket: &str, path: &str, bytes: &[u8]) -> Result<()>;

    fn public_url(&self, bucket: &str, path: &str) -> String;
}

struct Listener {
    id: u64,
    collection: Collection,
    callback: ChangeCallback,
}

#[derive(Default)]
struct FeedInner {
    next_id: u64,
    listeners: Vec<Listener>,
}

/// In-process fan-out of change notifications.
#[derive(Clone, Default)]
pub struct ChangeFeed {
    inner: Arc<Mutex<FeedInner>>,
}

impl ChangeFeed {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, collection: Collection, callback: ChangeCallback) -> Subscription {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        inner.next_id += 1;
        let id = inner.next_id;
        inner.listeners.push(Listener {
            id,
            collection,
            callback,
        });
        log::debug!("Subscribed #{} to {}", id, collection);

        Subscription {
            id,
            feed: Arc::downgrade(&self.inner),
        }
    }

    /// Deliver `event` to every listener of its collection.
    ///
    /// Callbacks run outside the lock so they may call back into the backend.
    pub fn publish(&self, event: ChangeEvent) {
        let callbacks: Vec<ChangeCallback> = {
            let inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
            inner
                .listeners
                .iter()
                .filter(|l| l.collection == event.collection)
                .map(|l| Arc::clone(&l.callback))
                .collect()
        };
        for callback in callbacks {
            callback(&event);
        }
    }

    pub fn listener_count(&self) -> usize {
        self.inner.lock().unwrap_or_else(|e| e.into_inner()).listeners.len()
    }
}

/// Handle for a change subscription; dropping it unsubscribes.
pub struct Subscription {
    id: u64,
    feed: Weak<Mutex<FeedInner>>,
}

impl Subscription {
    /// A handle bound to no feed, for backends without notifications.
    pub fn detached() -> Self {
        Self {
            id: 0,
            feed: Weak::new(),
        }
    }

    pub fn is_active(&self) -> bool {
        self.feed.upgrade().is_some()
    }

    pub fn unsubscribe(self) {}
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(feed) = self.feed.upgrade() {
            let mut inner = feed.lock().unwrap_or_else(|e| e.into_inner());
            inner.listeners.retain(|l| l.id != self.id);
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("active", &self.is_active())
            .finish()
    }
}

/// Serialize a record into a backend row.
pub fn to_row<T: Serialize>(record: &T) -> Result<Value> {
    serde_json::to_value(record).context("Failed to serialize row")
}

pub fn from_row<T: DeserializeOwned>(row: Value) -> Result<T> {
    serde_json::from_value(row).context("Failed to decode row")
}

/// Fetch and decode a whole collection. Rows that do not decode are
/// skipped with a warning so one bad row cannot blank a view.
pub fn fetch_records<T: DeserializeOwned>(
    backend: &dyn Backend,
    collection: Collection,
    order_by: Option<&'static str>,
) -> Result<Vec<T>> {
    let rows = backend
        .fetch_all(collection, order_by)
        .with_context(|| format!("Failed to fetch {}", collection))?;

    let records = rows
        .into_iter()
        .filter_map(|row| {
            let id = row.get(ID_FIELD).cloned();
            match serde_json::from_value::<T>(row) {
                Ok(record) => Some(record),
                Err(err) => {
                    log::warn!("Skipping malformed {} row {:?}: {}", collection, id, err);
                    None
                }
            }
        })
        .collect();

    Ok(records)
}

/// Give a row about to be inserted its id and creation time when it lacks
/// them. Returns the row id.
pub(crate) fn stamp_new_row(row: &mut Map<String, Value>) -> String {
    let id = match row.get(ID_FIELD) {
        Some(Value::String(id)) if !id.is_empty() => id.clone(),
        _ => uuid::Uuid::new_v4().to_string(),
    };
    row.insert(ID_FIELD.to_string(), Value::String(id.clone()));
    if row.get(CREATED_AT_FIELD).map_or(true, Value::is_null) {
        row.insert(
            CREATED_AT_FIELD.to_string(),
            Value::String(chrono::Local::now().to_rfc3339()),
        );
    }
    id
}

pub(crate) fn into_object(row: Value) -> Result<Map<String, Value>> {
    match row {
        Value::Object(map) => Ok(map),
        other => Err(anyhow::anyhow!("Expected a JSON object row, got {}", other)),
    }
}

/// Id of a stored row, if it has one
pub fn row_id(row: &Value) -> Option<String> {
    row.get(ID_FIELD).and_then(Value::as_str).map(str::to_string)
}
