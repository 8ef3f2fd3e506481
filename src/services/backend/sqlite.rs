//! Local backend storing every collection in one SQLite file.

use anyhow::{bail, Context, Result};
use chrono::Local;
use rusqlite::{params, OptionalExtension};
use serde_json::{Map, Value};

use super::{
    into_object, stamp_new_row, Backend, ChangeCallback, ChangeEvent, ChangeFeed, ChangeKind,
    Collection, Subscription, ID_FIELD, SINGLETON_ID,
};
use crate::services::database::Database;

/// Base of the URLs handed out for stored objects
pub const DEFAULT_PUBLIC_BASE: &str = "local://objects";

pub struct SqliteBackend {
    db: Database,
    feed: ChangeFeed,
    public_base: String,
}

/// Order-by fields end up inside a JSON path; keep them to plain names.
fn json_path(field: &str) -> Result<String> {
    if field.is_empty() || !field.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        bail!("Invalid order field '{}'", field);
    }
    Ok(format!("$.{}", field))
}

impl SqliteBackend {
    /// Open (or create) the database at `path` and prepare its tables.
    pub fn open(path: &str) -> Result<Self> {
        let db = Database::new(path)?;
        db.initialize_schema()?;
        log::info!("Opened clinic database at {}", path);
        Ok(Self {
            db,
            feed: ChangeFeed::new(),
            public_base: DEFAULT_PUBLIC_BASE.to_string(),
        })
    }

    pub fn in_memory() -> Result<Self> {
        Self::open(":memory:")
    }

    pub fn with_public_base(mut self, base: impl Into<String>) -> Self {
        self.public_base = base.into();
        self
    }

    /// Raw bytes of a stored object
    pub fn read_object(&self, bucket: &str, path: &str) -> Result<Option<Vec<u8>>> {
        self.db
            .connection()
            .query_row(
                "SELECT bytes FROM objects WHERE bucket = ?1 AND path = ?2",
                params![bucket, path],
                |row| row.get(0),
            )
            .optional()
            .context("Failed to read object")
    }

    fn load(&self, collection: Collection, id: &str) -> Result<Option<Map<String, Value>>> {
        let body: Option<String> = self
            .db
            .connection()
            .query_row(
                "SELECT body FROM records WHERE collection = ?1 AND id = ?2",
                params![collection.table_name(), id],
                |row| row.get(0),
            )
            .optional()
            .with_context(|| format!("Failed to load {} row {}", collection, id))?;

        match body {
            Some(body) => {
                let value: Value = serde_json::from_str(&body)
                    .with_context(|| format!("Corrupt {} row {}", collection, id))?;
                Ok(Some(into_object(value)?))
            }
            None => Ok(None),
        }
    }

    fn store_merged(
        &self,
        collection: Collection,
        id: &str,
        mut body: Map<String, Value>,
        patch: Map<String, Value>,
    ) -> Result<Value> {
        for (key, value) in patch {
            if key != ID_FIELD {
                body.insert(key, value);
            }
        }
        let body = Value::Object(body);

        self.db
            .connection()
            .execute(
                "UPDATE records SET body = ?1, updated_at = ?2 WHERE collection = ?3 AND id = ?4",
                params![
                    body.to_string(),
                    Local::now().to_rfc3339(),
                    collection.table_name(),
                    id
                ],
            )
            .with_context(|| format!("Failed to update {} row {}", collection, id))?;

        Ok(body)
    }

    fn notify(&self, collection: Collection, kind: ChangeKind, id: Option<String>) {
        self.feed.publish(ChangeEvent {
            collection,
            kind,
            id,
        });
    }
}

impl Backend for SqliteBackend {
    fn fetch_all(&self, collection: Collection, order_by: Option<&'static str>) -> Result<Vec<Value>> {
        let conn = self.db.connection();
        let bodies: Vec<String> = match order_by {
            Some(field) => {
                let mut stmt = conn.prepare(
                    "SELECT body FROM records WHERE collection = ?1
                     ORDER BY json_extract(body, ?2), rowid",
                )?;
                let rows = stmt.query_map(params![collection.table_name(), json_path(field)?], |row| {
                    row.get(0)
                })?;
                rows.collect::<Result<_, _>>()?
            }
            None => {
                let mut stmt =
                    conn.prepare("SELECT body FROM records WHERE collection = ?1 ORDER BY rowid")?;
                let rows = stmt.query_map([collection.table_name()], |row| row.get(0))?;
                rows.collect::<Result<_, _>>()?
            }
        };

        bodies
            .iter()
            .map(|body| {
                serde_json::from_str(body).with_context(|| format!("Corrupt {} row", collection))
            })
            .collect()
    }

    fn insert(&self, collection: Collection, rows: Vec<Value>) -> Result<Vec<Value>> {
        let conn = self.db.connection();
        let tx = conn
            .unchecked_transaction()
            .context("Failed to begin insert")?;

        let mut stored = Vec::with_capacity(rows.len());
        for row in rows {
            let mut body = into_object(row)?;
            let id = stamp_new_row(&mut body);
            let body = Value::Object(body);

            tx.execute(
                "INSERT INTO records (collection, id, body) VALUES (?1, ?2, ?3)",
                params![collection.table_name(), id, body.to_string()],
            )
            .with_context(|| format!("Failed to insert {} row {}", collection, id))?;
            stored.push((id, body));
        }
        tx.commit().context("Failed to commit insert")?;

        for (id, _) in &stored {
            self.notify(collection, ChangeKind::Insert, Some(id.clone()));
        }
        Ok(stored.into_iter().map(|(_, body)| body).collect())
    }

    fn update(&self, collection: Collection, id: &str, patch: Value) -> Result<Vec<Value>> {
        let patch = into_object(patch)?;
        let Some(body) = self.load(collection, id)? else {
            log::debug!("Update matched no {} row {}", collection, id);
            return Ok(Vec::new());
        };

        let merged = self.store_merged(collection, id, body, patch)?;
        self.notify(collection, ChangeKind::Update, Some(id.to_string()));
        Ok(vec![merged])
    }

    fn delete(&self, collection: Collection, id: &str) -> Result<()> {
        let removed = self
            .db
            .connection()
            .execute(
                "DELETE FROM records WHERE collection = ?1 AND id = ?2",
                params![collection.table_name(), id],
            )
            .with_context(|| format!("Failed to delete {} row {}", collection, id))?;

        if removed > 0 {
            self.notify(collection, ChangeKind::Delete, Some(id.to_string()));
        }
        Ok(())
    }

    fn upsert_singleton(&self, collection: Collection, row: Value) -> Result<()> {
        let patch = into_object(row)?;
        match self.load(collection, SINGLETON_ID)? {
            Some(body) => {
                self.store_merged(collection, SINGLETON_ID, body, patch)?;
                self.notify(collection, ChangeKind::Update, Some(SINGLETON_ID.to_string()));
            }
            None => {
                let mut body = patch;
                body.insert(ID_FIELD.to_string(), Value::String(SINGLETON_ID.to_string()));
                self.insert(collection, vec![Value::Object(body)])?;
            }
        }
        Ok(())
    }

    fn subscribe(&self, collection: Collection, callback: ChangeCallback) -> Subscription {
        self.feed.subscribe(collection, callback)
    }

    fn upload(&self, bucket: &str, path: &str, bytes: &[u8]) -> Result<()> {
        self.db
            .connection()
            .execute(
                "INSERT INTO objects (bucket, path, bytes) VALUES (?1, ?2, ?3)",
                params![bucket, path, bytes],
            )
            .with_context(|| format!("Failed to store {}/{}", bucket, path))?;
        Ok(())
    }

    fn public_url(&self, bucket: &str, path: &str) -> String {
        format!("{}/{}/{}", self.public_base.trim_end_matches('/'), bucket, path)
    }
}
