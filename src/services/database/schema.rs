use anyhow::{Context, Result};
use rusqlite::Connection;

/// Rows of every collection as JSON documents, plus uploaded objects.
const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS records (
        collection TEXT NOT NULL,
        id TEXT NOT NULL,
        body TEXT NOT NULL CHECK (json_valid(body)),
        created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
        updated_at TEXT,
        PRIMARY KEY (collection, id)
    );
    CREATE INDEX IF NOT EXISTS idx_records_collection ON records(collection);

    CREATE TABLE IF NOT EXISTS objects (
        bucket TEXT NOT NULL,
        path TEXT NOT NULL,
        bytes BLOB NOT NULL,
        uploaded_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
        PRIMARY KEY (bucket, path)
    );
";

pub fn create_tables(conn: &Connection) -> Result<()> {
    conn.execute_batch(SCHEMA)
        .context("Failed to create clinic tables")
}
