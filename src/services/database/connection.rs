use anyhow::{Context, Result};
use rusqlite::Connection;

use super::schema;

/// The SQLite file behind the local backend.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open `path`, creating the file if needed. `":memory:"` gives a
    /// private in-memory database.
    ///
    /// # Examples
    /// ```
    /// use vet_calendar::services::database::Database;
    /// let db = Database::new(":memory:").unwrap();
    /// db.initialize_schema().unwrap();
    /// ```
    pub fn new(path: &str) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open clinic database at {}", path))?;
        Ok(Self { conn })
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Create the records and objects tables when they are missing.
    pub fn initialize_schema(&self) -> Result<()> {
        schema::create_tables(&self.conn)
    }
}
