// Database service module
// SQLite file backing the local clinic backend

mod connection;
mod schema;

pub use connection::Database;

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn table_exists(db: &Database, name: &str) -> bool {
        let count: i64 = db
            .connection()
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name=?",
                [name],
                |row| row.get(0),
            )
            .unwrap();
        count == 1
    }

    #[test]
    fn test_new_database_in_memory() {
        let result = Database::new(":memory:");
        assert!(result.is_ok(), "Should create in-memory database");
    }

    #[test]
    fn test_new_database_with_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let db_path = temp_dir.path().join("clinic.db");
        let db_path_str = db_path.to_str().unwrap();

        let db = Database::new(db_path_str).unwrap();
        db.initialize_schema().unwrap();
        assert!(Path::new(db_path_str).exists(), "Database file should exist");
    }

    #[test]
    fn test_initialize_schema_creates_tables() {
        let db = Database::new(":memory:").unwrap();
        db.initialize_schema().unwrap();

        assert!(table_exists(&db, "records"));
        assert!(table_exists(&db, "objects"));
    }

    #[test]
    fn test_initialize_schema_is_idempotent() {
        let db = Database::new(":memory:").unwrap();
        db.initialize_schema().unwrap();
        assert!(db.initialize_schema().is_ok());
    }

    #[test]
    fn test_records_have_updated_at() {
        let db = Database::new(":memory:").unwrap();
        db.initialize_schema().unwrap();
        let columns: Vec<String> = db
            .connection()
            .prepare("SELECT name FROM pragma_table_info('records')")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(columns, vec!["collection", "id", "body", "created_at", "updated_at"]);
    }

    #[test]
    fn test_schema_survives_reopen() {
        let temp_dir = tempfile::tempdir().unwrap();
        let db_path = temp_dir.path().join("clinic.db");
        let db_path_str = db_path.to_str().unwrap();

        {
            let db = Database::new(db_path_str).unwrap();
            db.initialize_schema().unwrap();
            db.connection()
                .execute(
                    "INSERT INTO records (collection, id, body) VALUES ('patients', 'p1', '{}')",
                    [],
                )
                .unwrap();
        }

        let db = Database::new(db_path_str).unwrap();
        db.initialize_schema().unwrap();
        let count: i64 = db
            .connection()
            .query_row("SELECT COUNT(*) FROM records", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }
}
