//! Storage engine for fuellog.
//!
//! This module provides a small `SQLite`-backed key-value table. Each
//! record collection lives under one key as a serialized JSON blob; the
//! engine itself knows nothing about what the blobs contain.

pub mod migrations;
pub mod schema;

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::store::{Collection, RecordStore};

/// Key-value blob storage on top of `SQLite`.
#[derive(Debug)]
pub struct Storage {
    /// Path to the database file.
    path: PathBuf,
    /// Database connection.
    conn: Connection,
}

impl Storage {
    /// Open or create a storage database at the given path.
    ///
    /// Creates the parent directories and database file if they don't exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or schema initialization fails.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|source| Error::DirectoryCreate {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        debug!("Opening database at {}", path.display());
        let conn = Connection::open(&path).map_err(|source| Error::DatabaseOpen {
            path: path.clone(),
            source,
        })?;

        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")?;
        migrations::initialize_schema(&conn)?;

        info!("Database opened at {}", path.display());
        Ok(Self { path, conn })
    }

    /// Create an in-memory storage instance.
    ///
    /// # Errors
    ///
    /// Returns an error if the in-memory database cannot be created.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|source| Error::DatabaseOpen {
            path: PathBuf::from(":memory:"),
            source,
        })?;

        migrations::initialize_schema(&conn)?;

        Ok(Self {
            path: PathBuf::from(":memory:"),
            conn,
        })
    }

    /// Get the path to the database file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the blob stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn get(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .conn
            .query_row("SELECT value FROM records WHERE key = ?1", [key], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(value)
    }

    /// Store `value` under `key`, replacing any previous blob.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn put(&self, key: &str, value: &str) -> Result<()> {
        let updated_at = Utc::now().to_rfc3339();
        self.conn.execute(
            r"
            INSERT INTO records (key, value, updated_at) VALUES (?1, ?2, ?3)
            ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
            ",
            params![key, value, updated_at],
        )?;
        debug!("Stored {} bytes under '{}'", value.len(), key);
        Ok(())
    }

    /// All stored keys in ascending order.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn keys(&self) -> Result<Vec<String>> {
        let mut stmt = self.conn.prepare("SELECT key FROM records ORDER BY key")?;
        let keys = stmt
            .query_map([], |row| row.get(0))?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(keys)
    }

    /// Get database statistics.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails or the database
    /// file cannot be inspected.
    pub fn stats(&self) -> Result<StorageStats> {
        let blob_count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM records", [], |row| row.get(0))?;

        let last_update: Option<String> = self
            .conn
            .query_row(
                "SELECT updated_at FROM records ORDER BY updated_at DESC LIMIT 1",
                [],
                |row| row.get(0),
            )
            .optional()?;
        let last_update = last_update
            .and_then(|s| DateTime::parse_from_rfc3339(&s).ok())
            .map(|dt| dt.with_timezone(&Utc));

        let db_size_bytes = if self.path.to_string_lossy() == ":memory:" {
            0
        } else {
            std::fs::metadata(&self.path)?.len()
        };

        Ok(StorageStats {
            blob_count,
            last_update,
            db_size_bytes,
        })
    }
}

impl RecordStore for Storage {
    fn read_blob(&self, collection: Collection) -> Result<Option<String>> {
        self.get(collection.key())
    }

    fn write_blob(&mut self, collection: Collection, blob: String) -> Result<()> {
        self.put(collection.key(), &blob)
    }
}

/// Statistics about the storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageStats {
    /// Number of blobs stored.
    pub blob_count: i64,
    /// When a blob was last written.
    pub last_update: Option<DateTime<Utc>>,
    /// Size of the database file in bytes.
    pub db_size_bytes: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FillUp, Vehicle};

    fn create_test_storage() -> Storage {
        Storage::open_in_memory().expect("failed to create test storage")
    }

    #[test]
    fn test_get_missing_key() {
        let storage = create_test_storage();
        assert!(storage.get("vehicles").unwrap().is_none());
    }

    #[test]
    fn test_put_and_get() {
        let storage = create_test_storage();
        storage.put("vehicles", "[]").unwrap();
        assert_eq!(storage.get("vehicles").unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn test_put_replaces_existing_value() {
        let storage = create_test_storage();
        storage.put("fill_ups", "[1]").unwrap();
        storage.put("fill_ups", "[1,2]").unwrap();

        assert_eq!(storage.get("fill_ups").unwrap().as_deref(), Some("[1,2]"));
        assert_eq!(storage.stats().unwrap().blob_count, 1);
    }

    #[test]
    fn test_keys_sorted() {
        let storage = create_test_storage();
        storage.put("vehicles", "[]").unwrap();
        storage.put("fill_ups", "[]").unwrap();

        assert_eq!(storage.keys().unwrap(), vec!["fill_ups", "vehicles"]);
    }

    #[test]
    fn test_stats_empty() {
        let storage = create_test_storage();
        let stats = storage.stats().unwrap();

        assert_eq!(stats.blob_count, 0);
        assert!(stats.last_update.is_none());
        assert_eq!(stats.db_size_bytes, 0);
    }

    #[test]
    fn test_stats_with_data() {
        let storage = create_test_storage();
        storage.put("vehicles", "[]").unwrap();

        let stats = storage.stats().unwrap();
        assert_eq!(stats.blob_count, 1);
        assert!(stats.last_update.is_some());
    }

    #[test]
    fn test_path() {
        let storage = create_test_storage();
        assert_eq!(storage.path().to_string_lossy(), ":memory:");
    }

    #[test]
    fn test_record_store_round_trip() {
        let mut storage = create_test_storage();
        let vehicle = Vehicle::new("Daily", "Toyota", "Corolla", "2020");
        let fill_up = FillUp::new(vehicle.id(), Utc::now(), 5000.0, 38.0, 1.65);

        storage.save_vehicles(std::slice::from_ref(&vehicle)).unwrap();
        storage.save_fill_ups(std::slice::from_ref(&fill_up)).unwrap();

        assert_eq!(storage.load_vehicles().unwrap(), vec![vehicle]);
        assert_eq!(storage.load_fill_ups().unwrap(), vec![fill_up]);
    }

    #[test]
    fn test_record_store_malformed_blob() {
        let mut storage = create_test_storage();
        storage.write_blob(Collection::FillUps, "{broken".to_string()).unwrap();

        let err = storage.load_fill_ups().unwrap_err();
        assert!(err.is_decoding());
    }

    #[test]
    fn test_open_file_based_persists() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("records.db");

        {
            let storage = Storage::open(&db_path).unwrap();
            storage.put("vehicles", "[]").unwrap();
            assert_eq!(storage.path(), db_path);
        }

        let reopened = Storage::open(&db_path).unwrap();
        assert_eq!(reopened.get("vehicles").unwrap().as_deref(), Some("[]"));
        assert!(reopened.stats().unwrap().db_size_bytes > 0);
    }

    #[test]
    fn test_stats_reports_missing_file_as_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("records.db");
        let storage = Storage::open(&db_path).unwrap();
        storage.put("vehicles", "[]").unwrap();

        std::fs::remove_file(&db_path).unwrap();
        let err = storage.stats().unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_open_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let nested_path = dir.path().join("nested/deeper/records.db");

        let storage = Storage::open(&nested_path).unwrap();
        assert!(nested_path.exists());
        drop(storage);
    }
}
