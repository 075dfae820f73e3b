//! SQLite-backed key-value document storage.
//!
//! The aggregate snapshot is one JSON document in a `kv` table; the CLI
//! also parks the serialized timer engine there between invocations.
//! The database lives at `~/.config/himstreak/himstreak.db`.

use std::path::{Path, PathBuf};

use indoc::indoc;
use rusqlite::{params, Connection};

use crate::error::StorageError;
use crate::state::{AggregateState, StateStore};

const STATE_KEY: &str = "aggregate_state";

/// SQLite database holding the kv document table.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open the database at the default data directory.
    ///
    /// Creates the file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self, StorageError> {
        let path = super::data_dir()
            .map_err(|e| StorageError::QueryFailed(e.to_string()))?
            .join("himstreak.db");
        Self::open_at(&path)
    }

    /// Open the database at an explicit path.
    pub fn open_at(path: &Path) -> Result<Self, StorageError> {
        let conn = Connection::open(path).map_err(|source| StorageError::OpenFailed {
            path: PathBuf::from(path),
            source,
        })?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    /// Open an in-memory database (for tests).
    #[cfg(test)]
    pub fn open_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory().map_err(StorageError::from)?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<(), StorageError> {
        self.conn.execute_batch(indoc! {"
            CREATE TABLE IF NOT EXISTS kv (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );
        "})?;
        Ok(())
    }

    /// Get a value from the kv store.
    pub fn kv_get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let mut stmt = self.conn.prepare("SELECT value FROM kv WHERE key = ?1")?;
        let result = stmt.query_row(params![key], |row| row.get::<_, String>(0));
        match result {
            Ok(v) => Ok(Some(v)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Set a value in the kv store.
    pub fn kv_set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.conn.execute(
            "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }
}

/// [`StateStore`] backed by the SQLite kv table.
pub struct SqliteStore {
    db: Database,
}

impl SqliteStore {
    /// Open a store at the default data directory.
    pub fn open() -> Result<Self, StorageError> {
        Ok(Self { db: Database::open()? })
    }

    /// Open a store at an explicit path.
    pub fn open_at(path: &Path) -> Result<Self, StorageError> {
        Ok(Self {
            db: Database::open_at(path)?,
        })
    }

    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

impl StateStore for SqliteStore {
    fn load(&self) -> Result<Option<AggregateState>, StorageError> {
        match self.db.kv_get(STATE_KEY)? {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    fn save(&self, state: &AggregateState) -> Result<(), StorageError> {
        let json = serde_json::to_string(state)?;
        self.db.kv_set(STATE_KEY, &json)
    }
}
