// SQLite-backed key-value table

use super::{KeyValueStore, validate_key};
use crate::models::now_ms;
use eyre::{Context, Result};
use rusqlite::{Connection, OptionalExtension};
use std::fs;
use std::path::Path;
use tracing::debug;

pub const DB_FILE: &str = "tasklist.db";

/// Key-value store kept in a single SQLite table
pub struct SqliteKv {
    db: Connection,
}

impl SqliteKv {
    /// Open or create `tasklist.db` in the given directory
    pub fn open<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref();

        // Create directory if it doesn't exist
        fs::create_dir_all(dir).context("Failed to create store directory")?;

        let db = Connection::open(dir.join(DB_FILE)).context("Failed to open SQLite database")?;
        let kv = Self { db };
        kv.create_schema()?;
        Self::create_gitignore(dir)?;
        Ok(kv)
    }

    #[cfg(test)]
    fn open_in_memory() -> Result<Self> {
        let db = Connection::open_in_memory().context("Failed to open in-memory SQLite database")?;
        let kv = Self { db };
        kv.create_schema()?;
        Ok(kv)
    }

    #[cfg(test)]
    fn updated_at(&self, key: &str) -> Result<Option<i64>> {
        let ts = self
            .db
            .query_row("SELECT updated_at FROM kv WHERE key = ?1", [key], |row| row.get(0))
            .optional()?;
        Ok(ts)
    }

    fn create_schema(&self) -> Result<()> {
        debug!("Creating kv schema");

        self.db.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS kv (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at INTEGER NOT NULL
            );
            "#,
        )?;

        Ok(())
    }

    fn create_gitignore(dir: &Path) -> Result<()> {
        let gitignore_path = dir.join(".gitignore");
        if !gitignore_path.exists() {
            fs::write(gitignore_path, "tasklist.db\ntasklist.db-shm\ntasklist.db-wal\n")?;
        }
        Ok(())
    }
}

impl KeyValueStore for SqliteKv {
    fn get(&self, key: &str) -> Result<Option<String>> {
        validate_key(key)?;

        let blob = self
            .db
            .query_row("SELECT value FROM kv WHERE key = ?1", [key], |row| row.get(0))
            .optional()
            .context("Failed to read from kv table")?;
        Ok(blob)
    }

    fn set(&mut self, key: &str, blob: &str) -> Result<()> {
        validate_key(key)?;

        self.db
            .execute(
                "INSERT INTO kv (key, value, updated_at) VALUES (?1, ?2, ?3)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
                rusqlite::params![key, blob, now_ms()],
            )
            .context("Failed to write to kv table")?;

        debug!(key, bytes = blob.len(), "Wrote blob");
        Ok(())
    }
}
