//! SQLite-backed key-value blob storage.
//!
//! # Responsibility
//! - Mirror a browser-style local key-value store: one text value per key.
//! - Keep SQL details inside the storage boundary.
//!
//! # Invariants
//! - One row per key; writes upsert the whole value.
//! - Only migrated connections are accepted.

use super::{BlobStorage, StorageError, StorageResult, DEFAULT_STORAGE_KEY};
use crate::db::{open_db, open_db_in_memory};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

const KV_TABLE: &str = "kv_store";

pub struct SqliteBlobStorage {
    conn: Connection,
    key: String,
}

impl SqliteBlobStorage {
    /// Wraps a migrated connection, storing the blob under `key`.
    pub fn try_new(conn: Connection, key: impl Into<String>) -> StorageResult<Self> {
        if !table_exists(&conn, KV_TABLE)? {
            return Err(StorageError::MissingTable(KV_TABLE));
        }
        Ok(Self {
            conn,
            key: key.into(),
        })
    }

    /// Opens (and migrates) a database file, using the default key.
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        Self::try_new(open_db(path)?, DEFAULT_STORAGE_KEY)
    }

    pub fn open_in_memory() -> StorageResult<Self> {
        Self::try_new(open_db_in_memory()?, DEFAULT_STORAGE_KEY)
    }

    pub fn key(&self) -> &str {
        self.key.as_str()
    }

    /// Removes the stored value for this key.
    pub fn clear(&mut self) -> StorageResult<()> {
        self.conn.execute(
            "DELETE FROM kv_store WHERE key = ?1;",
            [self.key.as_str()],
        )?;
        Ok(())
    }

    /// Gives back the connection, e.g. to reopen under another key.
    pub fn into_connection(self) -> Connection {
        self.conn
    }
}

impl BlobStorage for SqliteBlobStorage {
    fn read(&self) -> StorageResult<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv_store WHERE key = ?1;",
                [self.key.as_str()],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn write(&mut self, blob: &str) -> StorageResult<()> {
        self.conn.execute(
            "INSERT INTO kv_store (key, value, updated_at)
             VALUES (?1, ?2, strftime('%s', 'now') * 1000)
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at;",
            params![self.key.as_str(), blob],
        )?;
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "sqlite"
    }
}

fn table_exists(conn: &Connection, table: &str) -> StorageResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}
