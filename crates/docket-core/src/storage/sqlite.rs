//! SQLite-backed key-value store.
//!
//! Runtime defaults:
//! - `journal_mode = WAL` so a reader in another process sees the last commit
//! - `busy_timeout = 5s` to ride out short write contention
//!
//! [`KvStore::set_many`] runs in one transaction, so the cases and updates
//! collections written by a submission land together or not at all.

use super::{KvStore, StoreError};
use rusqlite::{Connection, OptionalExtension, params, types::Type};
use std::{path::Path, time::Duration};
use tracing::debug;

/// Busy timeout used for store connections.
pub const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Latest schema version understood by this binary.
pub const LATEST_SCHEMA_VERSION: u32 = 1;

const MIGRATION_V1_SQL: &str = "
CREATE TABLE IF NOT EXISTS kv (
    key   TEXT PRIMARY KEY NOT NULL,
    value TEXT NOT NULL
);
";

const MIGRATIONS: &[(u32, &str)] = &[(1, MIGRATION_V1_SQL)];

#[derive(Debug)]
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open (or create) the store file, apply pragmas, and migrate.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory, database, pragmas, or migrations
    /// fail.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let mut conn = Connection::open(path)?;
        configure_connection(&conn)?;
        let version = migrate(&mut conn)?;
        debug!(path = %path.display(), version, "opened sqlite store");
        Ok(Self { conn })
    }

    /// A throwaway store, for tests.
    ///
    /// # Errors
    ///
    /// Returns an error if migrations fail.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let mut conn = Connection::open_in_memory()?;
        migrate(&mut conn)?;
        Ok(Self { conn })
    }

    #[must_use]
    pub const fn connection(&self) -> &Connection {
        &self.conn
    }
}

impl KvStore for SqliteStore {
    fn get_raw(&self, key: &str) -> Result<Option<String>, StoreError> {
        let value = self
            .conn
            .query_row("SELECT value FROM kv WHERE key = ?1", [key], |row| row.get(0))
            .optional()?;
        Ok(value)
    }

    fn set_raw(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        upsert(&self.conn, key, value)?;
        Ok(())
    }

    fn set_many(&mut self, entries: &[(&str, String)]) -> Result<(), StoreError> {
        let tx = self.conn.transaction()?;
        for (key, value) in entries {
            upsert(&tx, key, value)?;
        }
        tx.commit()?;
        Ok(())
    }
}

fn upsert(conn: &Connection, key: &str, value: &str) -> rusqlite::Result<usize> {
    conn.execute(
        "INSERT INTO kv (key, value) VALUES (?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value",
        params![key, value],
    )
}

fn configure_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.pragma_update(None, "synchronous", "NORMAL")?;
    let _journal_mode: String =
        conn.query_row("PRAGMA journal_mode = WAL", [], |row| row.get(0))?;
    conn.busy_timeout(DEFAULT_BUSY_TIMEOUT)?;
    Ok(())
}

/// Read `PRAGMA user_version` and convert it to a Rust `u32`.
///
/// # Errors
///
/// Returns an error if querying SQLite fails or the version value cannot be
/// represented as `u32`.
pub fn current_schema_version(conn: &Connection) -> rusqlite::Result<u32> {
    let version: i64 = conn.pragma_query_value(None, "user_version", |row| row.get(0))?;
    u32::try_from(version).map_err(|error| {
        rusqlite::Error::FromSqlConversionFailure(0, Type::Integer, Box::new(error))
    })
}

/// Apply all pending migrations in ascending order.
///
/// # Errors
///
/// Returns an error if any migration fails.
pub fn migrate(conn: &mut Connection) -> rusqlite::Result<u32> {
    let mut current = current_schema_version(conn)?;

    for (version, sql) in MIGRATIONS {
        if *version <= current {
            continue;
        }

        let tx = conn.transaction()?;
        tx.execute_batch(sql)?;
        tx.pragma_update(None, "user_version", i64::from(*version))?;
        tx.commit()?;
        current = *version;
    }

    Ok(current)
}
