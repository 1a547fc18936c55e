//! SQLite-based key-value storage with zstd-compressed values

use std::io::Read;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use anyhow::{Context, Result, anyhow};
use log::debug;
use rusqlite::{Connection, OptionalExtension, params};
use rusqlite_migration::{M, Migrations};

use super::KeyValueStore;

/// Default zstd compression level for stored collections
const COMPRESSION_LEVEL: i32 = 3;

/// Database migrations
///
/// Each migration is applied in order. The user_version pragma tracks which
/// migrations have been applied.
fn migrations() -> Migrations<'static> {
    Migrations::new(vec![
        // Migration 1: one row per collection
        M::up(
            r#"
            CREATE TABLE collections (
                key TEXT PRIMARY KEY,
                value BLOB NOT NULL,  -- zstd compressed JSON
                updated_at TEXT NOT NULL DEFAULT (datetime('now'))
            );
            "#,
        ),
    ])
}

/// SQLite-backed key-value store
///
/// Every collection is a single row whose value is the zstd-compressed
/// JSON document. Saves replace the whole row.
pub struct SqliteKeyValueStore {
    conn: Mutex<Connection>,
}

impl SqliteKeyValueStore {
    /// Open (or create) the store at `db_path`
    pub fn new(db_path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(db_path.as_ref())
            .with_context(|| format!("Failed to open database at {:?}", db_path.as_ref()))?;
        Self::from_connection(conn)
    }

    /// Open a private in-memory database
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("Failed to open in-memory database")?;
        Self::from_connection(conn)
    }

    fn from_connection(mut conn: Connection) -> Result<Self> {
        // WAL keeps readers unblocked while a collection is rewritten;
        // NORMAL sync is safe in WAL mode.
        conn.execute_batch(
            r#"
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA temp_store = MEMORY;
            "#,
        )?;

        migrations()
            .to_latest(&mut conn)
            .context("Failed to run database migrations")?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| anyhow!("Database connection lock poisoned"))
    }
}

impl KeyValueStore for SqliteKeyValueStore {
    fn load(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let conn = self.conn()?;
        let compressed: Option<Vec<u8>> = conn
            .query_row(
                "SELECT value FROM collections WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;

        let Some(compressed) = compressed else {
            return Ok(None);
        };

        let mut decoder = zstd::Decoder::new(compressed.as_slice())?;
        let mut value = Vec::new();
        decoder
            .read_to_end(&mut value)
            .with_context(|| format!("Failed to decompress value for key {}", key))?;
        Ok(Some(value))
    }

    fn save(&self, key: &str, value: &[u8]) -> Result<()> {
        let compressed =
            zstd::encode_all(value, COMPRESSION_LEVEL).context("Failed to compress value")?;
        debug!(
            "Saving {} ({} bytes, {} compressed)",
            key,
            value.len(),
            compressed.len()
        );

        let conn = self.conn()?;
        conn.execute(
            r#"
            INSERT INTO collections (key, value, updated_at)
            VALUES (?1, ?2, datetime('now'))
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
            params![key, compressed],
        )
        .with_context(|| format!("Failed to save key {}", key))?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let conn = self.conn()?;
        conn.execute("DELETE FROM collections WHERE key = ?1", params![key])?;
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare("SELECT key FROM collections ORDER BY key")?;
        let keys = stmt
            .query_map([], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<String>>>()?;
        Ok(keys)
    }
}
