//! Store connection management.
//!
//! The [`Store`] struct owns a [`rusqlite::Connection`] and guarantees that
//! migrations are run before any other operation. Typed slot accessors live
//! in [`crate::slots`] and [`crate::product_log`]; this module provides the
//! generic read/write primitives they build on.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use rusqlite::{params, Connection, OptionalExtension};
use serde::de::DeserializeOwned;
use serde::Serialize;

use dropshop_sync::Publisher;

use crate::error::{Result, StoreError};
use crate::migrations;

/// Synchronous slot store scoped to one machine profile.
pub struct Store {
    conn: Connection,
    /// Set when this store belongs to a bus-attached context; used only by
    /// the product-message append, the one store operation that publishes.
    publisher: Option<Publisher>,
}

impl Store {
    /// Open (or create) the default application database.
    ///
    /// The database file is placed in the platform-appropriate data directory:
    /// - Linux:   `~/.local/share/dropshop/dropshop.db`
    /// - macOS:   `~/Library/Application Support/com.dropshop.dropshop/dropshop.db`
    /// - Windows: `{FOLDERID_RoamingAppData}\dropshop\dropshop\data\dropshop.db`
    pub fn new() -> Result<Self> {
        let project_dirs =
            ProjectDirs::from("com", "dropshop", "dropshop").ok_or(StoreError::NoDataDir)?;

        let data_dir = project_dirs.data_dir();
        std::fs::create_dir_all(data_dir)?;

        let db_path = data_dir.join("dropshop.db");

        tracing::info!(path = %db_path.display(), "opening store");

        Self::open_at(&db_path)
    }

    /// Open (or create) a store at an explicit path.
    ///
    /// This is useful for tests and for several contexts sharing one profile
    /// (WAL mode allows concurrent connections to the same file).
    pub fn open_at(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;

        conn.pragma_update(None, "journal_mode", "WAL")?;

        migrations::run_migrations(&conn)?;

        Ok(Self {
            conn,
            publisher: None,
        })
    }

    /// Wire this store into a context's bus connection so that the
    /// product-message append can broadcast its `NEW_PRODUCT_MSG` event.
    pub fn attach_publisher(&mut self, publisher: Publisher) {
        self.publisher = Some(publisher);
    }

    pub(crate) fn publisher(&self) -> Option<&Publisher> {
        self.publisher.as_ref()
    }

    /// Return the filesystem path of the open database (if any).
    pub fn path(&self) -> Option<PathBuf> {
        self.conn.path().map(PathBuf::from)
    }

    /// Read and deserialize a slot.
    ///
    /// An absent slot yields `T::default()`. So does malformed JSON, after a
    /// warning: deserialization failure is treated as a recoverable
    /// empty-collection condition, never a crash. SQLite failures propagate.
    pub(crate) fn read_slot<T>(&self, key: &str) -> Result<T>
    where
        T: DeserializeOwned + Default,
    {
        let raw: Option<String> = self
            .conn
            .query_row("SELECT value FROM slots WHERE key = ?1", params![key], |row| {
                row.get(0)
            })
            .optional()?;

        match raw {
            None => Ok(T::default()),
            Some(json) => Ok(serde_json::from_str(&json).unwrap_or_else(|e| {
                tracing::warn!(slot = key, error = %e, "malformed slot data, treating as empty");
                T::default()
            })),
        }
    }

    /// Serialize and overwrite a slot as a whole. No partial or merge
    /// semantics: callers read-modify-write the full collection.
    pub(crate) fn write_slot<T>(&self, key: &str, value: &T) -> Result<()>
    where
        T: Serialize,
    {
        let json = serde_json::to_string(value)?;
        self.conn.execute(
            "INSERT OR REPLACE INTO slots (key, value) VALUES (?1, ?2)",
            params![key, json],
        )?;
        Ok(())
    }

    /// Remove a slot entirely (used for logout).
    pub(crate) fn clear_slot(&self, key: &str) -> Result<()> {
        self.conn
            .execute("DELETE FROM slots WHERE key = ?1", params![key])?;
        Ok(())
    }
}
