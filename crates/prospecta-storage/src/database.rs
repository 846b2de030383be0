// SPDX-FileCopyrightText: 2026 Prospecta Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Database connection management with PRAGMA setup, WAL mode, and lifecycle.
//!
//! All writes are serialized through tokio-rusqlite's single background thread.
//! Do NOT create additional Connection instances for writes.

use std::path::Path;

use prospecta_core::ProspectaError;
use tokio_rusqlite::Connection;

/// Helper to convert tokio_rusqlite errors into ProspectaError::Storage.
pub(crate) fn map_tr_err(e: tokio_rusqlite::Error) -> ProspectaError {
    ProspectaError::Storage {
        source: Box::new(e),
    }
}

/// Handle to the SQLite database.
///
/// Cheap to clone; all clones share the single background connection thread,
/// which is what serializes writes.
#[derive(Clone, Debug)]
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open (or create) the database at `path`, apply PRAGMAs, and run all
    /// pending migrations.
    pub async fn open(path: &str) -> Result<Self, ProspectaError> {
        if let Some(parent) = Path::new(path).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    ProspectaError::Storage {
                        source: Box::new(e),
                    }
                })?;
            }
        }
        let conn = Connection::open(path).await.map_err(|e| {
            ProspectaError::Storage {
                source: Box::new(e),
            }
        })?;
        Self::initialize(conn).await
    }

    /// Open an in-memory database. Used by tests.
    pub async fn open_in_memory() -> Result<Self, ProspectaError> {
        let conn = Connection::open_in_memory().await.map_err(|e| {
            ProspectaError::Storage {
                source: Box::new(e),
            }
        })?;
        Self::initialize(conn).await
    }

    async fn initialize(conn: Connection) -> Result<Self, ProspectaError> {
        conn.call(|conn| -> Result<(), rusqlite::Error> {
            conn.pragma_update(None, "journal_mode", "WAL")?;
            conn.pragma_update(None, "synchronous", "NORMAL")?;
            conn.pragma_update(None, "foreign_keys", "ON")?;
            conn.pragma_update(None, "busy_timeout", 5000)?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)?;
        conn.call(crate::migrations::run_migrations)
            .await
            .map_err(|e| match e {
                tokio_rusqlite::Error::Error(e) => e,
                e => ProspectaError::Storage {
                    source: Box::new(e),
                },
            })?;
        tracing::debug!("database opened, migrations applied");
        Ok(Self { conn })
    }

    /// Access the underlying connection for query modules.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Close the database, flushing the WAL.
    pub async fn close(self) -> Result<(), ProspectaError> {
        self.conn
            .close()
            .await
            .map_err(map_tr_err)
    }
}
