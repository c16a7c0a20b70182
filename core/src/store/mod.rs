//! SQLite persistence layer.
//!
//! RULE: Only the store talks to the database.
//! The aggregate calls store methods; it never executes SQL directly.
//!
//! Every public method opens its own connection, runs inside its own
//! transaction and commits before returning. Nothing spans two calls.

use crate::{
    config::{StoreConfig, StoreLocation},
    error::AnalyticsResult,
};
use rusqlite::{Connection, OpenFlags, Transaction};

mod employee;
mod financials;

#[derive(Debug)]
pub struct CompanyStore {
    location: StoreLocation,
    // Named in-memory databases vanish with their last connection.
    _anchor: Option<Connection>,
}

impl CompanyStore {
    /// Open (or create) the store described by `config`.
    pub fn open(config: &StoreConfig) -> AnalyticsResult<Self> {
        if let StoreLocation::File(path) = &config.location {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
        }
        let anchor = match &config.location {
            StoreLocation::Memory(_) => Some(open_connection(&config.location)?),
            StoreLocation::File(_) => None,
        };
        let store = Self {
            location: config.location.clone(),
            _anchor: anchor,
        };
        if config.schema_auto_init {
            store.init_schema()?;
        }
        log::debug!("Opened company store at {}", store.location.connection_uri());
        Ok(store)
    }

    /// Open an isolated in-memory store with the schema applied (used in tests).
    pub fn in_memory() -> AnalyticsResult<Self> {
        Self::open(&StoreConfig::in_memory())
    }

    /// Create both relations if missing. Safe to call any number of times.
    pub fn init_schema(&self) -> AnalyticsResult<()> {
        self.with_transaction(|tx| {
            tx.execute_batch(include_str!("../../../migrations/001_company.sql"))
        })?;
        Ok(())
    }

    fn with_transaction<T>(
        &self,
        f: impl FnOnce(&Transaction<'_>) -> rusqlite::Result<T>,
    ) -> AnalyticsResult<T> {
        let mut conn = open_connection(&self.location)?;
        let tx = conn.transaction()?;
        let out = f(&tx)?;
        tx.commit()?;
        Ok(out)
    }
}

fn open_connection(location: &StoreLocation) -> rusqlite::Result<Connection> {
    let conn = Connection::open_with_flags(
        location.connection_uri(),
        OpenFlags::SQLITE_OPEN_READ_WRITE
            | OpenFlags::SQLITE_OPEN_CREATE
            | OpenFlags::SQLITE_OPEN_URI,
    )?;
    if let StoreLocation::File(_) = location {
        // WAL mode only for real files (shared-memory databases ignore it).
        let _ = conn.execute_batch("PRAGMA journal_mode=WAL;");
    }
    Ok(conn)
}
