//! Kinship Storage Layer
//!
//! Implements the domain storage traits on SQLite.
//!
//! # Architecture
//!
//! - One `rusqlite::Connection` guarded by a mutex, so a single store can be
//!   shared across threads and tasks
//! - Every multi-row write (edge pairs, request acceptance, suggestion
//!   replacement) runs in one SQLite transaction while the lock is held
//! - Request and suggestion ids are UUIDv7 values stored as 16-byte BLOBs
//!
//! # Examples
//!
//! ```no_run
//! use kinship_store::SqliteStore;
//!
//! let store = SqliteStore::new(":memory:").unwrap();
//! // Store is now ready for graph operations
//! ```

#![warn(missing_docs)]

mod graph;
mod people;
mod requests;
mod suggestions;

use kinship_domain::KinshipError;
use rusqlite::Connection;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Domain rule violated while writing
    #[error(transparent)]
    Domain(#[from] KinshipError),

    /// Invalid data format in a stored row
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// A thread panicked while holding the connection lock
    #[error("Connection lock poisoned")]
    LockPoisoned,
}

impl From<StoreError> for KinshipError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Domain(e) => e,
            other => KinshipError::Storage(other.to_string()),
        }
    }
}

/// SQLite-based implementation of the graph, request and suggestion stores
///
/// # Thread Safety
///
/// The connection sits behind a mutex. Wrap the store in an `Arc` to share it.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Create a new SqliteStore with the given database path
    ///
    /// Use `:memory:` for an in-memory database (useful for testing).
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use kinship_store::SqliteStore;
    ///
    /// let store = SqliteStore::new("kinship.db").unwrap();
    /// ```
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        conn.busy_timeout(Duration::from_secs(5))?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Initialize the database schema
    fn initialize_schema(conn: &Connection) -> Result<(), StoreError> {
        let schema = include_str!("schema.sql");
        conn.execute_batch(schema)?;
        Ok(())
    }

    /// Acquire the connection
    fn lock(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.conn.lock().map_err(|_| StoreError::LockPoisoned)
    }
}

/// Wrap a decoding failure so it can be returned from a row-mapping closure
fn conversion_error(
    column: usize,
    ty: rusqlite::types::Type,
    message: impl Into<String>,
) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(
        column,
        ty,
        Box::new(StoreError::InvalidData(message.into())),
    )
}

fn to_sql_id(id: kinship_domain::PersonId) -> i64 {
    id.value() as i64
}

fn from_sql_id(raw: i64) -> kinship_domain::PersonId {
    kinship_domain::PersonId::new(raw as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_maps_to_storage() {
        let err: KinshipError = StoreError::InvalidData("bad row".into()).into();
        assert!(matches!(err, KinshipError::Storage(ref m) if m.contains("bad row")));
    }

    #[test]
    fn test_domain_error_passes_through() {
        let err: KinshipError =
            StoreError::Domain(KinshipError::NotFound("person 9".into())).into();
        assert_eq!(err, KinshipError::NotFound("person 9".into()));
    }

    #[test]
    fn test_schema_is_idempotent() {
        let store = SqliteStore::new(":memory:").unwrap();
        let conn = store.lock().unwrap();
        SqliteStore::initialize_schema(&conn).unwrap();
    }
}
