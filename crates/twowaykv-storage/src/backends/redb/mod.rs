//! Redb storage engine implementation.
//!
//! This module provides the `RedbEngine` type which implements the
//! `StorageEngine` trait using the Redb embedded database. One engine
//! instance corresponds to one ordered map stored in one database file.

mod transaction;

pub use transaction::{RedbCursor, RedbTransaction};

use std::path::Path;

use redb::{Database, ReadableTableMetadata, TableDefinition};
use tracing::debug;

use crate::engine::{StorageEngine, StorageError};

/// The single physical table holding the map. Keys and values are stored
/// as raw bytes, so the on-disk row format is exactly what callers write.
pub(crate) const DATA_TABLE: TableDefinition<'static, &[u8], &[u8]> =
    TableDefinition::new("twowaykv_data");

/// Configuration options for the Redb storage engine.
#[derive(Debug, Clone, Copy, Default)]
pub struct RedbConfig {
    /// Cache size in bytes. If not set, uses Redb's default.
    pub cache_size: Option<usize>,
}

impl RedbConfig {
    /// Create a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the cache size.
    #[must_use]
    pub const fn cache_size(mut self, size: usize) -> Self {
        self.cache_size = Some(size);
        self
    }
}

/// A storage engine backed by Redb.
///
/// Redb is a pure-Rust embedded database that provides ACID transactions
/// per database file. Commits are durable, so reopening the same path
/// recovers all previously committed rows unchanged.
pub struct RedbEngine {
    /// The underlying Redb database.
    db: Database,
}

impl RedbEngine {
    /// Open or create a database at the given path with default configuration.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Open`] if the database cannot be opened or created.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        Self::open_with_config(path, RedbConfig::default())
    }

    /// Open or create a database at the given path with custom configuration.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Open`] if the database cannot be opened or created.
    pub fn open_with_config(
        path: impl AsRef<Path>,
        config: RedbConfig,
    ) -> Result<Self, StorageError> {
        let mut builder = Database::builder();

        if let Some(cache_size) = config.cache_size {
            builder.set_cache_size(cache_size);
        }

        let db = builder.create(path.as_ref()).map_err(|e| StorageError::Open(e.to_string()))?;
        debug!(path = %path.as_ref().display(), "opened redb database");

        Ok(Self { db })
    }

    /// Create an in-memory database for testing.
    ///
    /// The database is lost when the engine is dropped.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Open`] if the database cannot be created.
    pub fn in_memory() -> Result<Self, StorageError> {
        let db = Database::builder()
            .create_with_backend(redb::backends::InMemoryBackend::new())
            .map_err(|e| StorageError::Open(e.to_string()))?;

        Ok(Self { db })
    }

    /// Get the underlying Redb database.
    ///
    /// This is primarily for advanced use cases and testing.
    pub const fn inner(&self) -> &Database {
        &self.db
    }
}

impl StorageEngine for RedbEngine {
    type Transaction<'a> = RedbTransaction;

    fn begin_read(&self) -> Result<Self::Transaction<'_>, StorageError> {
        let tx = self.db.begin_read().map_err(|e| StorageError::Transaction(e.to_string()))?;
        Ok(RedbTransaction::new_read(tx))
    }

    fn begin_write(&self) -> Result<Self::Transaction<'_>, StorageError> {
        let tx = self.db.begin_write().map_err(|e| StorageError::Transaction(e.to_string()))?;
        Ok(RedbTransaction::new_write(tx))
    }

    fn entry_count(&self) -> Result<u64, StorageError> {
        let tx = self.db.begin_read().map_err(|e| StorageError::Transaction(e.to_string()))?;
        match tx.open_table(DATA_TABLE) {
            Ok(t) => t.len().map_err(|e| StorageError::Internal(e.to_string())),
            // No data table means no rows yet
            Err(redb::TableError::TableDoesNotExist(_)) => Ok(0),
            Err(e) => Err(StorageError::Internal(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Transaction;

    #[test]
    fn in_memory_creation() {
        let engine = RedbEngine::in_memory().expect("failed to create in-memory db");

        let tx = engine.begin_read().expect("failed to begin read");
        assert!(tx.is_read_only());
    }

    #[test]
    fn config_builder() {
        let config = RedbConfig::new().cache_size(1024 * 1024 * 10);
        assert_eq!(config.cache_size, Some(10 * 1024 * 1024));
    }

    #[test]
    fn write_and_read() {
        let engine = RedbEngine::in_memory().expect("failed to create in-memory db");

        {
            let mut tx = engine.begin_write().expect("failed to begin write");
            tx.put(b"key", b"value").expect("failed to put");
            tx.commit().expect("failed to commit");
        }

        {
            let tx = engine.begin_read().expect("failed to begin read");
            let value = tx.get(b"key").expect("failed to get");
            assert_eq!(value, Some(b"value".to_vec()));
        }
    }

    #[test]
    fn entry_count_empty_and_populated() {
        let engine = RedbEngine::in_memory().expect("failed to create in-memory db");
        assert_eq!(engine.entry_count().expect("failed to count"), 0);

        let mut tx = engine.begin_write().expect("failed to begin write");
        tx.put(b"a", b"1").expect("failed to put");
        tx.put(b"b", b"2").expect("failed to put");
        tx.commit().expect("failed to commit");

        assert_eq!(engine.entry_count().expect("failed to count"), 2);
    }
}
