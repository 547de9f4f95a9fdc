//! Core storage engine traits.
//!
//! Each engine instance holds exactly one ordered map. Keys and values are
//! stored as raw bytes with no additional framing, so the on-disk format is
//! exactly what callers write.

use super::StorageError;

/// An owned key-value pair returned by cursors.
pub type KeyValue = (Vec<u8>, Vec<u8>);

/// The result of a cursor positioning operation.
pub type CursorResult = Result<Option<KeyValue>, StorageError>;

/// A storage engine that provides ordered key-value operations.
pub trait StorageEngine: Send + Sync {
    /// The transaction type for this engine.
    type Transaction<'a>: Transaction
    where
        Self: 'a;

    /// Begin a read-only transaction.
    fn begin_read(&self) -> Result<Self::Transaction<'_>, StorageError>;

    /// Begin a read-write transaction.
    ///
    /// A write transaction doubles as a write-batch: staged writes are
    /// invisible to readers until [`Transaction::commit`], and
    /// [`Transaction::rollback`] discards them with no partial effect.
    /// The handle is exclusively owned by its caller until then.
    fn begin_write(&self) -> Result<Self::Transaction<'_>, StorageError>;

    /// Number of rows currently stored.
    ///
    /// Used for liveness checks only; no correctness invariant attaches
    /// to the value.
    fn entry_count(&self) -> Result<u64, StorageError>;
}

/// A transaction that provides key-value operations on one map.
pub trait Transaction {
    /// The cursor type for ordered iteration.
    type Cursor<'a>: Cursor
    where
        Self: 'a;

    /// Get a value by key.
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StorageError>;

    /// Put a key-value pair. Fails with [`StorageError::ReadOnly`] on a
    /// read-only transaction.
    fn put(&mut self, key: &[u8], value: &[u8]) -> Result<(), StorageError>;

    /// Delete a key. Returns whether the key was present.
    fn delete(&mut self, key: &[u8]) -> Result<bool, StorageError>;

    /// Create a forward-seeking cursor over the map.
    fn cursor(&self) -> Result<Self::Cursor<'_>, StorageError>;

    /// Commit the transaction, flushing any staged writes.
    fn commit(self) -> Result<(), StorageError>;

    /// Roll back the transaction, discarding any staged writes.
    fn rollback(self) -> Result<(), StorageError>;

    /// Whether this transaction is read-only.
    fn is_read_only(&self) -> bool;
}

/// A forward-seeking cursor over ordered key-value pairs.
pub trait Cursor {
    /// Position at the first entry whose key is >= the given key.
    fn seek(&mut self, key: &[u8]) -> CursorResult;

    /// Advance to the next entry in key order.
    fn next(&mut self) -> CursorResult;

    /// The entry at the current position, if any, without advancing.
    fn current(&self) -> Option<(&[u8], &[u8])>;
}
