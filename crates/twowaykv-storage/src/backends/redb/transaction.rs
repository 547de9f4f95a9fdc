//! Redb transaction implementation.
//!
//! This module provides the `RedbTransaction` type which implements the
//! `Transaction` trait for both read-only and read-write transactions.
//!
//! # Batched cursors
//!
//! The cursor implementation streams entries in batches (default 1000)
//! rather than materializing the whole map, re-querying the table on
//! demand as the cursor advances past the loaded range.

use redb::{ReadTransaction, ReadableTable, WriteTransaction};

use crate::engine::{Cursor, CursorResult, KeyValue, StorageError, Transaction};

use super::DATA_TABLE;

/// Default batch size for cursor operations.
const DEFAULT_BATCH_SIZE: usize = 1000;

/// A transaction for the Redb storage engine.
///
/// Wraps both read-only and read-write Redb transactions behind the
/// unified `Transaction` trait.
///
/// Note: We allow the `large_enum_variant` lint here because boxing the
/// `WriteTransaction` would add indirection overhead for every operation,
/// and transactions are typically short-lived.
#[allow(clippy::large_enum_variant)]
pub enum RedbTransaction {
    /// A read-only transaction.
    Read(ReadTransaction),
    /// A read-write transaction.
    Write(WriteTransaction),
}

impl RedbTransaction {
    /// Create a new read-only transaction.
    pub const fn new_read(tx: ReadTransaction) -> Self {
        Self::Read(tx)
    }

    /// Create a new read-write transaction.
    pub const fn new_write(tx: WriteTransaction) -> Self {
        Self::Write(tx)
    }

    /// Fetch up to `batch_size` entries with keys >= `start`, optionally
    /// skipping the first match (used when continuing past a known key).
    fn fetch_from(
        &self,
        start: &[u8],
        skip_first: bool,
        batch_size: usize,
    ) -> Result<Vec<KeyValue>, StorageError> {
        match self {
            Self::Read(tx) => match tx.open_table(DATA_TABLE) {
                Ok(t) => scan_table(&t, start, skip_first, batch_size),
                // No data table means no data, which is not an error
                Err(redb::TableError::TableDoesNotExist(_)) => Ok(Vec::new()),
                Err(e) => Err(StorageError::Internal(e.to_string())),
            },
            Self::Write(tx) => match tx.open_table(DATA_TABLE) {
                Ok(t) => scan_table(&t, start, skip_first, batch_size),
                Err(e) => Err(StorageError::Internal(e.to_string())),
            },
        }
    }
}

/// Collect entries from a table range scan.
fn scan_table<T: ReadableTable<&'static [u8], &'static [u8]>>(
    table: &T,
    start: &[u8],
    skip_first: bool,
    batch_size: usize,
) -> Result<Vec<KeyValue>, StorageError> {
    let range = table.range(start..).map_err(|e| StorageError::Internal(e.to_string()))?;

    let mut entries = Vec::with_capacity(batch_size.min(1024));
    let mut skipped = !skip_first;
    for result in range {
        if entries.len() >= batch_size {
            break;
        }
        let (k, v) = result.map_err(|e| StorageError::Internal(e.to_string()))?;
        if !skipped {
            skipped = true;
            continue;
        }
        entries.push((k.value().to_vec(), v.value().to_vec()));
    }
    Ok(entries)
}

impl Transaction for RedbTransaction {
    type Cursor<'a>
        = RedbCursor<'a>
    where
        Self: 'a;

    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StorageError> {
        match self {
            Self::Read(tx) => match tx.open_table(DATA_TABLE) {
                Ok(t) => match t.get(key) {
                    Ok(Some(value)) => Ok(Some(value.value().to_vec())),
                    Ok(None) => Ok(None),
                    Err(e) => Err(StorageError::Internal(e.to_string())),
                },
                // No data table means no data, which is not an error
                Err(redb::TableError::TableDoesNotExist(_)) => Ok(None),
                Err(e) => Err(StorageError::Internal(e.to_string())),
            },
            Self::Write(tx) => match tx.open_table(DATA_TABLE) {
                Ok(t) => match t.get(key) {
                    Ok(Some(value)) => Ok(Some(value.value().to_vec())),
                    Ok(None) => Ok(None),
                    Err(e) => Err(StorageError::Internal(e.to_string())),
                },
                Err(e) => Err(StorageError::Internal(e.to_string())),
            },
        }
    }

    fn put(&mut self, key: &[u8], value: &[u8]) -> Result<(), StorageError> {
        match self {
            Self::Read(_) => Err(StorageError::ReadOnly),
            Self::Write(tx) => {
                let mut t =
                    tx.open_table(DATA_TABLE).map_err(|e| StorageError::Internal(e.to_string()))?;
                t.insert(key, value).map_err(|e| StorageError::Internal(e.to_string()))?;
                Ok(())
            }
        }
    }

    fn delete(&mut self, key: &[u8]) -> Result<bool, StorageError> {
        match self {
            Self::Read(_) => Err(StorageError::ReadOnly),
            Self::Write(tx) => {
                let mut t =
                    tx.open_table(DATA_TABLE).map_err(|e| StorageError::Internal(e.to_string()))?;
                let removed = match t.remove(key) {
                    Ok(Some(_)) => Ok(true),
                    Ok(None) => Ok(false),
                    Err(e) => Err(StorageError::Internal(e.to_string())),
                };
                removed
            }
        }
    }

    fn cursor(&self) -> Result<Self::Cursor<'_>, StorageError> {
        Ok(RedbCursor::new(self, DEFAULT_BATCH_SIZE))
    }

    fn commit(self) -> Result<(), StorageError> {
        match self {
            // Read transactions don't need explicit commit
            Self::Read(_) => Ok(()),
            Self::Write(tx) => tx.commit().map_err(|e| StorageError::Transaction(e.to_string())),
        }
    }

    fn rollback(self) -> Result<(), StorageError> {
        match self {
            // Read transactions just get dropped
            Self::Read(_) => Ok(()),
            Self::Write(tx) => {
                // Ignore abort result - we're rolling back anyway
                drop(tx.abort());
                Ok(())
            }
        }
    }

    fn is_read_only(&self) -> bool {
        matches!(self, Self::Read(_))
    }
}

/// A forward-seeking cursor over a Redb map.
///
/// Holds at most one batch of entries in memory at a time; advancing past
/// the batch re-queries the table starting after the last loaded key.
pub struct RedbCursor<'a> {
    /// Reference to the transaction for fetching batches.
    tx: &'a RedbTransaction,
    /// Current batch of entries.
    batch: Vec<KeyValue>,
    /// Position within the current batch.
    pos: Option<usize>,
    /// Maximum entries per batch.
    batch_size: usize,
    /// Whether the last fetch drained the remaining keyspace.
    exhausted: bool,
}

impl<'a> RedbCursor<'a> {
    pub(crate) fn new(tx: &'a RedbTransaction, batch_size: usize) -> Self {
        Self { tx, batch: Vec::new(), pos: None, batch_size, exhausted: false }
    }

    fn load_from(&mut self, start: &[u8], skip_first: bool) -> Result<(), StorageError> {
        self.batch = self.tx.fetch_from(start, skip_first, self.batch_size)?;
        self.exhausted = self.batch.len() < self.batch_size;
        self.pos = if self.batch.is_empty() { None } else { Some(0) };
        Ok(())
    }

    fn current_owned(&self) -> Option<KeyValue> {
        self.pos.and_then(|p| self.batch.get(p)).cloned()
    }
}

impl Cursor for RedbCursor<'_> {
    fn seek(&mut self, key: &[u8]) -> CursorResult {
        self.load_from(key, false)?;
        Ok(self.current_owned())
    }

    fn next(&mut self) -> CursorResult {
        match self.pos {
            // Ran off the end earlier; stay there
            None if self.exhausted => Ok(None),
            // Not positioned: start from the beginning of the keyspace
            None => self.seek(&[]),
            Some(p) if p + 1 < self.batch.len() => {
                self.pos = Some(p + 1);
                Ok(self.current_owned())
            }
            Some(_) => {
                if self.exhausted {
                    self.pos = None;
                    return Ok(None);
                }
                let Some((last_key, _)) = self.batch.last().cloned() else {
                    self.pos = None;
                    return Ok(None);
                };
                self.load_from(&last_key, true)?;
                Ok(self.current_owned())
            }
        }
    }

    fn current(&self) -> Option<(&[u8], &[u8])> {
        self.pos.and_then(|p| self.batch.get(p)).map(|(k, v)| (k.as_slice(), v.as_slice()))
    }
}
