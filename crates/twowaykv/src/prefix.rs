//! Prefix search over the key space.

use twowaykv_storage::{Cursor, StorageEngine, Transaction};

use crate::entry::Entry;
use crate::error::{Error, Result};
use crate::store::DualStore;

impl DualStore {
    /// Collect every entry whose key starts with `prefix`.
    ///
    /// Positions a forward-ordered cursor at the first key >= `prefix`
    /// and consumes consecutive keys while the prefix matches byte for
    /// byte (case-sensitive), stopping at the first non-matching key.
    /// Rows that fail to decode are collected as errors without halting
    /// the scan.
    pub fn seek_with_prefix(&self, prefix: &str) -> Result<(Vec<Entry>, Vec<Error>)> {
        let tx = self.forward().begin_read()?;
        let mut cursor = tx.cursor()?;

        let mut entries = Vec::new();
        let mut errors = Vec::new();

        let mut item = cursor.seek(prefix.as_bytes())?;
        while let Some((key_raw, value_raw)) = item {
            if !key_raw.starts_with(prefix.as_bytes()) {
                break;
            }
            match Entry::from_forward_row(key_raw, &value_raw) {
                Ok(entry) => entries.push(entry),
                Err(e) => errors.push(e),
            }
            item = cursor.next()?;
        }

        Ok((entries, errors))
    }
}
