//! Batched creation of missing entries.

use tracing::debug;

use twowaykv_storage::Transaction;

use crate::entry::{self, Entry};
use crate::error::{Error, Result};
use crate::store::{stage_entry, DualStore};

impl DualStore {
    /// Create entries for the keys that don't exist yet.
    ///
    /// All generated writes are staged through one shared write batch per
    /// map and flushed once after the whole key set is processed, so a
    /// per-key failure mid-batch never discards siblings already staged.
    /// Existence checks and collision probes go through the batch
    /// handles, so keys and values staged earlier in the same call count
    /// as present.
    ///
    /// Per key: if absent, a value is generated and the entry staged and
    /// returned. If present and `mute_already_exists` is set, the
    /// existing entry is resolved and returned with no error; otherwise
    /// an [`Error::AlreadyExists`] is recorded and processing continues.
    /// Collision exhaustion is likewise per key.
    ///
    /// # Errors
    ///
    /// The outer `Result` fails only on store-level problems (opening or
    /// flushing the batches); per-key failures come back in the error
    /// list.
    pub fn create_missing(
        &self,
        keys: &[String],
        mute_already_exists: bool,
    ) -> Result<(Vec<Entry>, Vec<Error>)> {
        let (mut forward_tx, mut reverse_tx) = self.begin_batches()?;
        let mut created = Vec::with_capacity(keys.len());
        let mut errors = Vec::new();

        for key in keys {
            match forward_tx.get(key.as_bytes()) {
                Ok(Some(raw)) => {
                    if mute_already_exists {
                        // Resolve the pre-existing entry instead of erroring.
                        match entry::decode_value(&raw) {
                            Ok(value) => created.push(Entry { key: key.clone(), value }),
                            Err(e) => errors.push(e),
                        }
                    } else {
                        errors.push(Error::AlreadyExists { key: key.clone() });
                    }
                }
                Ok(None) => match self.generator().generate(&reverse_tx, key) {
                    Ok(new_entry) => {
                        match stage_entry(&mut forward_tx, &mut reverse_tx, &new_entry) {
                            Ok(()) => created.push(new_entry),
                            Err(e) => errors.push(e),
                        }
                    }
                    Err(e) => errors.push(e),
                },
                Err(e) => errors.push(Error::Storage(e)),
            }
        }

        forward_tx.commit()?;
        reverse_tx.commit()?;

        debug!(created = created.len(), errors = errors.len(), "batch create flushed");
        Ok((created, errors))
    }
}
