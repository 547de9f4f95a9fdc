//! The dual store: two mutually-consistent single-direction maps.
//!
//! Every mutating operation keeps the forward (key -> value) and reverse
//! (value -> key) maps in lockstep. The two maps are separate databases,
//! so a logical write is two back-to-back single-map commits, not one
//! atomic transaction; a failure between them is surfaced to the caller
//! as a possible bijection break rather than rolled back.

use tracing::{debug, warn};

use twowaykv_storage::backends::{RedbConfig, RedbEngine};
use twowaykv_storage::{StorageEngine, StorageResult, Transaction};

use crate::config::{StoreConfig, STORE_FILE};
use crate::entry::Entry;
use crate::error::{Error, Result};
use crate::generate::IdGenerator;
use crate::sample::Sampler;

/// Handle to the bidirectional index.
///
/// Opened from a [`StoreConfig`]; all operations on the logical store go
/// through this type. It is `Send + Sync`; concurrent readers are fine,
/// but write-batch handles obtained from [`Self::begin_batches`] are
/// exclusively owned by their caller until flushed or cancelled.
pub struct DualStore {
    forward: RedbEngine,
    reverse: RedbEngine,
    generator: IdGenerator,
    sampler: Sampler,
}

impl DualStore {
    /// Open (or create) both maps under the configured base directory.
    ///
    /// Derives `<base>/keysToValues` and `<base>/valuesToKeys` and opens
    /// one database in each. Fails fast with [`Error::Open`] if either
    /// path cannot be created or opened; if the second open fails, the
    /// first handle is released before the error is returned.
    ///
    /// Reopening the same base directory recovers all previously
    /// committed rows unchanged.
    pub fn open(config: StoreConfig) -> Result<Self> {
        let generator = IdGenerator::new(config.value_space, config.generate_retries);
        let sampler = Sampler::new(config.value_space, config.sample_attempts);

        if config.in_memory {
            let forward = RedbEngine::in_memory().map_err(|e| Error::Open(e.to_string()))?;
            let reverse = RedbEngine::in_memory().map_err(|e| Error::Open(e.to_string()))?;
            return Ok(Self { forward, reverse, generator, sampler });
        }

        let forward_dir = config.forward_dir();
        let reverse_dir = config.reverse_dir();
        for dir in [&forward_dir, &reverse_dir] {
            std::fs::create_dir_all(dir)
                .map_err(|e| Error::Open(format!("{}: {e}", dir.display())))?;
        }

        let mut redb_config = RedbConfig::new();
        if let Some(cache_size) = config.cache_size {
            redb_config = redb_config.cache_size(cache_size);
        }

        let forward = RedbEngine::open_with_config(forward_dir.join(STORE_FILE), redb_config)
            .map_err(|e| Error::Open(e.to_string()))?;
        // An early return here drops `forward`, so no half-open handle leaks.
        let reverse = RedbEngine::open_with_config(reverse_dir.join(STORE_FILE), redb_config)
            .map_err(|e| Error::Open(e.to_string()))?;

        debug!(base = %config.base_dir.display(), "opened dual store");
        Ok(Self { forward, reverse, generator, sampler })
    }

    /// The forward (key -> value) engine. Primarily for tests and
    /// advanced callers.
    pub const fn forward(&self) -> &RedbEngine {
        &self.forward
    }

    /// The reverse (value -> key) engine.
    pub const fn reverse(&self) -> &RedbEngine {
        &self.reverse
    }

    /// The configured identifier generator.
    pub const fn generator(&self) -> &IdGenerator {
        &self.generator
    }

    /// The configured random sampler.
    pub const fn sampler(&self) -> &Sampler {
        &self.sampler
    }

    /// Row counts of the two maps, for liveness checks only.
    pub fn sizes(&self) -> Result<(u64, u64)> {
        Ok((self.forward.entry_count()?, self.reverse.entry_count()?))
    }

    /// Write one entry to both maps.
    ///
    /// The value is encoded as its canonical decimal string once and used
    /// on both sides. The forward map is committed first; if the reverse
    /// side then fails, the forward write is NOT rolled back — the error
    /// is surfaced and the caller must reconcile or retry.
    pub fn write_entry(&self, entry: &Entry) -> Result<()> {
        let value = entry.encoded_value();

        let mut tx = self.forward.begin_write()?;
        tx.put(entry.key.as_bytes(), value.as_bytes())?;
        tx.commit()?;

        let reverse_write: StorageResult<()> = (|| {
            let mut tx = self.reverse.begin_write()?;
            tx.put(value.as_bytes(), entry.key.as_bytes())?;
            tx.commit()
        })();
        if let Err(e) = reverse_write {
            warn!(key = %entry.key, value = %value, error = %e,
                "reverse map write failed after forward commit; maps may disagree");
            return Err(e.into());
        }
        Ok(())
    }

    /// Remove one entry from both maps.
    ///
    /// Same non-atomic two-commit discipline as [`Self::write_entry`]:
    /// removal is symmetric, but a failure between the commits leaves the
    /// maps out of step and is surfaced to the caller.
    pub fn delete_entry(&self, entry: &Entry) -> Result<()> {
        let value = entry.encoded_value();

        let mut tx = self.forward.begin_write()?;
        tx.delete(entry.key.as_bytes())?;
        tx.commit()?;

        let reverse_delete: StorageResult<()> = (|| {
            let mut tx = self.reverse.begin_write()?;
            tx.delete(value.as_bytes())?;
            tx.commit()
        })();
        if let Err(e) = reverse_delete {
            warn!(key = %entry.key, value = %value, error = %e,
                "reverse map delete failed after forward commit; maps may disagree");
            return Err(e.into());
        }
        Ok(())
    }

    /// Open one write-batch handle per map.
    ///
    /// Writes staged through [`stage_entry`] are invisible to readers
    /// until both handles are committed; rolling back discards all staged
    /// writes with no partial effect. The caller owns the flush/cancel
    /// lifecycle of both handles.
    pub fn begin_batches(
        &self,
    ) -> Result<(
        <RedbEngine as StorageEngine>::Transaction<'_>,
        <RedbEngine as StorageEngine>::Transaction<'_>,
    )> {
        Ok((self.forward.begin_write()?, self.reverse.begin_write()?))
    }
}

/// Stage one entry into pre-opened write batches for the two maps.
///
/// Batched variant of [`DualStore::write_entry`]: nothing is flushed
/// here, and the caller commits or rolls back both handles.
pub fn stage_entry<T: Transaction>(forward: &mut T, reverse: &mut T, entry: &Entry) -> Result<()> {
    let value = entry.encoded_value();
    forward.put(entry.key.as_bytes(), value.as_bytes())?;
    reverse.put(value.as_bytes(), entry.key.as_bytes())?;
    Ok(())
}
