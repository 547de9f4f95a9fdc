//! Bounded-retry random sampling over the reverse map.

use std::collections::HashSet;

use rand::Rng;
use tracing::warn;

use twowaykv_storage::{Cursor, StorageEngine, Transaction};

use crate::config::{DEFAULT_SAMPLE_ATTEMPTS, DEFAULT_VALUE_SPACE};
use crate::entry::Entry;
use crate::error::{Error, Result};

/// Draws uniformly-unpredictable existing entries without a full scan.
///
/// Each probe picks a random candidate value and seeks the reverse map to
/// the first stored value whose decimal encoding is byte-wise >= the
/// candidate's. The probe space and attempt ceiling are explicit
/// parameters, mirroring [`IdGenerator`](crate::IdGenerator).
#[derive(Debug, Clone, Copy)]
pub struct Sampler {
    value_space: u64,
    max_attempts: u32,
}

impl Default for Sampler {
    fn default() -> Self {
        Self::new(DEFAULT_VALUE_SPACE, DEFAULT_SAMPLE_ATTEMPTS)
    }
}

impl Sampler {
    /// Create a sampler probing `[0, value_space)` with the given attempt
    /// ceiling. A zero `value_space` is clamped to one.
    #[must_use]
    pub fn new(value_space: u64, max_attempts: u32) -> Self {
        Self { value_space: value_space.max(1), max_attempts }
    }

    /// Collect `n` distinct entries from the reverse map.
    ///
    /// Results are not repeatable: two calls under the same parameters
    /// may (and in a well-populated store do) yield different sets.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SamplingExhausted`] once the probe ceiling is
    /// crossed before `n` distinct entries are found. No partial set is
    /// returned on failure: the result is the error alone.
    pub fn sample<E: StorageEngine>(&self, reverse: &E, n: usize) -> Result<Vec<Entry>> {
        let tx = reverse.begin_read()?;
        let mut cursor = tx.cursor()?;
        let mut rng = rand::thread_rng();

        let mut seen = HashSet::with_capacity(n);
        let mut picked = Vec::with_capacity(n);
        let mut attempts = 0u32;

        while picked.len() < n {
            if attempts >= self.max_attempts {
                warn!(wanted = n, found = picked.len(), "sampling probe ceiling reached");
                return Err(Error::SamplingExhausted);
            }
            attempts += 1;

            let candidate = rng.gen_range(0..self.value_space).to_string();
            // First stored value >= the candidate's encoding, if any.
            let Some((value_raw, key_raw)) = cursor.seek(candidate.as_bytes())? else {
                continue;
            };

            let found = Entry::from_reverse_row(&value_raw, key_raw)?;
            if seen.insert(found.value) {
                picked.push(found);
            }
        }

        Ok(picked)
    }
}

impl crate::DualStore {
    /// Collect `n` distinct random entries using the configured sampler.
    ///
    /// See [`Sampler::sample`] for the probing strategy and failure mode.
    pub fn random_entries(&self, n: usize) -> Result<Vec<Entry>> {
        self.sampler().sample(self.reverse(), n)
    }
}
