//! Collision-avoiding identifier generation.

use rand::Rng;
use tracing::debug;

use twowaykv_storage::Transaction;

use crate::config::{DEFAULT_GENERATE_RETRIES, DEFAULT_VALUE_SPACE};
use crate::entry::Entry;
use crate::error::{Error, Result};

/// Synthesizes previously-unused values for new keys.
///
/// The candidate space and retry ceiling are explicit parameters so tests
/// can shrink them to force collisions deterministically.
#[derive(Debug, Clone, Copy)]
pub struct IdGenerator {
    value_space: u64,
    max_retries: u32,
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_VALUE_SPACE, DEFAULT_GENERATE_RETRIES)
    }
}

impl IdGenerator {
    /// Create a generator drawing from `[0, value_space)` with the given
    /// retry ceiling. A zero `value_space` is clamped to one.
    #[must_use]
    pub fn new(value_space: u64, max_retries: u32) -> Self {
        Self { value_space: value_space.max(1), max_retries }
    }

    /// The exclusive upper bound of the candidate space.
    #[must_use]
    pub const fn value_space(&self) -> u64 {
        self.value_space
    }

    /// Generate a fresh, not-yet-persisted entry for `key`.
    ///
    /// Draws uniform candidates and probes the reverse map through the
    /// supplied transaction, so values staged earlier in an uncommitted
    /// batch count as occupied. The value is never derived from the key;
    /// tried candidates are not memoized, so a failed candidate may be
    /// redrawn. Persisting the returned entry is the caller's job.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CollisionExhausted`] naming the key once the
    /// retry ceiling is crossed.
    pub fn generate<T: Transaction>(&self, reverse: &T, key: &str) -> Result<Entry> {
        let mut rng = rand::thread_rng();

        for _ in 0..self.max_retries {
            let candidate = rng.gen_range(0..self.value_space);
            let encoded = candidate.to_string();
            if reverse.get(encoded.as_bytes())?.is_none() {
                return Ok(Entry { key: key.to_owned(), value: candidate });
            }
        }

        debug!(key, retries = self.max_retries, "candidate space exhausted");
        Err(Error::CollisionExhausted { key: key.to_owned() })
    }
}
