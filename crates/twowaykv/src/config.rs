//! Store configuration.

use std::path::PathBuf;

use crate::error::{Error, Result};

/// Environment variable naming the base storage directory.
pub const STORE_DIR_ENV: &str = "GRAPH_DB_STORE_DIR";

/// Subdirectory of the base dir holding the forward (key -> value) map.
pub const FORWARD_DIR: &str = "keysToValues";

/// Subdirectory of the base dir holding the reverse (value -> key) map.
pub const REVERSE_DIR: &str = "valuesToKeys";

/// Database file name within each map's subdirectory.
pub(crate) const STORE_FILE: &str = "store.redb";

/// Default upper bound (exclusive) of the generated-value space.
pub const DEFAULT_VALUE_SPACE: u64 = 9_999_999;

/// Default retry ceiling for collision-avoiding value generation.
pub const DEFAULT_GENERATE_RETRIES: u32 = 10;

/// Default probe ceiling for random sampling.
pub const DEFAULT_SAMPLE_ATTEMPTS: u32 = 100;

/// Configuration options for opening a [`DualStore`](crate::DualStore).
///
/// The collision-testing tunables (`value_space`, retry ceilings) are
/// explicit parameters here rather than process-wide mutable state, so
/// tests can shrink them without cross-test interference.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Base storage directory; the two map subdirectories are derived
    /// from it deterministically.
    pub base_dir: PathBuf,
    /// Use throwaway in-memory maps instead of on-disk files.
    pub in_memory: bool,
    /// Per-map cache size in bytes. If not set, uses the engine default.
    pub cache_size: Option<usize>,
    /// Upper bound (exclusive) for generated and sampled candidate values.
    pub value_space: u64,
    /// Retry ceiling for value generation.
    pub generate_retries: u32,
    /// Probe ceiling for random sampling.
    pub sample_attempts: u32,
}

impl StoreConfig {
    /// Create a configuration rooted at the given base directory.
    #[must_use]
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            in_memory: false,
            cache_size: None,
            value_space: DEFAULT_VALUE_SPACE,
            generate_retries: DEFAULT_GENERATE_RETRIES,
            sample_attempts: DEFAULT_SAMPLE_ATTEMPTS,
        }
    }

    /// Create a configuration for throwaway in-memory maps.
    #[must_use]
    pub fn in_memory() -> Self {
        Self { in_memory: true, ..Self::new(PathBuf::new()) }
    }

    /// Read the base directory from [`STORE_DIR_ENV`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::Open`] when the variable is unset or empty.
    pub fn from_env() -> Result<Self> {
        match std::env::var(STORE_DIR_ENV) {
            Ok(dir) if !dir.is_empty() => Ok(Self::new(dir)),
            _ => Err(Error::Open(format!("{STORE_DIR_ENV} is not set"))),
        }
    }

    /// Set the per-map cache size.
    #[must_use]
    pub const fn cache_size(mut self, size: usize) -> Self {
        self.cache_size = Some(size);
        self
    }

    /// Set the candidate-value space bound.
    #[must_use]
    pub const fn value_space(mut self, bound: u64) -> Self {
        self.value_space = bound;
        self
    }

    /// Set the generation retry ceiling.
    #[must_use]
    pub const fn generate_retries(mut self, retries: u32) -> Self {
        self.generate_retries = retries;
        self
    }

    /// Set the sampling probe ceiling.
    #[must_use]
    pub const fn sample_attempts(mut self, attempts: u32) -> Self {
        self.sample_attempts = attempts;
        self
    }

    /// Path of the forward map's subdirectory.
    #[must_use]
    pub fn forward_dir(&self) -> PathBuf {
        self.base_dir.join(FORWARD_DIR)
    }

    /// Path of the reverse map's subdirectory.
    #[must_use]
    pub fn reverse_dir(&self) -> PathBuf {
        self.base_dir.join(REVERSE_DIR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derives_map_subdirectories() {
        let config = StoreConfig::new("/tmp/twowaykv");
        assert_eq!(config.forward_dir(), PathBuf::from("/tmp/twowaykv/keysToValues"));
        assert_eq!(config.reverse_dir(), PathBuf::from("/tmp/twowaykv/valuesToKeys"));
    }

    #[test]
    fn builder_overrides_tunables() {
        let config = StoreConfig::in_memory().value_space(1).generate_retries(3).sample_attempts(5);
        assert!(config.in_memory);
        assert_eq!(config.value_space, 1);
        assert_eq!(config.generate_retries, 3);
        assert_eq!(config.sample_attempts, 5);
    }

    #[test]
    fn from_env_requires_the_variable() {
        std::env::remove_var(STORE_DIR_ENV);
        assert!(StoreConfig::from_env().is_err());

        std::env::set_var(STORE_DIR_ENV, "/tmp/twowaykv/env");
        let config = StoreConfig::from_env().expect("variable is set");
        assert_eq!(config.base_dir, PathBuf::from("/tmp/twowaykv/env"));
        std::env::remove_var(STORE_DIR_ENV);
    }
}
