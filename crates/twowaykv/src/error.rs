//! Error types for the bidirectional index.
//!
//! Bulk operations never fail fast: per-item failures are collected and
//! returned alongside successes, either as [`Error`] values (creation) or
//! as [`RetrievalError`] records (bulk lookups).

use thiserror::Error;

use twowaykv_storage::StorageError;

/// Errors that can occur when using the dual store.
#[derive(Debug, Error)]
pub enum Error {
    /// The store could not be opened. Fatal to the caller; not retried.
    #[error("failed to open store: {0}")]
    Open(String),

    /// A lookup missed. Expected, surfaced per item in bulk operations.
    #[error("no entry found for {lookup}")]
    NotFound {
        /// The key or encoded value that was looked up.
        lookup: String,
    },

    /// A stored row could not be decoded. Indicates corruption or a
    /// cross-version format mismatch.
    #[error("stored row could not be decoded: {detail}")]
    Decode {
        /// What failed to decode.
        detail: String,
    },

    /// The identifier space was effectively exhausted while generating a
    /// value for this key.
    #[error("too many collisions on creating {key}")]
    CollisionExhausted {
        /// The key that could not be assigned a value.
        key: String,
    },

    /// A batch-creation target was already populated.
    #[error("key {key} already exists in DB")]
    AlreadyExists {
        /// The pre-existing key.
        key: String,
    },

    /// The random sampler ran out of probe attempts.
    #[error("max collisions reached finding random entries")]
    SamplingExhausted,

    /// A storage-level error occurred.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

impl Error {
    /// Whether this is a lookup miss.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Whether this reports a pre-existing key.
    #[must_use]
    pub const fn is_already_exists(&self) -> bool {
        matches!(self, Self::AlreadyExists { .. })
    }

    /// Whether this reports collision-retry exhaustion.
    #[must_use]
    pub const fn is_collision_exhausted(&self) -> bool {
        matches!(self, Self::CollisionExhausted { .. })
    }
}

/// Convenience alias for index results.
pub type Result<T> = std::result::Result<T, Error>;

/// One failed lookup within a bulk operation.
///
/// A miss on one identifier never aborts sibling lookups; every failed
/// input is reported as one of these alongside the resolved set.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RetrievalError {
    /// The identifier (key or encoded value) that failed to resolve.
    pub lookup_id: String,
    /// Whether the failure was a plain miss.
    pub not_found: bool,
    /// Human-readable failure detail.
    pub detail: String,
}

impl RetrievalError {
    /// A plain miss for the given identifier.
    #[must_use]
    pub fn not_found(lookup_id: impl Into<String>) -> Self {
        Self { lookup_id: lookup_id.into(), not_found: true, detail: "not found".to_owned() }
    }

    /// A non-miss failure (storage or decode) for the given identifier.
    #[must_use]
    pub fn other(lookup_id: impl Into<String>, detail: impl Into<String>) -> Self {
        Self { lookup_id: lookup_id.into(), not_found: false, detail: detail.into() }
    }
}

impl std::fmt::Display for RetrievalError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "lookup {} failed: {}", self.lookup_id, self.detail)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_are_stable() {
        // Callers branch on kind, but the user-facing strings are part of
        // the external contract and must not drift.
        let e = Error::CollisionExhausted { key: "collision".to_owned() };
        assert_eq!(e.to_string(), "too many collisions on creating collision");

        let e = Error::AlreadyExists { key: "alreadyExists1".to_owned() };
        assert_eq!(e.to_string(), "key alreadyExists1 already exists in DB");

        assert_eq!(
            Error::SamplingExhausted.to_string(),
            "max collisions reached finding random entries"
        );
    }

    #[test]
    fn kind_helpers() {
        assert!(Error::NotFound { lookup: "x".into() }.is_not_found());
        assert!(Error::AlreadyExists { key: "x".into() }.is_already_exists());
        assert!(Error::CollisionExhausted { key: "x".into() }.is_collision_exhausted());
        assert!(!Error::SamplingExhausted.is_not_found());
    }

    #[test]
    fn retrieval_error_constructors() {
        let miss = RetrievalError::not_found("absent");
        assert!(miss.not_found);
        assert_eq!(miss.lookup_id, "absent");

        let other = RetrievalError::other("bad", "stored value is not valid UTF-8");
        assert!(!other.not_found);
        assert!(other.to_string().contains("bad"));
    }
}
