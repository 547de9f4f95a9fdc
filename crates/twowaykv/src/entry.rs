//! The logical entry type and its on-disk row encoding.
//!
//! Forward rows are `UTF-8 key bytes -> ASCII decimal value bytes`;
//! reverse rows are `ASCII decimal value bytes -> UTF-8 key bytes`.
//! This byte-level format is load-bearing: data written by a prior run
//! must reopen unchanged.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A logical key-value pair. Either field may serve as a lookup handle.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Entry {
    /// The UTF-8 key.
    pub key: String,
    /// The non-negative integer value, immutable once assigned.
    pub value: u64,
}

impl Entry {
    /// Create a new entry.
    pub fn new(key: impl Into<String>, value: u64) -> Self {
        Self { key: key.into(), value }
    }

    /// The canonical decimal encoding of the value, used as the forward
    /// row's value bytes and the reverse row's key bytes.
    #[must_use]
    pub fn encoded_value(&self) -> String {
        self.value.to_string()
    }

    /// Decode a forward-map row (`key bytes -> value bytes`).
    pub fn from_forward_row(key: Vec<u8>, value: &[u8]) -> Result<Self> {
        Ok(Self { key: decode_key(key)?, value: decode_value(value)? })
    }

    /// Decode a reverse-map row (`value bytes -> key bytes`).
    pub fn from_reverse_row(value: &[u8], key: Vec<u8>) -> Result<Self> {
        Ok(Self { key: decode_key(key)?, value: decode_value(value)? })
    }
}

/// A lookup handle: by key or by value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
    /// Resolve through the forward map.
    Key(String),
    /// Resolve through the reverse map.
    Value(u64),
}

impl From<&str> for Lookup {
    fn from(key: &str) -> Self {
        Self::Key(key.to_owned())
    }
}

impl From<u64> for Lookup {
    fn from(value: u64) -> Self {
        Self::Value(value)
    }
}

/// Parse stored value bytes back into the integer they encode.
pub fn decode_value(raw: &[u8]) -> Result<u64> {
    let s = std::str::from_utf8(raw)
        .map_err(|_| Error::Decode { detail: "stored value is not valid UTF-8".to_owned() })?;
    s.parse::<u64>()
        .map_err(|_| Error::Decode { detail: format!("stored value {s:?} is not a decimal integer") })
}

/// Parse stored key bytes back into a string.
pub fn decode_key(raw: Vec<u8>) -> Result<String> {
    String::from_utf8(raw)
        .map_err(|_| Error::Decode { detail: "stored key is not valid UTF-8".to_owned() })
}
