//! Entry resolution by key or by value, single or bulk.

use std::collections::HashMap;

use twowaykv_storage::{StorageEngine, Transaction};

use crate::entry::{self, Entry, Lookup};
use crate::error::{Error, Result, RetrievalError};
use crate::store::DualStore;

impl DualStore {
    /// Resolve one entry through either map, depending on the lookup handle.
    ///
    /// # Errors
    ///
    /// [`Error::NotFound`] when the handle is absent; [`Error::Decode`]
    /// when the stored row cannot be parsed back.
    pub fn get_entry(&self, lookup: &Lookup) -> Result<Entry> {
        match lookup {
            Lookup::Key(key) => self.entry_by_key(key),
            Lookup::Value(value) => self.entry_by_value(*value),
        }
    }

    /// Resolve a key through the forward map.
    pub fn entry_by_key(&self, key: &str) -> Result<Entry> {
        let tx = self.forward().begin_read()?;
        let raw = tx
            .get(key.as_bytes())?
            .ok_or_else(|| Error::NotFound { lookup: key.to_owned() })?;
        Ok(Entry { key: key.to_owned(), value: entry::decode_value(&raw)? })
    }

    /// Resolve a value through the reverse map.
    pub fn entry_by_value(&self, value: u64) -> Result<Entry> {
        let encoded = value.to_string();
        let tx = self.reverse().begin_read()?;
        let raw = tx
            .get(encoded.as_bytes())?
            .ok_or_else(|| Error::NotFound { lookup: encoded.clone() })?;
        Ok(Entry { key: entry::decode_key(raw)?, value })
    }

    /// Resolve many keys through the forward map.
    ///
    /// Returns the successful resolutions as `key -> encoded value`
    /// alongside one [`RetrievalError`] per failed key. Every input key
    /// lands in exactly one of the two; a miss never aborts siblings.
    /// Result ordering carries no meaning. All lookups read one snapshot.
    pub fn entries_from_keys(
        &self,
        keys: &[String],
    ) -> Result<(HashMap<String, String>, Vec<RetrievalError>)> {
        let tx = self.forward().begin_read()?;
        let mut resolved = HashMap::with_capacity(keys.len());
        let mut errors = Vec::new();

        for key in keys {
            match tx.get(key.as_bytes()) {
                Ok(Some(raw)) => match String::from_utf8(raw) {
                    Ok(value) => {
                        resolved.insert(key.clone(), value);
                    }
                    Err(_) => {
                        errors.push(RetrievalError::other(key, "stored value is not valid UTF-8"));
                    }
                },
                Ok(None) => errors.push(RetrievalError::not_found(key)),
                Err(e) => errors.push(RetrievalError::other(key, e.to_string())),
            }
        }
        Ok((resolved, errors))
    }

    /// Resolve many values through the reverse map.
    ///
    /// The symmetric counterpart of [`Self::entries_from_keys`]: returns
    /// `encoded value -> key`, with failed values reported by their
    /// decimal encoding as the lookup identifier.
    pub fn entries_from_values(
        &self,
        values: &[u64],
    ) -> Result<(HashMap<String, String>, Vec<RetrievalError>)> {
        let tx = self.reverse().begin_read()?;
        let mut resolved = HashMap::with_capacity(values.len());
        let mut errors = Vec::new();

        for value in values {
            let encoded = value.to_string();
            match tx.get(encoded.as_bytes()) {
                Ok(Some(raw)) => match String::from_utf8(raw) {
                    Ok(key) => {
                        resolved.insert(encoded, key);
                    }
                    Err(_) => {
                        errors
                            .push(RetrievalError::other(encoded, "stored key is not valid UTF-8"));
                    }
                },
                Ok(None) => errors.push(RetrievalError::not_found(encoded)),
                Err(e) => errors.push(RetrievalError::other(encoded, e.to_string())),
            }
        }
        Ok((resolved, errors))
    }
}
