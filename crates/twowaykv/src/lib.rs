//! twowaykv
//!
//! A bidirectional key-value index: every stored pair is queryable
//! efficiently by key *or* by value, backed by two independently-persisted,
//! mutually-consistent single-direction ordered maps (forward: key -> value,
//! reverse: value -> key).
//!
//! The embedded ordered engine underneath is treated as an external
//! collaborator (see the `twowaykv-storage` crate); this crate supplies the
//! dual-store consistency discipline, collision-avoiding value generation,
//! batched creation, random sampling, and prefix search.
//!
//! # Example
//!
//! ```ignore
//! use twowaykv::{DualStore, Lookup, StoreConfig};
//!
//! let store = DualStore::open(StoreConfig::from_env()?)?;
//!
//! // Create entries for keys that don't exist yet
//! let (entries, errors) = store.create_missing(&keys, true)?;
//!
//! // Resolve in either direction
//! let by_key = store.get_entry(&Lookup::Key("some key".into()))?;
//! let by_value = store.get_entry(&Lookup::Value(by_key.value))?;
//! ```
//!
//! # Consistency
//!
//! The two maps live in separate databases; a logical write is two
//! back-to-back single-map commits, not one atomic transaction. A reader
//! interleaving between the commits can observe a bijection violation,
//! and a write error must be treated as "inconsistent state possible".

pub mod config;
pub mod entry;
pub mod error;

mod create;
mod generate;
mod prefix;
mod read;
mod sample;
mod store;

pub use config::StoreConfig;
pub use entry::{Entry, Lookup};
pub use error::{Error, Result, RetrievalError};
pub use generate::IdGenerator;
pub use sample::Sampler;
pub use store::{stage_entry, DualStore};
