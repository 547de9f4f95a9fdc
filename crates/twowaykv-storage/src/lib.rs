//! `twowaykv` Storage
//!
//! This crate provides the storage engine abstraction and backend
//! implementation for the `twowaykv` bidirectional index.
//!
//! # Modules
//!
//! - [`engine`] - Storage engine traits and abstractions
//! - [`backends`] - Concrete storage backend implementations

pub mod backends;
pub mod engine;

pub use engine::{Cursor, StorageEngine, StorageError, StorageResult, Transaction};
