//! Object storage for vsum.
//!
//! This crate provides:
//! - The [`ObjectStore`] trait (list / get / put) the rest of the backend codes against
//! - An S3 implementation with full listing pagination
//! - An in-memory implementation for tests and local runs

pub mod client;
pub mod error;
pub mod memory;
pub mod store;

pub use client::{S3Client, S3Config};
pub use error::{StorageError, StorageResult};
pub use memory::MemoryStore;
pub use store::ObjectStore;
