//! # zk-io — durable storage for the Zookeepr store
//!
//! The store is mirrored to a single JSON document, `{ "animals": [...] }`,
//! rewritten wholesale after every successful create.
//!
//! - [`document`] owns the on-disk format.
//! - [`store`] defines the [`DocumentStore`] seam and its file and memory
//!   backends.

pub mod document;
pub mod store;

pub use document::{AnimalDocument, PersistError};
pub use store::{DocumentStore, FileStore, MemoryStore};
