//! # zk-core — the animal records of Zookeepr
//!
//! Pure functions over an ordered slice of [`Animal`]s. Nothing in this crate
//! touches the filesystem, the network or a lock; the hub owns the store and
//! hands these functions a snapshot.
//!
//! - [`filter`] narrows a slice by [`Criteria`] (exact match, AND semantics).
//! - [`find_by_id`] returns the first record with a given id.
//! - [`validate`] / [`parse_candidate`] check a create payload against the
//!   fixed record shape.

pub mod query;
pub mod validate;

pub use query::{filter, find_by_id, Criteria};
pub use validate::{parse_candidate, validate, ValidationError, NOT_PROPERLY_FORMATTED};

use serde::{Deserialize, Serialize};

/// One animal in the store.
///
/// Field names on the wire are camelCase (`personalityTraits`), matching the
/// JSON document on disk and the HTTP API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Animal {
    /// Decimal position at creation time. Assigned by the store, never by clients.
    pub id: String,
    pub name: String,
    pub species: String,
    pub diet: String,
    pub personality_traits: Vec<String>,
}

impl Animal {
    /// Whether this animal carries `trait_name` verbatim.
    #[inline]
    pub fn has_trait(&self, trait_name: &str) -> bool {
        self.personality_traits.iter().any(|t| t == trait_name)
    }
}
