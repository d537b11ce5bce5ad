//! # Document — the on-disk shape of the store
//!
//! A single JSON object with one key:
//!
//! ```text
//! {
//!   "animals": [
//!     { "id": "0", "name": "...", "species": "...", "diet": "...", "personalityTraits": [...] },
//!     ...
//!   ]
//! }
//! ```
//!
//! Encoded pretty-printed with two-space indentation and no trailing newline.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use zk_core::Animal;

/// Errors raised while reading or writing the document.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid animal document at {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// The full persisted store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnimalDocument {
    pub animals: Vec<Animal>,
}

/// Borrowed view used on the write path so saving never clones the store.
#[derive(Serialize)]
struct AnimalDocumentRef<'a> {
    animals: &'a [Animal],
}

impl AnimalDocument {
    /// Parse a document from its JSON text.
    pub fn decode(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Encode `animals` as a pretty-printed document.
    pub fn encode(animals: &[Animal]) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&AnimalDocumentRef { animals })
    }
}
