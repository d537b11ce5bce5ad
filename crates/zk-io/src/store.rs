//! # Document stores
//!
//! [`DocumentStore`] is the seam between the in-memory animal list and its
//! durable mirror. [`FileStore`] is the production backend; [`MemoryStore`]
//! keeps the encoded document in process and is used by tests and by
//! embedders that do not want a file.

use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use zk_core::Animal;

use crate::document::{AnimalDocument, PersistError};

/// Durable mirror of the animal list.
///
/// `save` always receives the complete list and replaces whatever was stored
/// before. Callers serialize `save` calls; implementations need not.
pub trait DocumentStore: Send + Sync {
    /// Load the stored animals, or `None` if nothing has been stored yet.
    fn load(&self) -> Result<Option<Vec<Animal>>, PersistError>;

    /// Overwrite the stored document with `animals`.
    fn save(&self, animals: &[Animal]) -> Result<(), PersistError>;

    /// Human-readable location, for logs.
    fn describe(&self) -> String;
}

impl<T: DocumentStore + ?Sized> DocumentStore for Arc<T> {
    fn load(&self) -> Result<Option<Vec<Animal>>, PersistError> {
        (**self).load()
    }

    fn save(&self, animals: &[Animal]) -> Result<(), PersistError> {
        (**self).save(animals)
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}

// =============================================================================
// File backend
// =============================================================================

/// Stores the document at a fixed path.
///
/// Writes go to a sibling `.tmp` file which is synced and then renamed over
/// the target, so readers never observe a half-written document.
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The document path, as given to [`FileStore::new`].
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "animals.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl DocumentStore for FileStore {
    fn load(&self) -> Result<Option<Vec<Animal>>, PersistError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let doc = AnimalDocument::decode(&text).map_err(|source| PersistError::Parse {
            path: self.path.clone(),
            source,
        })?;
        tracing::debug!(
            "Loaded {} animals from {}",
            doc.animals.len(),
            self.path.display()
        );
        Ok(Some(doc.animals))
    }

    fn save(&self, animals: &[Animal]) -> Result<(), PersistError> {
        let text = AnimalDocument::encode(animals)?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let tmp = self.temp_path();
        {
            let mut file = File::create(&tmp)?;
            file.write_all(text.as_bytes())?;
            file.sync_all()?;
        }
        fs::rename(&tmp, &self.path)?;

        tracing::debug!("Wrote {} animals to {}", animals.len(), self.path.display());
        Ok(())
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

// =============================================================================
// Memory backend
// =============================================================================

/// Holds the encoded document in memory.
#[derive(Default)]
pub struct MemoryStore {
    text: Mutex<Option<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with an already-stored document.
    pub fn with_animals(animals: &[Animal]) -> Result<Self, PersistError> {
        Ok(Self {
            text: Mutex::new(Some(AnimalDocument::encode(animals)?)),
        })
    }

    /// The last saved document text, if any.
    pub fn contents(&self) -> Option<String> {
        self.lock().clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<String>> {
        // A panic mid-save leaves either the old or the new text; both are whole.
        self.text.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl DocumentStore for MemoryStore {
    fn load(&self) -> Result<Option<Vec<Animal>>, PersistError> {
        match self.lock().as_deref() {
            Some(text) => Ok(Some(AnimalDocument::decode(text)?.animals)),
            None => Ok(None),
        }
    }

    fn save(&self, animals: &[Animal]) -> Result<(), PersistError> {
        let text = AnimalDocument::encode(animals)?;
        *self.lock() = Some(text);
        Ok(())
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}
