//! # Animal Store
//!
//! The process-wide animal list and its durable mirror. Reads share the lock;
//! a create holds the write lock from id assignment through the document
//! rewrite, so concurrent creates never interleave. The rewrite itself runs
//! on the blocking pool.

use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;
use tokio::sync::{OwnedRwLockWriteGuard, RwLock};

use zk_core::{Animal, Criteria, ValidationError};
use zk_io::{AnimalDocument, DocumentStore, PersistError};

/// Dataset compiled into the binary, used when no data file exists yet.
pub const SEED_DOCUMENT: &str = include_str!("../../data/animals.json");

#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The animal was appended in memory but the document rewrite failed.
    #[error("Persistence error: {0}")]
    Persistence(#[from] PersistError),
}

/// Where the initial animal list came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadSource {
    Document,
    Seed,
}

pub struct AnimalStore {
    animals: Arc<RwLock<Vec<Animal>>>,
    backend: Arc<dyn DocumentStore>,
}

impl AnimalStore {
    pub fn new(animals: Vec<Animal>, backend: Box<dyn DocumentStore>) -> Self {
        Self {
            animals: Arc::new(RwLock::new(animals)),
            backend: Arc::from(backend),
        }
    }

    /// Load from `backend`, falling back to the embedded seed when the
    /// backend has nothing stored. The seed is not written until the first
    /// successful create.
    pub fn open(backend: Box<dyn DocumentStore>) -> Result<(Self, LoadSource), PersistError> {
        let (animals, source) = match backend.load()? {
            Some(animals) => (animals, LoadSource::Document),
            None => (seed_animals()?, LoadSource::Seed),
        };
        tracing::info!(
            "Loaded {} animals ({:?}) backed by {}",
            animals.len(),
            source,
            backend.describe()
        );
        Ok((Self::new(animals, backend), source))
    }

    pub async fn query(&self, criteria: &Criteria) -> Vec<Animal> {
        zk_core::filter(criteria, &self.animals.read().await)
    }

    pub async fn get(&self, id: &str) -> Option<Animal> {
        zk_core::find_by_id(id, &self.animals.read().await).cloned()
    }

    pub async fn len(&self) -> usize {
        self.animals.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.animals.read().await.is_empty()
    }

    pub async fn snapshot(&self) -> Vec<Animal> {
        self.animals.read().await.clone()
    }

    /// Assign an id, validate, append and rewrite the whole document.
    ///
    /// The id is the decimal store length and is assigned before validation,
    /// replacing any id the client sent. On a persistence error the animal
    /// stays appended in memory.
    pub async fn create(&self, mut candidate: Value) -> Result<Animal, StoreError> {
        let mut animals = Arc::clone(&self.animals).write_owned().await;

        if let Some(fields) = candidate.as_object_mut() {
            fields.insert("id".to_string(), Value::String(animals.len().to_string()));
        }

        let animal = match zk_core::parse_candidate(&candidate) {
            Ok(animal) => animal,
            Err(e) => {
                tracing::warn!("Rejected animal: {}", e);
                return Err(e.into());
            }
        };

        animals.push(animal.clone());

        if let Err(e) = self.save(animals).await {
            tracing::error!(
                "Failed to persist animal {} to {}: {}",
                animal.id,
                self.backend.describe(),
                e
            );
            return Err(e.into());
        }

        tracing::info!("Created animal {} ({})", animal.id, animal.name);
        Ok(animal)
    }

    /// Rewrite the document from the blocking pool. The write lock travels
    /// with the job and is released once the document is written, even if
    /// the calling request is dropped first.
    async fn save(
        &self,
        animals: OwnedRwLockWriteGuard<Vec<Animal>>,
    ) -> Result<(), PersistError> {
        let backend = Arc::clone(&self.backend);
        tokio::task::spawn_blocking(move || backend.save(&animals))
            .await
            .map_err(|e| PersistError::Io(std::io::Error::other(e)))?
    }
}

/// Parse the embedded seed dataset.
pub fn seed_animals() -> Result<Vec<Animal>, PersistError> {
    Ok(AnimalDocument::decode(SEED_DOCUMENT)?.animals)
}
