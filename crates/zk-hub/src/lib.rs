//! # zk-hub — the Zookeepr HTTP service
//!
//! - `GET  /api/animals`      filtered list
//! - `GET  /api/animals/:id`  one animal, or 404
//! - `POST /api/animals`      validate, append, persist
//!
//! Everything else falls through to the static `public` directory.

pub mod animals;
pub mod api;
pub mod config;

use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

pub use animals::{AnimalStore, LoadSource, StoreError};
pub use config::{Config, ServerConfig, StoreConfig};

pub struct AppState {
    pub animals: AnimalStore,
}

impl AppState {
    pub fn new(animals: AnimalStore) -> Self {
        Self { animals }
    }
}

/// Build the full router over `state`.
pub fn app(state: Arc<AppState>, server: &ServerConfig) -> Router {
    let mut router = Router::new()
        .route(
            "/api/animals",
            get(api::list_animals).post(api::create_animal),
        )
        .route("/api/animals/:id", get(api::get_animal))
        // Static pages
        .fallback_service(ServeDir::new(&server.public_dir))
        .layer(TraceLayer::new_for_http());

    if server.cors_permissive {
        router = router.layer(CorsLayer::permissive());
    }

    router.with_state(state)
}
