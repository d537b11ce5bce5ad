//! # Config
//!
//! Optional TOML file layered under the command-line arguments. Every key has
//! a default, so an absent file and an empty file behave the same.

use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Deserialize, Default, Clone, Debug)]
pub struct Config {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

#[derive(Deserialize, Clone, Debug)]
pub struct StoreConfig {
    /// The JSON document loaded at start-up and rewritten on every create.
    #[serde(default = "default_data_path")]
    pub data_path: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            data_path: default_data_path(),
        }
    }
}

#[derive(Deserialize, Clone, Debug)]
pub struct ServerConfig {
    /// Directory served for every path that is not an API route.
    #[serde(default = "default_public_dir")]
    pub public_dir: PathBuf,
    #[serde(default = "default_cors_permissive")]
    pub cors_permissive: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            public_dir: default_public_dir(),
            cors_permissive: default_cors_permissive(),
        }
    }
}

fn default_data_path() -> PathBuf {
    PathBuf::from("data/animals.json")
}
fn default_public_dir() -> PathBuf {
    PathBuf::from("public")
}
fn default_cors_permissive() -> bool {
    true
}

impl Config {
    /// Read `path`, falling back to defaults when it is missing or invalid.
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            tracing::debug!("No config at {}, using defaults", path.display());
            return Config::default();
        }
        match std::fs::read_to_string(path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(config) => config,
                Err(e) => {
                    tracing::warn!("Ignoring invalid config {}: {}", path.display(), e);
                    Config::default()
                }
            },
            Err(e) => {
                tracing::warn!("Could not read config {}: {}", path.display(), e);
                Config::default()
            }
        }
    }
}
