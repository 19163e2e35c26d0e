//! Configuration file loading and parsing.

use crate::errors::Error;
use serde::Deserialize;
use std::path::{Path, PathBuf};

use super::DEFAULT_REQUEST_TIMEOUT_SECS;
use super::paths;
use crate::embedding::EMBEDDING_DIMS;
use crate::memory_types::DEFAULT_SEARCH_LIMIT;

/// Configuration loaded from TOML file.
#[derive(Debug, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub chroma_url: String,

    #[serde(default)]
    pub tenant: String,

    #[serde(default)]
    pub database: String,

    #[serde(default)]
    pub collection: String,

    #[serde(default)]
    pub embedding_model: String,

    #[serde(default = "default_embedding_dims")]
    pub embedding_dims: usize,

    #[serde(default)]
    pub model_cache: Option<PathBuf>,

    #[serde(default = "default_search_limit")]
    pub search_limit: usize,

    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_embedding_dims() -> usize {
    EMBEDDING_DIMS
}

fn default_search_limit() -> usize {
    DEFAULT_SEARCH_LIMIT
}

fn default_request_timeout_secs() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

/// Default config file location: `<config dir>/memoria/config.toml`.
fn default_config_path() -> PathBuf {
    let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
    let config_dir = dirs::config_dir().unwrap_or_else(|| home.join(".config"));
    config_dir.join("memoria/config.toml")
}

/// Load configuration from TOML file.
///
/// `MEMORIA_CONFIG` names an explicit file, which must exist. Otherwise the
/// default location is used if present.
pub fn load_from_file() -> Result<Option<ConfigFile>, Error> {
    if let Ok(val) = std::env::var("MEMORIA_CONFIG") {
        if val.trim().is_empty() {
            return Err(Error::Config("MEMORIA_CONFIG cannot be empty".into()));
        }
        let path = paths::expand_tilde_path(Path::new(&val));
        return load_from_path(&path).map(Some);
    }

    let config_path = default_config_path();
    if config_path.exists() {
        load_from_path(&config_path).map(Some)
    } else {
        Ok(None)
    }
}

/// Load and parse the TOML file at `path`.
pub fn load_from_path(path: &Path) -> Result<ConfigFile, Error> {
    if !path.exists() {
        return Err(Error::FileNotFound(path.to_path_buf()));
    }

    let content = std::fs::read_to_string(path).map_err(|e| {
        Error::Config(format!("Failed to read config file {}: {e}", path.display()))
    })?;

    toml::from_str(&content).map_err(|e| {
        Error::Config(format!("Failed to parse config file {}: {e}", path.display()))
    })
}
