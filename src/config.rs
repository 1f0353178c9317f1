use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ViewfinderConfig {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub embedding: EmbeddingConfig,
    pub search: SearchConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: String,
    pub log_level: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct StorageConfig {
    pub db_path: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct EmbeddingConfig {
    pub provider: String,
    pub model: String,
    pub base_url: String,
    pub api_key: Option<String>,
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct SearchConfig {
    pub default_limit: usize,
    pub max_limit: usize,
    pub min_similarity: f64,
    pub candidate_multiplier: usize,
}

impl Default for ViewfinderConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            storage: StorageConfig::default(),
            embedding: EmbeddingConfig::default(),
            search: SearchConfig::default(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:5000".into(),
            log_level: "info".into(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        let db_path = default_viewfinder_dir()
            .join("photos.db")
            .to_string_lossy()
            .into_owned();
        Self { db_path }
    }
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: "voyage".into(),
            model: "voyage-multimodal-3".into(),
            base_url: "https://api.voyageai.com/v1".into(),
            api_key: None,
            timeout_secs: 30,
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_limit: 20,
            max_limit: 100,
            min_similarity: 0.1,
            candidate_multiplier: 3,
        }
    }
}

/// Returns `~/.viewfinder/`
pub fn default_viewfinder_dir() -> PathBuf {
    dirs::home_dir()
        .expect("home directory must exist")
        .join(".viewfinder")
}

/// Returns the default config file path: `~/.viewfinder/config.toml`
pub fn default_config_path() -> PathBuf {
    default_viewfinder_dir().join("config.toml")
}

impl ViewfinderConfig {
    /// Load config from TOML file (if it exists) then apply env var overrides.
    pub fn load() -> Result<Self> {
        Self::load_from(default_config_path())
    }

    /// Load from a specific path, then apply env var overrides.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut config = if path.exists() {
            let contents =
                std::fs::read_to_string(path).context("failed to read config file")?;
            toml::from_str(&contents).context("failed to parse config TOML")?
        } else {
            info!("no config file at {}, using defaults", path.display());
            ViewfinderConfig::default()
        };

        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply environment variable overrides (VIEWFINDER_DB, VIEWFINDER_ADDR,
    /// VIEWFINDER_LOG_LEVEL, VOYAGE_API_KEY).
    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("VIEWFINDER_DB") {
            self.storage.db_path = val;
        }
        if let Ok(val) = std::env::var("VIEWFINDER_ADDR") {
            self.server.bind_addr = val;
        }
        if let Ok(val) = std::env::var("VIEWFINDER_LOG_LEVEL") {
            self.server.log_level = val;
        }
        if let Ok(val) = std::env::var("VOYAGE_API_KEY") {
            if !val.is_empty() {
                self.embedding.api_key = Some(val);
            }
        }
    }

    /// Resolve the database path, expanding `~` if needed.
    pub fn resolved_db_path(&self) -> PathBuf {
        expand_tilde(&self.storage.db_path)
    }
}

pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        dirs::home_dir()
            .expect("home directory must exist")
            .join(rest)
    } else {
        PathBuf::from(path)
    }
}
