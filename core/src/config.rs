//! Query defaults loaded from `strata.toml`.

use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = "strata.toml";

/// Defaults applied to every query built from a shared context.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Forward elevated access to every remote call.
    pub use_master_key: bool,
    /// Page size when `paginate` is called without one.
    pub per_page: usize,
    /// Request parameter holding the current page.
    pub page_name: String,
    /// Monotonic column `chunk` walks by.
    pub chunk_column: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            use_master_key: false,
            per_page: 15,
            page_name: "page".to_owned(),
            chunk_column: "objectId".to_owned(),
        }
    }
}

impl Config {
    /// Load from the default config file
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(Path::new(CONFIG_FILE))
    }

    /// Load from a specific path
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ConfigError::NotFound(path.into())
            } else {
                ConfigError::Io(path.into(), e)
            }
        })?;

        let config: Self =
            toml::from_str(&content).map_err(|e| ConfigError::Parse(path.into(), e))?;

        config.validate()?;
        Ok(config)
    }

    /// Parse from TOML text without touching the filesystem
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)
            .map_err(|e| ConfigError::Parse(PathBuf::from("<inline>"), e))?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let err = |msg: &str| ConfigError::Invalid(msg.into());

        if self.per_page == 0 {
            return Err(err("per_page must be at least 1"));
        }
        if self.page_name.trim().is_empty() {
            return Err(err("page_name must not be empty"));
        }
        if self.chunk_column.trim().is_empty() {
            return Err(err("chunk_column must not be empty"));
        }

        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("failed to read {}: {}", .0.display(), .1)]
    Io(PathBuf, #[source] std::io::Error),

    #[error("failed to parse {}: {}", .0.display(), .1)]
    Parse(PathBuf, #[source] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}
