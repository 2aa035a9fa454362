//! `master-builder.toml` settings

use anyhow::{Context, Result};
use mb_client::ClientConfig;
use mb_io::ExportFormat;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Config file picked up from the working directory when `--config` is absent
pub const DEFAULT_CONFIG_FILE: &str = "master-builder.toml";

/// Log filter used when neither `RUST_LOG` nor the config sets one
pub const DEFAULT_LOG_FILTER: &str = "warn";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportSettings {
    pub default_format: ExportFormat,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            default_format: ExportFormat::Json,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    pub filter: String,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

/// Everything the CLI reads from its config file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    pub api: ClientConfig,
    pub export: ExportSettings,
    pub log: LogSettings,
}

impl CliConfig {
    /// # Errors
    /// Malformed TOML
    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).context("invalid configuration")
    }

    /// Load `path`, else [`DEFAULT_CONFIG_FILE`] when present, else defaults;
    /// `MB_API_BASE` is applied last
    ///
    /// # Errors
    /// An explicit path that cannot be read, or a file that does not parse
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) => Self::read(path)?,
            None if Path::new(DEFAULT_CONFIG_FILE).is_file() => Self::read(Path::new(DEFAULT_CONFIG_FILE))?,
            None => Self::default(),
        };
        Ok(config.with_env_overrides())
    }

    fn read(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        Self::from_toml(&text).with_context(|| format!("in {}", path.display()))
    }

    #[must_use]
    pub fn with_env_overrides(mut self) -> Self {
        self.api = self.api.with_env_overrides();
        self
    }
}
