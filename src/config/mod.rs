// src/config/mod.rs
mod schema;

use std::path::{Path, PathBuf};
use config::{Config as ConfigLoader, FileFormat};
use tracing::{debug, info, warn};

pub use schema::{Config, ApiConfig, ExportConfig, DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS};

use crate::error::{DdosintResult, DdosintError};

const DEFAULT_CONFIG: &str = include_str!("../../config/default.toml");

/// Centralized configuration handling
impl Config {
    /// Load configuration: built-in defaults, then the user file, then `DDOSINT__*` variables
    pub fn load(config_path: Option<&Path>) -> DdosintResult<Self> {
        let mut config_builder = ConfigLoader::builder();

        // Default configuration
        config_builder = config_builder.add_source(
            config::File::from_str(DEFAULT_CONFIG, FileFormat::Toml)
        );

        // User-provided configuration
        if let Some(path) = config_path {
            if path.exists() {
                config_builder = config_builder.add_source(config::File::from(path));
                info!("Loading user configuration from: {}", path.display());
            } else {
                warn!("Specified configuration file not found: {}", path.display());
            }
        } else {
            let default_path = Self::get_default_config_path();
            if default_path.exists() {
                config_builder = config_builder.add_source(config::File::from(default_path.as_path()));
                info!("Loading default configuration from: {}", default_path.display());
            } else {
                debug!("No existing configuration found, using built-in defaults");
            }
        }

        // Environment variables, e.g. DDOSINT__API__TIMEOUT_SECS
        config_builder = config_builder.add_source(
            config::Environment::with_prefix("DDOSINT")
                .prefix_separator("__")
                .separator("__")
        );

        let config: Config = match config_builder.build() {
            Ok(c) => match c.try_deserialize() {
                Ok(config) => config,
                Err(e) => return Err(DdosintError::ConfigError(format!("Failed to parse configuration: {}", e))),
            },
            Err(e) => return Err(DdosintError::ConfigError(format!("Failed to build configuration: {}", e))),
        };

        Ok(config)
    }

    /// Get the default configuration path
    pub fn get_default_config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".ddosint/config.toml")
    }

    /// Write the default configuration to `path` (or the default location)
    pub fn init(path: Option<&Path>, force: bool) -> DdosintResult<PathBuf> {
        let config_path = path
            .map(Path::to_path_buf)
            .unwrap_or_else(Self::get_default_config_path);

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| DdosintError::ConfigError(
                    format!("Failed to create directory {}: {}", parent.display(), e)
                ))?;
        }

        if config_path.exists() && !force {
            return Err(DdosintError::ConfigError(
                format!("Configuration already exists at {}. Use --force to overwrite.", config_path.display())
            ));
        }

        Config::default().save(&config_path)?;

        Ok(config_path)
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> DdosintResult<()> {
        let config_str = self.to_toml()?;

        std::fs::write(path, config_str)
            .map_err(|e| DdosintError::ConfigError(
                format!("Failed to write configuration to {}: {}", path.display(), e)
            ))?;

        info!("Configuration saved to {}", path.display());

        Ok(())
    }

    /// Render the configuration as TOML
    pub fn to_toml(&self) -> DdosintResult<String> {
        toml::to_string_pretty(self)
            .map_err(|e| DdosintError::ConfigError(format!("Failed to serialize configuration: {}", e)))
    }

    /// Apply command-line overrides on top of the loaded layers
    pub fn with_overrides(mut self, base_url: Option<String>, timeout_secs: Option<u64>) -> Self {
        if let Some(base_url) = base_url {
            self.api.base_url = base_url;
        }
        if let Some(timeout) = timeout_secs {
            self.api.timeout_secs = timeout;
        }
        self
    }
}
