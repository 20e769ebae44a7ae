use serde::{Serialize, Deserialize};
use std::path::PathBuf;

pub const DEFAULT_BASE_URL: &str = "https://ddosia.rfeed.it";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    pub api: ApiConfig,
    pub export: ExportConfig,
}

/// Remote monitor settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
}

/// File export settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExportConfig {
    pub output_dir: PathBuf,
    pub prefix: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api: ApiConfig {
                base_url: DEFAULT_BASE_URL.to_string(),
                timeout_secs: DEFAULT_TIMEOUT_SECS,
                user_agent: None,
            },
            export: ExportConfig {
                output_dir: PathBuf::from("."),
                prefix: "targets".to_string(),
            },
        }
    }
}

impl ApiConfig {
    /// User agent sent with every request
    pub fn user_agent(&self) -> String {
        self.user_agent
            .clone()
            .filter(|ua| !ua.trim().is_empty())
            .unwrap_or_else(|| format!("ddosint/{}", env!("CARGO_PKG_VERSION")))
    }
}
