use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Deserialize};

use crate::api::QueryResult;
use crate::error::{DdosintError, DdosintResult};

/// Export format enum
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Json,
    Csv,
}

/// Renders a query result into the text of one export format
pub trait ExportRenderer: Send + Sync {
    /// Render the result as a complete document
    fn render(&self, result: &QueryResult) -> DdosintResult<String>;

    /// Get the supported format
    fn supported_format(&self) -> ExportFormat;
}

impl ExportFormat {
    /// File extension for the format
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = DdosintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "csv" => Ok(ExportFormat::Csv),
            other => Err(DdosintError::InvalidInput(
                format!("Unsupported format: {}. Use 'json' or 'csv'", other)
            )),
        }
    }
}
