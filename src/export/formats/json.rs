use std::path::PathBuf;

use crate::api::QueryResult;
use crate::error::{DdosintError, DdosintResult};
use crate::export::format::{ExportFormat, ExportRenderer};

/// JSON renderer: the full envelope, pretty-printed
pub struct JsonRenderer;

impl JsonRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl ExportRenderer for JsonRenderer {
    fn render(&self, result: &QueryResult) -> DdosintResult<String> {
        let mut json = serde_json::to_string_pretty(result)
            .map_err(|e| DdosintError::ExportError {
                path: PathBuf::from("<json>"),
                message: format!("Failed to serialize: {}", e),
            })?;
        json.push('\n');
        Ok(json)
    }

    fn supported_format(&self) -> ExportFormat {
        ExportFormat::Json
    }
}
