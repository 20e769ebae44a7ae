use std::collections::HashMap;
use std::path::{Path, PathBuf};

use chrono::Local;
use serde::Serialize;
use tracing::{debug, info};

use crate::api::QueryResult;
use crate::error::{DdosintError, DdosintResult};
use super::formats::{ExportFormat, ExportRenderer};
use super::formats::csv::CsvRenderer;
use super::formats::json::JsonRenderer;

/// Writes query results into an output directory
pub struct Exporter {
    renderers: HashMap<ExportFormat, Box<dyn ExportRenderer>>,
    output_dir: PathBuf,
}

impl Exporter {
    /// Create an exporter with the JSON and CSV renderers registered
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        let mut exporter = Self {
            renderers: HashMap::new(),
            output_dir: output_dir.into(),
        };
        exporter.register_renderer(Box::new(JsonRenderer::new()));
        exporter.register_renderer(Box::new(CsvRenderer::new()));
        exporter
    }

    /// Register a renderer under the format it supports
    pub fn register_renderer(&mut self, renderer: Box<dyn ExportRenderer>) {
        let format = renderer.supported_format();
        debug!("Registering renderer for format: {:?}", format);
        self.renderers.insert(format, renderer);
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Render `result` for console display
    pub fn render(&self, result: &QueryResult, format: ExportFormat) -> DdosintResult<String> {
        let renderer = self.renderers.get(&format)
            .ok_or_else(|| DdosintError::InvalidInput(format!("No renderer registered for {}", format)))?;
        renderer.render(result)
    }

    /// Write `result` to `<prefix>_<suffix>.<ext>` and return the file path
    pub async fn export(
        &self,
        result: &QueryResult,
        format: ExportFormat,
        prefix: &str,
        suffix: &str,
    ) -> DdosintResult<PathBuf> {
        let contents = self.render(result, format)?;
        let file_name = file_name(prefix, suffix, format);
        self.write_file(&file_name, contents).await
    }

    /// Write any serializable response as pretty JSON to `<stem>.json`
    pub async fn write_json<T: Serialize>(&self, value: &T, stem: &str) -> DdosintResult<PathBuf> {
        let mut json = serde_json::to_string_pretty(value)
            .map_err(|e| DdosintError::ExportError {
                path: self.output_dir.join(format!("{}.json", stem)),
                message: format!("Failed to serialize: {}", e),
            })?;
        json.push('\n');
        self.write_file(&format!("{}.json", stem), json).await
    }

    async fn write_file(&self, file_name: &str, contents: String) -> DdosintResult<PathBuf> {
        if !self.output_dir.exists() {
            debug!("Creating output directory: {}", self.output_dir.display());
        }
        tokio::fs::create_dir_all(&self.output_dir).await
            .map_err(|e| DdosintError::ExportError {
                path: self.output_dir.clone(),
                message: format!("Failed to create directory: {}", e),
            })?;

        let output_path = self.output_dir.join(file_name);
        tokio::fs::write(&output_path, contents).await
            .map_err(|e| DdosintError::ExportError {
                path: output_path.clone(),
                message: format!("Failed to write file: {}", e),
            })?;

        info!("Exported {}", output_path.display());
        Ok(output_path)
    }
}

/// Deterministic export file name
pub fn file_name(prefix: &str, suffix: &str, format: ExportFormat) -> String {
    format!("{}_{}.{}", prefix, suffix, format.extension())
}

/// Make a value safe to use inside a file name
pub fn sanitize_component(value: &str) -> String {
    value
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect()
}

/// Suffix for an envelope: its date, or today when the service sent none
pub fn date_suffix(result: &QueryResult) -> String {
    result.date_text()
        .as_deref()
        .map(sanitize_component)
        .unwrap_or_else(today)
}

pub fn today() -> String {
    Local::now().format("%Y-%m-%d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{Scalar, Target};
    use serde_json::{json, Value};
    use tempfile::TempDir;

    fn sample_json() -> Value {
        json!({
            "date": "2024-01-15",
            "stats": {
                "total_targets": 2, "total_requests": 5, "unique_hosts": 2,
                "unique_ips": 2, "types": ["http", "tcp"], "methods": ["GET", "SYN"]
            },
            "targets": [
                {
                    "target_id": 1, "request_id": 10, "host": "a.example", "ip": "192.0.2.1",
                    "type": "http", "method": "GET", "port": 443, "use_ssl": 1, "path": "/",
                    "detected_at": "2024-01-15 08:00:00", "imported_at": "2024-01-15 08:01:00"
                },
                {
                    "target_id": 2, "request_id": 11, "host": "b.example", "ip": "192.0.2.2",
                    "type": "tcp", "method": "SYN", "port": 22, "use_ssl": 0, "path": null,
                    "detected_at": "2024-01-15 09:00:00", "imported_at": "2024-01-15 09:01:00"
                }
            ],
            "count": 2
        })
    }

    fn sample() -> QueryResult {
        serde_json::from_value(sample_json()).unwrap()
    }

    async fn export_json(input: &Value) -> Value {
        let dir = TempDir::new().unwrap();
        let exporter = Exporter::new(dir.path());
        let result: QueryResult = serde_json::from_value(input.clone()).unwrap();

        let path = exporter.export(&result, ExportFormat::Json, "targets", "x").await.unwrap();
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap()
    }

    #[tokio::test]
    async fn test_json_export_is_structurally_identical() {
        let dir = TempDir::new().unwrap();
        let exporter = Exporter::new(dir.path().join("out"));

        let path = exporter.export(&sample(), ExportFormat::Json, "targets", "2024-01-15").await.unwrap();

        assert_eq!(path, dir.path().join("out/targets_2024-01-15.json"));
        let written: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written, sample_json());
    }

    #[tokio::test]
    async fn test_json_export_of_partial_records_matches_response() {
        let input = json!({
            "date": "2024-01-15",
            "stats": {"total_targets": 2, "types": null, "methods": ["GET"]},
            "targets": [
                {"host": "a.example", "country": "IT", "port": 443},
                {"host": "b.example", "path": ["/a", "/b"], "use_ssl": null, "weight": 1.0}
            ],
            "count": null,
            "timeline": [{"date": "2024-01-15", "count": 2}]
        });

        assert_eq!(export_json(&input).await, input);
    }

    #[tokio::test]
    async fn test_csv_export_has_header_plus_rows() {
        let dir = TempDir::new().unwrap();
        let exporter = Exporter::new(dir.path());

        let path = exporter.export(&sample(), ExportFormat::Csv, "targets", "2024-01-15").await.unwrap();

        assert_eq!(path.file_name().unwrap(), "targets_2024-01-15.csv");
        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("target_id,request_id,host,ip,type"));
        assert!(lines[2].contains("b.example"));
    }

    #[tokio::test]
    async fn test_unwritable_directory_is_export_error() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("file");
        std::fs::write(&blocker, "not a directory").unwrap();

        let exporter = Exporter::new(blocker.join("sub"));
        let err = exporter.export(&sample(), ExportFormat::Json, "targets", "x").await.unwrap_err();

        assert!(matches!(err, DdosintError::ExportError { .. }));
    }

    #[tokio::test]
    async fn test_write_json_for_arbitrary_values() {
        let dir = TempDir::new().unwrap();
        let exporter = Exporter::new(dir.path());
        let rows = json!([{"year": 2024, "targets": 3}]);

        let path = exporter.write_json(&rows, "stats_by_year").await.unwrap();

        assert_eq!(path.file_name().unwrap(), "stats_by_year.json");
        let written: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written, rows);
    }

    #[test]
    fn test_render_matches_export_contents() {
        let exporter = Exporter::new(".");
        let result = QueryResult::from_targets(vec![
            Target { host: Some(Scalar::from("a.example")), ..Default::default() },
        ]);

        let csv = exporter.render(&result, ExportFormat::Csv).unwrap();
        assert_eq!(csv.lines().count(), 2);

        let json = exporter.render(&result, ExportFormat::Json).unwrap();
        assert!(json.contains("  \"targets\""));
    }

    #[test]
    fn test_file_name_helpers() {
        assert_eq!(file_name("search", &sanitize_component("sub.example.com"), ExportFormat::Csv),
                   "search_sub_example_com.csv");
        assert_eq!(sanitize_component("../etc/passwd"), "___etc_passwd");

        let mut result = sample();
        assert_eq!(date_suffix(&result), "2024-01-15");
        result.date = Some(Scalar::Null);
        assert_eq!(date_suffix(&result), today());
        result.date = None;
        assert_eq!(date_suffix(&result), today());
    }
}
