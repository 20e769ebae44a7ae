use std::path::PathBuf;

use crate::api::{QueryResult, Scalar, Target};
use crate::error::{DdosintError, DdosintResult};
use crate::export::format::{ExportFormat, ExportRenderer};

/// CSV renderer: one row per target, fixed column order
pub struct CsvRenderer;

impl CsvRenderer {
    pub fn new() -> Self {
        Self
    }
}

fn csv_error(e: impl std::fmt::Display) -> DdosintError {
    DdosintError::ExportError {
        path: PathBuf::from("<csv>"),
        message: format!("Failed to encode CSV: {}", e),
    }
}

impl ExportRenderer for CsvRenderer {
    fn render(&self, result: &QueryResult) -> DdosintResult<String> {
        let mut wtr = ::csv::Writer::from_writer(Vec::new());
        wtr.write_record(Target::COLUMNS).map_err(csv_error)?;

        // Absent and null fields are both empty cells
        for target in result.targets() {
            let cells = target.values().map(|v| v.map(Scalar::to_string).unwrap_or_default());
            wtr.write_record(&cells).map_err(csv_error)?;
        }

        let bytes = wtr.into_inner().map_err(csv_error)?;
        String::from_utf8(bytes).map_err(csv_error)
    }

    fn supported_format(&self) -> ExportFormat {
        ExportFormat::Csv
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn target(host: &str) -> Target {
        Target {
            target_id: Some(Scalar::from(1)),
            request_id: Some(Scalar::from("r-1")),
            host: Some(Scalar::from(host)),
            ip: Some(Scalar::from("192.0.2.1")),
            target_type: Some(Scalar::from("http")),
            method: Some(Scalar::from("GET")),
            port: Some(Scalar::from(443)),
            use_ssl: Some(Scalar::from(1)),
            path: Some(Scalar::Null),
            detected_at: Some(Scalar::from("2024-01-15 10:00:00")),
            imported_at: Some(Scalar::from("2024-01-15 10:05:00")),
            ..Default::default()
        }
    }

    #[test]
    fn test_header_and_one_row_per_target() {
        let result = QueryResult::from_targets(vec![target("a.example"), target("b.example"), target("c.example")]);
        let csv = CsvRenderer::new().render(&result).unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines.len(), 4);
        assert_eq!(
            lines[0],
            "target_id,request_id,host,ip,type,method,port,use_ssl,path,detected_at,imported_at"
        );
        assert_eq!(
            lines[1],
            "1,r-1,a.example,192.0.2.1,http,GET,443,1,,2024-01-15 10:00:00,2024-01-15 10:05:00"
        );
    }

    #[test]
    fn test_empty_targets_yield_header_only() {
        let csv = CsvRenderer::new().render(&QueryResult::default()).unwrap();
        assert_eq!(csv.lines().count(), 1);
    }

    #[test]
    fn test_fields_with_commas_are_quoted() {
        let mut t = target("a.example");
        t.path = Some(Scalar::from("/search?q=a,b"));
        let csv = CsvRenderer::new().render(&QueryResult::from_targets(vec![t])).unwrap();

        assert!(csv.contains("\"/search?q=a,b\""));
        assert_eq!(csv.lines().count(), 2);
    }

    #[test]
    fn test_cells_keep_wire_text() {
        let result: QueryResult = serde_json::from_value(json!({
            "targets": [{"target_id": 3, "host": "a.example", "port": 1.0, "path": ["/a", "/b"], "country": "IT"}]
        })).unwrap();
        let csv = CsvRenderer::new().render(&result).unwrap();
        let row = csv.lines().nth(1).unwrap();

        assert_eq!(row, r#"3,,a.example,,,,1.0,,"[""/a"",""/b""]",,"#);
    }
}
