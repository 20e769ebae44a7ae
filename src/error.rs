use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DdosintError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("API error{}: {message}", .status.map(|s| format!(" (HTTP {})", s)).unwrap_or_default())]
    ApiError {
        status: Option<u16>,
        message: String,
    },

    #[error("Export error: {path:?} - {message}")]
    ExportError {
        path: PathBuf,
        message: String,
    },

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("{0}")]
    NoData(String),
}

impl DdosintError {
    /// Build an `ApiError` for a payload problem that carries no HTTP status
    pub fn payload(message: impl Into<String>) -> Self {
        DdosintError::ApiError {
            status: None,
            message: message.into(),
        }
    }

    /// Line the binary prints when a command fails
    ///
    /// An empty result is an outcome rather than a fault, so it has no prefix.
    pub fn report(&self) -> String {
        match self {
            DdosintError::NoData(message) => message.clone(),
            other => format!("Error: {}", other),
        }
    }

    /// HTTP status attached to an API error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            DdosintError::ApiError { status, .. } => *status,
            _ => None,
        }
    }
}

impl From<reqwest::Error> for DdosintError {
    fn from(error: reqwest::Error) -> Self {
        DdosintError::ConnectionError(error.to_string())
    }
}

impl From<serde_json::Error> for DdosintError {
    fn from(error: serde_json::Error) -> Self {
        DdosintError::payload(format!("Invalid JSON response: {}", error))
    }
}

pub type DdosintResult<T> = std::result::Result<T, DdosintError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_message_includes_status() {
        let err = DdosintError::ApiError {
            status: Some(503),
            message: "maintenance".to_string(),
        };
        assert_eq!(err.to_string(), "API error (HTTP 503): maintenance");
        assert_eq!(err.status(), Some(503));

        let err = DdosintError::payload("bad shape");
        assert_eq!(err.to_string(), "API error: bad shape");
        assert_eq!(err.status(), None);
    }

    #[test]
    fn test_json_error_maps_to_api_error() {
        let parse_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: DdosintError = parse_err.into();
        assert!(matches!(err, DdosintError::ApiError { status: None, .. }));
    }

    #[test]
    fn test_report_line() {
        let err = DdosintError::NoData("No targets found for date 2024-01-15".to_string());
        assert_eq!(err.report(), "No targets found for date 2024-01-15");

        let err = DdosintError::ConnectionError("refused".to_string());
        assert_eq!(err.report(), "Error: Connection error: refused");
    }
}
