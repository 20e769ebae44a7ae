use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, info};
use url::Url;

use super::model::{DateEntry, QueryResult, StatKind, StatsReport, Target};
use super::transport::{RawResponse, Transport};
use crate::error::{DdosintError, DdosintResult};

static DATE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("date pattern is valid")
});

/// Number of recent targets requested when no limit is given
pub const DEFAULT_RECENT_LIMIT: usize = 20;

/// Check that `date` is a real calendar day written as `YYYY-MM-DD`
pub fn validate_date(date: &str) -> DdosintResult<NaiveDate> {
    let invalid = || DdosintError::InvalidInput(
        format!("Date must be in YYYY-MM-DD format, got '{}'", date)
    );

    if !DATE_RE.is_match(date) {
        return Err(invalid());
    }

    NaiveDate::parse_from_str(date, "%Y-%m-%d").map_err(|_| invalid())
}

/// Client for the monitor's JSON API
pub struct ApiClient<T: Transport> {
    transport: T,
    api_base: Url,
}

impl<T: Transport> ApiClient<T> {
    /// Create a client rooted at `base_url`; endpoints live under `<base_url>/api/`
    pub fn new(transport: T, base_url: &str) -> DdosintResult<Self> {
        let trimmed = base_url.trim().trim_end_matches('/');
        let base = Url::parse(&format!("{}/", trimmed))
            .map_err(|e| DdosintError::InvalidInput(format!("Invalid base URL '{}': {}", base_url, e)))?;

        if !matches!(base.scheme(), "http" | "https") {
            return Err(DdosintError::InvalidInput(
                format!("Base URL must use http or https, got '{}'", base_url)
            ));
        }

        let api_base = base
            .join("api/")
            .map_err(|e| DdosintError::InvalidInput(format!("Invalid base URL '{}': {}", base_url, e)))?;

        Ok(Self { transport, api_base })
    }

    /// Base of every endpoint URL
    pub fn api_base(&self) -> &Url {
        &self.api_base
    }

    /// All targets detected on `date`
    pub async fn extract_by_date(&self, date: &str) -> DdosintResult<QueryResult> {
        validate_date(date)?;
        info!("Fetching targets for {}", date);
        self.request("targets_by_date.php", &[("date", date.to_string())]).await
    }

    /// Targets whose host matches `host`
    pub async fn search_by_host(&self, host: &str, limit: Option<usize>) -> DdosintResult<QueryResult> {
        if host.trim().is_empty() {
            return Err(DdosintError::InvalidInput("Host must not be empty".to_string()));
        }

        let mut params = vec![("host", host.to_string())];
        if let Some(limit) = limit {
            params.push(("limit", limit.to_string()));
        }
        self.request("search_host.php", &params).await
    }

    /// One of the statistics views; `kind` is validated before any request is made
    pub async fn get_stats(&self, kind: &str) -> DdosintResult<StatsReport> {
        let kind: StatKind = kind.parse()?;
        self.request("stats.php", &[("type", kind.as_str().to_string())]).await
    }

    /// Dates for which the monitor holds data
    pub async fn list_dates(&self, limit: Option<usize>) -> DdosintResult<Vec<DateEntry>> {
        let params: Vec<(&str, String)> = limit
            .map(|l| vec![("limit", l.to_string())])
            .unwrap_or_default();
        self.request("available_dates.php", &params).await
    }

    /// Targets detected over the last two days
    pub async fn recent_targets(&self, limit: Option<usize>) -> DdosintResult<QueryResult> {
        let limit = limit.unwrap_or(DEFAULT_RECENT_LIMIT);
        let value: Value = self
            .request("recent_targets.php", &[("limit", limit.to_string())])
            .await?;

        // Older deployments answer with a bare array instead of an envelope
        if value.is_array() {
            let targets: Vec<Target> = serde_json::from_value(value)?;
            Ok(QueryResult::from_targets(targets))
        } else {
            Ok(serde_json::from_value(value)?)
        }
    }

    /// Build the URL for `endpoint` with the given query parameters
    pub fn endpoint_url(&self, endpoint: &str, params: &[(&str, String)]) -> DdosintResult<Url> {
        let mut url = self.api_base
            .join(endpoint)
            .map_err(|e| DdosintError::InvalidInput(format!("Invalid endpoint '{}': {}", endpoint, e)))?;

        if !params.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in params {
                pairs.append_pair(key, value);
            }
        }

        Ok(url)
    }

    async fn request<R: DeserializeOwned>(&self, endpoint: &str, params: &[(&str, String)]) -> DdosintResult<R> {
        let url = self.endpoint_url(endpoint, params)?;
        let response = self.transport.get(&url).await?;
        debug!("{} -> HTTP {}", endpoint, response.status);

        let value = decode(response)?;
        Ok(serde_json::from_value(value)?)
    }
}

/// Turn a raw response into JSON, mapping HTTP and API-level failures
fn decode(response: RawResponse) -> DdosintResult<Value> {
    if !response.is_success() {
        let message = serde_json::from_str::<Value>(&response.body)
            .ok()
            .and_then(|v| error_field(&v))
            .unwrap_or_else(|| {
                let text = response.body.trim();
                if text.is_empty() {
                    "no response body".to_string()
                } else {
                    text.to_string()
                }
            });

        return Err(DdosintError::ApiError {
            status: Some(response.status),
            message,
        });
    }

    let value: Value = serde_json::from_str(&response.body)?;

    if let Some(message) = error_field(&value) {
        return Err(DdosintError::payload(message));
    }

    Ok(value)
}

fn error_field(value: &Value) -> Option<String> {
    match value.get("error")? {
        Value::String(s) => Some(s.clone()),
        Value::Null => None,
        other => Some(other.to_string()),
    }
}
