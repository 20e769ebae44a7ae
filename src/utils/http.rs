// src/utils/http.rs
use std::time::Duration;
use async_trait::async_trait;
use reqwest::{Client, header};
use tracing::{debug, trace};
use url::Url;

use crate::api::transport::{RawResponse, Transport};
use crate::config::ApiConfig;
use crate::error::{DdosintError, DdosintResult};

/// HTTP client for making requests
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    user_agent: String,
}

impl HttpClient {
    /// Create a new HTTP client
    pub fn new(user_agent: Option<String>, timeout_secs: Option<u64>) -> DdosintResult<Self> {
        let user_agent = user_agent.unwrap_or_else(|| format!("ddosint/{}", env!("CARGO_PKG_VERSION")));
        let timeout = Duration::from_secs(timeout_secs.unwrap_or(30));

        let mut headers = header::HeaderMap::new();
        headers.insert(header::ACCEPT, header::HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .timeout(timeout)
            .user_agent(&user_agent)
            .default_headers(headers)
            .build()
            .map_err(|e| DdosintError::ConnectionError(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, user_agent })
    }

    /// Create a client from the `[api]` configuration section
    pub fn from_config(config: &ApiConfig) -> DdosintResult<Self> {
        Self::new(Some(config.user_agent()), Some(config.timeout_secs))
    }

    /// Get the user agent
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }
}

#[async_trait]
impl Transport for HttpClient {
    async fn get(&self, url: &Url) -> DdosintResult<RawResponse> {
        debug!("GET {}", url);

        let response = self.client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| DdosintError::ConnectionError(format!("Failed to connect to API: {}", e)))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| DdosintError::ConnectionError(format!("Failed to read response body: {}", e)))?;

        trace!("{} returned HTTP {} ({} bytes)", url, status, body.len());

        Ok(RawResponse { status, body })
    }
}
