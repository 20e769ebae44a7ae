use async_trait::async_trait;
use url::Url;

use crate::error::DdosintResult;

/// Raw HTTP response handed back by a transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self { status, body: body.into() }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Something that can perform a single HTTP GET
///
/// Network and connection failures must surface as `ConnectionError`;
/// every response that arrives, whatever its status, is returned as `Ok`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, url: &Url) -> DdosintResult<RawResponse>;
}
