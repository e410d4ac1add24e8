//! Search request transport.

use crate::error::{WidgetError, WidgetResult};
use async_trait::async_trait;
use linkfield_api::{SearchRequest, SearchResponse};
use std::time::Duration;
use tracing::debug;

/// Sends one search request and returns the server's envelope.
#[async_trait]
pub trait SearchTransport: Send + Sync {
    async fn search(&self, request: &SearchRequest) -> WidgetResult<SearchResponse>;
}

/// `POST {base_url}/search` over HTTP.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    pub fn new(base_url: &str, timeout: Duration) -> WidgetResult<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn endpoint(&self) -> String {
        format!("{}/search", self.base_url)
    }
}

#[async_trait]
impl SearchTransport for HttpTransport {
    async fn search(&self, request: &SearchRequest) -> WidgetResult<SearchResponse> {
        let response = self
            .client
            .post(self.endpoint())
            .json(request)
            .send()
            .await?;

        // Rejections and store failures still carry the envelope.
        let status = response.status();
        let text = response.text().await?;
        debug!(status = status.as_u16(), "Search response received");
        serde_json::from_str::<SearchResponse>(&text).map_err(|_| {
            WidgetError::InvalidResponse(format!("HTTP {}: {}", status.as_u16(), text))
        })
    }
}
