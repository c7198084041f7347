use std::collections::HashSet;
use std::time::Duration;

use reqwest::Client;

use super::SearchBackend;
use crate::config::ServiceConfig;
use crate::error::{Result, VectorWebError};
use crate::model::{ErrorBody, HealthReport, ResultItem, SearchRequest, SearchResponse};

/// Search service reached over HTTP with JSON bodies.
pub struct HttpSearchBackend {
    client: Client,
    base_url: String,
    health_timeout: Duration,
}

impl HttpSearchBackend {
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_health_timeout(base_url, Duration::from_secs(5))
    }

    pub fn with_health_timeout(base_url: &str, health_timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("vectorweb/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| VectorWebError::Config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            health_timeout,
        })
    }

    pub fn from_config(config: &ServiceConfig) -> Result<Self> {
        Self::with_health_timeout(&config.base_url, config.health_timeout())
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

/// Build the user-facing message for a non-success response: the body's
/// `detail` when present, otherwise one derived from the status line.
fn error_message(status: reqwest::StatusCode, body: &str) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.message())
        .unwrap_or_else(|| {
            format!(
                "Backend Error: {}",
                status.canonical_reason().unwrap_or(status.as_str())
            )
        })
}

fn ensure_unique_ids(items: &[ResultItem]) -> Result<()> {
    let mut seen = HashSet::with_capacity(items.len());
    for item in items {
        if !seen.insert(item.id.as_str()) {
            return Err(VectorWebError::Malformed(format!(
                "duplicate result id '{}'",
                item.id
            )));
        }
    }
    Ok(())
}

impl SearchBackend for HttpSearchBackend {
    async fn health(&self) -> Result<HealthReport> {
        let response = self
            .client
            .get(self.url("/health"))
            .timeout(self.health_timeout)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    VectorWebError::Timeout(self.health_timeout)
                } else {
                    VectorWebError::Transport(e.to_string())
                }
            })?;

        // The status field is authoritative, not the HTTP status.
        let body = response.text().await?;
        let report: HealthReport = serde_json::from_str(&body)?;
        Ok(report)
    }

    async fn search(&self, request: &SearchRequest) -> Result<Vec<ResultItem>> {
        let response = self
            .client
            .post(self.url("/search"))
            .json(request)
            .send()
            .await
            .map_err(|e| VectorWebError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(VectorWebError::Service {
                status: status.as_u16(),
                message: error_message(status, &body),
            });
        }

        let body = response.text().await?;
        let parsed: SearchResponse = serde_json::from_str(&body)?;
        ensure_unique_ids(&parsed.results)?;
        Ok(parsed.results)
    }

    fn endpoint(&self) -> &str {
        &self.base_url
    }
}
