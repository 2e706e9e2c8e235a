// Upstream metrics API client (the only network boundary)

use std::future::Future;

use serde_json::Value;
use tracing::instrument;

use crate::error::NetworkError;
use crate::query::Endpoint;
use crate::version::{NAME, VERSION};

/// Source of raw upstream JSON. Implemented by [`UpstreamClient`]; tests plug in fakes.
pub trait MetricsSource: Send + Sync + 'static {
    fn fetch(
        &self,
        endpoint: Endpoint,
        query: Vec<(&'static str, String)>,
    ) -> impl Future<Output = Result<Value, NetworkError>> + Send;
}

pub struct UpstreamClient {
    http: reqwest::Client,
    base_url: String,
}

impl UpstreamClient {
    pub fn new(base_url: &str) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(format!("{}/{}", NAME, VERSION))
            .build()?;
        Ok(Self::with_client(http, base_url))
    }

    /// Reuse an existing connection pool.
    pub fn with_client(http: reqwest::Client, base_url: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url_for(&self, endpoint: Endpoint) -> String {
        format!("{}{}", self.base_url, endpoint.path())
    }
}

impl MetricsSource for UpstreamClient {
    #[instrument(skip(self, query), fields(repo = "upstream", path = endpoint.path()))]
    async fn fetch(
        &self,
        endpoint: Endpoint,
        query: Vec<(&'static str, String)>,
    ) -> Result<Value, NetworkError> {
        let url = self.url_for(endpoint);
        let response = self.http.get(&url).query(&query).send().await?;
        let status = response.status();
        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), %url, "upstream call failed");
            return Err(NetworkError::Status {
                status: status.as_u16(),
            });
        }
        let body = response.json::<Value>().await?;
        tracing::debug!(status = status.as_u16(), "upstream call ok");
        Ok(body)
    }
}
