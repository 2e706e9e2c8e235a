use serde::Deserialize;

use crate::query::{DEFAULT_PAGE_SIZE, ResolverOptions};

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub upstream: UpstreamConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpstreamConfig {
    /// Root of the monitoring API, e.g. `https://example.com/api`.
    pub base_url: String,
    /// Cards per content page.
    #[serde(default = "default_content_page_size")]
    pub content_page_size: u32,
    /// Forward time/tier/language to the content listing. Only enable once the upstream
    /// is confirmed to filter contents.
    #[serde(default)]
    pub forward_content_filters: bool,
}

fn default_content_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

const MAX_CONTENT_PAGE_SIZE: u32 = 100;

impl UpstreamConfig {
    pub fn resolver_options(&self) -> ResolverOptions {
        ResolverOptions {
            page_size: self.content_page_size,
            forward_content_filters: self.forward_content_filters,
        }
    }
}

impl AppConfig {
    pub fn load() -> anyhow::Result<Self> {
        let path = std::env::var("CONFIG_FILE").unwrap_or_else(|_| "config.toml".into());
        let s = std::fs::read_to_string(&path)
            .map_err(|e| anyhow::anyhow!("reading config {}: {}", path, e))?;
        Self::load_from_str(&s)
    }

    /// Parse and validate config from a string (e.g. for tests).
    pub fn load_from_str(s: &str) -> anyhow::Result<Self> {
        let config: AppConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.server.port > 0,
            "server.port must be between 1 and 65535, got {}",
            self.server.port
        );
        anyhow::ensure!(!self.server.host.is_empty(), "server.host must be non-empty");
        let base = self.upstream.base_url.trim();
        anyhow::ensure!(
            base.starts_with("http://") || base.starts_with("https://"),
            "upstream.base_url must be an http(s) URL, got {:?}",
            self.upstream.base_url
        );
        anyhow::ensure!(
            (1..=MAX_CONTENT_PAGE_SIZE).contains(&self.upstream.content_page_size),
            "upstream.content_page_size must be between 1 and {}, got {}",
            MAX_CONTENT_PAGE_SIZE,
            self.upstream.content_page_size
        );
        Ok(())
    }
}
