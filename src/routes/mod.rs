// HTTP + WebSocket routes

mod http;
mod proxy;
mod ws;

use axum::{Router, routing::get};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::config::AppConfig;
use crate::upstream::UpstreamClient;

pub use proxy::ProxyError;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) upstream: Arc<UpstreamClient>,
    pub(crate) config: AppConfig,
}

pub fn app(upstream: Arc<UpstreamClient>, config: AppConfig) -> Router {
    let state = AppState { upstream, config };
    Router::new()
        .route("/", get(|| async { "seeding-monitor: metrics proxy is up" })) // GET /
        .route("/version", get(http::version_handler)) // GET /version
        .route("/api/dashboard", get(http::dashboard_handler)) // GET /api/dashboard
        .route("/api/plan", get(http::plan_handler)) // GET /api/plan
        .route("/api/metrics", get(proxy::metrics_total)) // GET /api/metrics
        .route("/api/metrics/daily", get(proxy::metrics_daily)) // GET /api/metrics/daily
        .route("/api/metrics/hourly", get(proxy::metrics_hourly)) // GET /api/metrics/hourly
        .route("/api/metrics/daily/tier", get(proxy::tier_daily)) // GET /api/metrics/daily/tier
        .route("/api/metrics/hourly/tier", get(proxy::tier_hourly)) // GET /api/metrics/hourly/tier
        .route("/api/contents", get(proxy::contents)) // GET /api/contents
        .route("/ws/dashboard", get(ws::ws_dashboard)) // WS /ws/dashboard
        .layer(CorsLayer::new().allow_origin(Any))
        .with_state(state)
}
