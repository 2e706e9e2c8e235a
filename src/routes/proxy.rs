// Thin proxy endpoints: forward the browser's query to the upstream and relay its JSON

use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use super::AppState;
use crate::error::NetworkError;
use crate::models::{Language, Tier};
use crate::query::Endpoint;
use crate::upstream::MetricsSource;

#[derive(Debug, Error)]
pub enum ProxyError {
    #[error("invalid query parameter {name}: {value:?}")]
    InvalidParameter { name: &'static str, value: String },

    #[error(transparent)]
    Upstream(#[from] NetworkError),
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let status = match &self {
            ProxyError::InvalidParameter { .. } => StatusCode::BAD_REQUEST,
            ProxyError::Upstream(e) => {
                tracing::error!(error = %e, upstream_status = ?e.status(), "proxy request failed");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        (status, Json(serde_json::json!({ "error": self.to_string() }))).into_response()
    }
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct ProxyQuery {
    days: Option<String>,
    hours: Option<String>,
    tier: Option<String>,
    language: Option<String>,
    page: Option<String>,
    size: Option<String>,
}

const HOURLY_WINDOWS: [u32; 3] = [24, 48, 72];

impl ProxyQuery {
    /// `hours` wins only when it names one of the hourly windows.
    fn is_hourly(&self) -> bool {
        present(self.hours.as_deref())
            .and_then(|h| h.parse::<u32>().ok())
            .is_some_and(|h| HOURLY_WINDOWS.contains(&h))
    }
}

/// Outgoing query. Empty and `ALL` values are dropped; the rest are validated.
#[derive(Debug, Default)]
struct Forward(Vec<(&'static str, String)>);

impl Forward {
    fn number(mut self, name: &'static str, raw: Option<&str>) -> Result<Self, ProxyError> {
        if let Some(v) = present(raw) {
            let n: u32 = v.parse().map_err(|_| invalid(name, v))?;
            self.0.push((name, n.to_string()));
        }
        Ok(self)
    }

    /// Exactly one of `hours`/`days`, never both.
    fn window(self, q: &ProxyQuery) -> Result<Self, ProxyError> {
        if q.is_hourly() {
            self.number("hours", q.hours.as_deref())
        } else {
            self.number("days", q.days.as_deref())
        }
    }

    fn tier(mut self, raw: Option<&str>) -> Result<Self, ProxyError> {
        if let Some(v) = present(raw) {
            let tier = Tier::parse(v).ok_or_else(|| invalid("tier", v))?;
            self.0.push(("tier", tier.token().to_string()));
        }
        Ok(self)
    }

    fn language(mut self, raw: Option<&str>) -> Result<Self, ProxyError> {
        if let Some(v) = present(raw) {
            let language = Language::parse(v).ok_or_else(|| invalid("language", v))?;
            self.0.push(("language", language.token().to_string()));
        }
        Ok(self)
    }
}

fn present(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim)
        .filter(|v| !v.is_empty() && !v.eq_ignore_ascii_case("ALL"))
}

fn invalid(name: &'static str, value: &str) -> ProxyError {
    ProxyError::InvalidParameter {
        name,
        value: value.to_string(),
    }
}

async fn relay(
    state: &AppState,
    endpoint: Endpoint,
    forward: Forward,
) -> Result<Json<Value>, ProxyError> {
    let body = state.upstream.fetch(endpoint, forward.0).await?;
    Ok(Json(body))
}

/// GET /api/metrics: hourly total when `hours` is 24/48/72, daily total otherwise.
pub(super) async fn metrics_total(
    State(state): State<AppState>,
    Query(q): Query<ProxyQuery>,
) -> Result<Json<Value>, ProxyError> {
    let endpoint = if q.is_hourly() {
        Endpoint::HourlyTotal
    } else {
        Endpoint::DailyTotal
    };
    let forward = Forward::default()
        .window(&q)?
        .tier(q.tier.as_deref())?
        .language(q.language.as_deref())?;
    relay(&state, endpoint, forward).await
}

/// GET /api/metrics/daily: daily time series.
pub(super) async fn metrics_daily(
    State(state): State<AppState>,
    Query(q): Query<ProxyQuery>,
) -> Result<Json<Value>, ProxyError> {
    let forward = Forward::default()
        .number("days", q.days.as_deref())?
        .tier(q.tier.as_deref())?
        .language(q.language.as_deref())?;
    relay(&state, Endpoint::DailySeries, forward).await
}

/// GET /api/metrics/hourly: hourly time series.
pub(super) async fn metrics_hourly(
    State(state): State<AppState>,
    Query(q): Query<ProxyQuery>,
) -> Result<Json<Value>, ProxyError> {
    let forward = Forward::default()
        .number("hours", q.hours.as_deref())?
        .tier(q.tier.as_deref())?
        .language(q.language.as_deref())?;
    relay(&state, Endpoint::HourlySeries, forward).await
}

/// GET /api/metrics/daily/tier: all tiers side by side, so `tier` is not forwarded.
pub(super) async fn tier_daily(
    State(state): State<AppState>,
    Query(q): Query<ProxyQuery>,
) -> Result<Json<Value>, ProxyError> {
    let forward = Forward::default()
        .number("days", q.days.as_deref())?
        .language(q.language.as_deref())?;
    relay(&state, Endpoint::DailyTier, forward).await
}

/// GET /api/metrics/hourly/tier
pub(super) async fn tier_hourly(
    State(state): State<AppState>,
    Query(q): Query<ProxyQuery>,
) -> Result<Json<Value>, ProxyError> {
    let forward = Forward::default()
        .number("hours", q.hours.as_deref())?
        .language(q.language.as_deref())?;
    relay(&state, Endpoint::HourlyTier, forward).await
}

/// GET /api/contents: `page` defaults to 0, `size` to the configured page size.
pub(super) async fn contents(
    State(state): State<AppState>,
    Query(q): Query<ProxyQuery>,
) -> Result<Json<Value>, ProxyError> {
    let default_size = state.config.upstream.content_page_size.to_string();
    let mut forward = Forward::default()
        .number("page", Some(q.page.as_deref().unwrap_or("0")))?
        .number("size", Some(q.size.as_deref().unwrap_or(&default_size)))?;
    if state.config.upstream.forward_content_filters {
        forward = forward
            .window(&q)?
            .tier(q.tier.as_deref())?
            .language(q.language.as_deref())?;
    }
    relay(&state, Endpoint::Contents, forward).await
}
