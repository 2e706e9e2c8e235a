// Shared test helpers: canned upstream payloads, a scripted MetricsSource, a local fake upstream

#![allow(dead_code)]

use axum::{
    Json, Router,
    extract::State,
    http::{StatusCode, Uri},
    response::{IntoResponse, Response},
};
use seeding_monitor::error::NetworkError;
use seeding_monitor::query::Endpoint;
use seeding_monitor::upstream::MetricsSource;
use serde_json::{Value, json};
use std::sync::{Arc, Mutex};
use tokio::sync::Semaphore;

pub fn summary_payload() -> Value {
    json!({
        "uploads": 120,
        "prFree": 40,
        "prPaid": 12,
        "viewsAvg": 15321.5,
        "gte10k": 30,
        "gte100k": 6,
        "gte1m": 1,
        "uploadsPercentageChange": 12.5
    })
}

/// Deliberately out of order.
pub fn daily_series_payload() -> Value {
    json!([
        { "date": "2025-07-03", "dailyUploads": 5, "dailyViewsAvg": 900.0 },
        { "date": "2025-07-01", "dailyUploads": 3, "dailyViewsAvg": 1200.0 },
        { "date": "2025-07-02", "dailyUploads": 8 }
    ])
}

pub fn hourly_series_payload() -> Value {
    json!([
        { "hour": "2025-07-01T12:00:00", "hourlyUploads": 2, "hourlyViewsAvg": 50.0 },
        { "hour": "2025-07-01T10:00:00", "hourlyUploads": 1, "hourlyViewsAvg": 10.0 },
        { "hour": "2025-07-01T11:00:00", "hourlyUploads": 4, "hourlyViewsAvg": 30.0 }
    ])
}

pub fn tier_payload() -> Value {
    json!([
        { "tier": "NANO", "uploads": 50, "averageViews": 1000.0 },
        { "tier": "MICRO", "uploads": 30, "averageViews": 5000.0 },
        { "tier": "MID", "uploads": 10 },
        { "tier": "MEGA", "uploads": 2, "averageViews": 250000.0 }
    ])
}

pub fn contents_payload() -> Value {
    json!({
        "content": [
            {
                "contentId": "c-1",
                "influencerHandle": "@glow",
                "caption": "morning routine",
                "url": "https://www.tiktok.com/@glow/video/1",
                "thumbnailUrl": "https://cdn.example.com/1.jpg",
                "views": 154000,
                "likes": 12000,
                "explodedBucket": "100k",
                "createdAt": "2025-07-01T09:00:00Z"
            },
            {
                "contentId": "c-2",
                "url": "https://www.tiktok.com/@skin/video/2",
                "views": 11000
            }
        ],
        "number": 0,
        "size": 9,
        "totalElements": 20,
        "totalPages": 3,
        "first": true,
        "last": false
    })
}

pub fn canned_response(endpoint: Endpoint) -> Value {
    match endpoint {
        Endpoint::DailyTotal | Endpoint::HourlyTotal => summary_payload(),
        Endpoint::DailySeries => daily_series_payload(),
        Endpoint::HourlySeries => hourly_series_payload(),
        Endpoint::DailyTier | Endpoint::HourlyTier => tier_payload(),
        Endpoint::Contents => contents_payload(),
    }
}

pub type Responder =
    dyn Fn(Endpoint, &[(&'static str, String)]) -> Result<Value, NetworkError> + Send + Sync;

/// In-process MetricsSource. Optionally holds calls carrying `key=value` until the gate gets permits.
pub struct ScriptedSource {
    respond: Box<Responder>,
    hold: Option<(&'static str, String, Arc<Semaphore>)>,
    pub calls: Mutex<Vec<(Endpoint, Vec<(&'static str, String)>)>>,
}

impl ScriptedSource {
    pub fn canned() -> Self {
        Self::new(|endpoint, _| Ok(canned_response(endpoint)))
    }

    pub fn new(
        respond: impl Fn(Endpoint, &[(&'static str, String)]) -> Result<Value, NetworkError>
        + Send
        + Sync
        + 'static,
    ) -> Self {
        Self {
            respond: Box::new(respond),
            hold: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn hold(mut self, key: &'static str, value: &str, gate: Arc<Semaphore>) -> Self {
        self.hold = Some((key, value.to_string(), gate));
        self
    }

    pub fn recorded(&self) -> Vec<(Endpoint, Vec<(&'static str, String)>)> {
        self.calls.lock().unwrap().clone()
    }
}

impl MetricsSource for ScriptedSource {
    async fn fetch(
        &self,
        endpoint: Endpoint,
        query: Vec<(&'static str, String)>,
    ) -> Result<Value, NetworkError> {
        self.calls.lock().unwrap().push((endpoint, query.clone()));
        if let Some((key, value, gate)) = &self.hold
            && query.iter().any(|(k, v)| k == key && v == value)
        {
            let _permit = gate.acquire().await.expect("gate closed");
        }
        (self.respond)(endpoint, &query)
    }
}

/// Local HTTP server standing in for the monitoring API. Paths are served under `/api`.
#[derive(Clone, Default)]
pub struct FakeUpstream {
    requests: Arc<Mutex<Vec<(String, String)>>>,
    failing: Arc<Mutex<Vec<String>>>,
}

impl FakeUpstream {
    /// Binds an ephemeral port and returns the base URL (`http://127.0.0.1:port/api`).
    pub async fn spawn(&self) -> String {
        let app = Router::new()
            .fallback(fake_upstream_handler)
            .with_state(self.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}/api", addr)
    }

    /// Make `path` (relative to `/api`) answer 500.
    pub fn fail(&self, path: &str) {
        self.failing.lock().unwrap().push(path.to_string());
    }

    /// `(path, query)` of every request seen so far.
    pub fn requests(&self) -> Vec<(String, String)> {
        self.requests.lock().unwrap().clone()
    }

    pub fn query_for(&self, path: &str) -> Option<String> {
        self.requests()
            .into_iter()
            .rev()
            .find(|(p, _)| p == path)
            .map(|(_, q)| q)
    }
}

async fn fake_upstream_handler(State(fake): State<FakeUpstream>, uri: Uri) -> Response {
    let path = uri.path().trim_start_matches("/api").to_string();
    let query = uri.query().unwrap_or("").to_string();
    fake.requests.lock().unwrap().push((path.clone(), query));
    if fake.failing.lock().unwrap().contains(&path) {
        return (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response();
    }
    let endpoint = match path.as_str() {
        "/metrics/daily/total" => Endpoint::DailyTotal,
        "/metrics/hourly/total" => Endpoint::HourlyTotal,
        "/metrics/daily" => Endpoint::DailySeries,
        "/metrics/hourly" => Endpoint::HourlySeries,
        "/metrics/daily/tier" => Endpoint::DailyTier,
        "/metrics/hourly/tier" => Endpoint::HourlyTier,
        "/contents" => Endpoint::Contents,
        _ => return StatusCode::NOT_FOUND.into_response(),
    };
    Json(canned_response(endpoint)).into_response()
}

pub fn test_config_toml(base_url: &str) -> String {
    format!(
        r#"
[server]
port = 8081
host = "127.0.0.1"

[upstream]
base_url = "{base_url}"
"#
    )
}
