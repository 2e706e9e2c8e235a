// GET handlers: version, dashboard view, query plan

use axum::{
    extract::{Query, State},
    response::IntoResponse,
};

use super::AppState;
use crate::models::{FilterQuery, FilterState};
use crate::orchestrator;
use crate::query;
use crate::version::{NAME, VERSION};

/// GET /version: returns service name and version (from Cargo.toml at build time).
pub(super) async fn version_handler() -> impl IntoResponse {
    axum::Json(serde_json::json!({
        "name": NAME,
        "version": VERSION,
    }))
}

/// GET /api/dashboard?time&language&tier&page: every series fetched concurrently and
/// normalized. Always 200; failures are reported per series.
pub(super) async fn dashboard_handler(
    State(state): State<AppState>,
    Query(params): Query<FilterQuery>,
) -> impl IntoResponse {
    let filter = FilterState::from_query(&params);
    let plan = query::resolve(&filter, &state.config.upstream.resolver_options());
    let view = orchestrator::load(state.upstream.as_ref(), filter, &plan).await;
    if let Some(err) = &view.page_error {
        tracing::warn!(query = %view.query, error = %err, "dashboard summary unavailable");
    }
    axum::Json(view)
}

/// GET /api/plan: the upstream calls a filter resolves to, without issuing them.
pub(super) async fn plan_handler(
    State(state): State<AppState>,
    Query(params): Query<FilterQuery>,
) -> impl IntoResponse {
    let filter = FilterState::from_query(&params);
    axum::Json(query::resolve(&filter, &state.config.upstream.resolver_options()))
}
