// WebSocket dashboard stream: client sends filters, server pushes views as series resolve

use axum::{
    extract::{
        Query, State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use bytes::Bytes;
use serde_json::Value;
use tokio::time::{Duration, Instant, timeout};

use super::AppState;
use crate::models::{FilterAction, FilterQuery, FilterState};
use crate::orchestrator::DashboardSession;

pub(super) const WS_PING_INTERVAL: Duration = Duration::from_secs(30);
pub(super) const WS_SEND_TIMEOUT: Duration = Duration::from_secs(10);

/// A text frame from the client: either a single action or a full filter query.
#[derive(Debug)]
enum ClientMessage {
    Action(FilterAction),
    Filter(FilterQuery),
}

impl ClientMessage {
    /// Frames carrying an `action` key are actions only; a bad action is an error,
    /// never an empty filter query.
    fn parse(text: &str) -> serde_json::Result<Self> {
        let value: Value = serde_json::from_str(text)?;
        if value.get("action").is_some() {
            serde_json::from_value(value).map(ClientMessage::Action)
        } else {
            serde_json::from_value(value).map(ClientMessage::Filter)
        }
    }
}

pub(super) async fn ws_dashboard(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
    Query(query): Query<FilterQuery>,
) -> impl IntoResponse {
    let initial = FilterState::from_query(&query);
    ws.on_upgrade(move |socket| async move {
        if let Err(e) = stream_dashboard(socket, state, initial).await {
            tracing::info!("Dashboard stream error: {}", e);
        }
    })
}

async fn stream_dashboard(
    mut socket: WebSocket,
    state: AppState,
    initial: FilterState,
) -> anyhow::Result<()> {
    tracing::info!(query = %initial.to_query_string(), "Client connected to dashboard stream");
    let session = DashboardSession::new(
        state.upstream.clone(),
        state.config.upstream.resolver_options(),
    );
    let mut updates = session.subscribe();
    // Calls keep running detached; their results arrive through `updates`.
    drop(session.apply_filter(initial));

    // First ping after one full interval, not immediately.
    let mut ping_interval =
        tokio::time::interval_at(Instant::now() + WS_PING_INTERVAL, WS_PING_INTERVAL);
    ping_interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
    loop {
        tokio::select! {
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let json = serde_json::to_string(&updates.borrow_and_update().view)?;
                let r = timeout(WS_SEND_TIMEOUT, socket.send(Message::Text(json.into()))).await;
                if r.is_err() || r.unwrap_or(Ok(())).is_err() {
                    break;
                }
            }
            incoming = socket.recv() => {
                match incoming {
                    Some(Ok(Message::Text(text))) => {
                        match ClientMessage::parse(text.as_str()) {
                            Ok(ClientMessage::Action(action)) => drop(session.dispatch(action)),
                            Ok(ClientMessage::Filter(query)) => {
                                drop(session.apply_filter(FilterState::from_query(&query)))
                            }
                            Err(e) => tracing::debug!(error = %e, "ignoring malformed dashboard message"),
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        tracing::debug!(error = %e, "dashboard socket receive failed");
                        break;
                    }
                }
            }
            _ = ping_interval.tick() => {
                let r = timeout(WS_SEND_TIMEOUT, socket.send(Message::Ping(Bytes::new()))).await;
                if r.is_err() || r.unwrap_or(Ok(())).is_err() {
                    break;
                }
            }
        }
    }
    tracing::info!("Client disconnected from dashboard stream");
    Ok(())
}
