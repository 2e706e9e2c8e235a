// Fetch orchestrator: runs a query plan concurrently, one status slot per series.
// Within a series the newest call wins; older responses are discarded by token.

use std::collections::BTreeMap;
use std::sync::Arc;

use futures_util::future::join_all;
use serde::{Serialize, Serializer};
use serde_json::Value;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::display::PageWindow;
use crate::error::{ErrorInfo, NetworkError};
use crate::models::{
    ContentPage, FilterAction, FilterState, Granularity, NormalizedChartPoint,
    NormalizedTierPoint, SummaryCard, SummaryMetrics,
};
use crate::normalize;
use crate::query::{self, DEFAULT_PAGE_SIZE, PlannedCall, QueryPlan, ResolverOptions, SeriesKey};
use crate::upstream::MetricsSource;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SeriesStatus {
    Pending,
    Ready,
    Failed,
}

/// Load state of one series. Serialises as `{status, data, error}`.
#[derive(Debug, Clone, PartialEq)]
pub enum SeriesResult<T> {
    Pending,
    Ready(T),
    Failed(ErrorInfo),
}

impl<T> SeriesResult<T> {
    pub fn status(&self) -> SeriesStatus {
        match self {
            SeriesResult::Pending => SeriesStatus::Pending,
            SeriesResult::Ready(_) => SeriesStatus::Ready,
            SeriesResult::Failed(_) => SeriesStatus::Failed,
        }
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            SeriesResult::Ready(data) => Some(data),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&ErrorInfo> {
        match self {
            SeriesResult::Failed(e) => Some(e),
            _ => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, SeriesResult::Pending)
    }
}

impl<T> From<Result<T, ErrorInfo>> for SeriesResult<T> {
    fn from(r: Result<T, ErrorInfo>) -> Self {
        match r {
            Ok(data) => SeriesResult::Ready(data),
            Err(e) => SeriesResult::Failed(e),
        }
    }
}

impl<T: Serialize> Serialize for SeriesResult<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        struct Wire<'a, T> {
            status: SeriesStatus,
            data: Option<&'a T>,
            error: Option<&'a ErrorInfo>,
        }
        Wire {
            status: self.status(),
            data: self.data(),
            error: self.error(),
        }
        .serialize(serializer)
    }
}

/// Everything the presentation layer needs for one render.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    pub filter: FilterState,
    /// Canonical query string for the current filter (defaults omitted).
    pub query: String,
    pub granularity: Granularity,
    pub summary_metrics: SeriesResult<SummaryMetrics>,
    pub time_series: SeriesResult<Vec<NormalizedChartPoint>>,
    pub tier_breakdown: SeriesResult<Vec<NormalizedTierPoint>>,
    pub content_page: SeriesResult<ContentPage>,
    /// Set when the summary series failed; other failures stay local to their section.
    pub page_error: Option<String>,
    pub cards: Vec<SummaryCard>,
    pub pagination: Option<PageWindow>,
}

impl DashboardView {
    pub fn pending(filter: FilterState) -> Self {
        Self {
            filter,
            query: filter.to_query_string(),
            granularity: filter.granularity(),
            summary_metrics: SeriesResult::Pending,
            time_series: SeriesResult::Pending,
            tier_breakdown: SeriesResult::Pending,
            content_page: SeriesResult::Pending,
            page_error: None,
            cards: Vec::new(),
            pagination: None,
        }
    }

    pub fn status(&self, key: SeriesKey) -> SeriesStatus {
        match key {
            SeriesKey::SummaryMetrics => self.summary_metrics.status(),
            SeriesKey::TimeSeries => self.time_series.status(),
            SeriesKey::TierBreakdown => self.tier_breakdown.status(),
            SeriesKey::ContentPage => self.content_page.status(),
        }
    }

    fn apply(&mut self, outcome: SeriesOutcome) {
        match outcome {
            SeriesOutcome::SummaryMetrics(r) => {
                self.summary_metrics = r.into();
                self.page_error = self.summary_metrics.error().map(|e| e.message.clone());
                self.cards = self
                    .summary_metrics
                    .data()
                    .map(SummaryMetrics::cards)
                    .unwrap_or_default();
            }
            SeriesOutcome::TimeSeries(r) => self.time_series = r.into(),
            SeriesOutcome::TierBreakdown(r) => self.tier_breakdown = r.into(),
            SeriesOutcome::ContentPage(r) => {
                self.content_page = r.into();
                self.pagination = self.content_page.data().map(ContentPage::window);
            }
        }
    }
}

/// Normalized result of one planned call.
#[derive(Debug, Clone)]
pub enum SeriesOutcome {
    SummaryMetrics(Result<SummaryMetrics, ErrorInfo>),
    TimeSeries(Result<Vec<NormalizedChartPoint>, ErrorInfo>),
    TierBreakdown(Result<Vec<NormalizedTierPoint>, ErrorInfo>),
    ContentPage(Result<ContentPage, ErrorInfo>),
}

/// Issues one planned call and normalizes its response. Never fails: errors become the outcome.
pub async fn fetch_series<S: MetricsSource>(
    source: &S,
    key: SeriesKey,
    call: PlannedCall,
    granularity: Granularity,
) -> SeriesOutcome {
    let page = call.params.page.unwrap_or(0);
    let size = call.params.size.unwrap_or(DEFAULT_PAGE_SIZE);
    let raw = source.fetch(call.endpoint, call.query_pairs()).await;
    if let Err(e) = &raw {
        tracing::warn!(series = key.name(), error = %e, "series fetch failed");
    }
    match key {
        SeriesKey::SummaryMetrics => {
            SeriesOutcome::SummaryMetrics(decode(key, raw, normalize::summary))
        }
        SeriesKey::TimeSeries => SeriesOutcome::TimeSeries(decode(key, raw, |v| {
            normalize::time_series(v, granularity)
        })),
        SeriesKey::TierBreakdown => SeriesOutcome::TierBreakdown(decode(key, raw, normalize::tiers)),
        SeriesKey::ContentPage => SeriesOutcome::ContentPage(decode(key, raw, |v| {
            normalize::content_page(v, page, size)
        })),
    }
}

fn decode<T>(
    key: SeriesKey,
    raw: Result<Value, NetworkError>,
    reshape: impl FnOnce(Value) -> Result<T, serde_json::Error>,
) -> Result<T, ErrorInfo> {
    let value = raw.map_err(ErrorInfo::from)?;
    reshape(value).map_err(|e| {
        tracing::warn!(series = key.name(), error = %e, "unexpected upstream payload");
        ErrorInfo::from(NetworkError::from(e))
    })
}

/// Runs every call of `plan` concurrently and waits for all of them.
pub async fn load<S: MetricsSource>(
    source: &S,
    filter: FilterState,
    plan: &QueryPlan,
) -> DashboardView {
    let granularity = plan.granularity();
    let mut view = DashboardView::pending(filter);
    let outcomes = join_all(
        plan.iter()
            .map(|(key, call)| fetch_series(source, key, call.clone(), granularity)),
    )
    .await;
    for outcome in outcomes {
        view.apply(outcome);
    }
    view
}

/// Session state published to subscribers after every applied change.
#[derive(Debug, Clone)]
pub struct SessionState {
    pub view: DashboardView,
    latest: BTreeMap<SeriesKey, u64>,
    next_token: u64,
}

impl SessionState {
    fn new(filter: FilterState) -> Self {
        Self {
            view: DashboardView::pending(filter),
            latest: BTreeMap::new(),
            next_token: 0,
        }
    }

    /// Token of the newest call issued for `key`, if any.
    pub fn latest_token(&self, key: SeriesKey) -> Option<u64> {
        self.latest.get(&key).copied()
    }
}

/// Handles for the calls issued by one filter change.
pub struct Refresh {
    handles: Vec<(SeriesKey, JoinHandle<bool>)>,
}

impl Refresh {
    /// Waits for every call of this refresh. Returns the series whose responses were applied;
    /// superseded ones are left out.
    pub async fn wait(self) -> Vec<SeriesKey> {
        let mut applied = Vec::new();
        for (key, handle) in self.handles {
            match handle.await {
                Ok(true) => applied.push(key),
                Ok(false) => {}
                Err(e) => tracing::warn!(series = key.name(), error = %e, "series task failed"),
            }
        }
        applied
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }
}

/// A long-lived dashboard consumer. Each filter change re-plans and refetches; responses from a
/// superseded call never overwrite newer state.
pub struct DashboardSession<S> {
    source: Arc<S>,
    options: ResolverOptions,
    state: Arc<watch::Sender<SessionState>>,
}

impl<S: MetricsSource> DashboardSession<S> {
    pub fn new(source: Arc<S>, options: ResolverOptions) -> Self {
        let (tx, _) = watch::channel(SessionState::new(FilterState::default()));
        Self {
            source,
            options,
            state: Arc::new(tx),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    pub fn view(&self) -> DashboardView {
        self.state.borrow().view.clone()
    }

    pub fn filter(&self) -> FilterState {
        self.state.borrow().view.filter
    }

    /// Applies a user action to the current filter and refetches.
    pub fn dispatch(&self, action: FilterAction) -> Refresh {
        let next = self.filter().apply(action);
        self.apply_filter(next)
    }

    /// Replaces the filter, resets every series to pending and issues the new plan.
    /// Must be called inside a tokio runtime.
    pub fn apply_filter(&self, filter: FilterState) -> Refresh {
        let plan = query::resolve(&filter, &self.options);
        let granularity = plan.granularity();
        let mut issued = Vec::with_capacity(plan.len());
        self.state.send_modify(|s| {
            s.view = DashboardView::pending(filter);
            for (key, _) in plan.iter() {
                s.next_token += 1;
                s.latest.insert(key, s.next_token);
                issued.push((key, s.next_token));
            }
        });
        tracing::debug!(query = %filter.to_query_string(), calls = issued.len(), "plan issued");

        let handles = issued
            .into_iter()
            .filter_map(|(key, token)| {
                let call = plan.get(key)?.clone();
                let source = self.source.clone();
                let state = self.state.clone();
                let handle = tokio::spawn(async move {
                    let outcome = fetch_series(source.as_ref(), key, call, granularity).await;
                    let applied = state.send_if_modified(|s| {
                        if s.latest.get(&key) != Some(&token) {
                            return false;
                        }
                        s.view.apply(outcome);
                        true
                    });
                    if !applied {
                        tracing::debug!(series = key.name(), token, "discarding superseded response");
                    }
                    applied
                });
                Some((key, handle))
            })
            .collect();
        Refresh { handles }
    }
}
