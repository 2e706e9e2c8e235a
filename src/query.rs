// Query resolver: filter state -> upstream call plan (pure, no I/O)

use std::collections::BTreeMap;

use serde::Serialize;

use crate::models::{FilterState, Granularity, Language, Tier, Window};

/// Upstream endpoints, relative to the configured base URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Endpoint {
    DailyTotal,
    HourlyTotal,
    DailySeries,
    HourlySeries,
    DailyTier,
    HourlyTier,
    Contents,
}

impl Endpoint {
    pub fn path(self) -> &'static str {
        match self {
            Endpoint::DailyTotal => "/metrics/daily/total",
            Endpoint::HourlyTotal => "/metrics/hourly/total",
            Endpoint::DailySeries => "/metrics/daily",
            Endpoint::HourlySeries => "/metrics/hourly",
            Endpoint::DailyTier => "/metrics/daily/tier",
            Endpoint::HourlyTier => "/metrics/hourly/tier",
            Endpoint::Contents => "/contents",
        }
    }

    pub fn total(granularity: Granularity) -> Self {
        match granularity {
            Granularity::Daily => Endpoint::DailyTotal,
            Granularity::Hourly => Endpoint::HourlyTotal,
        }
    }

    pub fn series(granularity: Granularity) -> Self {
        match granularity {
            Granularity::Daily => Endpoint::DailySeries,
            Granularity::Hourly => Endpoint::HourlySeries,
        }
    }

    pub fn tier(granularity: Granularity) -> Self {
        match granularity {
            Granularity::Daily => Endpoint::DailyTier,
            Granularity::Hourly => Endpoint::HourlyTier,
        }
    }
}

/// Logical data series rendered by the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SeriesKey {
    SummaryMetrics,
    TimeSeries,
    TierBreakdown,
    ContentPage,
}

impl SeriesKey {
    pub const ALL: [SeriesKey; 4] = [
        SeriesKey::SummaryMetrics,
        SeriesKey::TimeSeries,
        SeriesKey::TierBreakdown,
        SeriesKey::ContentPage,
    ];

    pub fn name(self) -> &'static str {
        match self {
            SeriesKey::SummaryMetrics => "summaryMetrics",
            SeriesKey::TimeSeries => "timeSeries",
            SeriesKey::TierBreakdown => "tierBreakdown",
            SeriesKey::ContentPage => "contentPage",
        }
    }
}

/// Outgoing query parameters. Sentinel values never make it in here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct QueryParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub days: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hours: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tier: Option<Tier>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<Language>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u32>,
}

impl QueryParams {
    fn with_window(mut self, window: Option<Window>) -> Self {
        match window {
            Some(Window::Days(d)) => self.days = Some(d),
            Some(Window::Hours(h)) => self.hours = Some(h),
            None => {}
        }
        self
    }

    /// Key/value pairs in a stable order, ready for the query string.
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(d) = self.days {
            pairs.push(("days", d.to_string()));
        }
        if let Some(h) = self.hours {
            pairs.push(("hours", h.to_string()));
        }
        if let Some(t) = self.tier.and_then(Tier::selected) {
            pairs.push(("tier", t.token().to_string()));
        }
        if let Some(l) = self.language.and_then(Language::selected) {
            pairs.push(("language", l.token().to_string()));
        }
        if let Some(p) = self.page {
            pairs.push(("page", p.to_string()));
        }
        if let Some(s) = self.size {
            pairs.push(("size", s.to_string()));
        }
        pairs
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlannedCall {
    pub endpoint: Endpoint,
    pub params: QueryParams,
}

impl PlannedCall {
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        self.params.to_pairs()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueryPlan {
    granularity: Granularity,
    calls: BTreeMap<SeriesKey, PlannedCall>,
}

impl QueryPlan {
    pub fn granularity(&self) -> Granularity {
        self.granularity
    }

    pub fn is_hourly(&self) -> bool {
        self.granularity.is_hourly()
    }

    pub fn get(&self, key: SeriesKey) -> Option<&PlannedCall> {
        self.calls.get(&key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (SeriesKey, &PlannedCall)> {
        self.calls.iter().map(|(k, c)| (*k, c))
    }

    pub fn len(&self) -> usize {
        self.calls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.calls.is_empty()
    }
}

pub const DEFAULT_PAGE_SIZE: u32 = 9;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolverOptions {
    pub page_size: u32,
    /// Also send time/tier/language to the content listing. Off unless the upstream
    /// is known to honour them.
    pub forward_content_filters: bool,
}

impl Default for ResolverOptions {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            forward_content_filters: false,
        }
    }
}

/// Builds the call plan for `filter`. Deterministic: same input, same plan.
pub fn resolve(filter: &FilterState, options: &ResolverOptions) -> QueryPlan {
    let granularity = filter.granularity();
    let window = filter.time_range.window();
    let tier = filter.tier.selected();
    let language = filter.language.selected();

    let filtered = QueryParams {
        tier,
        language,
        ..Default::default()
    }
    .with_window(window);

    let mut calls = BTreeMap::new();
    calls.insert(
        SeriesKey::SummaryMetrics,
        PlannedCall {
            endpoint: Endpoint::total(granularity),
            params: filtered.clone(),
        },
    );
    calls.insert(
        SeriesKey::TimeSeries,
        PlannedCall {
            endpoint: Endpoint::series(granularity),
            params: filtered.clone(),
        },
    );
    // The tier endpoint compares all tiers, so the tier filter is never forwarded.
    calls.insert(
        SeriesKey::TierBreakdown,
        PlannedCall {
            endpoint: Endpoint::tier(granularity),
            params: QueryParams {
                language,
                ..Default::default()
            }
            .with_window(window),
        },
    );

    let content_base = if options.forward_content_filters {
        filtered
    } else {
        QueryParams::default()
    };
    calls.insert(
        SeriesKey::ContentPage,
        PlannedCall {
            endpoint: Endpoint::Contents,
            params: QueryParams {
                page: Some(filter.page),
                size: Some(options.page_size),
                ..content_base
            },
        },
    );

    QueryPlan { granularity, calls }
}
