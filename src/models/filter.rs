// Dashboard filter state and its query-string form (time, language, tier, page)

use serde::{Deserialize, Deserializer, Serialize};

/// Whether a metrics query aggregates by hour or by day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Granularity {
    Daily,
    Hourly,
}

impl Granularity {
    pub fn is_hourly(self) -> bool {
        matches!(self, Granularity::Hourly)
    }
}

/// Selected look-back window. `All` means unbounded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimeRange {
    #[default]
    #[serde(rename = "ALL", alias = "all")]
    All,
    #[serde(rename = "1")]
    Day,
    #[serde(rename = "7")]
    Week,
    #[serde(rename = "30")]
    Month,
    #[serde(rename = "365")]
    Year,
    #[serde(rename = "24")]
    Hours24,
    #[serde(rename = "48")]
    Hours48,
    #[serde(rename = "72")]
    Hours72,
}

/// A bounded look-back window, in the unit the upstream expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Window {
    Days(u32),
    Hours(u32),
}

impl TimeRange {
    pub const VALUES: [TimeRange; 8] = [
        TimeRange::All,
        TimeRange::Day,
        TimeRange::Week,
        TimeRange::Month,
        TimeRange::Year,
        TimeRange::Hours24,
        TimeRange::Hours48,
        TimeRange::Hours72,
    ];

    pub fn token(self) -> &'static str {
        match self {
            TimeRange::All => ALL,
            TimeRange::Day => "1",
            TimeRange::Week => "7",
            TimeRange::Month => "30",
            TimeRange::Year => "365",
            TimeRange::Hours24 => "24",
            TimeRange::Hours48 => "48",
            TimeRange::Hours72 => "72",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if s.eq_ignore_ascii_case(ALL) {
            return Some(TimeRange::All);
        }
        Self::VALUES.into_iter().find(|v| v.token() == s)
    }

    pub fn label(self) -> &'static str {
        match self {
            TimeRange::All => "All time",
            TimeRange::Day => "Last day",
            TimeRange::Week => "Last 7 days",
            TimeRange::Month => "Last 30 days",
            TimeRange::Year => "Last 365 days",
            TimeRange::Hours24 => "Last 24 hours",
            TimeRange::Hours48 => "Last 48 hours",
            TimeRange::Hours72 => "Last 72 hours",
        }
    }

    pub fn window(self) -> Option<Window> {
        match self {
            TimeRange::All => None,
            TimeRange::Day => Some(Window::Days(1)),
            TimeRange::Week => Some(Window::Days(7)),
            TimeRange::Month => Some(Window::Days(30)),
            TimeRange::Year => Some(Window::Days(365)),
            TimeRange::Hours24 => Some(Window::Hours(24)),
            TimeRange::Hours48 => Some(Window::Hours(48)),
            TimeRange::Hours72 => Some(Window::Hours(72)),
        }
    }

    /// Hourly for 24/48/72, daily for everything else (including `All`).
    pub fn granularity(self) -> Granularity {
        match self.window() {
            Some(Window::Hours(_)) => Granularity::Hourly,
            _ => Granularity::Daily,
        }
    }

    pub fn is_hourly(self) -> bool {
        self.granularity().is_hourly()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Language {
    #[default]
    #[serde(rename = "ALL", alias = "all")]
    All,
    #[serde(rename = "ko")]
    Korean,
    #[serde(rename = "en")]
    English,
    #[serde(rename = "es")]
    Spanish,
}

impl Language {
    pub const VALUES: [Language; 4] = [
        Language::All,
        Language::Korean,
        Language::English,
        Language::Spanish,
    ];

    pub fn token(self) -> &'static str {
        match self {
            Language::All => ALL,
            Language::Korean => "ko",
            Language::English => "en",
            Language::Spanish => "es",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        Self::VALUES
            .into_iter()
            .find(|v| v.token().eq_ignore_ascii_case(s))
    }

    pub fn label(self) -> &'static str {
        match self {
            Language::All => "All languages",
            Language::Korean => "Korean",
            Language::English => "English",
            Language::Spanish => "Spanish",
        }
    }

    /// `None` for the `All` sentinel.
    pub fn selected(self) -> Option<Self> {
        (self != Language::All).then_some(self)
    }
}

/// Influencer follower-count bracket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tier {
    #[default]
    #[serde(rename = "ALL", alias = "all")]
    All,
    #[serde(rename = "NANO")]
    Nano,
    #[serde(rename = "MICRO")]
    Micro,
    #[serde(rename = "MID")]
    Mid,
    #[serde(rename = "MEGA")]
    Mega,
}

impl Tier {
    pub const VALUES: [Tier; 5] = [Tier::All, Tier::Nano, Tier::Micro, Tier::Mid, Tier::Mega];

    pub fn token(self) -> &'static str {
        match self {
            Tier::All => ALL,
            Tier::Nano => "NANO",
            Tier::Micro => "MICRO",
            Tier::Mid => "MID",
            Tier::Mega => "MEGA",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        Self::VALUES
            .into_iter()
            .find(|v| v.token().eq_ignore_ascii_case(s))
    }

    pub fn label(self) -> &'static str {
        match self {
            Tier::All => "All tiers",
            Tier::Nano => "Nano",
            Tier::Micro => "Micro",
            Tier::Mid => "Mid",
            Tier::Mega => "Mega",
        }
    }

    /// `None` for the `All` sentinel.
    pub fn selected(self) -> Option<Self> {
        (self != Tier::All).then_some(self)
    }
}

const ALL: &str = "ALL";

/// Currently selected dashboard filters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterState {
    pub time_range: TimeRange,
    pub language: Language,
    pub tier: Tier,
    pub page: u32,
}

/// Raw query-string form of [`FilterState`]: `time`, `language`, `tier`, `page`.
/// Absent keys mean the default (ALL / page 0).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterQuery {
    #[serde(
        default,
        deserialize_with = "string_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tier: Option<String>,
    #[serde(
        default,
        deserialize_with = "string_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub page: Option<String>,
}

/// Query strings carry text, JSON messages may carry numbers; accept both.
fn string_or_number<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(u64),
    }
    Ok(Option::<Raw>::deserialize(d)?.map(|raw| match raw {
        Raw::Text(s) => s,
        Raw::Number(n) => n.to_string(),
    }))
}

/// A user filter action. Every action except `SetPage` resets the page to 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", content = "value", rename_all = "camelCase")]
pub enum FilterAction {
    SetTimeRange(TimeRange),
    SetLanguage(Language),
    SetTier(Tier),
    SetPage(u32),
}

impl FilterState {
    /// URL → state. Missing or unrecognised values fall back to their defaults.
    pub fn from_query(query: &FilterQuery) -> Self {
        let time_range = parse_or_default(query.time.as_deref(), "time", TimeRange::parse);
        let language = parse_or_default(query.language.as_deref(), "language", Language::parse);
        let tier = parse_or_default(query.tier.as_deref(), "tier", Tier::parse);
        let page = parse_or_default(query.page.as_deref(), "page", |s| s.trim().parse().ok());
        Self {
            time_range,
            language,
            tier,
            page,
        }
    }

    /// State → URL. Defaults are omitted so the default state serialises to nothing.
    pub fn to_query(&self) -> FilterQuery {
        FilterQuery {
            time: (self.time_range != TimeRange::All).then(|| self.time_range.token().to_string()),
            language: self.language.selected().map(|l| l.token().to_string()),
            tier: self.tier.selected().map(|t| t.token().to_string()),
            page: (self.page != 0).then(|| self.page.to_string()),
        }
    }

    pub fn to_query_string(&self) -> String {
        let q = self.to_query();
        [
            ("time", q.time),
            ("language", q.language),
            ("tier", q.tier),
            ("page", q.page),
        ]
        .into_iter()
        .filter_map(|(k, v)| v.map(|v| format!("{k}={v}")))
        .collect::<Vec<_>>()
        .join("&")
    }

    pub fn granularity(&self) -> Granularity {
        self.time_range.granularity()
    }

    pub fn is_hourly(&self) -> bool {
        self.time_range.is_hourly()
    }

    /// Returns the state after `action`.
    pub fn apply(self, action: FilterAction) -> Self {
        match action {
            FilterAction::SetTimeRange(time_range) => Self {
                time_range,
                page: 0,
                ..self
            },
            FilterAction::SetLanguage(language) => Self {
                language,
                page: 0,
                ..self
            },
            FilterAction::SetTier(tier) => Self {
                tier,
                page: 0,
                ..self
            },
            FilterAction::SetPage(page) => Self { page, ..self },
        }
    }
}

fn parse_or_default<T: Default>(
    raw: Option<&str>,
    key: &str,
    parse: impl Fn(&str) -> Option<T>,
) -> T {
    match raw {
        None => T::default(),
        Some(s) if s.trim().is_empty() => T::default(),
        Some(s) => parse(s).unwrap_or_else(|| {
            tracing::debug!(key, value = s, "unrecognised filter value, using default");
            T::default()
        }),
    }
}
