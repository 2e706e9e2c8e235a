// Response normalizer: raw upstream JSON -> canonical chart/card shapes
//
// Absent numbers become 0. Time series come out sorted ascending by timestamp.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::Deserialize;
use serde_json::Value;

use crate::models::{
    ContentCard, ContentPage, Granularity, NormalizedChartPoint, NormalizedTierPoint,
    SummaryChanges, SummaryMetrics,
};

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct RawSummary {
    uploads: Option<u64>,
    pr_free: Option<u64>,
    pr_paid: Option<u64>,
    views_avg: Option<f64>,
    gte10k: Option<u64>,
    gte100k: Option<u64>,
    gte1m: Option<u64>,
    uploads_percentage_change: Option<f64>,
    pr_free_percentage_change: Option<f64>,
    pr_paid_percentage_change: Option<f64>,
    views_avg_percentage_change: Option<f64>,
    gte10k_percentage_change: Option<f64>,
    gte100k_percentage_change: Option<f64>,
    gte1m_percentage_change: Option<f64>,
}

pub fn summary(raw: Value) -> Result<SummaryMetrics, serde_json::Error> {
    let r: RawSummary = serde_json::from_value(raw)?;
    Ok(SummaryMetrics {
        uploads: r.uploads.unwrap_or(0),
        free_sponsorships: r.pr_free.unwrap_or(0),
        paid_sponsorships: r.pr_paid.unwrap_or(0),
        average_views: non_negative(r.views_avg),
        exploded_10k: r.gte10k.unwrap_or(0),
        exploded_100k: r.gte100k.unwrap_or(0),
        exploded_1m: r.gte1m.unwrap_or(0),
        changes: SummaryChanges {
            uploads: r.uploads_percentage_change.unwrap_or(0.0),
            free_sponsorships: r.pr_free_percentage_change.unwrap_or(0.0),
            paid_sponsorships: r.pr_paid_percentage_change.unwrap_or(0.0),
            average_views: r.views_avg_percentage_change.unwrap_or(0.0),
            exploded_10k: r.gte10k_percentage_change.unwrap_or(0.0),
            exploded_100k: r.gte100k_percentage_change.unwrap_or(0.0),
            exploded_1m: r.gte1m_percentage_change.unwrap_or(0.0),
        },
    })
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct RawSeriesPoint {
    #[serde(alias = "date", alias = "hour", alias = "dateTime", alias = "datetime")]
    timestamp: Option<String>,
    daily_uploads: Option<u64>,
    daily_views_avg: Option<f64>,
    hourly_uploads: Option<u64>,
    hourly_views_avg: Option<f64>,
}

/// Points without a parseable timestamp are dropped; they cannot be placed on the axis.
pub fn time_series(
    raw: Value,
    granularity: Granularity,
) -> Result<Vec<NormalizedChartPoint>, serde_json::Error> {
    let rows: Vec<RawSeriesPoint> = from_list(raw)?;
    let mut keyed: Vec<(NaiveDateTime, NormalizedChartPoint)> = rows
        .into_iter()
        .filter_map(|row| {
            let Some((key, timestamp)) = row.timestamp.as_deref().and_then(canonical_timestamp)
            else {
                tracing::warn!(
                    timestamp = ?row.timestamp,
                    "dropping time-series point without a valid timestamp"
                );
                return None;
            };
            let (uploads, views) = match granularity {
                Granularity::Daily => (row.daily_uploads, row.daily_views_avg),
                Granularity::Hourly => (row.hourly_uploads, row.hourly_views_avg),
            };
            Some((
                key,
                NormalizedChartPoint {
                    timestamp,
                    uploads: uploads.unwrap_or(0),
                    average_views: non_negative(views),
                },
            ))
        })
        .collect();
    keyed.sort_by_key(|(key, _)| *key);
    Ok(keyed.into_iter().map(|(_, p)| p).collect())
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct RawTierRow {
    tier: Option<String>,
    #[serde(alias = "dailyUploads", alias = "hourlyUploads", alias = "tierUploads")]
    uploads: Option<u64>,
    #[serde(alias = "viewsAvg", alias = "dailyViewsAvg", alias = "hourlyViewsAvg")]
    average_views: Option<f64>,
}

/// Upstream order is kept; the upstream already orders tiers for comparison.
pub fn tiers(raw: Value) -> Result<Vec<NormalizedTierPoint>, serde_json::Error> {
    let rows: Vec<RawTierRow> = from_list(raw)?;
    Ok(rows
        .into_iter()
        .map(|row| NormalizedTierPoint {
            tier: row.tier.unwrap_or_default(),
            uploads: row.uploads.unwrap_or(0),
            average_views: non_negative(row.average_views),
        })
        .collect())
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct RawContentPage {
    content: Vec<RawContent>,
    number: Option<u32>,
    size: Option<u32>,
    total_elements: Option<u64>,
    total_pages: Option<u32>,
    first: Option<bool>,
    last: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct RawContent {
    #[serde(alias = "id", alias = "content_id")]
    content_id: Option<Value>,
    #[serde(alias = "influencer_handle")]
    influencer_handle: Option<String>,
    #[serde(alias = "description")]
    caption: Option<String>,
    url: Option<String>,
    #[serde(alias = "thumbnail", alias = "thumbnail_url")]
    thumbnail_url: Option<String>,
    views: Option<u64>,
    likes: Option<u64>,
    comments: Option<u64>,
    tier: Option<String>,
    #[serde(alias = "sponsorship_type")]
    sponsorship_type: Option<String>,
    #[serde(alias = "exploded_bucket")]
    exploded_bucket: Option<String>,
    #[serde(alias = "created_at")]
    created_at: Option<String>,
}

/// `requested_page` and `requested_size` fill in whatever page metadata the upstream omits.
pub fn content_page(
    raw: Value,
    requested_page: u32,
    requested_size: u32,
) -> Result<ContentPage, serde_json::Error> {
    let r: RawContentPage = serde_json::from_value(raw)?;
    let page_index = r.number.unwrap_or(requested_page);
    let page_size = r.size.unwrap_or(requested_size);
    let items: Vec<ContentCard> = r.content.into_iter().map(content_card).collect();
    let total_elements = r.total_elements.unwrap_or(items.len() as u64);
    let total_pages = r.total_pages.unwrap_or_else(|| {
        if page_size == 0 {
            0
        } else {
            total_elements.div_ceil(page_size as u64) as u32
        }
    });
    Ok(ContentPage {
        has_next: r
            .last
            .map(|last| !last)
            .unwrap_or(page_index.saturating_add(1) < total_pages),
        has_previous: r.first.map(|first| !first).unwrap_or(page_index > 0),
        items,
        page_index,
        page_size,
        total_elements,
        total_pages,
    })
}

fn content_card(r: RawContent) -> ContentCard {
    let id = match r.content_id {
        Some(Value::String(s)) => s,
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    };
    ContentCard {
        id,
        influencer_handle: r.influencer_handle.unwrap_or_default(),
        caption: r.caption.unwrap_or_default(),
        url: r.url.unwrap_or_default(),
        thumbnail_url: r.thumbnail_url.filter(|s| !s.is_empty()),
        views: r.views.unwrap_or(0),
        likes: r.likes.unwrap_or(0),
        comments: r.comments.unwrap_or(0),
        tier: r.tier,
        sponsorship_type: r.sponsorship_type,
        exploded_bucket: r.exploded_bucket,
        created_at: r.created_at,
    }
}

/// Accepts a bare array, `null`, or an object wrapping the array in `data`/`content`.
fn from_list<T: serde::de::DeserializeOwned>(raw: Value) -> Result<Vec<T>, serde_json::Error> {
    let list = match raw {
        Value::Null => return Ok(Vec::new()),
        Value::Object(mut map) => match map.remove("data").or_else(|| map.remove("content")) {
            Some(inner) => inner,
            None => Value::Object(map),
        },
        other => other,
    };
    serde_json::from_value(list)
}

fn non_negative(v: Option<f64>) -> f64 {
    v.unwrap_or(0.0).max(0.0)
}

/// Sort key plus ISO-8601 rendering. RFC 3339 input is kept verbatim.
fn canonical_timestamp(s: &str) -> Option<(NaiveDateTime, String)> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some((dt.naive_utc(), s.to_string()));
    }
    for fmt in [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M",
    ] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some((dt, dt.format("%Y-%m-%dT%H:%M:%S").to_string()));
        }
    }
    let date = NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()?;
    Some((date.and_hms_opt(0, 0, 0)?, date.format("%Y-%m-%d").to_string()))
}
