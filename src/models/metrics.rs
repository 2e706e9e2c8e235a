// Chart- and card-ready metric shapes handed to the presentation layer

use serde::{Deserialize, Serialize};

use crate::display::format_compact;

/// One time-series bucket, whatever the upstream granularity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedChartPoint {
    /// ISO-8601 date or date-time.
    pub timestamp: String,
    pub uploads: u64,
    pub average_views: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedTierPoint {
    pub tier: String,
    pub uploads: u64,
    pub average_views: f64,
}

/// Period-over-period changes reported by the upstream, in percent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryChanges {
    pub uploads: f64,
    pub free_sponsorships: f64,
    pub paid_sponsorships: f64,
    pub average_views: f64,
    pub exploded_10k: f64,
    pub exploded_100k: f64,
    pub exploded_1m: f64,
}

/// Headline numbers for the selected window.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryMetrics {
    pub uploads: u64,
    pub free_sponsorships: u64,
    pub paid_sponsorships: u64,
    pub average_views: f64,
    /// Contents with at least 10K views.
    pub exploded_10k: u64,
    pub exploded_100k: u64,
    pub exploded_1m: u64,
    pub changes: SummaryChanges,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryCard {
    pub key: String,
    pub value: f64,
    pub display: String,
    pub change: f64,
}

impl SummaryMetrics {
    /// Cards in dashboard order.
    pub fn cards(&self) -> Vec<SummaryCard> {
        let c = &self.changes;
        [
            ("uploads", self.uploads as f64, c.uploads),
            ("freeSponsorships", self.free_sponsorships as f64, c.free_sponsorships),
            ("paidSponsorships", self.paid_sponsorships as f64, c.paid_sponsorships),
            ("averageViews", self.average_views, c.average_views),
            ("exploded10k", self.exploded_10k as f64, c.exploded_10k),
            ("exploded100k", self.exploded_100k as f64, c.exploded_100k),
            ("exploded1m", self.exploded_1m as f64, c.exploded_1m),
        ]
        .into_iter()
        .map(|(key, value, change)| SummaryCard {
            key: key.to_string(),
            value,
            display: format_compact(value),
            change,
        })
        .collect()
    }
}
