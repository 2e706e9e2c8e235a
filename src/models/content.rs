// Paginated content grid: cards and page metadata

use serde::{Deserialize, Serialize};

use crate::display::{PageWindow, page_window};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentCard {
    pub id: String,
    pub influencer_handle: String,
    pub caption: String,
    pub url: String,
    pub thumbnail_url: Option<String>,
    pub views: u64,
    pub likes: u64,
    pub comments: u64,
    pub tier: Option<String>,
    /// organic / pr_free / pr_paid
    pub sponsorship_type: Option<String>,
    /// 10k / 100k / 1M bucket, when the content crossed one.
    pub exploded_bucket: Option<String>,
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentPage {
    pub items: Vec<ContentCard>,
    pub page_index: u32,
    pub page_size: u32,
    pub total_elements: u64,
    pub total_pages: u32,
    pub has_next: bool,
    pub has_previous: bool,
}

impl ContentPage {
    pub fn window(&self) -> PageWindow {
        page_window(self.page_index, self.total_pages)
    }
}
