// Display helpers: compact counts and the pagination window

use serde::Serialize;

/// `1_234_567 → "1.2M"`, `3_400 → "3.4K"`, smaller values as-is (`15.5 → "15.5"`).
pub fn format_compact(value: f64) -> String {
    if value >= 1_000_000.0 {
        format!("{:.1}M", value / 1_000_000.0)
    } else if value >= 1_000.0 {
        format!("{:.1}K", value / 1_000.0)
    } else {
        format!("{}", value)
    }
}

/// One slot in the page-number bar. `Ellipsis` serialises as `null`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum PageLink {
    Page(u32),
    Ellipsis,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageWindow {
    pub current: u32,
    pub links: Vec<PageLink>,
    pub has_previous: bool,
    pub has_next: bool,
}

const MAX_VISIBLE_PAGES: u32 = 5;

/// Zero-based page links around `current`, with ellipses once there are more than five pages.
pub fn page_window(current: u32, total_pages: u32) -> PageWindow {
    let links = if total_pages <= MAX_VISIBLE_PAGES {
        (0..total_pages).map(PageLink::Page).collect()
    } else {
        let last = total_pages - 1;
        let mut links = Vec::with_capacity(7);
        if current <= 2 {
            links.extend((0..4).map(PageLink::Page));
            links.push(PageLink::Ellipsis);
            links.push(PageLink::Page(last));
        } else if current >= last - 1 {
            links.push(PageLink::Page(0));
            links.push(PageLink::Ellipsis);
            links.extend((total_pages - 4..total_pages).map(PageLink::Page));
        } else {
            links.push(PageLink::Page(0));
            links.push(PageLink::Ellipsis);
            links.extend((current - 1..=current + 1).map(PageLink::Page));
            links.push(PageLink::Ellipsis);
            links.push(PageLink::Page(last));
        }
        links
    };
    PageWindow {
        current,
        links,
        has_previous: current > 0,
        has_next: current.saturating_add(1) < total_pages,
    }
}
