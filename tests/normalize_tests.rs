// Response normalizer: field mapping, ordering, missing-field tolerance

mod common;

use seeding_monitor::models::Granularity;
use seeding_monitor::normalize;
use serde_json::json;

#[test]
fn daily_series_sorted_ascending_regardless_of_input_order() {
    let points =
        normalize::time_series(common::daily_series_payload(), Granularity::Daily).unwrap();
    let stamps: Vec<&str> = points.iter().map(|p| p.timestamp.as_str()).collect();
    assert_eq!(stamps, vec!["2025-07-01", "2025-07-02", "2025-07-03"]);
    assert_eq!(points[0].uploads, 3);
    assert_eq!(points[0].average_views, 1200.0);
}

#[test]
fn every_permutation_normalizes_to_the_same_order() {
    let rows = [
        json!({ "date": "2025-07-01", "dailyUploads": 1 }),
        json!({ "date": "2025-07-02", "dailyUploads": 2 }),
        json!({ "date": "2025-07-03", "dailyUploads": 3 }),
    ];
    let orders = [[0, 1, 2], [0, 2, 1], [1, 0, 2], [1, 2, 0], [2, 0, 1], [2, 1, 0]];
    for order in orders {
        let payload = json!(order.iter().map(|&i| rows[i].clone()).collect::<Vec<_>>());
        let points = normalize::time_series(payload, Granularity::Daily).unwrap();
        let uploads: Vec<u64> = points.iter().map(|p| p.uploads).collect();
        assert_eq!(uploads, vec![1, 2, 3], "input order {:?}", order);
    }
}

#[test]
fn hourly_series_uses_hourly_fields() {
    let points =
        normalize::time_series(common::hourly_series_payload(), Granularity::Hourly).unwrap();
    let uploads: Vec<u64> = points.iter().map(|p| p.uploads).collect();
    assert_eq!(uploads, vec![1, 4, 2]);
    assert_eq!(points[0].timestamp, "2025-07-01T10:00:00");
    assert_eq!(points[2].average_views, 50.0);
}

#[test]
fn granularity_selects_which_fields_are_read() {
    let payload = json!([{ "date": "2025-07-01", "dailyUploads": 9, "hourlyUploads": 2 }]);
    let daily = normalize::time_series(payload.clone(), Granularity::Daily).unwrap();
    let hourly = normalize::time_series(payload, Granularity::Hourly).unwrap();
    assert_eq!(daily[0].uploads, 9);
    assert_eq!(hourly[0].uploads, 2);
}

#[test]
fn mixed_timestamp_formats_sort_by_instant() {
    let payload = json!([
        { "timestamp": "2025-07-01T12:00:00+09:00", "hourlyUploads": 3 },
        { "timestamp": "2025-07-01 02:00:00", "hourlyUploads": 1 },
        { "timestamp": "2025-07-01T02:30:00Z", "hourlyUploads": 2 }
    ]);
    let points = normalize::time_series(payload, Granularity::Hourly).unwrap();
    let uploads: Vec<u64> = points.iter().map(|p| p.uploads).collect();
    assert_eq!(uploads, vec![1, 2, 3]);
    assert_eq!(points[0].timestamp, "2025-07-01T02:00:00");
    assert_eq!(points[2].timestamp, "2025-07-01T12:00:00+09:00");
}

#[test]
fn points_without_timestamp_are_dropped() {
    let payload = json!([
        { "dailyUploads": 4 },
        { "date": "not a date", "dailyUploads": 5 },
        { "date": "2025-07-01", "dailyUploads": 6 }
    ]);
    let points = normalize::time_series(payload, Granularity::Daily).unwrap();
    assert_eq!(points.len(), 1);
    assert_eq!(points[0].uploads, 6);
}

#[test]
fn missing_numbers_become_zero() {
    let points =
        normalize::time_series(json!([{ "date": "2025-07-01" }]), Granularity::Daily).unwrap();
    assert_eq!(points[0].uploads, 0);
    assert_eq!(points[0].average_views, 0.0);

    let summary = normalize::summary(json!({ "uploads": 3 })).unwrap();
    assert_eq!(summary.uploads, 3);
    assert_eq!(summary.average_views, 0.0);
    assert_eq!(summary.free_sponsorships, 0);
    assert_eq!(summary.changes.uploads, 0.0);

    let json = serde_json::to_value(&summary).unwrap();
    assert_eq!(json["averageViews"], 0.0);
}

#[test]
fn summary_maps_upstream_names() {
    let summary = normalize::summary(common::summary_payload()).unwrap();
    assert_eq!(summary.uploads, 120);
    assert_eq!(summary.free_sponsorships, 40);
    assert_eq!(summary.paid_sponsorships, 12);
    assert_eq!(summary.average_views, 15321.5);
    assert_eq!(summary.exploded_10k, 30);
    assert_eq!(summary.exploded_100k, 6);
    assert_eq!(summary.exploded_1m, 1);
    assert_eq!(summary.changes.uploads, 12.5);
    assert_eq!(summary.changes.average_views, 0.0);

    let cards = summary.cards();
    assert_eq!(cards.len(), 7);
    assert_eq!(cards[0].key, "uploads");
    assert_eq!(cards[3].display, "15.3K");
}

#[test]
fn tier_rows_accept_upstream_aliases() {
    let payload = json!([
        { "tier": "NANO", "dailyUploads": 4, "viewsAvg": 100.0 },
        { "tier": "MEGA", "hourlyUploads": 1, "hourlyViewsAvg": 9000.0 },
        { "tier": "MID" }
    ]);
    let tiers = normalize::tiers(payload).unwrap();
    assert_eq!(tiers.len(), 3);
    assert_eq!(tiers[0].uploads, 4);
    assert_eq!(tiers[0].average_views, 100.0);
    assert_eq!(tiers[1].average_views, 9000.0);
    assert_eq!(tiers[2].uploads, 0);
    assert_eq!(tiers[2].average_views, 0.0);
}

#[test]
fn tier_payload_keeps_upstream_order() {
    let tiers = normalize::tiers(common::tier_payload()).unwrap();
    let names: Vec<&str> = tiers.iter().map(|t| t.tier.as_str()).collect();
    assert_eq!(names, vec!["NANO", "MICRO", "MID", "MEGA"]);
}

#[test]
fn wrapped_and_null_lists_are_accepted() {
    let wrapped = json!({ "data": [{ "tier": "NANO", "uploads": 1 }] });
    assert_eq!(normalize::tiers(wrapped).unwrap().len(), 1);
    assert!(normalize::tiers(serde_json::Value::Null).unwrap().is_empty());
}

#[test]
fn non_list_payload_is_an_error() {
    assert!(normalize::tiers(json!("oops")).is_err());
    assert!(normalize::time_series(json!(42), Granularity::Daily).is_err());
}

#[test]
fn content_page_maps_metadata_and_cards() {
    let page = normalize::content_page(common::contents_payload(), 0, 9).unwrap();
    assert_eq!(page.items.len(), 2);
    assert_eq!(page.page_index, 0);
    assert_eq!(page.page_size, 9);
    assert_eq!(page.total_elements, 20);
    assert_eq!(page.total_pages, 3);
    assert!(page.has_next);
    assert!(!page.has_previous);

    let first = &page.items[0];
    assert_eq!(first.id, "c-1");
    assert_eq!(first.influencer_handle, "@glow");
    assert_eq!(first.views, 154000);
    assert_eq!(first.exploded_bucket.as_deref(), Some("100k"));

    let second = &page.items[1];
    assert_eq!(second.likes, 0);
    assert_eq!(second.caption, "");
    assert_eq!(second.thumbnail_url, None);
}

#[test]
fn content_page_derives_missing_metadata() {
    let payload = json!({
        "content": [{ "id": 17, "views": 5 }],
        "totalElements": 19
    });
    let page = normalize::content_page(payload, 2, 9).unwrap();
    assert_eq!(page.items[0].id, "17");
    assert_eq!(page.page_index, 2);
    assert_eq!(page.total_pages, 3);
    assert!(!page.has_next);
    assert!(page.has_previous);
}

#[test]
fn snake_case_content_fields_are_accepted() {
    let payload = json!({
        "content": [{
            "content_id": "x",
            "influencer_handle": "@snake",
            "sponsorship_type": "pr_paid",
            "thumbnail": "https://cdn.example.com/x.jpg"
        }]
    });
    let page = normalize::content_page(payload, 0, 9).unwrap();
    let card = &page.items[0];
    assert_eq!(card.id, "x");
    assert_eq!(card.influencer_handle, "@snake");
    assert_eq!(card.sponsorship_type.as_deref(), Some("pr_paid"));
    assert_eq!(card.thumbnail_url.as_deref(), Some("https://cdn.example.com/x.jpg"));
}
