//! Tests for the resolution filters. Pure: no git, no filesystem.

use super::*;
use crate::CommitRecord;
use serde_json::json;

fn entry(dates: &[&str]) -> HistoryEntry {
    HistoryEntry::from_commits(
        dates
            .iter()
            .enumerate()
            .map(|(i, d)| CommitRecord {
                hash: format!("{:040x}", i + 1),
                date: d.to_string(),
                message: format!("edit {}", i),
                url: None,
            })
            .collect(),
    )
}

/// Aggregate with `hello` (two commits) and a path-only entry for `legacy`.
fn sample_aggregate() -> HistoryAggregate {
    let mut agg = HistoryAggregate::new(None);
    agg.insert(
        "hello".to_string(),
        "src/posts/2024-01-01-hello.md".to_string(),
        entry(&["2024-05-01T10:00:00+00:00", "2024-01-01T10:00:00+00:00"]),
    );
    agg.by_file.insert(
        "src/posts/legacy.md".to_string(),
        std::sync::Arc::new(entry(&["2023-02-02T00:00:00+00:00"])),
    );
    agg
}

// ─── history_for_item ───────────────────────────────────────────────

#[test]
fn test_history_by_slug() {
    let agg = sample_aggregate();
    let found = history_for_item(&json!({ "fileSlug": "hello" }), &agg).unwrap();
    assert_eq!(found.revisions, 2);
}

#[test]
fn test_history_plain_string_slug() {
    let agg = sample_aggregate();
    assert!(history_for_item(&json!("hello"), &agg).is_some());
    assert!(history_for_item(&json!("nope"), &agg).is_none());
}

#[test]
fn test_history_by_input_path() {
    let agg = sample_aggregate();
    // Slug differs from any posts key; the path still matches byFile.
    let item = json!({ "fileSlug": "renamed", "inputPath": "./src/posts/2024-01-01-hello.md" });
    let found = history_for_item(&item, &agg).unwrap();
    assert_eq!(found.revisions, 2);
}

#[test]
fn test_history_by_conventional_path() {
    let agg = sample_aggregate();
    let found = history_for_item(&json!({ "data": { "slug": "legacy" } }), &agg).unwrap();
    assert_eq!(found.last_updated.as_deref(), Some("2023-02-02T00:00:00+00:00"));
}

#[test]
fn test_history_conventional_path_follows_layout() {
    let mut agg = HistoryAggregate::new(None);
    agg.by_file.insert("content/notes/n.txt".to_string(), std::sync::Arc::new(entry(&["2024-01-01T00:00:00Z"])));
    let layout = ContentLayout { content_dir: "content/notes".to_string(), extension: "txt".to_string() };
    let resolver = HistoryResolver::with_layout(&agg, layout);
    assert!(resolver.history_for(&json!({ "slug": "n" })).is_some());
    assert!(history_for_item(&json!({ "slug": "n" }), &agg).is_none());
}

#[test]
fn test_history_unidentifiable_item() {
    let agg = sample_aggregate();
    let item = json!({ "title": "No identity", "date": "2024-01-01" });
    assert_eq!(resolve_slug(&item), None);
    assert!(history_for_item(&item, &agg).is_none());
}

// ─── last_updated_for_item ──────────────────────────────────────────

#[test]
fn test_last_updated_from_history() {
    let agg = sample_aggregate();
    let item = json!({ "fileSlug": "hello", "date": "2020-01-01" });
    assert_eq!(last_updated_for_item(&item, &agg).as_deref(), Some("2024-05-01T10:00:00+00:00"));
}

#[test]
fn test_last_updated_fallback_order() {
    let agg = HistoryAggregate::new(None);
    let full = json!({
        "lastUpdated": "2024-02-02",
        "date": "2024-03-03",
        "data": { "lastUpdated": "2024-01-01", "date": "2024-04-04" }
    });
    assert_eq!(last_updated_for_item(&full, &agg).as_deref(), Some("2024-01-01"));

    let top = json!({ "lastUpdated": "2024-02-02", "date": "2024-03-03", "data": { "date": "2024-04-04" } });
    assert_eq!(last_updated_for_item(&top, &agg).as_deref(), Some("2024-02-02"));

    let date = json!({ "date": "2024-03-03", "data": { "date": "2024-04-04" } });
    assert_eq!(last_updated_for_item(&date, &agg).as_deref(), Some("2024-03-03"));

    let nested = json!({ "data": { "date": "2024-04-04" } });
    assert_eq!(last_updated_for_item(&nested, &agg).as_deref(), Some("2024-04-04"));

    assert_eq!(last_updated_for_item(&json!({}), &agg), None);
}

#[test]
fn test_last_updated_zero_commit_entry_uses_authored_date() {
    let mut agg = HistoryAggregate::new(None);
    agg.insert("draft".to_string(), "src/posts/draft.md".to_string(), HistoryEntry::from_commits(Vec::new()));
    let item = json!({ "fileSlug": "draft", "date": "2024-06-01" });
    assert_eq!(last_updated_for_item(&item, &agg).as_deref(), Some("2024-06-01"));
}

#[test]
fn test_last_updated_numeric_date() {
    let agg = HistoryAggregate::new(None);
    let item = json!({ "date": 1704067200000i64 });
    assert_eq!(last_updated_for_item(&item, &agg).as_deref(), Some("1704067200000"));
}

// ─── revision_count_for_item ────────────────────────────────────────

#[test]
fn test_revisions_from_history() {
    let agg = sample_aggregate();
    assert_eq!(revision_count_for_item(&json!({ "fileSlug": "hello", "revisionCount": 9 }), &agg), 2);
}

#[test]
fn test_revisions_fallbacks() {
    let agg = HistoryAggregate::new(None);
    assert_eq!(revision_count_for_item(&json!({ "data": { "revisionCount": 4 }, "revisionCount": 7 }), &agg), 4);
    assert_eq!(revision_count_for_item(&json!({ "revisionCount": 7 }), &agg), 7);
    assert_eq!(revision_count_for_item(&json!({ "revisionCount": 0 }), &agg), 1);
    assert_eq!(revision_count_for_item(&json!({ "revisionCount": -3 }), &agg), 1);
    assert_eq!(revision_count_for_item(&json!({ "revisionCount": 2.7 }), &agg), 2);
    assert_eq!(revision_count_for_item(&json!({ "revisionCount": "5" }), &agg), 1);
    assert_eq!(revision_count_for_item(&json!({}), &agg), 1);
}

#[test]
fn test_revisions_floor_on_corrupt_entry() {
    let mut agg = HistoryAggregate::new(None);
    let mut zero = HistoryEntry::from_commits(Vec::new());
    zero.revisions = 0;
    agg.insert("z".to_string(), "src/posts/z.md".to_string(), zero);
    assert_eq!(revision_count_for_item(&json!("z"), &agg), 1);
}

// ─── sort_by_last_updated ───────────────────────────────────────────

#[test]
fn test_sort_missing_dates_last() {
    let agg = HistoryAggregate::new(None);
    let items = vec![
        json!({ "title": "a", "date": "2024-01-01" }),
        json!({ "title": "b" }),
        json!({ "title": "c", "date": "2023-06-01" }),
    ];
    let sorted = sort_by_last_updated(&items, &agg);
    let titles: Vec<&str> = sorted.iter().map(|i| i["title"].as_str().unwrap()).collect();
    assert_eq!(titles, vec!["a", "c", "b"]);
    // Input untouched
    assert_eq!(items[1]["title"], "b");
}

#[test]
fn test_sort_uses_history_over_authored_date() {
    let agg = sample_aggregate();
    let items = vec![
        json!({ "title": "old-authored", "date": "2025-01-01" }),
        json!({ "title": "hello", "fileSlug": "hello", "date": "2019-01-01" }),
        json!({ "title": "mid", "date": "2024-03-01" }),
    ];
    let sorted = sort_by_last_updated(&items, &agg);
    let titles: Vec<&str> = sorted.iter().map(|i| i["title"].as_str().unwrap()).collect();
    assert_eq!(titles, vec!["old-authored", "hello", "mid"]);
}

#[test]
fn test_sort_is_stable_for_ties_and_unparseable() {
    let agg = HistoryAggregate::new(None);
    let items = vec![
        json!({ "title": "x1", "date": "2024-01-01" }),
        json!({ "title": "junk", "date": "not a date" }),
        json!({ "title": "x2", "date": "2024-01-01T00:00:00Z" }),
        json!({ "title": "none" }),
    ];
    let sorted = sort_by_last_updated(&items, &agg);
    let titles: Vec<&str> = sorted.iter().map(|i| i["title"].as_str().unwrap()).collect();
    assert_eq!(titles, vec!["x1", "x2", "junk", "none"]);
}

#[test]
fn test_sort_compares_across_offsets() {
    let agg = HistoryAggregate::new(None);
    let items = vec![
        json!({ "t": "earlier", "date": "2024-01-01T10:00:00+02:00" }),
        json!({ "t": "later", "date": "2024-01-01T09:00:00+00:00" }),
    ];
    let sorted = sort_by_last_updated(&items, &agg);
    assert_eq!(sorted[0]["t"], "later");
}

// ─── parse_date ─────────────────────────────────────────────────────

#[test]
fn test_parse_date_formats() {
    let expected = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap().and_hms_opt(0, 0, 0).unwrap().and_utc();
    assert_eq!(parse_date("2024-01-01"), Some(expected));
    assert_eq!(parse_date("2024-01-01T00:00:00Z"), Some(expected));
    assert_eq!(parse_date("2024-01-01T01:00:00+01:00"), Some(expected));
    assert_eq!(parse_date("2024-01-01 01:00:00 +0100"), Some(expected));
    assert_eq!(parse_date("2024-01-01T00:00:00"), Some(expected));
    assert_eq!(parse_date("2024-01-01T00:00:00.000"), Some(expected));
    assert_eq!(parse_date("1704067200000"), Some(expected));
    assert_eq!(parse_date("yesterday"), None);
    assert_eq!(parse_date(""), None);
}

#[test]
fn test_parse_date_short_numbers_are_not_epoch_millis() {
    let jan_first = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap().and_hms_opt(0, 0, 0).unwrap().and_utc();
    assert_eq!(parse_date("2024"), Some(jan_first));
    assert_eq!(parse_date("42"), None);
    assert_eq!(parse_date("123456789"), None);
    assert_eq!(parse_date("1704067200000.0"), Some(jan_first));
    assert_eq!(parse_date("-1704067200000"), None);
}

#[test]
fn test_sort_year_only_date_orders_by_year() {
    let agg = HistoryAggregate::new(None);
    let items = vec![
        json!({ "title": "older", "date": "2023-06-01" }),
        json!({ "title": "year", "date": "2024" }),
        json!({ "title": "newer", "date": "2024-03-01" }),
    ];
    let sorted = sort_by_last_updated(&items, &agg);
    let titles: Vec<&str> = sorted.iter().map(|i| i["title"].as_str().unwrap()).collect();
    assert_eq!(titles, vec!["newer", "year", "older"]);
}
