//! Resolution filters consumed by the template layer.
//!
//! Every lookup takes the loaded aggregate by reference and never touches
//! git. Misses are not errors: each filter ends in `None` or a safe default.

use std::cmp::Reverse;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::Value;

use crate::builder::ContentLayout;
use crate::slug::{input_path, probe};
use crate::{normalize_content_path, resolve_slug, HistoryAggregate, HistoryEntry};

/// Item fields consulted for a date when the history has none, in order.
const DATE_FIELDS: &[&[&str]] = &[
    &["data", "lastUpdated"],
    &["lastUpdated"],
    &["date"],
    &["data", "date"],
];

/// Item fields consulted for an explicit revision count, in order.
const REVISION_FIELDS: &[&[&str]] = &[&["data", "revisionCount"], &["revisionCount"]];

/// Lookups against one loaded aggregate.
#[derive(Debug, Clone)]
pub struct HistoryResolver<'a> {
    aggregate: &'a HistoryAggregate,
    layout: ContentLayout,
}

impl<'a> HistoryResolver<'a> {
    pub fn new(aggregate: &'a HistoryAggregate) -> Self {
        Self::with_layout(aggregate, ContentLayout::default())
    }

    pub fn with_layout(aggregate: &'a HistoryAggregate, layout: ContentLayout) -> Self {
        HistoryResolver { aggregate, layout }
    }

    /// Find the history entry for an item: by slug, then by its normalized
    /// input path, then by the conventional path for its slug.
    pub fn history_for(&self, item: &Value) -> Option<&'a HistoryEntry> {
        let slug = resolve_slug(item);

        if let Some(entry) = slug.as_deref().and_then(|s| self.aggregate.posts.get(s)) {
            return Some(entry.as_ref());
        }

        let by_path = input_path(item)
            .map(normalize_content_path)
            .and_then(|key| self.aggregate.by_file.get(&key));
        if let Some(entry) = by_path {
            return Some(entry.as_ref());
        }

        slug.and_then(|s| self.aggregate.by_file.get(&self.layout.slug_key(&s)))
            .map(|entry| entry.as_ref())
    }

    /// Effective last-updated date: the newest commit if history has one,
    /// else the item's own declared dates.
    pub fn last_updated_for(&self, item: &Value) -> Option<String> {
        if let Some(date) = self.history_for(item).and_then(|e| e.last_updated.clone()) {
            return Some(date);
        }
        DATE_FIELDS
            .iter()
            .find_map(|path| probe(item, path).and_then(date_text))
    }

    /// Effective revision count, never below 1.
    pub fn revision_count_for(&self, item: &Value) -> u64 {
        if let Some(entry) = self.history_for(item) {
            return entry.revisions.max(1);
        }
        REVISION_FIELDS
            .iter()
            .find_map(|path| probe(item, path).and_then(count_value))
            .unwrap_or(1)
    }

    /// Items ordered by effective last-updated date, newest first.
    ///
    /// Missing or unparseable dates sort as the oldest possible instant.
    /// Equal dates keep their input order. The input slice is untouched.
    pub fn sort_by_last_updated<'b>(&self, items: &'b [Value]) -> Vec<&'b Value> {
        let mut sorted: Vec<&Value> = items.iter().collect();
        sorted.sort_by_cached_key(|item| {
            Reverse(self.last_updated_for(item).as_deref().and_then(parse_date))
        });
        sorted
    }
}

/// Non-empty string dates as-is; numbers (epoch milliseconds) as their text.
fn date_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Numeric revision counts, floored at 1. Non-numbers are ignored.
fn count_value(value: &Value) -> Option<u64> {
    let n = value.as_f64().filter(|n| n.is_finite())?;
    Some(n.floor().max(1.0) as u64)
}

/// Parse the date spellings that show up in front matter and git output.
///
/// Accepts RFC 3339, git's `YYYY-MM-DD HH:MM:SS +ZZZZ`, naive date-times
/// (taken as UTC), plain `YYYY-MM-DD`, a bare year (January 1st), and epoch
/// milliseconds.
#[must_use]
pub fn parse_date(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S %z") {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(naive.and_utc());
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|naive| naive.and_utc());
    }
    if s.len() == 4 && s.bytes().all(|b| b.is_ascii_digit()) {
        let year = s.parse().ok()?;
        return NaiveDate::from_ymd_opt(year, 1, 1)?.and_hms_opt(0, 0, 0).map(|naive| naive.and_utc());
    }
    epoch_millis(s)
}

/// Epoch milliseconds: at least 10 integer digits, optional fraction.
/// Shorter digit runs are years or counters, not timestamps.
fn epoch_millis(s: &str) -> Option<DateTime<Utc>> {
    let (int, frac) = s.split_once('.').unwrap_or((s, "0"));
    let all_digits = |part: &str| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit());
    if int.len() < 10 || !all_digits(int) || !all_digits(frac) {
        return None;
    }
    DateTime::<Utc>::from_timestamp_millis(int.parse().ok()?)
}

// ─── Free-function filters (default content layout) ─────────────────

/// History entry for an item, or `None`.
pub fn history_for_item<'a>(item: &Value, aggregate: &'a HistoryAggregate) -> Option<&'a HistoryEntry> {
    HistoryResolver::new(aggregate).history_for(item)
}

/// Effective last-updated date for an item, or `None`.
pub fn last_updated_for_item(item: &Value, aggregate: &HistoryAggregate) -> Option<String> {
    HistoryResolver::new(aggregate).last_updated_for(item)
}

/// Effective revision count for an item, at least 1.
pub fn revision_count_for_item(item: &Value, aggregate: &HistoryAggregate) -> u64 {
    HistoryResolver::new(aggregate).revision_count_for(item)
}

/// Items ordered newest-updated first, without reordering the input.
pub fn sort_by_last_updated<'b>(items: &'b [Value], aggregate: &HistoryAggregate) -> Vec<&'b Value> {
    HistoryResolver::new(aggregate).sort_by_last_updated(items)
}

#[cfg(test)]
#[path = "resolve_tests.rs"]
mod tests;
