//! Slug resolution for content items of unknown shape.
//!
//! Items reach the template layer as raw collection entries, rendered pages,
//! or template-local variables. Each shape carries its identity in a
//! different place, so resolution is an ordered chain of field probes
//! against a `serde_json::Value`. The item is only ever read.

use serde_json::Value;

/// Field paths probed for an explicit slug, highest priority first.
const SLUG_FIELDS: &[&[&str]] = &[
    &["fileSlug"],
    &["slug"],
    &["data", "slug"],
    &["data", "page", "fileSlug"],
    &["page", "fileSlug"],
];

/// Field paths probed for the item's source path.
const INPUT_PATH_FIELDS: &[&[&str]] = &[
    &["inputPath"],
    &["page", "inputPath"],
    &["data", "page", "inputPath"],
];

/// Follow `path` through nested objects and return the value at its end.
pub(crate) fn probe<'a>(item: &'a Value, path: &[&str]) -> Option<&'a Value> {
    path.iter().try_fold(item, |current, key| current.as_object()?.get(*key))
}

/// Like [`probe`], but only yields non-empty strings.
pub(crate) fn probe_str<'a>(item: &'a Value, path: &[&str]) -> Option<&'a str> {
    probe(item, path)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}

/// The item's source file path, from whichever location carries it.
#[must_use]
pub fn input_path(item: &Value) -> Option<&str> {
    INPUT_PATH_FIELDS.iter().find_map(|path| probe_str(item, path))
}

/// File base name with its final extension removed.
///
/// Accepts both `/` and `\` separators. A leading dot (`.hidden`) is part of
/// the name, not an extension.
#[must_use]
pub fn file_stem(path: &str) -> &str {
    let name = path.rsplit(['/', '\\']).next().unwrap_or(path);
    match name.rfind('.') {
        Some(dot) if dot > 0 => &name[..dot],
        _ => name,
    }
}

/// Resolve the canonical slug for a content item.
///
/// A plain JSON string is taken as an already-known slug. Otherwise the
/// explicit slug fields are tried in priority order, then the base name of
/// the item's input path. Returns `None` when the item carries no
/// identifying information.
///
/// # Examples
///
/// ```
/// use post_history::resolve_slug;
/// use serde_json::json;
///
/// assert_eq!(resolve_slug(&json!("hello")).as_deref(), Some("hello"));
/// assert_eq!(
///     resolve_slug(&json!({ "page": { "inputPath": "./src/posts/first.md" } })).as_deref(),
///     Some("first")
/// );
/// assert_eq!(resolve_slug(&json!({ "title": "untitled" })), None);
/// ```
#[must_use]
pub fn resolve_slug(item: &Value) -> Option<String> {
    if let Value::String(s) = item {
        return Some(s.clone());
    }

    if let Some(slug) = SLUG_FIELDS.iter().find_map(|path| probe_str(item, path)) {
        return Some(slug.to_string());
    }

    input_path(item)
        .map(file_stem)
        .filter(|stem| !stem.is_empty())
        .map(str::to_string)
}
