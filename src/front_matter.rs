//! Front-matter slug extraction for content files.
//!
//! Only the two fields that decide a post's identity are read (`slug` and
//! `permalink`); the rest of the block belongs to the site generator.

use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;
use serde_yaml::Value;
use tracing::debug;

use crate::slug::file_stem;

static FRONT_MATTER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)\A\u{feff}?---[ \t]*\r?\n(.*?)\r?\n---[ \t]*(?:\r?\n|\z)")
        .expect("front matter pattern is valid")
});

/// Identity fields declared in a file's front matter.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FrontMatter {
    pub slug: Option<String>,
    pub permalink: Option<String>,
}

/// The block as YAML sees it. Every other key is ignored.
#[derive(Debug, Default, Deserialize)]
struct RawFrontMatter {
    #[serde(default)]
    slug: Option<Value>,
    #[serde(default)]
    permalink: Option<Value>,
}

/// Return the raw front-matter block at the very start of `content`, if any.
#[must_use]
pub fn front_matter_block(content: &str) -> Option<&str> {
    FRONT_MATTER
        .captures(content)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
}

/// Non-empty text of a scalar. `false`, `null` and collections yield `None`.
fn scalar_text(value: Option<Value>) -> Option<String> {
    let text = match value? {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}

/// Parse the `slug:` and `permalink:` fields out of a file's front matter.
///
/// Empty values and `permalink: false` count as absent. A block that is not
/// valid YAML (or not a mapping) declares nothing.
#[must_use]
pub fn parse_front_matter(content: &str) -> FrontMatter {
    let Some(block) = front_matter_block(content) else {
        return FrontMatter::default();
    };
    if block.trim().is_empty() {
        return FrontMatter::default();
    }

    let raw = match serde_yaml::from_str::<RawFrontMatter>(block) {
        Ok(raw) => raw,
        Err(e) => {
            debug!(error = %e, "Ignoring unparseable front matter");
            RawFrontMatter::default()
        }
    };
    FrontMatter {
        slug: scalar_text(raw.slug),
        permalink: scalar_text(raw.permalink),
    }
}

/// Final non-empty path segment of a permalink (`/posts/my-post/` -> `my-post`).
#[must_use]
pub fn permalink_slug(permalink: &str) -> Option<&str> {
    permalink
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .filter(|segment| !segment.is_empty())
}

/// Derive the canonical slug of a content file: explicit `slug`, else the
/// last segment of `permalink`, else the file's base name.
#[must_use]
pub fn derive_slug(content: &str, file_name: &str) -> String {
    let fm = parse_front_matter(content);
    if let Some(slug) = fm.slug {
        return slug;
    }
    if let Some(segment) = fm.permalink.as_deref().and_then(permalink_slug) {
        return segment.to_string();
    }
    file_stem(file_name).to_string()
}
