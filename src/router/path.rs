//! Path normalization shared by registration and resolution.
//!
//! A route path is normalized by stripping the separator at both ends and
//! lower-casing it. Empty segments (`a//b`) are dropped when splitting, so
//! repeated separators collapse.

use std::borrow::{Borrow, Cow};
use std::fmt;

/// Default separator between path segments.
pub const DEFAULT_SEPARATOR: char = '/';

/// A normalized, non-empty path segment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PathSegment(Box<str>);

impl PathSegment {
    /// Normalize `raw` into a segment. Returns `None` if nothing is left
    /// once separators are stripped.
    #[must_use]
    pub fn new(raw: &str, separator: char) -> Option<Self> {
        let normalized = strip_and_lower(raw, separator);
        if normalized.is_empty() || normalized.contains(separator) {
            return None;
        }
        Some(Self(normalized.into_boxed_str()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for PathSegment {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Strip `separator` at both ends of `raw` and lower-case the rest.
#[must_use]
pub fn strip_and_lower(raw: &str, separator: char) -> String {
    raw.trim_matches(separator).to_lowercase()
}

/// Lower-case a single segment, borrowing when it already is.
///
/// Folds exactly like [`strip_and_lower`], titlecase letters (`ǅ`) included.
#[inline]
#[must_use]
pub fn lower_segment(segment: &str) -> Cow<'_, str> {
    if segment.chars().any(|c| !c.is_lowercase() && c.to_lowercase().ne(std::iter::once(c))) {
        Cow::Owned(segment.to_lowercase())
    } else {
        Cow::Borrowed(segment)
    }
}

/// Split `path` on `separator`, skipping empty segments.
pub fn split_segments(path: &str, separator: char) -> impl Iterator<Item = &str> {
    path.split(separator).filter(|segment| !segment.is_empty())
}

/// Full route path of an operation: `normalize(base) + separator + normalize(operation)`.
///
/// Either part may be empty; the separator between them is dropped later
/// when the path is split.
#[must_use]
pub fn build_route_path(base: &str, operation: &str, separator: char) -> String {
    let base = strip_and_lower(base, separator);
    let operation = strip_and_lower(operation, separator);
    let mut url = String::with_capacity(base.len() + operation.len() + 1);
    url.push_str(&base);
    url.push(separator);
    url.push_str(&operation);
    url
}

/// Canonical display form of a route path: segments joined by one separator.
#[must_use]
pub fn canonical_path(path: &str, separator: char) -> String {
    let mut out = String::with_capacity(path.len());
    for segment in split_segments(path, separator) {
        if !out.is_empty() {
            out.push(separator);
        }
        out.push_str(&lower_segment(segment));
    }
    out
}

/// Part of a request URI the router resolves: query string and fragment
/// removed, then the deployment `context_path` stripped from the front.
///
/// The context path only matches whole segments: with `/app`, the URI
/// `/appuser/list` is returned unchanged.
#[must_use]
pub fn controller_path<'a>(uri: &'a str, context_path: &str, separator: char) -> &'a str {
    let path = uri
        .split_once(['?', '#'])
        .map_or(uri, |(path, _)| path);
    let prefix = context_path.trim_end_matches(separator);
    if prefix.is_empty() {
        return path;
    }
    match path.strip_prefix(prefix) {
        Some(rest) if rest.is_empty() || rest.starts_with(separator) => rest,
        _ => path,
    }
}
