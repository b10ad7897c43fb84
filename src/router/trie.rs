//! Segment trie used to store routes.
//!
//! Each node represents one normalized path segment and may carry a data
//! value (the routing entry of a registered route). Matching is a greedy
//! walk over literal segments: it descends while a child matches the next
//! segment and stops at the first miss, without backtracking. The segments
//! that were not consumed are reported back as the leftover, so a caller can
//! interpret them as positional URL parameters.
//!
//! ```text
//!            (root)
//!              |
//!            user ─────────┐
//!           /    \          \
//!        list*   get*      admin
//!                             \
//!                            reset*
//! ```
//!
//! Resolving `user/get/42` stops at `get*` with leftover `["42"]`;
//! resolving `ghost/x` stops at the root with leftover `["ghost", "x"]`.

use smallvec::SmallVec;
use std::collections::HashMap;

use super::path::{canonical_path, lower_segment, split_segments, strip_and_lower, PathSegment};
use crate::error::RouterError;

/// Number of path segments kept inline before a match spills to the heap.
pub const MAX_INLINE_SEGMENTS: usize = 8;

/// Borrowed path segments of one lookup.
pub type SegmentVec<'p> = SmallVec<[&'p str; MAX_INLINE_SEGMENTS]>;

/// Node of the trie. Children are owned exclusively by their parent.
#[derive(Debug)]
pub struct TrieNode<T> {
    children: HashMap<PathSegment, TrieNode<T>>,
    data: Option<T>,
}

impl<T> Default for TrieNode<T> {
    fn default() -> Self {
        Self {
            children: HashMap::new(),
            data: None,
        }
    }
}

impl<T> TrieNode<T> {
    /// Data attached when this node terminated a registered route.
    #[must_use]
    pub fn data(&self) -> Option<&T> {
        self.data.as_ref()
    }

    /// Child for `segment`, compared case-insensitively.
    #[must_use]
    pub fn child(&self, segment: &str) -> Option<&TrieNode<T>> {
        self.children.get(lower_segment(segment).as_ref())
    }

    #[must_use]
    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    fn collect_entries<'t>(&'t self, prefix: &mut Vec<&'t str>, separator: char, out: &mut Vec<(String, &'t T)>) {
        if let Some(data) = &self.data {
            let mut path = String::new();
            for (i, segment) in prefix.iter().enumerate() {
                if i > 0 {
                    path.push(separator);
                }
                path.push_str(segment);
            }
            out.push((path, data));
        }
        for (segment, child) in &self.children {
            prefix.push(segment.as_str());
            child.collect_entries(prefix, separator, out);
            prefix.pop();
        }
    }
}

/// Outcome of [`PathTrie::try_to_resolve`].
#[derive(Debug)]
pub struct TrieMatch<'t, 'p, T> {
    /// Deepest node reached; its data may be absent.
    pub node: &'t TrieNode<T>,
    /// Number of segments consumed by the walk.
    pub consumed: usize,
    /// Segments left after the walk stopped, in request order and case.
    pub leftover: SegmentVec<'p>,
}

impl<'t, T> TrieMatch<'t, '_, T> {
    #[must_use]
    pub fn data(&self) -> Option<&'t T> {
        self.node.data()
    }
}

/// Tree of [`TrieNode`]s keyed by path segments split on one separator.
///
/// Built once during registration; read-only afterwards, so shared
/// references can be used from many threads without locking.
#[derive(Debug)]
pub struct PathTrie<T> {
    root: TrieNode<T>,
    separator: char,
    len: usize,
}

impl<T> PathTrie<T> {
    #[must_use]
    pub fn new(separator: char) -> Self {
        Self {
            root: TrieNode::default(),
            separator,
            len: 0,
        }
    }

    #[must_use]
    pub fn separator(&self) -> char {
        self.separator
    }

    /// Number of nodes carrying data.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[must_use]
    pub fn root(&self) -> &TrieNode<T> {
        &self.root
    }

    /// Attach `data` to the node at `full_path`, creating missing nodes.
    ///
    /// Fails with `DuplicateRoute` if that node already carries data; the trie
    /// is left unchanged apart from intermediate nodes that may have been
    /// created on the way.
    pub fn register_data(&mut self, full_path: &str, data: T) -> Result<&T, RouterError> {
        let normalized = strip_and_lower(full_path, self.separator);
        let mut node = &mut self.root;
        for segment in split_segments(&normalized, self.separator) {
            let Some(key) = PathSegment::new(segment, self.separator) else {
                continue;
            };
            node = node.children.entry(key).or_default();
        }
        if node.data.is_some() {
            return Err(RouterError::DuplicateRoute {
                path: canonical_path(&normalized, self.separator),
                verb: None,
            });
        }
        self.len += 1;
        Ok(node.data.insert(data))
    }

    /// Walk from the root consuming segments of `full_path` while a child
    /// matches, and report where the walk stopped.
    ///
    /// An empty path resolves to the root with no leftover.
    #[must_use]
    pub fn try_to_resolve<'t, 'p>(&'t self, full_path: &'p str) -> TrieMatch<'t, 'p, T> {
        let mut segments = split_segments(full_path, self.separator);
        let mut node = &self.root;
        let mut consumed = 0;
        let mut leftover = SegmentVec::new();

        for segment in segments.by_ref() {
            match node.child(segment) {
                Some(child) => {
                    node = child;
                    consumed += 1;
                }
                None => {
                    leftover.push(segment);
                    break;
                }
            }
        }
        leftover.extend(segments);

        TrieMatch {
            node,
            consumed,
            leftover,
        }
    }

    /// Data registered at exactly `full_path`, without creating nodes.
    #[must_use]
    pub fn get(&self, full_path: &str) -> Option<&T> {
        let mut node = &self.root;
        for segment in split_segments(full_path, self.separator) {
            node = node.child(segment)?;
        }
        node.data()
    }

    /// Every registered path with its data, sorted by path.
    #[must_use]
    pub fn entries(&self) -> Vec<(String, &T)> {
        let mut out = Vec::with_capacity(self.len);
        let mut prefix = Vec::new();
        self.root.collect_entries(&mut prefix, self.separator, &mut out);
        out.sort_by(|a, b| a.0.cmp(&b.0));
        out
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    fn trie() -> PathTrie<&'static str> {
        let mut trie = PathTrie::new('/');
        trie.register_data("user/list", "list").unwrap();
        trie.register_data("/User/Get/", "get").unwrap();
        trie.register_data("user/admin/reset", "reset").unwrap();
        trie
    }

    #[test]
    fn test_exact_match_has_no_leftover() {
        let trie = trie();
        let m = trie.try_to_resolve("user/list");
        assert_eq!(m.data(), Some(&"list"));
        assert_eq!(m.consumed, 2);
        assert!(m.leftover.is_empty());
    }

    #[test]
    fn test_trailing_segments_become_leftover() {
        let trie = trie();
        let m = trie.try_to_resolve("user/get/42/Abc");
        assert_eq!(m.data(), Some(&"get"));
        assert_eq!(m.leftover.as_slice(), &["42", "Abc"]);
    }

    #[test]
    fn test_match_is_case_insensitive_and_collapses_separators() {
        let trie = trie();
        for path in ["/USER/LIST/", "user//list", "User/List"] {
            let m = trie.try_to_resolve(path);
            assert_eq!(m.data(), Some(&"list"), "path {path}");
            assert!(m.leftover.is_empty());
        }
    }

    #[test]
    fn test_titlecase_request_matches_its_own_route() {
        let mut trie = PathTrie::new('/');
        trie.register_data("\u{1C5}emo/x", "demo").unwrap();
        for path in ["\u{1C4}EMO/x", "\u{1C6}emo/x", "\u{1C5}emo/x"] {
            let m = trie.try_to_resolve(path);
            assert_eq!(m.data(), Some(&"demo"), "path {path}");
            assert!(m.leftover.is_empty());
        }
    }

    #[test]
    fn test_get_is_exact_and_read_only() {
        let trie = trie();
        assert_eq!(trie.get("/USER/get"), Some(&"get"));
        assert_eq!(trie.get("user/get/42"), None);
        assert_eq!(trie.get("user/admin"), None);
        assert_eq!(trie.get("ghost"), None);
        assert_eq!(trie.len(), 3);
    }

    #[test]
    fn test_miss_at_root_returns_root() {
        let trie = trie();
        let m = trie.try_to_resolve("ghost/x");
        assert!(std::ptr::eq(m.node, trie.root()));
        assert_eq!(m.consumed, 0);
        assert_eq!(m.leftover.as_slice(), &["ghost", "x"]);
        assert!(m.data().is_none());
    }

    #[test]
    fn test_intermediate_node_has_no_data() {
        let trie = trie();
        let m = trie.try_to_resolve("user/admin");
        assert!(m.data().is_none());
        assert!(m.leftover.is_empty());
    }

    #[test]
    fn test_empty_path_resolves_to_root() {
        let trie = trie();
        let m = trie.try_to_resolve("");
        assert!(std::ptr::eq(m.node, trie.root()));
        assert!(m.leftover.is_empty());
    }

    #[test]
    fn test_no_backtracking() {
        // `user/admin` exists as an intermediate node; `user/admin/42` must
        // stop there rather than fall back to a shorter registered route.
        let trie = trie();
        let m = trie.try_to_resolve("user/admin/42");
        assert!(m.data().is_none());
        assert_eq!(m.leftover.as_slice(), &["42"]);
    }

    #[test]
    fn test_duplicate_registration_fails() {
        let mut trie = trie();
        let err = trie.register_data("USER//list/", "again").unwrap_err();
        assert!(matches!(err, RouterError::DuplicateRoute { ref path, .. } if path == "user/list"));
        assert_eq!(trie.len(), 3);
        assert_eq!(trie.try_to_resolve("user/list").data(), Some(&"list"));
    }

    #[test]
    fn test_custom_separator() {
        let mut trie = PathTrie::new('.');
        trie.register_data(".svc.Echo.", 1).unwrap();
        let m = trie.try_to_resolve("svc.echo.hello");
        assert_eq!(m.data(), Some(&1));
        assert_eq!(m.leftover.as_slice(), &["hello"]);
    }

    #[test]
    fn test_entries_are_sorted() {
        let trie = trie();
        let paths: Vec<String> = trie.entries().into_iter().map(|(p, _)| p).collect();
        assert_eq!(paths, vec!["user/admin/reset", "user/get", "user/list"]);
    }
}
