//! # Router Module
//!
//! Registration and resolution of controller routes.
//!
//! ## Overview
//!
//! The router is responsible for:
//! - Building a segment trie from controller declarations
//! - Matching incoming request paths against the trie
//! - Capturing trailing, unmatched segments as positional URL parameters
//! - Selecting the operation for the request verb
//! - Handing back the shared controller instance to run it on
//!
//! ## Architecture
//!
//! The router uses a two-phase approach:
//!
//! 1. **Registration**: At startup, each operation's full path
//!    (`controller address / operation address`, normalized) is inserted into
//!    a [`PathTrie`]. The terminal node of each path carries a
//!    [`RoutingEntry`] mapping verbs to operations.
//!
//! 2. **Resolution**: For each request the trie is walked greedily over
//!    literal segments. The node reached must carry an entry
//!    (`RouteNotFound` otherwise), the entry must have an operation for the
//!    verb (`VerbNotAllowed`), and the number of leftover segments must equal
//!    the operation's URL parameter count (`UnresolvableUrl`).
//!
//! ## Example
//!
//! ```rust
//! use htf_router::controllers;
//! use htf_router::declaration::HttpVerb;
//! use htf_router::router::Router;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let router = Router::new(&controllers::declarations())?;
//!
//! let resolved = router.resolve("/user/get/42", HttpVerb::Get)?;
//! assert_eq!(resolved.operation().name(), "get");
//! assert_eq!(resolved.url_params.as_slice(), &["42".to_string()]);
//!
//! assert!(router.resolve("/user/get", HttpVerb::Get).is_err());
//! # Ok(())
//! # }
//! ```
//!
//! ## Ambiguity
//!
//! Matching never backtracks. If `a/b` is registered with one URL parameter,
//! a request for an unregistered `a/b/c` lands on `a/b` with `c` as its
//! parameter. Declarations should avoid operation addresses that can be
//! mistaken for parameter values of a shorter route.

mod core;
mod entry;
mod path;
mod trie;

pub use core::{ParamVec, ResolvedRoute, RouteInfo, RouteMatch, RouteTarget, Router, RouterBuilder};
pub use entry::{OperationDescriptor, RoutingEntry};
pub use path::{
    build_route_path, canonical_path, controller_path, split_segments, strip_and_lower,
    PathSegment, DEFAULT_SEPARATOR,
};
pub use trie::{PathTrie, SegmentVec, TrieMatch, TrieNode, MAX_INLINE_SEGMENTS};
