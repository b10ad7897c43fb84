//! # htf-router
//!
//! Request routing for controller-style services: controllers declare a base
//! address and a set of operations, each with its own address, accepted verbs
//! and parameter roles. The router turns those declarations into a segment
//! trie and resolves every request to a shared controller instance, the
//! operation to run and the positional URL parameters left over by the match.
//!
//! ## Architecture
//!
//! - **[`declaration`]** - Controller and operation metadata, the
//!   [`Controller`](declaration::Controller) and
//!   [`Respondable`](declaration::Respondable) traits, declaration providers
//! - **[`router`]** - Path normalization, the segment trie, routing entries,
//!   registration and resolution
//! - **[`cache`]** - One lazily created controller instance per type
//! - **[`dispatcher`]** - Argument binding and invocation, with JSON problem
//!   responses for routing failures
//! - **[`config`]** - Separator, context path and parameter case settings
//! - **[`logging`]** - `tracing` subscriber setup
//! - **[`error`]** - The [`RouterError`] kinds
//!
//! ### Request Handling Flow
//!
//! ```text
//! uri ──► controller_path ──► PathTrie::try_to_resolve ──► RoutingEntry
//!                                                              │ verb
//!                                                              ▼
//!     HandlerResponse ◄── Controller::invoke ◄── ParamBinder ◄── OperationDescriptor
//!                                ▲                                 + leftover segments
//!                                └── TargetCache::get_or_create
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use htf_router::controllers;
//! use htf_router::dispatcher::{DispatchRequest, Dispatcher};
//! use htf_router::router::Router;
//! use http::Method;
//! use std::sync::Arc;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let router = Arc::new(Router::new(&controllers::declarations())?);
//! let dispatcher = Dispatcher::new(router);
//!
//! let response = dispatcher.dispatch(&DispatchRequest::new(Method::GET, "/user/get/abc-123"));
//! assert_eq!(response.status, 200);
//! assert_eq!(response.body["name"], "John");
//!
//! let response = dispatcher.dispatch(&DispatchRequest::new(Method::POST, "/user/list"));
//! assert_eq!(response.status, 405);
//! assert_eq!(response.get_header("allow"), Some("GET"));
//! # Ok(())
//! # }
//! ```
//!
//! ## Matching Rules
//!
//! - Segments are compared case-insensitively; empty segments are ignored
//! - The walk is greedy over literal segments and never backtracks
//! - Segments left after the walk are the operation's URL parameters, and
//!   their count must equal the number of `FromUrl` formals
//! - A path reaching a node without an entry is `RouteNotFound`, a missing
//!   verb is `VerbNotAllowed`, a count mismatch is `UnresolvableUrl`

pub mod cache;
pub mod cli;
pub mod config;
pub mod controllers;
pub mod declaration;
pub mod dispatcher;
pub mod error;
pub mod ids;
pub mod logging;
pub mod router;

pub use config::RouterConfig;
pub use error::RouterError;
pub use router::{ResolvedRoute, Router, RouterBuilder};
