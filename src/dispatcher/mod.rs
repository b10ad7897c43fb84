//! # Dispatcher Module
//!
//! Runs resolved operations: the glue between a transport layer and the
//! [`Router`](crate::router::Router).
//!
//! ## Request Flow
//!
//! 1. The context path, query string and fragment are stripped from the URI
//! 2. The router resolves the path and method to a shared controller
//!    instance, an operation and the leftover URL segments
//! 3. A [`ParamBinder`] maps leftover segments, query string and body onto
//!    the operation's formal parameters
//! 4. The controller runs the operation and its result is converted to a
//!    [`HandlerResponse`] through the [`Respondable`](crate::declaration::Respondable)
//!    capability
//!
//! ## Error Handling
//!
//! [`Dispatcher::dispatch`] never fails. Routing errors map to the status of
//! their kind (404, 405, 400, 500), binding errors to 400 and operation
//! failures to 500, each with a JSON body:
//!
//! ```json
//! { "error": "no route matches `ghost/x`", "kind": "route_not_found", "status": 404, "request_id": "01J..." }
//! ```
//!
//! [`Dispatcher::try_dispatch`] returns the [`DispatchError`] instead.

mod binder;
mod core;

pub use binder::{ArgValue, BindError, CallArgs, ParamBinder, PositionalBinder, RequestData};
pub use core::{
    DispatchError, DispatchRequest, Dispatcher, HandlerResponse, HeaderVec, MAX_INLINE_HEADERS,
};
