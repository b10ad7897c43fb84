//! Dispatcher core module - resolve, bind and invoke.

use http::Method;
use serde::Serialize;
use serde_json::Value;
use smallvec::SmallVec;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error, info_span, warn};

use super::binder::{BindError, ParamBinder, PositionalBinder, RequestData};
use crate::error::{BoxError, RouterError};
use crate::ids::{RequestId, REQUEST_ID_HEADER};
use crate::router::{controller_path, Router};

/// Inline capacity for response headers before spilling to the heap.
pub const MAX_INLINE_HEADERS: usize = 16;

/// Response header list; names are `Arc<str>` so static names clone cheaply.
pub type HeaderVec = SmallVec<[(Arc<str>, String); MAX_INLINE_HEADERS]>;

/// Response produced by an operation, or by the dispatcher on failure.
#[derive(Debug, Clone, Serialize)]
pub struct HandlerResponse {
    /// HTTP status code (200, 404, 500, etc.)
    pub status: u16,
    #[serde(skip_serializing)]
    pub headers: HeaderVec,
    pub body: Value,
}

impl HandlerResponse {
    #[must_use]
    pub fn new(status: u16, headers: HeaderVec, body: Value) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    /// JSON response with a `content-type` header.
    #[must_use]
    pub fn json(status: u16, body: Value) -> Self {
        let mut headers = HeaderVec::new();
        headers.push((Arc::from("content-type"), "application/json".to_string()));
        Self {
            status,
            headers,
            body,
        }
    }

    #[must_use]
    pub fn error(status: u16, message: &str) -> Self {
        Self::json(status, serde_json::json!({ "error": message }))
    }

    /// Header value by case-insensitive name.
    #[inline]
    #[must_use]
    pub fn get_header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Add or replace a header.
    pub fn set_header(&mut self, name: &str, value: String) {
        self.headers.retain(|(k, _)| !k.eq_ignore_ascii_case(name));
        self.headers.push((Arc::from(name), value));
    }
}

/// Transport-agnostic request handed to the [`Dispatcher`].
#[derive(Debug, Clone)]
pub struct DispatchRequest {
    pub request_id: RequestId,
    pub method: Method,
    /// Request target as received: path plus optional query string.
    pub uri: String,
    pub body: Option<Value>,
}

impl DispatchRequest {
    #[must_use]
    pub fn new(method: Method, uri: impl Into<String>) -> Self {
        Self {
            request_id: RequestId::new(),
            method,
            uri: uri.into(),
            body: None,
        }
    }

    #[must_use]
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    #[must_use]
    pub fn with_request_id(mut self, request_id: RequestId) -> Self {
        self.request_id = request_id;
        self
    }

    /// Query string without the leading `?` and without any fragment.
    #[must_use]
    pub fn query(&self) -> Option<&str> {
        let (_, rest) = self.uri.split_once('?')?;
        Some(rest.split_once('#').map_or(rest, |(query, _)| query))
    }
}

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error(transparent)]
    Route(#[from] RouterError),

    #[error(transparent)]
    Binding(#[from] BindError),

    #[error("{controller}::{operation} failed: {source}")]
    Handler {
        controller: &'static str,
        operation: String,
        #[source]
        source: BoxError,
    },
}

impl DispatchError {
    #[must_use]
    pub fn status(&self) -> u16 {
        match self {
            DispatchError::Route(e) => e.status_code().as_u16(),
            DispatchError::Binding(_) => 400,
            DispatchError::Handler { .. } => 500,
        }
    }

    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            DispatchError::Route(e) => e.kind(),
            DispatchError::Binding(_) => "binding_failure",
            DispatchError::Handler { .. } => "handler_failure",
        }
    }

    /// Problem-style JSON response for this error. A 405 carries an `Allow`
    /// header listing the accepted verbs.
    #[must_use]
    pub fn to_response(&self, request_id: RequestId) -> HandlerResponse {
        let status = self.status();
        let mut response = HandlerResponse::json(
            status,
            serde_json::json!({
                "error": self.to_string(),
                "kind": self.kind(),
                "status": status,
                "request_id": request_id,
            }),
        );
        if let DispatchError::Route(RouterError::VerbNotAllowed { allowed, .. }) = self {
            let allow: Vec<&str> = allowed.iter().map(|v| v.as_str()).collect();
            response.set_header("allow", allow.join(", "));
        }
        response
    }
}

/// Resolves a request through the [`Router`], binds the operation's
/// arguments and runs it on the shared controller instance.
pub struct Dispatcher<B = PositionalBinder> {
    router: Arc<Router>,
    binder: B,
}

impl Dispatcher {
    #[must_use]
    pub fn new(router: Arc<Router>) -> Self {
        Self::with_binder(router, PositionalBinder)
    }
}

impl<B: ParamBinder> Dispatcher<B> {
    #[must_use]
    pub fn with_binder(router: Arc<Router>, binder: B) -> Self {
        Self { router, binder }
    }

    #[must_use]
    pub fn router(&self) -> &Router {
        &self.router
    }

    /// Dispatch `request`, mapping every failure to a problem response.
    /// The response always carries an `x-request-id` header.
    pub fn dispatch(&self, request: &DispatchRequest) -> HandlerResponse {
        let mut response = match self.try_dispatch(request) {
            Ok(response) => response,
            Err(e) => {
                match &e {
                    DispatchError::Handler { .. } => {
                        error!(request_id = %request.request_id, error = %e, "Handler failed");
                    }
                    _ => {
                        warn!(
                            request_id = %request.request_id,
                            kind = e.kind(),
                            status = e.status(),
                            error = %e,
                            "Dispatch rejected"
                        );
                    }
                }
                e.to_response(request.request_id)
            }
        };
        response.set_header(REQUEST_ID_HEADER, request.request_id.to_string());
        response
    }

    /// Dispatch `request`, returning failures to the caller.
    pub fn try_dispatch(&self, request: &DispatchRequest) -> Result<HandlerResponse, DispatchError> {
        let span = info_span!(
            "dispatch",
            request_id = %request.request_id,
            method = %request.method,
            uri = %request.uri
        );
        let _enter = span.enter();

        let config = self.router.config();
        let path = controller_path(&request.uri, &config.context_path, config.separator);
        let resolved = self.router.resolve_method(&request.method, path)?;
        let operation = resolved.operation();

        let data = RequestData {
            query: request.query(),
            body: request.body.as_ref(),
        };
        let args = self.binder.bind(operation, &resolved.url_params, &data)?;
        debug!(operation = operation.name(), args = args.len(), "Arguments bound");

        let result = resolved
            .instance
            .invoke(operation.name(), args)
            .map_err(|e| DispatchError::Handler {
                controller: resolved.target.controller.name(),
                operation: operation.name().to_string(),
                source: e.into(),
            })?;
        let response = result.into_response();
        debug!(status = response.status, "Operation completed");
        Ok(response)
    }
}

impl<B> std::fmt::Debug for Dispatcher<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("routes", &self.router.routes().len())
            .finish_non_exhaustive()
    }
}
