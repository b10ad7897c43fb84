//! Request correlation ids.
//!
//! Every [`DispatchRequest`](crate::dispatcher::DispatchRequest) carries a
//! [`RequestId`]. The dispatcher records it on the `dispatch` span, embeds it
//! in problem responses and echoes it back in the [`REQUEST_ID_HEADER`]
//! response header. An id supplied by the caller is reused when it parses as
//! a ULID, so one id follows a request across services.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Header a caller may set and that every dispatched response carries.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

#[derive(Debug, Error)]
#[error("invalid request id {value:?}: {source}")]
pub struct InvalidRequestId {
    value: String,
    #[source]
    source: ulid::DecodeError,
}

/// Correlation id of one dispatched request. Sorts by creation time.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct RequestId(pub ulid::Ulid);

impl RequestId {
    #[must_use]
    pub fn new() -> Self {
        Self(ulid::Ulid::new())
    }

    /// Caller-supplied id if it is a valid ULID, else a fresh one.
    #[must_use]
    pub fn from_header_or_new(header_value: Option<&str>) -> Self {
        header_value
            .and_then(|value| value.trim().parse().ok())
            .unwrap_or_default()
    }

    /// [`RequestId::from_header_or_new`] over the [`REQUEST_ID_HEADER`] of
    /// an inbound request.
    #[must_use]
    pub fn from_headers(headers: &http::HeaderMap) -> Self {
        Self::from_header_or_new(
            headers
                .get(REQUEST_ID_HEADER)
                .and_then(|value| value.to_str().ok()),
        )
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for RequestId {
    type Err = InvalidRequestId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ulid::Ulid::from_string(s)
            .map(Self)
            .map_err(|source| InvalidRequestId {
                value: s.to_string(),
                source,
            })
    }
}

impl TryFrom<String> for RequestId {
    type Error = InvalidRequestId;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<RequestId> for String {
    fn from(id: RequestId) -> Self {
        id.to_string()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn test_caller_id_is_reused() {
        let id = RequestId::new();
        let padded = format!(" {id} ");
        assert_eq!(RequestId::from_header_or_new(Some(&padded)), id);
        assert_ne!(RequestId::from_header_or_new(Some("not-a-ulid")), id);
    }

    #[test]
    fn test_from_inbound_headers() {
        let id = RequestId::new();
        let mut headers = http::HeaderMap::new();
        headers.insert(REQUEST_ID_HEADER, id.to_string().parse().unwrap());
        assert_eq!(RequestId::from_headers(&headers), id);

        headers.insert(REQUEST_ID_HEADER, http::HeaderValue::from_static("garbage"));
        assert_ne!(RequestId::from_headers(&headers), id);
    }

    #[test]
    fn test_json_form_is_the_ulid_string() {
        let id = RequestId::new();
        let json = serde_json::to_value(id).unwrap();
        assert_eq!(json, serde_json::Value::String(id.to_string()));
        assert_eq!(serde_json::from_value::<RequestId>(json).unwrap(), id);

        let err = serde_json::from_str::<RequestId>("\"nope\"").unwrap_err();
        assert!(err.to_string().contains("\"nope\""));
    }
}
