use http::Method;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// HTTP verbs a controller operation can be bound to.
///
/// Only the five verbs below can carry a route; PATCH, OPTIONS, TRACE and
/// CONNECT are rejected at conversion time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpVerb {
    Delete,
    Get,
    Head,
    Post,
    Put,
}

/// Returned when a method has no [`HttpVerb`] counterpart.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unsupported HTTP method `{0}`")]
pub struct UnsupportedMethod(pub String);

/// Number of routable verbs.
pub const VERB_COUNT: usize = 5;

impl HttpVerb {
    pub const ALL: [HttpVerb; VERB_COUNT] = [
        HttpVerb::Delete,
        HttpVerb::Get,
        HttpVerb::Head,
        HttpVerb::Post,
        HttpVerb::Put,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            HttpVerb::Delete => "DELETE",
            HttpVerb::Get => "GET",
            HttpVerb::Head => "HEAD",
            HttpVerb::Post => "POST",
            HttpVerb::Put => "PUT",
        }
    }

    /// Dense index, used for the per-entry verb table.
    #[inline]
    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for HttpVerb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HttpVerb {
    type Err = UnsupportedMethod;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        HttpVerb::ALL
            .into_iter()
            .find(|verb| verb.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnsupportedMethod(s.to_string()))
    }
}

impl TryFrom<&Method> for HttpVerb {
    type Error = UnsupportedMethod;

    fn try_from(method: &Method) -> Result<Self, Self::Error> {
        match *method {
            Method::DELETE => Ok(HttpVerb::Delete),
            Method::GET => Ok(HttpVerb::Get),
            Method::HEAD => Ok(HttpVerb::Head),
            Method::POST => Ok(HttpVerb::Post),
            Method::PUT => Ok(HttpVerb::Put),
            _ => Err(UnsupportedMethod(method.as_str().to_string())),
        }
    }
}

impl From<HttpVerb> for Method {
    fn from(verb: HttpVerb) -> Self {
        match verb {
            HttpVerb::Delete => Method::DELETE,
            HttpVerb::Get => Method::GET,
            HttpVerb::Head => Method::HEAD,
            HttpVerb::Post => Method::POST,
            HttpVerb::Put => Method::PUT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("get".parse::<HttpVerb>(), Ok(HttpVerb::Get));
        assert_eq!("Delete".parse::<HttpVerb>(), Ok(HttpVerb::Delete));
        assert_eq!(
            "PATCH".parse::<HttpVerb>(),
            Err(UnsupportedMethod("PATCH".into()))
        );
    }

    #[test]
    fn test_method_conversion() {
        assert_eq!(HttpVerb::try_from(&Method::PUT), Ok(HttpVerb::Put));
        assert!(HttpVerb::try_from(&Method::OPTIONS).is_err());
        assert_eq!(Method::from(HttpVerb::Head), Method::HEAD);
    }

    #[test]
    fn test_indexes_are_dense() {
        for (i, verb) in HttpVerb::ALL.into_iter().enumerate() {
            assert_eq!(verb.index(), i);
        }
    }
}
