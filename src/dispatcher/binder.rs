//! Argument binding: turning URL parameters, query string and body into the
//! positional arguments of an operation.

use serde_json::Value;
use smallvec::SmallVec;
use thiserror::Error;

use crate::declaration::ParamRole;
use crate::router::{OperationDescriptor, MAX_INLINE_SEGMENTS};

/// One bound argument.
#[derive(Debug, Clone, PartialEq)]
pub enum ArgValue {
    /// Taken from a leftover URL segment.
    Url(String),
    /// Taken from a query string parameter.
    Query(String),
    /// The request body.
    Body(Value),
    /// Nothing to bind: an absent query parameter or an `Other` formal.
    Missing,
}

impl ArgValue {
    /// Text of a URL or query argument.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ArgValue::Url(s) | ArgValue::Query(s) => Some(s),
            ArgValue::Body(_) | ArgValue::Missing => None,
        }
    }

    #[must_use]
    pub fn as_body(&self) -> Option<&Value> {
        match self {
            ArgValue::Body(v) => Some(v),
            _ => None,
        }
    }
}

/// Arguments of one call, in the order the operation declares its formals.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CallArgs {
    values: SmallVec<[ArgValue; MAX_INLINE_SEGMENTS]>,
}

impl CallArgs {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, value: ArgValue) {
        self.values.push(value);
    }

    /// Argument at formal position `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&ArgValue> {
        self.values.get(index)
    }

    /// Text of the argument at `index`, if it came from the URL or query.
    #[must_use]
    pub fn str(&self, index: usize) -> Option<&str> {
        self.get(index).and_then(ArgValue::as_str)
    }

    /// The `nth` URL-bound argument, counting only URL arguments.
    #[must_use]
    pub fn url(&self, nth: usize) -> Option<&str> {
        self.values
            .iter()
            .filter_map(|v| match v {
                ArgValue::Url(s) => Some(s.as_str()),
                _ => None,
            })
            .nth(nth)
    }

    /// First body argument.
    #[must_use]
    pub fn body(&self) -> Option<&Value> {
        self.values.iter().find_map(ArgValue::as_body)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ArgValue> {
        self.values.iter()
    }
}

impl FromIterator<ArgValue> for CallArgs {
    fn from_iter<I: IntoIterator<Item = ArgValue>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

/// Request parts besides the path that a binder may draw from.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestData<'a> {
    /// Raw query string without the leading `?`.
    pub query: Option<&'a str>,
    pub body: Option<&'a Value>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BindError {
    #[error("operation {operation} expects more url parameters than the path carries")]
    MissingUrlParam { operation: String },

    #[error("operation {operation} requires a request body")]
    MissingBody { operation: String },
}

/// Strategy mapping leftover URL segments and request data onto an
/// operation's formal parameters.
pub trait ParamBinder: Send + Sync {
    fn bind(
        &self,
        operation: &OperationDescriptor,
        url_params: &[String],
        request: &RequestData<'_>,
    ) -> Result<CallArgs, BindError>;
}

/// Default binder: `FromUrl` formals take the leftover segments in order,
/// `FromQuery` formals look up their name in the query string, `FromBody`
/// formals take the whole body.
#[derive(Debug, Clone, Copy, Default)]
pub struct PositionalBinder;

impl ParamBinder for PositionalBinder {
    fn bind(
        &self,
        operation: &OperationDescriptor,
        url_params: &[String],
        request: &RequestData<'_>,
    ) -> Result<CallArgs, BindError> {
        let mut url = url_params.iter();
        let mut args = CallArgs::new();
        for role in operation.params() {
            let value = match role {
                ParamRole::FromUrl => {
                    let segment = url.next().ok_or_else(|| BindError::MissingUrlParam {
                        operation: operation.name().to_string(),
                    })?;
                    ArgValue::Url(segment.clone())
                }
                ParamRole::FromQuery(name) => request
                    .query
                    .and_then(|query| query_value(query, name))
                    .map_or(ArgValue::Missing, ArgValue::Query),
                ParamRole::FromBody => {
                    let body = request.body.ok_or_else(|| BindError::MissingBody {
                        operation: operation.name().to_string(),
                    })?;
                    ArgValue::Body(body.clone())
                }
                ParamRole::Other => ArgValue::Missing,
            };
            args.push(value);
        }
        Ok(args)
    }
}

/// First value of `name` in a form-encoded query string.
fn query_value(query: &str, name: &str) -> Option<String> {
    url::form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.into_owned())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use crate::declaration::{HttpVerb, OperationDecl};
    use serde_json::json;

    fn descriptor(decl: OperationDecl) -> OperationDescriptor {
        OperationDescriptor::from_decl("Test", &decl.verb(HttpVerb::Post)).unwrap()
    }

    #[test]
    fn test_binds_each_role() {
        let op = descriptor(
            OperationDecl::new("move")
                .param(ParamRole::FromUrl)
                .param(ParamRole::FromQuery("force".into()))
                .param(ParamRole::FromBody)
                .param(ParamRole::FromUrl)
                .param(ParamRole::Other),
        );
        let body = json!({"to": "archive"});
        let request = RequestData {
            query: Some("force=yes%21&x=1"),
            body: Some(&body),
        };
        let url_params = vec!["a".to_string(), "b".to_string()];

        let args = PositionalBinder.bind(&op, &url_params, &request).unwrap();
        assert_eq!(args.len(), 5);
        assert_eq!(args.str(0), Some("a"));
        assert_eq!(args.str(1), Some("yes!"));
        assert_eq!(args.body(), Some(&body));
        assert_eq!(args.url(1), Some("b"));
        assert_eq!(args.get(4), Some(&ArgValue::Missing));
    }

    #[test]
    fn test_absent_query_is_missing() {
        let op = descriptor(OperationDecl::new("search").param(ParamRole::FromQuery("q".into())));
        let args = PositionalBinder
            .bind(&op, &[], &RequestData::default())
            .unwrap();
        assert_eq!(args.get(0), Some(&ArgValue::Missing));
    }

    #[test]
    fn test_missing_body_fails() {
        let op = descriptor(OperationDecl::new("create").param(ParamRole::FromBody));
        let err = PositionalBinder
            .bind(&op, &[], &RequestData::default())
            .unwrap_err();
        assert_eq!(
            err,
            BindError::MissingBody {
                operation: "create".into()
            }
        );
    }
}
