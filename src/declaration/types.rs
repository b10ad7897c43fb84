use std::any::type_name;

use super::controller::{ControllerType, Respondable};
use super::verb::HttpVerb;
use crate::dispatcher::HandlerResponse;

/// Where a formal parameter of an operation takes its value from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamRole {
    /// Bound positionally from the leftover URL segments.
    FromUrl,
    /// Bound from the query string parameter with the given name.
    FromQuery(String),
    /// Bound from the request body.
    FromBody,
    /// Supplied by the binder by other means.
    Other,
}

/// Type tag of an operation's declared result.
///
/// The router only accepts operations whose result carries the
/// [`Respondable`] capability; the tag records whether it does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResultContract {
    type_name: &'static str,
    respondable: bool,
}

impl ResultContract {
    /// Result type implementing [`Respondable`].
    #[must_use]
    pub fn respondable<R: Respondable + ?Sized>() -> Self {
        Self {
            type_name: type_name::<R>(),
            respondable: true,
        }
    }

    /// Result type without the response capability. Registering an
    /// operation with this contract fails.
    #[must_use]
    pub fn plain<R: ?Sized>() -> Self {
        Self {
            type_name: type_name::<R>(),
            respondable: false,
        }
    }

    #[must_use]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    #[must_use]
    pub fn is_respondable(&self) -> bool {
        self.respondable
    }
}

impl Default for ResultContract {
    fn default() -> Self {
        Self::respondable::<HandlerResponse>()
    }
}

/// Declared metadata of one controller operation.
#[derive(Debug, Clone)]
pub struct OperationDecl {
    /// Operation identifier passed back to [`Controller::invoke`](super::Controller::invoke).
    pub name: String,
    /// Address relative to the controller address; may be empty.
    pub address: String,
    /// Verbs the operation accepts.
    pub verbs: Vec<HttpVerb>,
    /// Roles of the formal parameters, in declaration order.
    pub params: Vec<ParamRole>,
    pub result: ResultContract,
}

impl OperationDecl {
    /// New operation with an empty address, no verbs and no parameters.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            address: String::new(),
            verbs: Vec::new(),
            params: Vec::new(),
            result: ResultContract::default(),
        }
    }

    #[must_use]
    pub fn at(mut self, address: impl Into<String>) -> Self {
        self.address = address.into();
        self
    }

    #[must_use]
    pub fn verb(mut self, verb: HttpVerb) -> Self {
        self.verbs.push(verb);
        self
    }

    #[must_use]
    pub fn verbs(mut self, verbs: impl IntoIterator<Item = HttpVerb>) -> Self {
        self.verbs.extend(verbs);
        self
    }

    #[must_use]
    pub fn param(mut self, role: ParamRole) -> Self {
        self.params.push(role);
        self
    }

    #[must_use]
    pub fn returns(mut self, result: ResultContract) -> Self {
        self.result = result;
        self
    }

    /// Number of formals bound from leftover URL segments.
    #[must_use]
    pub fn url_param_count(&self) -> usize {
        self.params
            .iter()
            .filter(|role| **role == ParamRole::FromUrl)
            .count()
    }
}

/// Declared metadata of one controller type.
#[derive(Debug, Clone)]
pub struct ControllerDecl {
    pub controller: ControllerType,
    /// Base address shared by every operation of the controller.
    pub address: String,
    pub operations: Vec<OperationDecl>,
}

impl ControllerDecl {
    #[must_use]
    pub fn new(controller: ControllerType, address: impl Into<String>) -> Self {
        Self {
            controller,
            address: address.into(),
            operations: Vec::new(),
        }
    }

    #[must_use]
    pub fn operation(mut self, operation: OperationDecl) -> Self {
        self.operations.push(operation);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_param_count_ignores_other_roles() {
        let op = OperationDecl::new("move")
            .param(ParamRole::FromUrl)
            .param(ParamRole::FromBody)
            .param(ParamRole::FromQuery("force".into()))
            .param(ParamRole::FromUrl);
        assert_eq!(op.url_param_count(), 2);
    }

    #[test]
    fn test_default_result_is_respondable() {
        let op = OperationDecl::new("list");
        assert!(op.result.is_respondable());
        assert!(op.result.type_name().ends_with("HandlerResponse"));
        assert!(!ResultContract::plain::<String>().is_respondable());
    }
}
