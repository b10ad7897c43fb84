//! Per-node routing payload: the controller type and its verb → operation table.

use std::sync::Arc;

use crate::declaration::{
    ControllerType, HttpVerb, OperationDecl, ParamRole, ResultContract, VERB_COUNT,
};
use crate::error::RouterError;

/// Validated, immutable view of one operation declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationDescriptor {
    name: String,
    params: Vec<ParamRole>,
    url_param_count: usize,
    result: ResultContract,
}

impl OperationDescriptor {
    /// Validate `decl` for `controller`.
    ///
    /// Rejects an empty operation name, an operation without verbs, a verb
    /// listed twice and a result type without the respondable capability.
    pub fn from_decl(controller: &str, decl: &OperationDecl) -> Result<Self, RouterError> {
        if decl.name.trim().is_empty() {
            return Err(RouterError::invalid(controller, "<unnamed>", "operation name is empty"));
        }
        if decl.verbs.is_empty() {
            return Err(RouterError::invalid(controller, &decl.name, "no HTTP verb declared"));
        }
        for (i, verb) in decl.verbs.iter().enumerate() {
            if decl.verbs[..i].contains(verb) {
                return Err(RouterError::invalid(
                    controller,
                    &decl.name,
                    format!("verb {verb} listed more than once"),
                ));
            }
        }
        if !decl.result.is_respondable() {
            return Err(RouterError::invalid(
                controller,
                &decl.name,
                format!(
                    "result type {} does not implement Respondable",
                    decl.result.type_name()
                ),
            ));
        }

        Ok(Self {
            name: decl.name.clone(),
            params: decl.params.clone(),
            url_param_count: decl.url_param_count(),
            result: decl.result,
        })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn params(&self) -> &[ParamRole] {
        &self.params
    }

    /// Number of formals bound from leftover URL segments.
    #[inline]
    #[must_use]
    pub fn url_param_count(&self) -> usize {
        self.url_param_count
    }

    /// Indexes of the formals bound from leftover URL segments, in order.
    pub fn url_param_positions(&self) -> impl Iterator<Item = usize> + '_ {
        self.params
            .iter()
            .enumerate()
            .filter(|(_, role)| **role == ParamRole::FromUrl)
            .map(|(i, _)| i)
    }

    #[must_use]
    pub fn result(&self) -> ResultContract {
        self.result
    }
}

/// Routing entry stored on a trie node.
///
/// One entry belongs to exactly one controller type and maps each verb to at
/// most one operation.
#[derive(Debug, Clone)]
pub struct RoutingEntry {
    controller: ControllerType,
    operations: [Option<Arc<OperationDescriptor>>; VERB_COUNT],
}

impl RoutingEntry {
    #[must_use]
    pub fn new(controller: ControllerType) -> Self {
        Self {
            controller,
            operations: Default::default(),
        }
    }

    /// Bind `operation` to each of `verbs`.
    ///
    /// Fails with `DuplicateRoute` if one of the verbs is already bound; in
    /// that case the entry is left unchanged.
    pub fn bind(
        &mut self,
        path: &str,
        verbs: &[HttpVerb],
        operation: &Arc<OperationDescriptor>,
    ) -> Result<(), RouterError> {
        if let Some(taken) = verbs.iter().find(|verb| self.operations[verb.index()].is_some()) {
            return Err(RouterError::DuplicateRoute {
                path: path.to_string(),
                verb: Some(*taken),
            });
        }
        for verb in verbs {
            self.operations[verb.index()] = Some(Arc::clone(operation));
        }
        Ok(())
    }

    /// Operation registered for `verb`, if any.
    #[inline]
    #[must_use]
    pub fn operation_for(&self, verb: HttpVerb) -> Option<&Arc<OperationDescriptor>> {
        self.operations[verb.index()].as_ref()
    }

    #[must_use]
    pub fn controller(&self) -> &ControllerType {
        &self.controller
    }

    /// Verbs this entry answers, in [`HttpVerb::ALL`] order.
    #[must_use]
    pub fn verbs(&self) -> Vec<HttpVerb> {
        HttpVerb::ALL
            .into_iter()
            .filter(|verb| self.operations[verb.index()].is_some())
            .collect()
    }
}
