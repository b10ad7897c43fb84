//! # Declaration Module
//!
//! Plain metadata describing controllers and their operations, as handed to
//! the router by a [`DeclarationProvider`].
//!
//! A controller declaration carries a base address and a list of operations.
//! Each operation carries its own address, the verbs it accepts, the roles of
//! its formal parameters and a tag of its result type. The router joins the
//! two addresses into the full route path:
//!
//! ```rust
//! use htf_router::declaration::{ControllerDecl, ControllerType, HttpVerb, OperationDecl, ParamRole};
//! # use htf_router::declaration::{Controller, Respondable};
//! # use htf_router::dispatcher::CallArgs;
//! # #[derive(Default)] struct UserController;
//! # impl Controller for UserController {
//! #     fn invoke(&self, _: &str, _: CallArgs) -> anyhow::Result<Box<dyn Respondable>> { unimplemented!() }
//! # }
//!
//! let users = ControllerDecl::new(ControllerType::of::<UserController>(), "user")
//!     .operation(OperationDecl::new("list").at("list").verb(HttpVerb::Get))
//!     .operation(
//!         OperationDecl::new("get")
//!             .at("get")
//!             .verb(HttpVerb::Get)
//!             .param(ParamRole::FromUrl),
//!     );
//! assert_eq!(users.operations.len(), 2);
//! ```

mod controller;
mod provider;
mod types;
mod verb;

pub use controller::{Controller, ControllerType, Respondable};
pub use provider::{DeclarationProvider, StaticRegistry};
pub use types::{ControllerDecl, OperationDecl, ParamRole, ResultContract};
pub use verb::{HttpVerb, UnsupportedMethod, VERB_COUNT};
