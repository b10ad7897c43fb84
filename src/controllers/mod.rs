//! Sample controllers used by the `htf-router` binary, the doc examples and
//! the integration tests.

mod pet;
mod user;

pub use pet::{Pet, PetController};
pub use user::{User, UserController};

use crate::declaration::{ControllerDecl, StaticRegistry};

/// Declarations of every sample controller.
#[must_use]
pub fn declarations() -> Vec<ControllerDecl> {
    vec![UserController::declaration(), PetController::declaration()]
}

/// The sample controllers as a [`StaticRegistry`].
#[must_use]
pub fn registry() -> StaticRegistry {
    declarations()
        .into_iter()
        .fold(StaticRegistry::new(), StaticRegistry::with)
}
