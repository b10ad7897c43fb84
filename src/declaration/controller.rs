use std::any::{type_name, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::dispatcher::{CallArgs, HandlerResponse};

/// Capability the transport layer recognizes as convertible to an HTTP response.
///
/// Every operation result must carry it; the router checks the declared
/// [`ResultContract`](super::ResultContract) at registration time.
pub trait Respondable: Send {
    fn into_response(self: Box<Self>) -> HandlerResponse;
}

impl Respondable for HandlerResponse {
    fn into_response(self: Box<Self>) -> HandlerResponse {
        *self
    }
}

/// A live handler instance. One instance per controller type is shared by
/// every request routed to it, so implementations must be `Sync`.
pub trait Controller: Send + Sync + 'static {
    /// Run `operation` with already bound arguments.
    fn invoke(&self, operation: &str, args: CallArgs) -> anyhow::Result<Box<dyn Respondable>>;
}

type Factory = Arc<dyn Fn() -> anyhow::Result<Arc<dyn Controller>> + Send + Sync>;

/// Identifier of a controller type plus its zero-argument construction contract.
///
/// Equality and hashing use the underlying [`TypeId`] only.
#[derive(Clone)]
pub struct ControllerType {
    id: TypeId,
    name: &'static str,
    factory: Factory,
}

impl ControllerType {
    /// Controller constructed through [`Default`].
    #[must_use]
    pub fn of<T: Controller + Default>() -> Self {
        Self::with_factory::<T>(|| Ok(T::default()))
    }

    /// Controller constructed by a fallible factory. A factory error surfaces
    /// as `InstantiationFailure` on first use.
    #[must_use]
    pub fn with_factory<T: Controller>(factory: fn() -> anyhow::Result<T>) -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: short_type_name::<T>(),
            factory: Arc::new(move || {
                factory().map(|controller| Arc::new(controller) as Arc<dyn Controller>)
            }),
        }
    }

    #[must_use]
    pub fn id(&self) -> TypeId {
        self.id
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Build a fresh instance. Callers should go through
    /// [`TargetCache`](crate::cache::TargetCache) instead.
    pub fn instantiate(&self) -> anyhow::Result<Arc<dyn Controller>> {
        (self.factory)()
    }
}

fn short_type_name<T: ?Sized>() -> &'static str {
    let full = type_name::<T>();
    full.rsplit("::").next().unwrap_or(full)
}

impl fmt::Debug for ControllerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ControllerType")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl PartialEq for ControllerType {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ControllerType {}

impl Hash for ControllerType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[derive(Default)]
    struct Ping;

    impl Controller for Ping {
        fn invoke(&self, _operation: &str, _args: CallArgs) -> anyhow::Result<Box<dyn Respondable>> {
            Ok(Box::new(HandlerResponse::json(200, serde_json::json!("pong"))))
        }
    }

    struct Broken;

    impl Controller for Broken {
        fn invoke(&self, _operation: &str, _args: CallArgs) -> anyhow::Result<Box<dyn Respondable>> {
            anyhow::bail!("never built")
        }
    }

    #[test]
    fn test_type_identity_and_name() {
        let a = ControllerType::of::<Ping>();
        let b = ControllerType::of::<Ping>();
        assert_eq!(a, b);
        assert_eq!(a.name(), "Ping");
        assert_ne!(a, ControllerType::with_factory::<Broken>(|| anyhow::bail!("no")));
    }

    #[test]
    fn test_instantiate_runs_factory() {
        let ping = ControllerType::of::<Ping>().instantiate().unwrap();
        let response = ping
            .invoke("ping", CallArgs::default())
            .unwrap()
            .into_response();
        assert_eq!(response.status, 200);

        let broken = ControllerType::with_factory::<Broken>(|| anyhow::bail!("missing dependency"));
        assert!(broken.instantiate().is_err());
    }
}
