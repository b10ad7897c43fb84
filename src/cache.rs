//! # Target Cache Module
//!
//! One live controller instance per controller type, created on first use
//! and shared by every request routed to that type afterwards.
//!
//! ## Thread Safety
//!
//! The cache is backed by a [`DashMap`]. A lookup takes a shard read lock
//! only. On a miss the factory runs with no lock held, then the instance is
//! published through the entry API. Callers racing on the first access to
//! the same type may each run the factory, but only the first published
//! instance is kept and every caller gets that one. Once published, an
//! instance is never replaced.
//!
//! Lookups never wait on a running factory.

use dashmap::DashMap;
use std::any::TypeId;
use std::sync::Arc;
use tracing::{error, info};

use crate::declaration::{Controller, ControllerType};
use crate::error::RouterError;

/// Concurrency-safe map from controller type to its single instance.
#[derive(Default)]
pub struct TargetCache {
    instances: DashMap<TypeId, Arc<dyn Controller>>,
}

impl TargetCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached instance of `controller`, constructing it on first access.
    ///
    /// A construction failure is returned as `InstantiationFailure` and
    /// nothing is cached, so a later call runs the factory again.
    pub fn get_or_create(&self, controller: &ControllerType) -> Result<Arc<dyn Controller>, RouterError> {
        if let Some(instance) = self.get(controller) {
            return Ok(instance);
        }

        let built = controller.instantiate().map_err(|e| {
            error!(
                controller = controller.name(),
                error = %e,
                "Controller instantiation failed"
            );
            RouterError::InstantiationFailure {
                controller: controller.name().to_string(),
                source: e.into(),
            }
        })?;

        // The entry guard write-locks the shard; release it before len() below.
        let instance = {
            let slot = self.instances.entry(controller.id()).or_insert(built);
            Arc::clone(slot.value())
        };

        info!(
            controller = controller.name(),
            cached_controllers = self.instances.len(),
            "Controller instance ready"
        );
        Ok(instance)
    }

    /// Instance of `controller` if it was already created.
    #[must_use]
    pub fn get(&self, controller: &ControllerType) -> Option<Arc<dyn Controller>> {
        self.instances
            .get(&controller.id())
            .map(|instance| Arc::clone(instance.value()))
    }

    #[must_use]
    pub fn contains(&self, controller: &ControllerType) -> bool {
        self.instances.contains_key(&controller.id())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.instances.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// Create every listed controller now. Returns how many instances the
    /// cache holds afterwards.
    pub fn warm_up<'a>(
        &self,
        controllers: impl IntoIterator<Item = &'a ControllerType>,
    ) -> Result<usize, RouterError> {
        for controller in controllers {
            self.get_or_create(controller)?;
        }
        Ok(self.len())
    }
}

impl std::fmt::Debug for TargetCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TargetCache")
            .field("instances", &self.instances.len())
            .finish()
    }
}
