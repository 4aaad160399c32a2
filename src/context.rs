use std::sync::Arc;

use crate::profile::ActiveProfiles;
use crate::registry::{Registry, ServiceKey};
use crate::resolve::WiringError;

/// Application-level dependency injection.
///
/// Pairs a frozen [Registry] with the profiles of the running process. A context only
/// exists once every registered service has been checked against those profiles.
pub struct ApplicationContext<K> {
    registry: Registry<K>,
    active: ActiveProfiles,
}

impl<K: ServiceKey> ApplicationContext<K> {
    /// Verify the registry under the active profiles and wrap it.
    ///
    /// Return the first unresolved or ambiguous service: the application must not start with it.
    pub fn start(registry: Registry<K>, active: ActiveProfiles) -> Result<Self, WiringError> {
        tracing::info!(profiles = %active, "starting application context");
        if let Err(e) = registry.verify(&active) {
            tracing::error!(error = %e, "application context failed to start");
            return Err(e);
        }
        Ok(Self { registry, active })
    }

    pub fn active_profiles(&self) -> &ActiveProfiles {
        &self.active
    }

    pub fn registry(&self) -> &Registry<K> {
        &self.registry
    }

    /// Obtain the implementation selected for a service
    pub fn inject<T: ?Sized + 'static>(&self, key: K) -> Result<Arc<T>, WiringError> {
        let instance = self.registry.resolve(key, &self.active)?;
        tracing::debug!(%key, capability = std::any::type_name::<T>(), "injected");
        Ok(instance)
    }

    /// Obtain a named candidate of a service
    pub fn inject_qualified<T: ?Sized + 'static>(&self, key: K, qualifier: &str) -> Result<Arc<T>, WiringError> {
        let instance = self.registry.resolve_qualified(key, qualifier, &self.active)?;
        tracing::debug!(%key, qualifier, "injected");
        Ok(instance)
    }

    /// Call a constructor after injecting its dependency
    pub fn inject_and_call<T, O, F>(&self, key: K, constructor: F) -> Result<O, WiringError>
    where
        T: ?Sized + 'static,
        F: FnOnce(Arc<T>) -> O,
    {
        self.inject(key).map(constructor)
    }
}
