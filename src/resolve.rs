//! Traits and structs supporting the resolution rules
//!
//! Every candidate hides its construction behind a [Provide] implementation.
//!
//! * The [Provide] trait indicates that a struct can provide an instance of the target type.
//!   The provider can be either a singleton of the target type or a factory for on-demand instances.
//! * [SingletonProvider] builds its instance on first use and hands out clones afterwards.
//! * [InstanceProvider] calls its constructor for every request.
//!
//! The [Scope] of a candidate selects which of the two is used.

use std::sync::Arc;

use once_cell::sync::OnceCell;
use thiserror::Error;

/// Provide an instance of a given type
///
/// This trait allows to use a uniform API for both
/// shared components (the provider holds the singleton)
/// and on-demand instances (the provider is a factory).
pub trait Provide<T>: Send + Sync {
    fn provide(&self) -> T;
}

/// Shared trait object implementing [Provide]
pub type Provider<T> = Arc<dyn Provide<T>>;

/// Lifetime of the instances handed out by a candidate
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Scope {
    /// One shared instance, built on first resolution
    #[default]
    Singleton,
    /// A new instance for every resolution
    Prototype,
}

/// Clone-based provider with a lazily built value
pub struct SingletonProvider<T, F> {
    cell: OnceCell<T>,
    constructor: F,
}

impl<T, F> SingletonProvider<T, F> {
    pub fn build(constructor: F) -> Arc<Self> {
        Arc::new(SingletonProvider {
            cell: OnceCell::new(),
            constructor,
        })
    }
}

impl<T, F> Provide<T> for SingletonProvider<T, F>
where
    T: Clone + Send + Sync,
    F: Fn() -> T + Send + Sync,
{
    fn provide(&self) -> T {
        self.cell.get_or_init(&self.constructor).clone()
    }
}

/// Generic provider for single-use instances based on a constructor
pub struct InstanceProvider<F>(F);

impl<F> InstanceProvider<F> {
    pub fn build(constructor: F) -> Arc<Self> {
        Arc::new(InstanceProvider(constructor))
    }
}

impl<T, F: Fn() -> T + Send + Sync> Provide<T> for InstanceProvider<F> {
    fn provide(&self) -> T {
        (self.0)()
    }
}

/// Build the provider matching a scope
pub fn scoped_provider<T, F>(scope: Scope, constructor: F) -> Provider<T>
where
    T: Clone + Send + Sync + 'static,
    F: Fn() -> T + Send + Sync + 'static,
{
    match scope {
        Scope::Singleton => SingletonProvider::<T, F>::build(constructor),
        Scope::Prototype => InstanceProvider::build(constructor),
    }
}

/// Errors triggered during the wiring process
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WiringError {
    #[error("Unresolved dependency: no candidate for '{name}' matches active profiles {active}")]
    UnresolvedDependency { name: String, active: String },
    #[error("Ambiguous dependency: candidates {candidates:?} for '{name}' all match active profiles {active}")]
    AmbiguousDependency {
        name: String,
        active: String,
        candidates: Vec<String>,
    },
    #[error("Unknown qualifier: no candidate '{qualifier}' is registered for '{name}'")]
    UnknownQualifier { name: String, qualifier: String },
    #[error("Invalid candidate: '{candidate}' for '{name}' declares no profile")]
    MissingProfile { name: String, candidate: String },
    #[error("Consistency error: '{candidate}' is already registered for '{name}'")]
    DuplicateCandidate { name: String, candidate: String },
}
