//! Profile-aware dependency injection with explicit registration tables.
//!
//! # Simple use case
//!
//! ```
//! # use std::sync::Arc;
//! # use envwire::*;
//! // Define traits and implementors
//! trait Datasource: Send + Sync {
//!     fn url(&self) -> String;
//! }
//!
//! struct Local;
//! impl Datasource for Local {
//!     fn url(&self) -> String { "sqlite::memory:".into() }
//! }
//!
//! struct Remote;
//! impl Datasource for Remote {
//!     fn url(&self) -> String { "postgres://db".into() }
//! }
//!
//! # fn main() -> Result<(), WiringError> {
//! // Register one candidate per environment
//! let mut builder = RegistryBuilder::new();
//! builder
//!     .register("datasource", Candidate::<dyn Datasource>::singleton("local", ["dev", "default"], || Arc::new(Local)))?
//!     .register("datasource", Candidate::<dyn Datasource>::singleton("remote", ["prod"], || Arc::new(Remote)))?;
//!
//! // Start a context for the active profiles and inject
//! let ctx = ApplicationContext::start(builder.build(), ActiveProfiles::parse("prod"))?;
//! let db: Arc<dyn Datasource> = ctx.inject("datasource")?;
//! assert_eq!(db.url(), "postgres://db");
//! # Ok(())
//! # }
//! ```
//!
//! # Mechanism
//!
//! The registry combines a type map based on the ```Any``` trait with typed service keys:
//! candidates are stored per capability type and key, so that a lookup never needs a cast
//! on the caller's side.
//!
//! * Each [Candidate] carries a name, one or more [Profile] labels and a [Provide] implementation
//!   which builds the instance (a lazily built singleton or a new instance per request).
//! * A [Registry] selects the single candidate whose labels intersect the [ActiveProfiles].
//!   A candidate matched through a specific label wins over one matched only through the
//!   fallback label (```default```); any other tie is an [WiringError::AmbiguousDependency].
//! * An [ApplicationContext] verifies every registered service when it starts, so that a missing
//!   or ambiguous dependency aborts startup instead of surfacing on first use.

mod context;
mod helpers;
mod profile;
mod registry;
mod resolve;

pub mod app;
pub mod config;
pub mod controllers;
pub mod logging;
pub mod services;

pub use context::ApplicationContext;
pub use profile::{ActiveProfiles, Profile, ProfileMatch, DEFAULT_PROFILE};
pub use registry::{Candidate, Registry, RegistryBuilder, ServiceKey};
pub use resolve::{scoped_provider, InstanceProvider, Provide, Provider, Scope, SingletonProvider, WiringError};

#[cfg(test)]
mod tests;
