//! Registration table and startup of the demo application

use std::fmt;
use std::sync::Arc;

use crate::context::ApplicationContext;
use crate::controllers::{EnvironmentController, FauxController, GreetingController, PropertyInjectedController};
use crate::profile::ActiveProfiles;
use crate::registry::{Candidate, Registry, RegistryBuilder};
use crate::resolve::WiringError;
use crate::services::*;

/// Environments with a dedicated datasource
pub const ENVIRONMENTS: [&str; 4] = ["dev", "qa", "uat", "prod"];

pub const PROPERTY_GREETING: &str = "propertyGreetingService";

/// Logical services of the demo application
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Service {
    Datasource,
    Environment,
    Greeting,
    PropertyGreeting,
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Service::Datasource => "datasource",
            Service::Environment => "environment",
            Service::Greeting => "greeting",
            Service::PropertyGreeting => "property-greeting",
        };
        f.write_str(name)
    }
}

/// Build the registration table of the demo application.
///
/// The dev datasource doubles as the fallback one, and profile-independent services are
/// tagged with every environment plus the fallback label of `active`.
pub fn registry(active: &ActiveProfiles) -> Result<Registry<Service>, WiringError> {
    let mut builder = RegistryBuilder::new();
    let fallback = active.fallback().as_str();
    let everywhere = [ENVIRONMENTS[0], ENVIRONMENTS[1], ENVIRONMENTS[2], ENVIRONMENTS[3], fallback];

    crate::register_candidates!(&mut builder, Service::Datasource => dyn DatasourceSettings {
        "datasourceDev" ["dev", fallback] => DevDatasource::default,
        "datasourceQa" ["qa"] => QaDatasource::default,
        "datasourceUat" ["uat"] => UatDatasource::default,
        "datasourceProd" ["prod"] => ProdDatasource::default,
    })?;

    let greetings: [(Service, &str, Arc<dyn GreetingService>); 2] = [
        (Service::Greeting, "greetingService", Arc::new(BaseGreeting)),
        (Service::PropertyGreeting, PROPERTY_GREETING, Arc::new(PropertyGreeting)),
    ];
    for (key, name, greeting) in greetings {
        builder.register(key, Candidate::singleton(name, everywhere, move || greeting.clone()))?;
    }

    let active = active.clone();
    builder.register::<dyn EnvironmentService>(
        Service::Environment,
        Candidate::singleton("environmentService", everywhere, move || {
            let service: Arc<dyn EnvironmentService> = Arc::new(ProfileEnvironment::new(active.clone()));
            service
        }),
    )?;

    Ok(builder.build())
}

/// Controllers of a started application
pub struct Application {
    pub faux: FauxController,
    pub environment: EnvironmentController,
    pub greeting: GreetingController,
    pub property: PropertyInjectedController,
}

impl Application {
    /// Wire every controller, failing fast on the first unresolved service
    pub fn start(active: ActiveProfiles) -> Result<Self, WiringError> {
        let ctx = ApplicationContext::start(registry(&active)?, active)?;
        Ok(Self {
            faux: ctx.inject_and_call(Service::Datasource, FauxController::new)?,
            environment: ctx.inject_and_call(Service::Environment, EnvironmentController::new)?,
            greeting: ctx.inject_and_call(Service::Greeting, GreetingController::new)?,
            property: PropertyInjectedController::new(
                ctx.inject_qualified(Service::PropertyGreeting, PROPERTY_GREETING)?,
            ),
        })
    }
}
