//! Consumers of the injected services.
//!
//! All dependencies arrive through the constructors.

use std::sync::Arc;

use crate::services::{DatasourceSettings, EnvironmentService, GreetingService};

pub struct FauxController {
    settings: Arc<dyn DatasourceSettings>,
}

impl FauxController {
    pub fn new(settings: Arc<dyn DatasourceSettings>) -> Self {
        Self { settings }
    }

    pub fn datasource(&self) -> String {
        self.settings.datasource_settings()
    }
}

pub struct EnvironmentController {
    environment: Arc<dyn EnvironmentService>,
}

impl EnvironmentController {
    pub fn new(environment: Arc<dyn EnvironmentService>) -> Self {
        Self { environment }
    }

    pub fn environment(&self) -> String {
        format!("You are in {} Environment", self.environment.env())
    }
}

pub struct GreetingController {
    greeting: Arc<dyn GreetingService>,
}

impl GreetingController {
    pub fn new(greeting: Arc<dyn GreetingService>) -> Self {
        Self { greeting }
    }

    pub fn say_hello(&self) -> String {
        tracing::debug!("in the greeting controller");
        self.greeting.say_greeting()
    }
}

/// Receives the greeting chosen by name rather than the primary one
pub struct PropertyInjectedController {
    greeting: Arc<dyn GreetingService>,
}

impl PropertyInjectedController {
    pub fn new(greeting: Arc<dyn GreetingService>) -> Self {
        Self { greeting }
    }

    pub fn say_hello(&self) -> String {
        self.greeting.say_greeting()
    }
}
