//! Services wired by the demo application

use crate::profile::ActiveProfiles;

/// Connection settings of the datasource used in the current environment
pub trait DatasourceSettings: Send + Sync {
    fn datasource_settings(&self) -> String;
}

#[derive(Debug, Default)]
pub struct DevDatasource;

impl DatasourceSettings for DevDatasource {
    fn datasource_settings(&self) -> String {
        "dev".to_owned()
    }
}

#[derive(Debug, Default)]
pub struct QaDatasource;

impl DatasourceSettings for QaDatasource {
    fn datasource_settings(&self) -> String {
        "qa".to_owned()
    }
}

#[derive(Debug, Default)]
pub struct UatDatasource;

impl DatasourceSettings for UatDatasource {
    fn datasource_settings(&self) -> String {
        "uat".to_owned()
    }
}

#[derive(Debug, Default)]
pub struct ProdDatasource;

impl DatasourceSettings for ProdDatasource {
    fn datasource_settings(&self) -> String {
        "prod".to_owned()
    }
}

pub trait GreetingService: Send + Sync {
    fn say_greeting(&self) -> String;
}

#[derive(Debug, Default)]
pub struct BaseGreeting;

impl GreetingService for BaseGreeting {
    fn say_greeting(&self) -> String {
        "Hello Everyone From Base!!!".to_owned()
    }
}

#[derive(Debug, Default)]
pub struct PropertyGreeting;

impl GreetingService for PropertyGreeting {
    fn say_greeting(&self) -> String {
        "Friends don't let friends do property injection!!!".to_owned()
    }
}

/// Name of the environment the process runs in
pub trait EnvironmentService: Send + Sync {
    fn env(&self) -> String;
}

/// Reports the active profiles, or the fallback when nothing specific is active
#[derive(Debug)]
pub struct ProfileEnvironment {
    active: ActiveProfiles,
}

impl ProfileEnvironment {
    pub fn new(active: ActiveProfiles) -> Self {
        Self { active }
    }
}

impl EnvironmentService for ProfileEnvironment {
    fn env(&self) -> String {
        let specific: Vec<&str> = self.active.specific().map(|p| p.as_str()).collect();
        if specific.is_empty() {
            self.active.fallback().to_string()
        } else {
            specific.join(", ")
        }
    }
}
