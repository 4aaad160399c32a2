use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use envwire::app::Application;
use envwire::config::Settings;
use envwire::logging::init_logging;

/// Start the demo application under the selected profiles
#[derive(Debug, Parser)]
#[command(name = "envwire", version)]
struct Args {
    /// Comma-separated profiles, overriding APP_PROFILES__ACTIVE
    #[arg(short, long, value_delimiter = ',')]
    profiles: Vec<String>,

    /// Settings file (TOML or YAML)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut settings = Settings::load(args.config.as_deref()).context("loading settings")?;
    settings.override_profiles(args.profiles);
    init_logging(&settings.logging)?;

    let app = Application::start(settings.active_profiles()).context("wiring the application")?;
    tracing::info!("in main method");

    println!("{}", app.faux.datasource());
    println!("{}", app.environment.environment());
    println!("{}", app.greeting.say_hello());
    println!("{}", app.property.say_hello());
    Ok(())
}
