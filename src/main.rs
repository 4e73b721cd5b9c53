use clap::Parser;
use color_eyre::Result;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use lifeplan::cli::Cli;
use lifeplan::{Config, Database, Profile, seed};

fn main() -> Result<()> {
    // Set up error reporting with color-eyre
    color_eyre::install()?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    // Parse CLI arguments
    let cli = Cli::parse();

    // Determine profile: --dev flag enables dev mode, otherwise use prod
    let profile = if cli.dev { Profile::Dev } else { Profile::Prod };

    // Load configuration with the determined profile
    let config = Config::load_with_profile(profile)?;

    // Initialize database
    let db_path = config.get_database_path();
    let db = Database::new(
        db_path
            .to_str()
            .ok_or_else(|| color_eyre::eyre::eyre!("Database path contains invalid UTF-8"))?,
    )?;

    // One idempotent startup step; every later caller can assume the
    // default life areas exist
    seed(&db)?;

    lifeplan::cli::run(cli.command, &db)?;

    Ok(())
}
