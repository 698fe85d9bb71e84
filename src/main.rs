//! geosearch - Debounced place search for the terminal.

use geo_search::cli::Cli;
use geo_search::config::Config;
use geo_search::error::Result;
use geo_search::geocoding::create_geocoder;
use geo_search::logging;
use geo_search::tui::{self, headless, App};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    let cli = Cli::parse_args();

    // A missing .env file is not an error.
    let _ = dotenvy::dotenv();

    if cli.is_headless() {
        logging::init_stderr_logging();
    } else {
        logging::init_file_logging();
    }

    match run(cli).await {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            error!("{}: {}", e.category(), e);
            eprintln!("{}: {}", e.category(), e);
            std::process::exit(1);
        }
    }
}

async fn run(cli: Cli) -> Result<i32> {
    // Precedence: CLI arguments, then the config file, then environment.
    let config_path = cli.config_path();
    info!("Loading config from: {}", config_path.display());
    let mut config = Config::load_from_file(&config_path)?;
    cli.apply_overrides(&mut config)?;
    config.geocoding.apply_env_defaults();

    let geocoder = create_geocoder(&config.geocoding)?;
    info!(
        provider = geocoder.name(),
        debounce_ms = config.search.debounce_ms,
        "Geocoder ready"
    );

    if cli.is_headless() {
        return headless::run_headless(&cli, &config, geocoder).await;
    }

    let app = App::new(config.geocoding.display_string(), config.search.debounce());
    tui::run(app, geocoder).await?;
    Ok(0)
}
