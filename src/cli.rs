//! Command-line argument parsing for geosearch.

use crate::config::Config;
use crate::error::{GeoSearchError, Result};
use crate::geocoding::GeocoderProvider;
use clap::Parser;
use std::path::PathBuf;

/// Output format for headless mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Plain text output of the final screen.
    #[default]
    Text,
    /// JSON output with screen, state, and metadata.
    Json,
    /// Frame-by-frame output showing state after each event.
    Frames,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            "frames" => Ok(Self::Frames),
            _ => Err(format!(
                "Invalid output format: {s}. Expected: text, json, or frames"
            )),
        }
    }
}

/// Search for places from the terminal.
#[derive(Parser, Debug)]
#[command(name = "geosearch")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Geocoding provider (mapbox or mock)
    #[arg(long, value_name = "PROVIDER", env = "GEOSEARCH_PROVIDER")]
    pub provider: Option<String>,

    /// Mapbox access token (overrides the config file and MAPBOX_ACCESS_TOKEN)
    #[arg(long, value_name = "TOKEN")]
    pub access_token: Option<String>,

    /// Quiet period in milliseconds before a query is sent
    #[arg(long, value_name = "MS")]
    pub debounce_ms: Option<u64>,

    /// Config file path
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    // === Headless mode options ===
    /// Run in headless mode (no terminal UI, for testing/automation)
    #[arg(long)]
    pub headless: bool,

    /// Comma-separated events to execute in headless mode (e.g., "type:paris,wait:600ms")
    #[arg(long, value_name = "EVENTS")]
    pub events: Option<String>,

    /// Path to script file with events (use "-" for stdin)
    #[arg(long, value_name = "PATH")]
    pub script: Option<String>,

    /// Screen size for headless mode (WIDTHxHEIGHT, e.g., "80x24")
    #[arg(long, value_name = "SIZE", default_value = "80x24")]
    pub size: String,

    /// Output format for headless mode
    #[arg(long, value_name = "FORMAT", default_value = "text")]
    pub output: String,

    /// Write output to file instead of stdout
    #[arg(long, value_name = "PATH")]
    pub output_file: Option<PathBuf>,

    /// Stop on first assertion failure
    #[arg(long)]
    pub fail_fast: bool,
}

impl Cli {
    /// Parses command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Returns the config file path to use.
    pub fn config_path(&self) -> PathBuf {
        self.config.clone().unwrap_or_else(Config::default_path)
    }

    /// Applies command-line overrides on top of a loaded config.
    pub fn apply_overrides(&self, config: &mut Config) -> Result<()> {
        if let Some(provider) = &self.provider {
            config.geocoding.provider = provider
                .parse::<GeocoderProvider>()
                .map_err(GeoSearchError::config)?;
        }
        if let Some(token) = &self.access_token {
            config.geocoding.access_token = Some(token.clone());
        }
        if let Some(debounce_ms) = self.debounce_ms {
            config.search.debounce_ms = debounce_ms;
        }
        Ok(())
    }

    /// Returns true if headless mode is enabled.
    pub fn is_headless(&self) -> bool {
        self.headless
    }

    /// Parses the screen size from the --size argument.
    pub fn parse_screen_size(&self) -> std::result::Result<(u16, u16), String> {
        let (width, height) = self.size.split_once('x').ok_or_else(|| {
            format!(
                "Invalid size format: '{}'. Expected WIDTHxHEIGHT (e.g., 80x24)",
                self.size
            )
        })?;
        let width = width
            .parse::<u16>()
            .map_err(|_| format!("Invalid width: '{}'", width))?;
        let height = height
            .parse::<u16>()
            .map_err(|_| format!("Invalid height: '{}'", height))?;
        Ok((width, height))
    }

    /// Parses the output format from the --output argument.
    pub fn parse_output_format(&self) -> std::result::Result<OutputFormat, String> {
        self.output.parse()
    }

    /// Validates headless mode arguments.
    pub fn validate_headless(&self) -> std::result::Result<(), String> {
        if !self.headless {
            return Ok(());
        }

        if self.events.is_none() && self.script.is_none() {
            return Err("--headless requires --events or --script".to_string());
        }

        self.parse_screen_size()?;
        self.parse_output_format()?;

        Ok(())
    }
}
