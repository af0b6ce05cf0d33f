//! Skydeck CLI
//!
//! Terminal weather dashboard: track up to a handful of cities plus the
//! current position and show current conditions with a short forecast.

#![allow(clippy::print_stdout)]

mod app;
mod render;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use application::{ApplicationError, UserOutcome};
use clap::{Parser, Subcommand};
use domain::{GeoLocation, LocationId};
use infrastructure::{AppConfig, init_tracing};

use crate::app::App;

/// Skydeck CLI
#[derive(Parser)]
#[command(name = "skydeck-cli")]
#[command(author, version, about = "Skydeck weather dashboard", long_about = None)]
struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Configuration file (default: ./config.toml if present)
    #[arg(short, long, env = "SKYDECK_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show tracked locations with the last known weather
    List,

    /// Track a city by name
    ///
    /// Example: skydeck-cli add "Nizhny Novgorod"
    Add {
        /// City name
        name: String,
    },

    /// Track the current position
    ///
    /// Without coordinates the configured default position is used.
    Locate {
        /// Latitude in degrees
        #[arg(long, requires = "lon", allow_hyphen_values = true)]
        lat: Option<f64>,

        /// Longitude in degrees
        #[arg(long, requires = "lat", allow_hyphen_values = true)]
        lon: Option<f64>,
    },

    /// Stop tracking a location
    Remove {
        /// Location id or its number from `list`
        target: String,
    },

    /// Fetch fresh weather for every tracked location
    Refresh,

    /// Suggest places matching a partial name
    Suggest {
        /// Text typed so far
        text: String,

        /// Track the suggestion with this number
        #[arg(long)]
        add: Option<usize>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let config =
        AppConfig::load_from(cli.config.as_deref()).context("Failed to load configuration")?;
    init_tracing(&config.telemetry.clone().with_verbosity(cli.verbose))?;

    let position = match requested_position(&cli.command) {
        Ok(position) => position,
        Err(e) => {
            println!("❌ {}", render::error_line(&e));
            return Ok(ExitCode::FAILURE);
        },
    };

    let mut app = App::build(&config, position).context("Failed to start dashboard")?;

    let result = run(&mut app, cli.command).await;
    match result {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(e) => {
            println!("❌ {}", render::error_line(&e));
            Ok(ExitCode::FAILURE)
        },
    }
}

/// Coordinates given to `locate`, if any
fn requested_position(command: &Commands) -> Result<Option<GeoLocation>, ApplicationError> {
    match command {
        Commands::Locate {
            lat: Some(lat),
            lon: Some(lon),
        } => Ok(Some(GeoLocation::new(*lat, *lon)?)),
        _ => Ok(None),
    }
}

async fn run(app: &mut App, command: Commands) -> Result<(), ApplicationError> {
    match command {
        Commands::List => {
            let locations = app.dashboard.locations();
            if locations.is_empty() {
                println!("No locations tracked yet. Add one with `skydeck-cli add <city>`.");
                return Ok(());
            }
            let snapshot = app.dashboard.weather();
            for (i, location) in locations.iter().enumerate() {
                println!("{}", render::location_line(i, location));
                match snapshot.get(&location.id) {
                    Some(view) => {
                        for line in render::view_block(view) {
                            println!("{line}");
                        }
                    },
                    None => println!("   no weather yet, run `skydeck-cli refresh`"),
                }
            }
        },

        Commands::Add { name } => {
            let location = app.dashboard.add_location_by_name(&name).await?;
            println!("✅ Added {}", location.display_name);
            refresh(app).await?;
        },

        Commands::Locate { .. } => {
            let location = app.dashboard.add_current_location().await?;
            println!("📍 Tracking {}", location.display_name);
            refresh(app).await?;
        },

        Commands::Remove { target } => {
            let id = resolve_target(app, &target)?;
            let removed = app.dashboard.remove_location(&id)?;
            println!("🗑️  Removed {}", removed.display_name);
        },

        Commands::Refresh => refresh(app).await?,

        Commands::Suggest { text, add } => {
            app.suggestions.on_query_changed(&text, tokio::time::Instant::now());
            let suggestions = app.suggestions.settle().await.to_vec();
            for line in render::suggestion_lines(&suggestions) {
                println!("{line}");
            }

            if let Some(number) = add {
                let candidate = number
                    .checked_sub(1)
                    .and_then(|i| suggestions.get(i))
                    .cloned()
                    .ok_or_else(|| {
                        ApplicationError::Validation(format!("no suggestion number {number}"))
                    })?;
                let display_name = candidate.display_name();
                app.suggestions.select(candidate);
                let place = app.suggestions.submit(&display_name).await?;
                let location = app.dashboard.add_selection(&place)?;
                println!("✅ Added {}", location.display_name);
                refresh(app).await?;
            }
        },
    }
    Ok(())
}

async fn refresh(app: &mut App) -> Result<(), ApplicationError> {
    let report = app.dashboard.refresh().await?;
    for line in render::report_lines(&report) {
        println!("{line}");
    }
    if report.is_page_error() {
        println!("{}", UserOutcome::NetworkError.message());
    }
    Ok(())
}

/// Accept either a location id or a 1-based list number
fn resolve_target(app: &App, target: &str) -> Result<LocationId, ApplicationError> {
    let locations = app.dashboard.locations();
    if let Ok(number) = target.trim().parse::<usize>() {
        return number
            .checked_sub(1)
            .and_then(|i| locations.get(i))
            .map(|l| l.id)
            .ok_or_else(|| ApplicationError::NotFound(format!("location number {number}")));
    }
    LocationId::parse(target)
        .map_err(|_| ApplicationError::Validation(format!("not a location id or number: {target}")))
}
