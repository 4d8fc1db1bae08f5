mod output;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};

use evtrip_core::{AppConfig, TripRequest};
use evtrip_mapbox::MapboxClient;
use evtrip_ocm::OcmClient;
use evtrip_planner::{PlanError, PlannerSettings, TripPlanner};

#[derive(Debug, Parser)]
#[command(name = "evtrip")]
#[command(about = "EV charging trip planner")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Plan a trip with charging stops between two places.
    Plan(PlanArgs),
}

#[derive(Debug, Args)]
struct PlanArgs {
    /// Origin place name, e.g. "San Francisco, CA".
    #[arg(long)]
    origin: String,

    /// Destination place name, e.g. "New York, NY".
    #[arg(long)]
    destination: String,

    /// Battery capacity in kWh (20-150).
    #[arg(long)]
    capacity_kwh: f64,

    /// Consumption in kWh per mile (0.05-1).
    #[arg(long)]
    consumption_kwh_per_mi: f64,

    /// Print the full plan as pretty JSON instead of the summary.
    #[arg(long)]
    json: bool,

    /// Write numbered turn-by-turn instructions to this file.
    #[arg(long)]
    steps_out: Option<PathBuf>,

    /// Print a Google Maps directions link for the planned route.
    #[arg(long)]
    maps_url: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = evtrip_core::load_config().context("failed to load configuration")?;
    init_tracing(&config);

    match cli.command {
        Commands::Plan(args) => run_plan(&config, args).await,
    }
}

fn init_tracing(config: &AppConfig) {
    use tracing_subscriber::EnvFilter;
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.clone()));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

async fn run_plan(config: &AppConfig, args: PlanArgs) -> anyhow::Result<()> {
    let mapbox = match &config.mapbox_base_url {
        Some(url) => {
            MapboxClient::with_base_url(&config.mapbox_access_token, config.http_timeout_secs, url)
        }
        None => MapboxClient::new(&config.mapbox_access_token, config.http_timeout_secs),
    }
    .context("failed to build the Mapbox client")?;

    let ocm = match &config.ocm_base_url {
        Some(url) => OcmClient::with_base_url(
            &config.ocm_api_key,
            config.http_timeout_secs,
            config.station_throttle_ms,
            config.station_retry_backoff_ms,
            url,
        ),
        None => OcmClient::new(
            &config.ocm_api_key,
            config.http_timeout_secs,
            config.station_throttle_ms,
            config.station_retry_backoff_ms,
        ),
    }
    .context("failed to build the Open Charge Map client")?;

    let planner = TripPlanner::new(
        Arc::new(mapbox),
        Arc::new(ocm),
        PlannerSettings {
            safety_margin_miles: config.safety_margin_miles,
            search_radius_meters: config.search_radius_meters,
        },
    );

    let request = TripRequest {
        origin: args.origin.clone(),
        destination: args.destination.clone(),
        capacity_kwh: args.capacity_kwh,
        consumption_kwh_per_mile: args.consumption_kwh_per_mi,
    };

    match planner.plan(&request).await {
        Ok(plan) => {
            if args.json {
                println!("{}", serde_json::to_string_pretty(&plan)?);
            } else {
                print!("{}", output::render_summary(&plan, request.max_range_miles()));
            }

            if let Some(path) = &args.steps_out {
                std::fs::write(path, output::format_steps(&plan.steps))
                    .with_context(|| format!("failed to write steps to {}", path.display()))?;
                println!("Turn-by-turn instructions written to {}", path.display());
            }

            if args.maps_url {
                println!(
                    "{}",
                    output::google_maps_url(plan.origin, &plan.stops, plan.destination)
                );
            }
            Ok(())
        }
        Err(PlanError::InsufficientCoverage { stops }) => {
            // A degraded plan is still worth showing, but never as success.
            eprintln!(
                "No charging station within range of the route; {} stop(s) were found first:",
                stops.len()
            );
            for (i, stop) in stops.iter().enumerate() {
                eprintln!(
                    "  {}. {} ({:.4}, {:.4})",
                    i + 1,
                    stop.title,
                    stop.point.lat,
                    stop.point.lon
                );
            }
            anyhow::bail!("insufficient charging coverage for this trip")
        }
        Err(e) => Err(e).context("trip planning failed"),
    }
}
