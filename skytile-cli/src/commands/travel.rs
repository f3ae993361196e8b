//! Travel command - wander from a start point, collecting pictures on a timer.
//!
//! Each tick resolves one picture at the current position. Successful pictures
//! go into a bounded history which is written out as a grid after every step.
//! A tick is skipped while the previous resolution is still running.

use std::path::PathBuf;
use std::time::Duration;

use clap::Args;
use rand::rngs::StdRng;
use rand::SeedableRng;
use skytile::coord::GeoCoordinate;
use skytile::geoip::locate;
use skytile::history::{ImageHistory, MAX_HISTORY_SIZE};
use skytile::provider::AsyncReqwestClient;
use skytile::travel::Journey;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use super::common::FetchArgs;
use crate::error::CliError;
use crate::runner::CliRunner;

/// Arguments for the travel command.
#[derive(Debug, Args)]
pub struct TravelArgs {
    /// Start latitude (located by IP when omitted)
    #[arg(long, allow_negative_numbers = true, requires = "lon")]
    pub lat: Option<f64>,

    /// Start longitude (located by IP when omitted)
    #[arg(long, allow_negative_numbers = true, requires = "lat")]
    pub lon: Option<f64>,

    #[command(flatten)]
    pub fetch: FetchArgs,

    /// Seconds between steps
    #[arg(long)]
    pub interval: Option<u64>,

    /// Width of the random step window in degrees
    #[arg(long)]
    pub step: Option<f64>,

    /// Grid image to rewrite after each picture
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Stop after this many steps
    #[arg(long)]
    pub ticks: Option<u64>,
}

/// Columns and rows of a near-square grid holding `capacity` cells.
pub fn grid_shape(capacity: usize) -> (u32, u32) {
    let capacity = u32::try_from(capacity.clamp(1, MAX_HISTORY_SIZE)).unwrap_or(1);
    let mut cols = 1;
    while cols * cols < capacity {
        cols += 1;
    }
    let rows = capacity.div_ceil(cols);
    (cols, rows)
}

/// Step width from the command line, falling back to the configured one.
fn resolve_step(cli: Option<f64>, configured: f64) -> Result<f64, CliError> {
    let step = cli.unwrap_or(configured);
    if !step.is_finite() || step < 0.0 {
        return Err(CliError::Config(format!(
            "Step must be a non-negative number, got {}",
            step
        )));
    }
    Ok(step)
}

fn limit_reached(ticks: Option<u64>, steps: u64) -> bool {
    ticks.is_some_and(|limit| steps >= limit)
}

/// Run the travel command.
pub fn run(runner: &CliRunner, args: TravelArgs) -> Result<(), CliError> {
    runner.log_startup("travel");
    let config = runner.config();
    let settings = &config.travel;

    let options = args.fetch.options(config);
    let fetcher = args.fetch.fetcher(config)?;
    let interval = Duration::from_secs(args.interval.unwrap_or(settings.interval_secs).max(1));
    let step = resolve_step(args.step, settings.step_degrees)?;
    let output = args.output.clone().unwrap_or_else(|| settings.output.clone());
    let cell_size = settings.cell_size;

    let mut history = ImageHistory::new(settings.history_size);
    let (cols, rows) = grid_shape(history.capacity());

    let start = match (args.lat, args.lon) {
        (Some(lat), Some(lon)) => GeoCoordinate::new(lon, lat),
        _ => {
            let client = AsyncReqwestClient::new()?;
            let location = runner.block_on(locate(&client))?;
            println!(
                "Starting near {}",
                location.city.as_deref().unwrap_or("your location")
            );
            location.coordinate
        }
    };

    let mut rng = match args.fetch.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let mut journey = Journey::new(start).with_step_degrees(step);

    let shutdown = CancellationToken::new();
    let shutdown_clone = shutdown.clone();
    ctrlc::set_handler(move || {
        println!();
        println!("Received shutdown signal, stopping...");
        shutdown_clone.cancel();
    })
    .map_err(|e| CliError::Config(format!("Failed to set signal handler: {}", e)))?;

    println!("Travelling from {} every {:?}", start, interval);
    println!("Writing grid to {}", output.display());
    println!("Press Ctrl+C to stop");
    println!();

    runner.block_on(async {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut steps = 0u64;

        loop {
            if limit_reached(args.ticks, steps) {
                break;
            }
            tokio::select! {
                _ = shutdown.cancelled() => break,
                _ = ticker.tick() => {}
            }

            let position = journey.position();
            let result = tokio::select! {
                _ = shutdown.cancelled() => break,
                result = journey.advance(&fetcher, options, &mut rng) => result,
            };

            match result {
                Ok(picture) => {
                    println!("{}  {}", position, picture.url());
                    history.push(picture);
                    history
                        .save_grid(&output, cols, rows, cell_size)
                        .map_err(|source| CliError::Save {
                            path: output.clone(),
                            source,
                        })?;
                }
                Err(e) => warn!(coord = %position, error = %e, "No picture for this step"),
            }

            steps += 1;
        }

        info!(steps, pictures = history.len(), "Travel finished");
        Ok::<(), CliError>(())
    })?;

    println!("Collected {} pictures", history.len());
    Ok(())
}
