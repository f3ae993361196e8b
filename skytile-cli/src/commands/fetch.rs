//! Fetch command - save one recent picture of a coordinate.

use std::path::PathBuf;
use std::time::Duration;

use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::warn;

use super::common::{CoordinateArgs, FetchArgs};
use crate::error::CliError;
use crate::runner::CliRunner;

/// Arguments for the fetch command.
#[derive(Debug, Args)]
pub struct FetchCommandArgs {
    #[command(flatten)]
    pub coord: CoordinateArgs,

    #[command(flatten)]
    pub fetch: FetchArgs,

    /// Where to write the picture (format from extension)
    #[arg(short, long, default_value = "skytile.jpg")]
    pub output: PathBuf,
}

/// Run the fetch command.
pub fn run(runner: &CliRunner, args: FetchCommandArgs) -> Result<(), CliError> {
    runner.log_startup("fetch");
    let config = runner.config();
    let options = args.fetch.options(config);
    let fetcher = args.fetch.fetcher(config)?;

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.enable_steady_tick(Duration::from_millis(120));

    let mut probes = 0;
    let result = runner.block_on(fetcher.get_tile_picture_with_progress(
        args.coord.lon,
        args.coord.lat,
        options,
        |index, total, candidate| {
            probes = index + 1;
            spinner.set_message(format!(
                "[{}/{}] {} {}",
                index + 1,
                total,
                candidate.date,
                candidate.layer.instrument()
            ));
        },
    ));
    spinner.finish_and_clear();

    let picture = match result {
        Ok(picture) => picture,
        Err(e) => {
            warn!(lat = args.coord.lat, lon = args.coord.lon, probes, "No picture found");
            return Err(e.into());
        }
    };
    picture
        .image()
        .save(&args.output)
        .map_err(|source| CliError::Save {
            path: args.output.clone(),
            source,
        })?;

    let (width, height) = picture.dimensions();
    println!("Saved {} ({}x{})", args.output.display(), width, height);
    println!("  Source: {}", picture.url());
    println!("  Probes: {}", probes);

    Ok(())
}
