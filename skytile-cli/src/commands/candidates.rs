//! Candidates command - print the probe plan without fetching.

use clap::Args;
use skytile::config::ConfigFile;
use skytile::coord::{tile_to_lat_lon, GeoCoordinate};

use super::common::{CoordinateArgs, FetchArgs};
use crate::error::CliError;

/// Arguments for the candidates command.
#[derive(Debug, Args)]
pub struct CandidatesArgs {
    #[command(flatten)]
    pub coord: CoordinateArgs,

    #[command(flatten)]
    pub fetch: FetchArgs,

    /// Print only the URLs, one per line
    #[arg(long)]
    pub urls_only: bool,
}

/// Run the candidates command.
pub fn run(args: CandidatesArgs) -> Result<(), CliError> {
    let config = ConfigFile::load()?;
    let options = args.fetch.options(&config);
    let fetcher = args.fetch.fetcher(&config)?;

    let coord = GeoCoordinate::new(args.coord.lon, args.coord.lat);
    let (tile, candidates) = fetcher.plan(coord, options);

    if args.urls_only {
        for url in candidates.urls() {
            println!("{}", url);
        }
        return Ok(());
    }

    println!("Coordinate: {}", coord);
    println!("Tile:       {} (NW corner {})", tile, tile_to_lat_lon(&tile));
    println!("Candidates: {}", candidates.len());
    println!();

    for (index, candidate) in candidates.iter().enumerate() {
        println!(
            "{:>4}  {}  -{:<3} {:<18} {}",
            index + 1,
            candidate.date,
            candidate.day_offset,
            candidate.layer.instrument(),
            candidate.url
        );
    }

    Ok(())
}
