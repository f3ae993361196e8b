//! Locate command - show the position the travel command would start from.

use skytile::geoip::locate;
use skytile::provider::AsyncReqwestClient;

use crate::error::CliError;
use crate::runner::CliRunner;

/// Run the locate command.
pub fn run(runner: &CliRunner) -> Result<(), CliError> {
    runner.log_startup("locate");
    let client = AsyncReqwestClient::new()?;
    let location = runner.block_on(locate(&client))?;

    println!("Coordinate: {}", location.coordinate);
    if let Some(city) = &location.city {
        println!("City:       {}", city);
    }
    if let Some(country) = &location.country {
        println!("Country:    {}", country);
    }

    Ok(())
}
