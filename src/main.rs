use anyhow::Result;
use log::{error, info};
use crate::errors::DashboardError;
use crate::initialization::init;
use crate::worker::run;

mod charts;
mod config;
mod errors;
mod initialization;
mod logging;
mod manager_weather;
pub mod models;
mod records;
mod worker;

fn main() -> Result<()> {

    // Load config and set up the weather manager. If initialization fails, we are pretty much
    // out of luck and can't even log properly.
    let (config, mgr) = match init() {
        Ok((c, m)) => (c, m),
        Err(e) => {
            return Err(DashboardError(format!("Initialization failed: {}", e)))?;
        }
    };

    // Run one fetch-transform-render pass
    match run(&mgr, &config.cities.names, &config.files) {
        Ok(_) => {
            info!("dashboard run completed");
        },
        Err(e) => {
            error!("Run failed: {}", e);
            return Err(e)?;
        }
    }

    Ok(())
}
