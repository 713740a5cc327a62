pub mod demo;
pub mod extract;

use std::error::Error;
use std::path::Path;

use m2x_chain::RawParticle;
use m2x_core::errors::M2xError;
use m2x_kin::{process_events, process_events_parallel, AssemblerConfig, EventOutcome};
use tracing::info;

/// Loads the assembler configuration, falling back to the defaults.
pub fn load_config(path: Option<&Path>) -> Result<AssemblerConfig, Box<dyn Error>> {
    let config = match path {
        Some(path) => AssemblerConfig::load(path)?,
        None => AssemblerConfig::default(),
    };
    info!(
        concurrency = config.concurrency,
        invisible_mass = config.invisible_mass,
        sqrt_s = config.collision.sqrt_s,
        "assembler configured"
    );
    Ok(config)
}

/// Runs the pipeline sequentially or on the configured worker pool.
pub fn run_pipeline<I>(events: I, config: &AssemblerConfig) -> Result<Vec<EventOutcome>, M2xError>
where
    I: IntoIterator<Item = Result<Vec<RawParticle>, M2xError>>,
    I::IntoIter: Send,
{
    if config.concurrency > 1 {
        process_events_parallel(events, config)
    } else {
        process_events(events, config)
    }
}
