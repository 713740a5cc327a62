use std::error::Error;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use clap::Args;
use m2x_cli::lhe;
use m2x_kin::{ReportSummary, SolverInput};
use serde::Serialize;
use tracing::info;

use super::{load_config, run_pipeline};

#[derive(Args, Debug)]
pub struct ExtractArgs {
    /// Les Houches event file to read.
    #[arg(long)]
    pub input: PathBuf,
    /// Output file receiving one JSON solver input per line.
    #[arg(long)]
    pub out: PathBuf,
    /// Optional YAML assembler configuration.
    #[arg(long)]
    pub config: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct ExtractedEvent<'a> {
    event: u64,
    input: &'a SolverInput,
}

pub fn run(args: &ExtractArgs) -> Result<(), Box<dyn Error>> {
    let config = load_config(args.config.as_deref())?;
    let reader = lhe::open(&args.input)?;
    let outcomes = run_pipeline(reader, &config)?;

    let mut out = BufWriter::new(File::create(&args.out)?);
    for outcome in &outcomes {
        if let Some(event) = outcome.assembled() {
            let record = ExtractedEvent {
                event: outcome.sequence,
                input: &event.input,
            };
            serde_json::to_writer(&mut out, &record)?;
            writeln!(out)?;
        }
    }
    out.flush()?;

    let summary = ReportSummary::from_outcomes(&outcomes);
    info!(
        processed = summary.processed,
        assembled = summary.assembled,
        skipped = summary.skipped(),
        out = %args.out.display(),
        "extraction finished"
    );
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
