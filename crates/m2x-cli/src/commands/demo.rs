use std::error::Error;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use clap::Args;
use m2x_cli::lhe;
use m2x_kin::{DecayGenerator, DecayChannels, EventOutcome, ReportSummary};
use serde::Serialize;
use tracing::info;

use super::{load_config, run_pipeline};

#[derive(Args, Debug)]
pub struct DemoArgs {
    /// Number of synthetic events to generate.
    #[arg(long, default_value_t = 100)]
    pub events: u64,
    /// Seed for deterministic event generation.
    #[arg(long, default_value_t = 2024)]
    pub seed: u64,
    /// Optional YAML assembler configuration.
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Also write the generated events as a Les Houches file.
    #[arg(long)]
    pub lhe_out: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct DemoReport {
    seed: u64,
    summary: ReportSummary,
    residuals: Vec<BranchResiduals>,
    max_residual: f64,
}

#[derive(Debug, Serialize)]
struct BranchResiduals {
    event: u64,
    branches: [f64; 2],
}

pub fn run(args: &DemoArgs) -> Result<(), Box<dyn Error>> {
    let generator = DecayGenerator::new(DecayChannels::ditau(), args.seed)?;
    let config = load_config(args.config.as_deref())?;

    if let Some(path) = &args.lhe_out {
        let mut out = BufWriter::new(File::create(path)?);
        writeln!(out, "<LesHouchesEvents version=\"3.0\">")?;
        for index in 0..args.events {
            lhe::write_event(&mut out, &generator.event(index))?;
        }
        writeln!(out, "</LesHouchesEvents>")?;
        out.flush()?;
        info!(path = %path.display(), events = args.events, "wrote synthetic events");
    }

    let outcomes = run_pipeline(generator.events(args.events), &config)?;
    let report = build_report(args.seed, &outcomes);
    info!(max_residual = report.max_residual, "demo finished");
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn build_report(seed: u64, outcomes: &[EventOutcome]) -> DemoReport {
    let residuals: Vec<BranchResiduals> = outcomes
        .iter()
        .filter_map(|outcome| {
            let event = outcome.assembled()?;
            let branches = event.branches.map(|branch| {
                let total = branch.total().to_array();
                let parent = branch.parent_momentum.to_array();
                total
                    .iter()
                    .zip(parent)
                    .map(|(a, b)| (a - b).abs())
                    .fold(0.0, f64::max)
            });
            Some(BranchResiduals {
                event: outcome.sequence,
                branches,
            })
        })
        .collect();
    let max_residual = residuals
        .iter()
        .flat_map(|r| r.branches)
        .fold(0.0, f64::max);
    DemoReport {
        seed,
        summary: ReportSummary::from_outcomes(outcomes),
        residuals,
        max_residual,
    }
}
