//! Per-event report lines and run summaries.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::pipeline::EventOutcome;
use crate::solver::SolverOutcome;

/// Formats a solver result as `m2 k1x k1y k1z k2x k2y k2z`.
pub fn report_line(outcome: &SolverOutcome) -> String {
    let fields = [
        outcome.m2,
        outcome.k1.px,
        outcome.k1.py,
        outcome.k1.pz,
        outcome.k2.px,
        outcome.k2.py,
        outcome.k2.pz,
    ];
    fields
        .iter()
        .map(f64::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Counts of processed, assembled and skipped events.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ReportSummary {
    /// Events pulled from the stream.
    pub processed: usize,
    /// Events that produced a solver input.
    pub assembled: usize,
    /// Skipped events keyed by error code.
    pub skipped_by_code: BTreeMap<String, usize>,
}

impl ReportSummary {
    /// Tallies a list of outcomes.
    pub fn from_outcomes(outcomes: &[EventOutcome]) -> Self {
        let mut summary = Self::default();
        for outcome in outcomes {
            summary.record(outcome);
        }
        summary
    }

    /// Adds one outcome to the tally.
    pub fn record(&mut self, outcome: &EventOutcome) {
        self.processed += 1;
        match &outcome.result {
            Ok(_) => self.assembled += 1,
            Err(err) => *self.skipped_by_code.entry(err.code().to_string()).or_default() += 1,
        }
    }

    /// Total number of skipped events.
    pub fn skipped(&self) -> usize {
        self.skipped_by_code.values().sum()
    }
}
