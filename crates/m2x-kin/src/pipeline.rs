//! Event-at-a-time processing of a reader's event stream.

use m2x_chain::{RawParticle, RecordStore};
use m2x_core::errors::{ErrorInfo, M2xError};
use rayon::prelude::*;
use tracing::{debug, warn};

use crate::assemble::{assemble_event, AssembledEvent};
use crate::config::{AssemblerConfig, TopologyPolicy};
use crate::solver::{KinematicSolver, SolverOutcome};

/// Result of processing one event, tagged with its 1-based position in the stream.
#[derive(Debug, Clone, PartialEq)]
pub struct EventOutcome {
    /// Position of the event in the input stream, starting at 1.
    pub sequence: u64,
    /// Assembled branches, or the per-event error that caused the skip.
    pub result: Result<AssembledEvent, M2xError>,
}

impl EventOutcome {
    /// Assembled event, if the event was not skipped.
    pub fn assembled(&self) -> Option<&AssembledEvent> {
        self.result.as_ref().ok()
    }
}

/// Processes one event's raw entries.
pub fn process_event(
    sequence: u64,
    raw: Vec<RawParticle>,
    config: &AssemblerConfig,
) -> EventOutcome {
    let result = RecordStore::from_raw(raw).and_then(|store| assemble_event(&store, config));
    if let Err(err) = &result {
        log_skip(sequence, err, config.topology_policy);
    }
    EventOutcome { sequence, result }
}

/// Processes a stream of events sequentially, pulling one event at a time.
///
/// Recoverable reader errors become skipped outcomes; the first fatal error
/// aborts the run.
pub fn process_events<I>(events: I, config: &AssemblerConfig) -> Result<Vec<EventOutcome>, M2xError>
where
    I: IntoIterator<Item = Result<Vec<RawParticle>, M2xError>>,
{
    let mut outcomes = Vec::new();
    for (index, event) in events.into_iter().enumerate() {
        outcomes.push(dispatch(index as u64 + 1, event, config)?);
    }
    Ok(outcomes)
}

/// Processes a stream of events on a pool of `config.concurrency` workers.
///
/// The reader is still consumed sequentially. Outcomes are returned in input
/// order.
pub fn process_events_parallel<I>(
    events: I,
    config: &AssemblerConfig,
) -> Result<Vec<EventOutcome>, M2xError>
where
    I: IntoIterator<Item = Result<Vec<RawParticle>, M2xError>>,
    I::IntoIter: Send,
{
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.concurrency.max(1))
        .build()
        .map_err(|err| M2xError::Config(ErrorInfo::new("thread-pool", err.to_string())))?;

    let stream = events.into_iter().enumerate();
    let results: Result<Vec<EventOutcome>, M2xError> = pool.install(move || {
        stream
            .par_bridge()
            .map(|(index, event)| dispatch(index as u64 + 1, event, config))
            .collect()
    });

    let mut ordered = results?;
    ordered.sort_by_key(|outcome| outcome.sequence);
    Ok(ordered)
}

fn dispatch(
    sequence: u64,
    event: Result<Vec<RawParticle>, M2xError>,
    config: &AssemblerConfig,
) -> Result<EventOutcome, M2xError> {
    match event {
        Ok(raw) => Ok(process_event(sequence, raw, config)),
        Err(err) if err.is_recoverable() => {
            log_skip(sequence, &err, config.topology_policy);
            Ok(EventOutcome {
                sequence,
                result: Err(err),
            })
        }
        Err(err) => Err(err.with_context("event", sequence)),
    }
}

/// Hands every assembled event to `solver`, skipping events it cannot solve.
///
/// Inputs are checked against `config.mass_tolerance` first.
pub fn solve_all(
    outcomes: &[EventOutcome],
    solver: &dyn KinematicSolver,
    config: &AssemblerConfig,
) -> Vec<(u64, Result<SolverOutcome, M2xError>)> {
    outcomes
        .iter()
        .filter_map(|outcome| outcome.assembled().map(|event| (outcome.sequence, event)))
        .map(|(sequence, event)| {
            let result = event
                .input
                .validate(config.mass_tolerance)
                .and_then(|()| solver.solve(&event.input));
            if let Err(err) = &result {
                warn!(event = sequence, code = err.code(), %err, "solver failed, skipping event");
            }
            (sequence, result)
        })
        .collect()
}

fn log_skip(sequence: u64, err: &M2xError, policy: TopologyPolicy) {
    match (err, policy) {
        (M2xError::Topology(_), TopologyPolicy::Skip) => {
            debug!(event = sequence, code = err.code(), "not a two-branch event, skipping");
        }
        (M2xError::Topology(_), TopologyPolicy::Report) => {
            warn!(event = sequence, code = err.code(), %err, "not a two-branch event, skipping");
        }
        _ => warn!(event = sequence, code = err.code(), %err, "skipping event"),
    }
}
