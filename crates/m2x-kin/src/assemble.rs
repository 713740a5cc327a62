//! Per-event branch assembly.

use m2x_chain::{final_states_of, initial_states, partition, ParticleRecord, RecordStore};
use m2x_core::errors::{ErrorInfo, M2xError};
use m2x_core::{FourMomentum, Line};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::AssemblerConfig;
use crate::solver::SolverInput;

/// Grouped final-state content of one initial-state branch.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BranchSummary {
    /// Line of the initial-state parent.
    pub parent_line: Line,
    /// Type id of the parent.
    pub parent_type_id: i64,
    /// Declared mass of the parent.
    pub parent_mass: f64,
    /// Stored four-momentum of the parent.
    pub parent_momentum: FourMomentum,
    /// Sum over visible final states.
    pub visible: FourMomentum,
    /// Sum over invisible final states.
    pub invisible: FourMomentum,
    /// Number of visible final states.
    pub visible_count: usize,
    /// Number of invisible final states.
    pub invisible_count: usize,
    /// Number of final states in neither type set.
    pub unclassified_count: usize,
}

impl BranchSummary {
    /// Visible plus invisible four-momentum.
    pub fn total(&self) -> FourMomentum {
        self.visible + self.invisible
    }
}

/// Branch summaries of one event together with the derived solver input.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AssembledEvent {
    /// The two branches, in initial-state order.
    pub branches: [BranchSummary; 2],
    /// Input for the external solver.
    pub input: SolverInput,
}

/// Builds the solver input for one event.
pub fn assemble(store: &RecordStore, config: &AssemblerConfig) -> Result<SolverInput, M2xError> {
    assemble_event(store, config).map(|event| event.input)
}

/// Splits an event into its two initial-state branches and sums each branch's
/// visible and invisible final states.
///
/// Fails with [`M2xError::Topology`] unless there are exactly two initial
/// states with non-empty branches, with [`M2xError::Hypothesis`] when the
/// invisible mass exceeds a parent's declared mass (if checked), and with
/// [`M2xError::Ancestry`] when a parent chain loops.
pub fn assemble_event(
    store: &RecordStore,
    config: &AssemblerConfig,
) -> Result<AssembledEvent, M2xError> {
    let parents = initial_states(store);
    let [first, second] = match (parents.len(), parents.get(0), parents.get(1)) {
        (2, Some(first), Some(second)) => [first, second],
        (count, ..) => {
            return Err(topology_error("initial-state-count", "expected two initial states")
                .with_context("initial_states", count));
        }
    };
    if let Some(pair) = &config.pair {
        if !pair.matches(first.type_id(), second.type_id()) {
            return Err(
                topology_error("unmatched-pair", "initial states are not the required pair")
                    .with_context("type_ids", format!("{},{}", first.type_id(), second.type_id()))
                    .with_context("expected", format!("{},{}", pair.type_ids[0], pair.type_ids[1])),
            );
        }
    }

    let mut branches = Vec::with_capacity(2);
    for parent in [first, second] {
        if let Some(branch) = summarize_branch(parent, store, config)? {
            branches.push(branch);
        }
    }
    let [a, b]: [BranchSummary; 2] = branches.try_into().map_err(|kept: Vec<_>| {
        topology_error("branch-count", "expected two non-empty decay branches")
            .with_context("branches", kept.len())
    })?;

    if config.check_invisible_mass {
        for branch in [&a, &b] {
            if config.invisible_mass > branch.parent_mass {
                return Err(M2xError::Hypothesis(
                    ErrorInfo::new(
                        "invisible-mass-exceeds-parent",
                        "invisible mass hypothesis exceeds the parent mass",
                    )
                    .with_context("invisible_mass", config.invisible_mass)
                    .with_context("parent_mass", branch.parent_mass)
                    .with_context("parent_line", branch.parent_line),
                ));
            }
        }
    }

    let input = solver_input(&a, &b, config);
    Ok(AssembledEvent {
        branches: [a, b],
        input,
    })
}

fn summarize_branch(
    parent: &ParticleRecord,
    store: &RecordStore,
    config: &AssemblerConfig,
) -> Result<Option<BranchSummary>, M2xError> {
    let products = final_states_of(parent.line(), store)?;
    if products.is_empty() {
        debug!(parent = %parent.line(), "initial state has no final-state descendants");
        return Ok(None);
    }
    let groups = partition(&products, &config.visible, &config.invisible);
    if !groups.unclassified.is_empty() {
        debug!(
            parent = %parent.line(),
            type_ids = ?groups.unclassified.type_ids(),
            "final states outside both type sets"
        );
    }
    Ok(Some(BranchSummary {
        parent_line: parent.line(),
        parent_type_id: parent.type_id(),
        parent_mass: parent.mass(),
        parent_momentum: parent.momentum(),
        visible: groups.visible.sum(),
        invisible: groups.invisible.sum(),
        visible_count: groups.visible.len(),
        invisible_count: groups.invisible.len(),
        unclassified_count: groups.unclassified.len(),
    }))
}

fn solver_input(a: &BranchSummary, b: &BranchSummary, config: &AssemblerConfig) -> SolverInput {
    let [ax, ay] = a.invisible.transverse();
    let [bx, by] = b.invisible.transverse();
    SolverInput {
        visible: [a.visible, b.visible],
        ptmiss: [ax + bx, ay + by],
        invisible_mass: config.invisible_mass,
        sqrt_s: config.collision.sqrt_s,
        ptot_z: config.collision.ptot_z,
    }
}

fn topology_error(code: &str, message: &str) -> M2xError {
    M2xError::Topology(ErrorInfo::new(code, message))
}
