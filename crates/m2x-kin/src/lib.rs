#![deny(missing_docs)]

//! Two-branch decay assembly for kinematic solvers.
//!
//! [`assemble_event`] turns one event's [`RecordStore`](m2x_chain::RecordStore)
//! into the per-branch visible/invisible sums and the [`SolverInput`] handed
//! to an external [`KinematicSolver`]. Processing is a pure function of the
//! event and the [`AssemblerConfig`]; [`pipeline`] applies it to a stream of
//! events, optionally across a bounded worker pool.

pub mod assemble;
pub mod config;
pub mod pipeline;
pub mod report;
pub mod solver;
pub mod synth;

pub use assemble::{assemble, assemble_event, AssembledEvent, BranchSummary};
pub use config::{AssemblerConfig, CollisionConfig, PairRequirement, TopologyPolicy};
pub use pipeline::{process_event, process_events, process_events_parallel, solve_all, EventOutcome};
pub use report::{report_line, ReportSummary};
pub use solver::{KinematicSolver, SolverInput, SolverOutcome};
pub use synth::{DecayGenerator, DecayChannels, Species};
