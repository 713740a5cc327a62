mod common;

use common::*;
use m2x_core::errors::{ErrorInfo, M2xError};
use m2x_core::FourMomentum;
use m2x_kin::{
    process_events, process_events_parallel, report_line, solve_all, AssemblerConfig,
    DecayGenerator, DecayChannels, KinematicSolver, ReportSummary, SolverInput, SolverOutcome,
    TopologyPolicy,
};

/// Returns the visible momenta as the invisible guesses.
struct MirrorSolver;

impl KinematicSolver for MirrorSolver {
    fn solve(&self, input: &SolverInput) -> Result<SolverOutcome, M2xError> {
        Ok(SolverOutcome {
            m2: input.sqrt_s,
            k1: input.visible[0],
            k2: input.visible[1],
        })
    }
}

struct FailingSolver;

impl KinematicSolver for FailingSolver {
    fn solve(&self, _input: &SolverInput) -> Result<SolverOutcome, M2xError> {
        Err(M2xError::Solver(ErrorInfo::new("no-minimum", "failed to find minimum")))
    }
}

fn mixed_stream() -> Vec<Result<Vec<m2x_chain::RawParticle>, M2xError>> {
    vec![
        Ok(ditau_raw()),
        Ok(three_initial_raw()),
        Err(M2xError::Record(ErrorInfo::new("malformed-line", "bad field"))),
        Ok(ditau_raw()),
    ]
}

#[test]
fn skipped_events_do_not_stop_the_stream() {
    let outcomes = process_events(mixed_stream(), &AssemblerConfig::default()).unwrap();
    let sequences: Vec<u64> = outcomes.iter().map(|o| o.sequence).collect();
    assert_eq!(sequences, vec![1, 2, 3, 4]);
    assert!(outcomes[0].assembled().is_some());
    assert_eq!(outcomes[1].result.as_ref().unwrap_err().code(), "initial-state-count");
    assert_eq!(outcomes[2].result.as_ref().unwrap_err().code(), "malformed-line");
    assert_eq!(outcomes[3].assembled(), outcomes[0].assembled());

    let summary = ReportSummary::from_outcomes(&outcomes);
    assert_eq!(summary.processed, 4);
    assert_eq!(summary.assembled, 2);
    assert_eq!(summary.skipped(), 2);
    assert_eq!(summary.skipped_by_code["initial-state-count"], 1);
}

#[test]
fn skip_policy_keeps_the_same_outcomes() {
    let report = process_events(mixed_stream(), &AssemblerConfig::default()).unwrap();
    let config = AssemblerConfig {
        topology_policy: TopologyPolicy::Skip,
        ..AssemblerConfig::default()
    };
    let skip = process_events(mixed_stream(), &config).unwrap();
    assert_eq!(report, skip);
}

#[test]
fn fatal_reader_error_aborts_the_run() {
    let events = vec![
        Ok(ditau_raw()),
        Err(M2xError::Input(ErrorInfo::new("input-read", "stream closed"))),
        Ok(ditau_raw()),
    ];
    let err = process_events(events, &AssemblerConfig::default()).unwrap_err();
    match err {
        M2xError::Input(info) => assert_eq!(info.context["event"], "2"),
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn parallel_processing_matches_sequential_order() {
    let generator = DecayGenerator::new(DecayChannels::ditau(), 3).unwrap();
    let sequential = process_events(generator.events(64), &AssemblerConfig::default()).unwrap();
    let config = AssemblerConfig {
        concurrency: 4,
        ..AssemblerConfig::default()
    };
    let parallel = process_events_parallel(generator.events(64), &config).unwrap();
    assert_eq!(parallel.len(), 64);
    assert_eq!(parallel, sequential);
}

#[test]
fn solver_sees_assembled_events_only() {
    let outcomes = process_events(mixed_stream(), &AssemblerConfig::default()).unwrap();
    let solved = solve_all(&outcomes, &MirrorSolver, &AssemblerConfig::default());
    let sequences: Vec<u64> = solved.iter().map(|(sequence, _)| *sequence).collect();
    assert_eq!(sequences, vec![1, 4]);

    let outcome = solved[0].1.as_ref().unwrap();
    let line = report_line(outcome);
    let fields: Vec<f64> = line.split(' ').map(|f| f.parse().unwrap()).collect();
    assert_eq!(fields.len(), 7);
    assert_eq!(fields[0], 112f64.sqrt());
    assert_eq!(&fields[1..4], &VISIBLE_1[..3]);
    assert_eq!(&fields[4..7], &VISIBLE_2[..3]);
}

#[test]
fn solver_failures_are_reported_per_event() {
    let outcomes = process_events(vec![Ok(ditau_raw())], &AssemblerConfig::default()).unwrap();
    let solved = solve_all(&outcomes, &FailingSolver, &AssemblerConfig::default());
    assert_eq!(solved.len(), 1);
    assert_eq!(solved[0].1.as_ref().unwrap_err().code(), "no-minimum");
}

#[test]
fn invalid_solver_input_never_reaches_the_solver() {
    let input = SolverInput {
        visible: [FourMomentum::new(1.0, 0.0, 0.0, 0.5), FourMomentum::zero()],
        ptmiss: [0.0, 0.0],
        invisible_mass: 0.0,
        sqrt_s: 10.583,
        ptot_z: 3.0,
    };
    let err = input.validate(AssemblerConfig::default().mass_tolerance).unwrap_err();
    assert!(matches!(err, M2xError::Solver(info) if info.code == "invalid-solver-input"));
}

/// Massless electron as printed in an event file, with a slightly negative mass squared.
const FILE_PRECISION_ELECTRON: [f64; 4] =
    [-28.075296351, -7.3864307962, -35.779337499, 46.07540143];

#[test]
fn massless_visible_at_file_precision_is_solved() {
    let electron = FourMomentum::from_slice(&FILE_PRECISION_ELECTRON).unwrap();
    assert!(electron.mass_squared() < 0.0);
    assert!(electron.invariant_mass().is_none());

    let mut raw = ditau_raw();
    raw[4].momentum = FILE_PRECISION_ELECTRON.to_vec();
    raw[4].mass = 0.0;
    let config = AssemblerConfig::default();
    let outcomes = process_events(vec![Ok(raw)], &config).unwrap();
    let input = outcomes[0].assembled().unwrap().input;
    assert_eq!(input.visible[0], electron);
    assert!(input.validate(config.mass_tolerance).is_ok());

    let solved = solve_all(&outcomes, &MirrorSolver, &config);
    assert!(solved[0].1.is_ok());

    let strict = AssemblerConfig {
        mass_tolerance: 0.0,
        ..AssemblerConfig::default()
    };
    let solved = solve_all(&outcomes, &MirrorSolver, &strict);
    assert_eq!(solved[0].1.as_ref().unwrap_err().code(), "invalid-solver-input");
}
