//! Seam to the external constrained-minimization solver.

use m2x_core::errors::{ErrorInfo, M2xError};
use m2x_core::FourMomentum;
use serde::{Deserialize, Serialize};

/// Kinematic input of one two-branch event.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SolverInput {
    /// Visible four-momentum of each branch, in initial-state order.
    pub visible: [FourMomentum; 2],
    /// Missing transverse momentum `(x, y)`: the invisible transverse sum of both branches.
    pub ptmiss: [f64; 2],
    /// Hypothesised mass of each invisible particle.
    pub invisible_mass: f64,
    /// Centre-of-mass energy of the collision.
    pub sqrt_s: f64,
    /// Longitudinal momentum of the total system.
    pub ptot_z: f64,
}

impl SolverInput {
    /// Rejects input no solver can accept.
    ///
    /// A visible momentum counts as spacelike once its mass squared drops
    /// below `-mass_tolerance * e^2`. Massless particles written with finite
    /// precision land slightly on either side of zero.
    pub fn validate(&self, mass_tolerance: f64) -> Result<(), M2xError> {
        let finite = self
            .visible
            .iter()
            .flat_map(|p| p.to_array())
            .chain(self.ptmiss)
            .chain([self.invisible_mass, self.sqrt_s, self.ptot_z])
            .all(f64::is_finite);
        if !finite {
            return Err(invalid_input("non-finite component"));
        }
        if self.invisible_mass < 0.0 {
            return Err(invalid_input("negative invisible mass")
                .with_context("invisible_mass", self.invisible_mass));
        }
        if self.sqrt_s <= 0.0 {
            return Err(
                invalid_input("non-positive total energy").with_context("sqrt_s", self.sqrt_s),
            );
        }
        for (branch, p) in self.visible.iter().enumerate() {
            if p.mass_squared() < -mass_tolerance * p.e * p.e {
                return Err(invalid_input("visible momentum is spacelike")
                    .with_context("branch", branch)
                    .with_context("mass_squared", p.mass_squared()));
            }
        }
        Ok(())
    }
}

fn invalid_input(message: &str) -> M2xError {
    M2xError::Solver(ErrorInfo::new("invalid-solver-input", message))
}

/// Result of a successful minimization.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SolverOutcome {
    /// The minimized kinematic observable.
    pub m2: f64,
    /// Reconstructed invisible four-momentum of the first branch.
    pub k1: FourMomentum,
    /// Reconstructed invisible four-momentum of the second branch.
    pub k2: FourMomentum,
}

/// External constrained-minimization routine.
///
/// [`solve_all`](crate::pipeline::solve_all) calls `solve` sequentially, one
/// event at a time.
pub trait KinematicSolver: Send + Sync {
    /// Minimizes the observable for one event.
    fn solve(&self, input: &SolverInput) -> Result<SolverOutcome, M2xError>;
}
