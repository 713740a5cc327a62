//! YAML-configurable parameters governing branch assembly.

use std::fs;
use std::path::Path;

use m2x_chain::TypeSet;
use m2x_core::errors::{ErrorInfo, M2xError};
use serde::{Deserialize, Serialize};

/// Caller configuration applied to every event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssemblerConfig {
    /// Type ids summed into each branch's visible four-momentum.
    #[serde(default = "TypeSet::charged_leptons_and_pions")]
    pub visible: TypeSet,
    /// Type ids summed into each branch's invisible four-momentum.
    #[serde(default = "TypeSet::neutrinos_and_dark")]
    pub invisible: TypeSet,
    /// Hypothesised invisible-particle mass forwarded to the solver.
    #[serde(default)]
    pub invisible_mass: f64,
    /// Total energy and longitudinal momentum of the collision.
    #[serde(default)]
    pub collision: CollisionConfig,
    /// Optional type-id pair the two initial states must form.
    #[serde(default)]
    pub pair: Option<PairRequirement>,
    /// Reject events whose branch parent is lighter than the invisible mass.
    #[serde(default = "default_true")]
    pub check_invisible_mass: bool,
    /// Relative tolerance on negative visible mass squared, in units of `e^2`.
    #[serde(default = "default_mass_tolerance")]
    pub mass_tolerance: f64,
    /// How events that are not a two-branch topology are surfaced.
    #[serde(default)]
    pub topology_policy: TopologyPolicy,
    /// Worker count for parallel event processing.
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
}

fn default_true() -> bool {
    true
}

fn default_concurrency() -> usize {
    1
}

fn default_mass_tolerance() -> f64 {
    1e-6
}

impl Default for AssemblerConfig {
    fn default() -> Self {
        Self {
            visible: TypeSet::charged_leptons_and_pions(),
            invisible: TypeSet::neutrinos_and_dark(),
            invisible_mass: 0.0,
            collision: CollisionConfig::default(),
            pair: None,
            check_invisible_mass: true,
            mass_tolerance: default_mass_tolerance(),
            topology_policy: TopologyPolicy::default(),
            concurrency: default_concurrency(),
        }
    }
}

impl AssemblerConfig {
    /// Loads and validates a configuration from a YAML file.
    pub fn load(path: &Path) -> Result<Self, M2xError> {
        let contents = fs::read_to_string(path).map_err(|err| {
            config_error("config-read", err.to_string()).with_context("path", path.display())
        })?;
        Self::from_yaml_str(&contents)
    }

    /// Parses and validates a configuration from YAML text.
    pub fn from_yaml_str(contents: &str) -> Result<Self, M2xError> {
        let config: Self = serde_yaml::from_str(contents)
            .map_err(|err| config_error("config-parse", err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Serializes the configuration as YAML.
    pub fn to_yaml_string(&self) -> Result<String, M2xError> {
        serde_yaml::to_string(self).map_err(|err| config_error("config-serialize", err.to_string()))
    }

    /// Checks the configuration for contradictions.
    pub fn validate(&self) -> Result<(), M2xError> {
        let overlap = self.visible.overlap(&self.invisible);
        if !overlap.is_empty() {
            let ids: Vec<String> = overlap.iter().map(i64::to_string).collect();
            return Err(
                config_error("overlapping-type-sets", "a type id is both visible and invisible")
                    .with_context("type_ids", ids.join(",")),
            );
        }
        if !(self.invisible_mass >= 0.0 && self.invisible_mass.is_finite()) {
            return Err(config_error(
                "invalid-invisible-mass",
                "invisible mass must be finite and >= 0",
            )
            .with_context("invisible_mass", self.invisible_mass));
        }
        if !(self.mass_tolerance >= 0.0 && self.mass_tolerance.is_finite()) {
            return Err(config_error(
                "invalid-mass-tolerance",
                "mass tolerance must be finite and >= 0",
            )
            .with_context("mass_tolerance", self.mass_tolerance));
        }
        if !(self.collision.sqrt_s > 0.0 && self.collision.sqrt_s.is_finite()) {
            return Err(config_error("invalid-sqrt-s", "total energy must be finite and positive")
                .with_context("sqrt_s", self.collision.sqrt_s));
        }
        if !self.collision.ptot_z.is_finite() {
            return Err(config_error("invalid-ptot-z", "longitudinal momentum must be finite")
                .with_context("ptot_z", self.collision.ptot_z));
        }
        if self.concurrency == 0 {
            return Err(config_error("invalid-concurrency", "at least one worker is required"));
        }
        Ok(())
    }
}

/// Total energy and longitudinal momentum of the colliding system.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CollisionConfig {
    /// Centre-of-mass energy.
    pub sqrt_s: f64,
    /// Longitudinal momentum of the total system.
    #[serde(default)]
    pub ptot_z: f64,
}

impl CollisionConfig {
    /// Massless beams of energies `e_a` (along +z) and `e_b` (along -z).
    pub fn from_beam_energies(e_a: f64, e_b: f64) -> Self {
        let e_total = e_a + e_b;
        let ptot_z = e_a - e_b;
        Self {
            sqrt_s: (e_total * e_total - ptot_z * ptot_z).sqrt(),
            ptot_z,
        }
    }
}

impl Default for CollisionConfig {
    fn default() -> Self {
        Self::from_beam_energies(7.0, 4.0)
    }
}

/// Type ids the two initial-state records must carry, in either order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairRequirement {
    /// The two expected type ids.
    pub type_ids: [i64; 2],
}

impl PairRequirement {
    /// Opposite-charge tau pair.
    pub const DITAU: PairRequirement = PairRequirement {
        type_ids: [15, -15],
    };

    /// Returns whether `(a, b)` matches the pair in any order.
    pub fn matches(&self, a: i64, b: i64) -> bool {
        let [x, y] = self.type_ids;
        (a == x && b == y) || (a == y && b == x)
    }
}

/// Handling of events that are not a two-branch topology.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TopologyPolicy {
    /// Skip the event with a debug-level diagnostic only.
    Skip,
    /// Skip the event and emit a warning with its sequence number.
    #[default]
    Report,
}

fn config_error(code: &str, message: impl Into<String>) -> M2xError {
    M2xError::Config(ErrorInfo::new(code, message))
}
