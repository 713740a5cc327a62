//! Deterministic synthetic two-branch events.
//!
//! Each event has the layout of a Les Houches record: two beams, two
//! initial-state parents produced back to back in the centre-of-mass frame,
//! and a two-body decay of each parent into one visible and one invisible
//! daughter. Daughter momenta are generated in the parent rest frame and
//! boosted to the lab, so each branch sums to its parent's four-momentum.

use m2x_chain::RawParticle;
use m2x_core::errors::{ErrorInfo, M2xError};
use m2x_core::{FourMomentum, RngHandle};
use serde::{Deserialize, Serialize};

/// Particle type id with its nominal mass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Species {
    /// Signed particle-type code.
    pub type_id: i64,
    /// Rest mass.
    pub mass: f64,
}

impl Species {
    /// Creates a species.
    pub const fn new(type_id: i64, mass: f64) -> Self {
        Self { type_id, mass }
    }
}

/// Content and beam energies of generated events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecayChannels {
    /// Energy of the beam travelling along +z.
    pub beam_a: f64,
    /// Energy of the beam travelling along -z.
    pub beam_b: f64,
    /// The two initial-state parents.
    pub parents: [Species; 2],
    /// Visible daughter of each parent.
    pub visible: [Species; 2],
    /// Invisible daughter of each parent.
    pub invisible: [Species; 2],
}

impl DecayChannels {
    /// `e- e+ -> tau- tau+` at 7 x 4 units, with `tau- -> e- nu_e` and
    /// `tau+ -> mu+ nu_mu~`.
    pub fn ditau() -> Self {
        Self {
            beam_a: 7.0,
            beam_b: 4.0,
            parents: [Species::new(15, 1.77686), Species::new(-15, 1.77686)],
            visible: [Species::new(11, 0.000511), Species::new(-13, 0.105658)],
            invisible: [Species::new(12, 0.0), Species::new(-14, 0.0)],
        }
    }

    fn validate(&self) -> Result<(), M2xError> {
        let half_energy = (self.beam_a * self.beam_b).sqrt();
        for (branch, parent) in self.parents.iter().enumerate() {
            if parent.mass >= half_energy {
                return Err(synth_error("parent-above-threshold", "beams cannot produce the parents")
                    .with_context("branch", branch)
                    .with_context("parent_mass", parent.mass));
            }
            let daughters = self.visible[branch].mass + self.invisible[branch].mass;
            if daughters >= parent.mass {
                return Err(synth_error("closed-decay", "daughters outweigh their parent")
                    .with_context("branch", branch)
                    .with_context("daughter_mass", daughters));
            }
        }
        Ok(())
    }
}

/// Generator of reproducible synthetic events; event `i` depends only on
/// `(seed, i)`.
#[derive(Debug, Clone)]
pub struct DecayGenerator {
    decays: DecayChannels,
    seed: u64,
}

impl DecayGenerator {
    /// Creates a generator after checking the decays are kinematically open.
    pub fn new(decays: DecayChannels, seed: u64) -> Result<Self, M2xError> {
        decays.validate()?;
        Ok(Self { decays, seed })
    }

    /// Raw entries of event number `index`.
    pub fn event(&self, index: u64) -> Vec<RawParticle> {
        let mut rng = RngHandle::substream(self.seed, index);
        let decays = &self.decays;
        let beam_a = FourMomentum::new(0.0, 0.0, decays.beam_a, decays.beam_a);
        let beam_b = FourMomentum::new(0.0, 0.0, -decays.beam_b, decays.beam_b);
        let total = beam_a + beam_b;
        let sqrt_s = total.invariant_mass().unwrap_or_default();
        let lab = total.boost_vector();

        let [m_a, m_b] = [decays.parents[0].mass, decays.parents[1].mass];
        let p_star = breakup_momentum(sqrt_s, m_a, m_b);
        let direction = rng.isotropic_direction();
        let parents = back_to_back(p_star, direction, m_a, m_b).map(|p| p.boosted(lab));

        let mut raw = vec![
            entry(Species::new(11, 0.0), -1, (0, 0), beam_a),
            entry(Species::new(-11, 0.0), -1, (0, 0), beam_b),
            entry(decays.parents[0], 2, (1, 2), parents[0]),
            entry(decays.parents[1], 2, (1, 2), parents[1]),
        ];
        for branch in 0..2 {
            let parent = decays.parents[branch];
            let (visible, invisible) = (decays.visible[branch], decays.invisible[branch]);
            let q_star = breakup_momentum(parent.mass, visible.mass, invisible.mass);
            let direction = rng.isotropic_direction();
            let beta = parents[branch].boost_vector();
            let [k_vis, k_inv] = back_to_back(q_star, direction, visible.mass, invisible.mass)
                .map(|p| p.boosted(beta));
            let mother = branch as u32 + 3;
            raw.push(entry(visible, 1, (mother, mother), k_vis));
            raw.push(entry(invisible, 1, (mother, mother), k_inv));
        }
        raw
    }

    /// Lazy stream of the first `count` events.
    pub fn events(
        &self,
        count: u64,
    ) -> impl Iterator<Item = Result<Vec<RawParticle>, M2xError>> + '_ {
        (0..count).map(move |index| Ok(self.event(index)))
    }
}

/// Momentum of each daughter in the two-body decay of a mass `m` at rest.
fn breakup_momentum(m: f64, m1: f64, m2: f64) -> f64 {
    let sum = m1 + m2;
    let diff = m1 - m2;
    ((m * m - sum * sum) * (m * m - diff * diff)).max(0.0).sqrt() / (2.0 * m)
}

fn back_to_back(p: f64, direction: [f64; 3], m1: f64, m2: f64) -> [FourMomentum; 2] {
    let [x, y, z] = direction.map(|c| c * p);
    let e1 = (p * p + m1 * m1).sqrt();
    let e2 = (p * p + m2 * m2).sqrt();
    [
        FourMomentum::new(x, y, z, e1),
        FourMomentum::new(-x, -y, -z, e2),
    ]
}

fn entry(species: Species, status: i32, parent_lines: (u32, u32), p: FourMomentum) -> RawParticle {
    RawParticle {
        type_id: species.type_id,
        status,
        parent_lines,
        momentum: vec![p.px, p.py, p.pz, p.e, species.mass],
        mass: species.mass,
    }
}

fn synth_error(code: &str, message: &str) -> M2xError {
    M2xError::Config(ErrorInfo::new(code, message))
}
