//! Four-momentum algebra.

use std::iter::Sum;
use std::ops::{Add, AddAssign};

use serde::{Deserialize, Serialize};

use crate::errors::{ErrorInfo, M2xError};

/// Energy-momentum vector `(px, py, pz, e)` in a consistent unit system.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FourMomentum {
    /// Momentum along x.
    pub px: f64,
    /// Momentum along y.
    pub py: f64,
    /// Momentum along z.
    pub pz: f64,
    /// Energy.
    pub e: f64,
}

impl FourMomentum {
    /// Creates a four-momentum from its components.
    pub const fn new(px: f64, py: f64, pz: f64, e: f64) -> Self {
        Self { px, py, pz, e }
    }

    /// The additive identity.
    pub const fn zero() -> Self {
        Self::new(0.0, 0.0, 0.0, 0.0)
    }

    /// Builds a four-momentum from the leading `(px, py, pz, e)` entries of a slice.
    ///
    /// Entries past the fourth are ignored.
    pub fn from_slice(components: &[f64]) -> Result<Self, M2xError> {
        match components {
            [px, py, pz, e, ..] => Ok(Self::new(*px, *py, *pz, *e)),
            _ => Err(M2xError::Record(
                ErrorInfo::new("short-momentum", "momentum needs four components")
                    .with_context("components", components.len()),
            )),
        }
    }

    /// Squared length of the spatial part.
    pub fn p3_squared(&self) -> f64 {
        self.px * self.px + self.py * self.py + self.pz * self.pz
    }

    /// Minkowski square `e² − |p⃗|²`.
    pub fn mass_squared(&self) -> f64 {
        self.e * self.e - self.p3_squared()
    }

    /// Invariant mass, or `None` when `e² < |p⃗|²`.
    ///
    /// No tolerance is applied: tiny negative radicands from cancellation also
    /// yield `None`.
    pub fn invariant_mass(&self) -> Option<f64> {
        let m2 = self.mass_squared();
        if m2 < 0.0 || m2.is_nan() {
            None
        } else {
            Some(m2.sqrt())
        }
    }

    /// Transverse components `(px, py)`.
    pub fn transverse(&self) -> [f64; 2] {
        [self.px, self.py]
    }

    /// Components as `(px, py, pz, e)`.
    pub fn to_array(&self) -> [f64; 4] {
        [self.px, self.py, self.pz, self.e]
    }

    /// Velocity `p⃗ / e` of a frame moving with this four-momentum.
    pub fn boost_vector(&self) -> [f64; 3] {
        [self.px / self.e, self.py / self.e, self.pz / self.e]
    }

    /// Lorentz-boosts this four-momentum by the velocity `beta`.
    ///
    /// `|beta|` must be below one.
    pub fn boosted(&self, beta: [f64; 3]) -> Self {
        let [bx, by, bz] = beta;
        let b2 = bx * bx + by * by + bz * bz;
        if b2 == 0.0 {
            return *self;
        }
        let gamma = 1.0 / (1.0 - b2).sqrt();
        let bp = bx * self.px + by * self.py + bz * self.pz;
        let gamma2 = (gamma - 1.0) / b2;
        Self {
            px: self.px + gamma2 * bp * bx + gamma * bx * self.e,
            py: self.py + gamma2 * bp * by + gamma * by * self.e,
            pz: self.pz + gamma2 * bp * bz + gamma * bz * self.e,
            e: gamma * (self.e + bp),
        }
    }

    /// Componentwise comparison with an absolute tolerance.
    pub fn approx_eq(&self, other: &Self, tolerance: f64) -> bool {
        self.to_array()
            .iter()
            .zip(other.to_array().iter())
            .all(|(a, b)| (a - b).abs() <= tolerance)
    }
}

impl Add for FourMomentum {
    type Output = FourMomentum;

    fn add(self, rhs: Self) -> Self::Output {
        Self {
            px: self.px + rhs.px,
            py: self.py + rhs.py,
            pz: self.pz + rhs.pz,
            e: self.e + rhs.e,
        }
    }
}

impl AddAssign for FourMomentum {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sum for FourMomentum {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::zero(), Add::add)
    }
}

impl<'a> Sum<&'a FourMomentum> for FourMomentum {
    fn sum<I: Iterator<Item = &'a FourMomentum>>(iter: I) -> Self {
        iter.copied().sum()
    }
}
