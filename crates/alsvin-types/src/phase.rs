//! Exact spider and rotation phases.

use num_rational::Rational64;
use num_traits::{Signed, Zero};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};
use std::str::FromStr;
use thiserror::Error;

/// An exact phase, stored as a rational multiple of π.
///
/// Phases are normalized into the half-open interval (−π, π], so two phases
/// that differ by a full turn compare equal. The unit is π: `Phase::new(1, 2)`
/// is π/2, `Phase::new(1, 1)` is π.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Phase(Rational64);

impl Phase {
    /// The zero phase.
    pub const fn zero() -> Self {
        Phase(Rational64::new_raw(0, 1))
    }

    /// The π phase.
    pub const fn pi() -> Self {
        Phase(Rational64::new_raw(1, 1))
    }

    /// Create a phase of `numer`/`denom` · π, normalized into (−π, π].
    ///
    /// # Panics
    ///
    /// Panics if `denom` is zero.
    pub fn new(numer: i64, denom: i64) -> Self {
        assert!(denom != 0, "phase denominator must be non-zero");
        Phase(Rational64::new(numer, denom)).normalized()
    }

    /// Numerator of the reduced fraction, in units of π.
    pub fn numer(&self) -> i64 {
        *self.0.numer()
    }

    /// Denominator of the reduced fraction (always positive).
    pub fn denom(&self) -> i64 {
        *self.0.denom()
    }

    /// True for the zero phase.
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// True for the π phase.
    pub fn is_pi(&self) -> bool {
        self.0 == Rational64::new_raw(1, 1)
    }

    /// True for a Pauli phase (a multiple of π, i.e. 0 or π once normalized).
    pub fn is_pauli(&self) -> bool {
        self.denom() == 1
    }

    /// True for a Clifford phase (a multiple of π/2).
    pub fn is_clifford(&self) -> bool {
        self.denom() <= 2
    }

    /// True for a proper Clifford phase, exactly ±π/2.
    pub fn is_proper_clifford(&self) -> bool {
        self.0.abs() == Rational64::new_raw(1, 2)
    }

    /// Fold the underlying rational into (−1, 1] (units of π).
    fn normalized(self) -> Self {
        let two = Rational64::new_raw(2, 1);
        let mut r = self.0 - two * (self.0 / two).floor();
        if r > Rational64::new_raw(1, 1) {
            r -= two;
        }
        Phase(r)
    }
}

impl Default for Phase {
    fn default() -> Self {
        Phase::zero()
    }
}

impl Add for Phase {
    type Output = Phase;

    fn add(self, rhs: Phase) -> Phase {
        Phase(self.0 + rhs.0).normalized()
    }
}

impl AddAssign for Phase {
    fn add_assign(&mut self, rhs: Phase) {
        *self = *self + rhs;
    }
}

impl Sub for Phase {
    type Output = Phase;

    fn sub(self, rhs: Phase) -> Phase {
        Phase(self.0 - rhs.0).normalized()
    }
}

impl SubAssign for Phase {
    fn sub_assign(&mut self, rhs: Phase) {
        *self = *self - rhs;
    }
}

impl Neg for Phase {
    type Output = Phase;

    fn neg(self) -> Phase {
        Phase(-self.0).normalized()
    }
}

impl Mul<i64> for Phase {
    type Output = Phase;

    fn mul(self, rhs: i64) -> Phase {
        Phase(self.0 * Rational64::new_raw(rhs, 1)).normalized()
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.denom() == 1 {
            write!(f, "{}", self.numer())
        } else {
            write!(f, "{}/{}", self.numer(), self.denom())
        }
    }
}

/// Error parsing a textual phase expression.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid phase expression '{0}'")]
pub struct PhaseParseError(pub String);

impl FromStr for Phase {
    type Err = PhaseParseError;

    /// Parse a phase in units of π: `p` or `p/q` with signed numerator and
    /// positive denominator.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || PhaseParseError(s.to_string());
        match s.split_once('/') {
            Some((n, d)) => {
                let numer: i64 = n.trim().parse().map_err(|_| err())?;
                let denom: i64 = d.trim().parse().map_err(|_| err())?;
                if denom <= 0 {
                    return Err(err());
                }
                Ok(Phase::new(numer, denom))
            }
            None => {
                let numer: i64 = s.trim().parse().map_err(|_| err())?;
                Ok(Phase::new(numer, 1))
            }
        }
    }
}
