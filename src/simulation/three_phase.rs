//! # Three-Phase Quantities
//!
//! Per-phase values for the A/B/C windings of a star-connected BLDC motor.
//! The same type carries terminal voltages, back-EMFs and phase currents,
//! so the per-tick arithmetic in the electrical and mechanical models reads
//! phase by phase without juggling tuples.

use serde::{Deserialize, Serialize};
use std::ops::{Add, Mul, Neg, Sub};

/// One value per motor phase
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct PhaseValues {
    /// Phase A
    pub a: f64,
    /// Phase B
    pub b: f64,
    /// Phase C
    pub c: f64,
}

impl PhaseValues {
    /// All phases at zero
    pub const ZERO: Self = Self {
        a: 0.0,
        b: 0.0,
        c: 0.0,
    };

    pub const fn new(a: f64, b: f64, c: f64) -> Self {
        Self { a, b, c }
    }

    /// Sum across all phases
    pub fn total(&self) -> f64 {
        self.a + self.b + self.c
    }

    /// Largest absolute value of any phase
    pub fn max_abs(&self) -> f64 {
        self.a.abs().max(self.b.abs()).max(self.c.abs())
    }

    /// Phase-by-phase product summed, e.g. `e · i` gives converted electrical power
    pub fn dot(&self, other: &PhaseValues) -> f64 {
        self.a * other.a + self.b * other.b + self.c * other.c
    }

    /// Apply `f` to every phase
    pub fn map(self, f: impl Fn(f64) -> f64) -> Self {
        Self {
            a: f(self.a),
            b: f(self.b),
            c: f(self.c),
        }
    }

    /// True when no phase is NaN or infinite
    pub fn is_finite(&self) -> bool {
        self.a.is_finite() && self.b.is_finite() && self.c.is_finite()
    }

    pub fn as_array(&self) -> [f64; 3] {
        [self.a, self.b, self.c]
    }
}

impl Add for PhaseValues {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.a + rhs.a, self.b + rhs.b, self.c + rhs.c)
    }
}

impl Sub for PhaseValues {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.a - rhs.a, self.b - rhs.b, self.c - rhs.c)
    }
}

impl Mul<f64> for PhaseValues {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self {
        self.map(|x| x * rhs)
    }
}

impl Neg for PhaseValues {
    type Output = Self;

    fn neg(self) -> Self {
        self.map(|x| -x)
    }
}

impl From<(f64, f64, f64)> for PhaseValues {
    fn from((a, b, c): (f64, f64, f64)) -> Self {
        Self::new(a, b, c)
    }
}
