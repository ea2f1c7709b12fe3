//! # Motor Parameters
//!
//! Physical constants for one motor instance, fixed for the duration of a run.
//!
//! `ke` is expressed per rad/s of *electrical* speed and `kt` in N·m/A. The two
//! are supplied independently; nothing here forces `ke == kt`.
//! The Hall layout is part of the motor because it is fixed by where the
//! sensors sit on the stator.

use serde::{Deserialize, Serialize};

use super::hall::HallLayout;
use crate::error::SimulationError;

/// BLDC motor parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotorParameters {
    /// Phase resistance R (Ohm)
    pub resistance_ohm: f64,

    /// Phase inductance L (H)
    pub inductance_h: f64,

    /// Back-EMF constant Ke (V per rad/s of electrical speed)
    pub ke: f64,

    /// Torque constant Kt (N·m/A)
    pub kt: f64,

    /// Rotor inertia J (kg·m²)
    pub inertia_kg_m2: f64,

    /// Viscous friction coefficient B (N·m·s/rad)
    pub friction_nms_per_rad: f64,

    /// Pole pairs (electrical cycles per mechanical revolution)
    pub pole_pairs: u32,

    /// DC bus voltage (V)
    pub vdc: f64,

    /// Hall sensor mounting
    pub hall_layout: HallLayout,
}

impl Default for MotorParameters {
    fn default() -> Self {
        Self {
            resistance_ohm: 0.5,
            inductance_h: 0.001, // 1 mH
            ke: 0.01,
            kt: 0.01,
            inertia_kg_m2: 0.0001,
            friction_nms_per_rad: 0.001,
            pole_pairs: 4,
            vdc: 24.0,
            hall_layout: HallLayout::Spaced60,
        }
    }
}

impl MotorParameters {
    /// Electrical time constant L/R (s)
    pub fn electrical_time_constant(&self) -> f64 {
        self.inductance_h / self.resistance_ohm
    }

    /// Mechanical time constant J/B (s)
    pub fn mechanical_time_constant(&self) -> f64 {
        self.inertia_kg_m2 / self.friction_nms_per_rad
    }

    /// Pole pairs as a float multiplier between mechanical and electrical quantities
    pub fn pole_pairs_f64(&self) -> f64 {
        f64::from(self.pole_pairs)
    }

    /// Check the parameters the integrators divide by
    ///
    /// L and J appear as denominators of the current and speed derivatives;
    /// zero pole pairs would pin the electrical angle at zero forever.
    pub fn validate(&self) -> Result<(), SimulationError> {
        SimulationError::require_positive("inductance_h", self.inductance_h)?;
        SimulationError::require_positive("inertia_kg_m2", self.inertia_kg_m2)?;
        if self.pole_pairs == 0 {
            return Err(SimulationError::InvalidConfig {
                field: "pole_pairs",
                value: 0.0,
            });
        }
        Ok(())
    }
}
