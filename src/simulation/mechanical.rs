//! # Rotor Mechanics
//!
//! Electromagnetic torque from the converted electrical power, then the rotor
//! equation of motion:
//!
//! J * dω/dt = T_e - B * ω - T_load
//!
//! ## Torque
//!
//! Above [`LOW_SPEED_THRESHOLD`] the torque is the power balance
//! `T_e = (e_a*i_a + e_b*i_b + e_c*i_c) / ω`. At or below it the division is
//! avoided and a [`LowSpeedTorque`] fallback is used instead. The switch is a
//! hard threshold and the two formulas do not agree at the crossover, so the
//! torque trace can jump when the rotor passes 0.1 rad/s.
//!
//! ## Forward-only rotation
//!
//! After each Euler step ω is clamped to be non-negative. This model covers
//! spin-up and forward running only; a braking torque stops the rotor rather
//! than reversing it.

use serde::{Deserialize, Serialize};

use super::back_emf::phase_shapes;
use super::params::MotorParameters;
use super::three_phase::PhaseValues;

/// Speed (rad/s) at or below which the power-balance torque is not used
pub const LOW_SPEED_THRESHOLD: f64 = 0.1;

/// Torque estimate used near standstill
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LowSpeedTorque {
    /// `Kt * (i_a + i_b + i_c)`
    ///
    /// With symmetric two-phase drive the active currents cancel, so a rotor
    /// starting from rest with zero currents develops no torque.
    #[default]
    CurrentSum,
    /// `Kt * Σ shape_x(θ_e) * i_x`, weighting each current by its normalized back-EMF
    BackEmfWeighted,
}

impl LowSpeedTorque {
    /// Standstill torque (N·m)
    pub fn torque(self, currents: &PhaseValues, theta_e: f64, params: &MotorParameters) -> f64 {
        match self {
            LowSpeedTorque::CurrentSum => params.kt * (currents.a + currents.b + currents.c),
            LowSpeedTorque::BackEmfWeighted => params.kt * phase_shapes(theta_e).dot(currents),
        }
    }
}

/// Electromagnetic torque (N·m) with the selected low-speed fallback
pub fn electromagnetic_torque_with(
    model: LowSpeedTorque,
    back_emf: &PhaseValues,
    currents: &PhaseValues,
    omega: f64,
    theta_e: f64,
    params: &MotorParameters,
) -> f64 {
    if omega.abs() > LOW_SPEED_THRESHOLD {
        back_emf.dot(currents) / omega
    } else {
        model.torque(currents, theta_e, params)
    }
}

/// Electromagnetic torque (N·m) using the phase current sum near standstill
pub fn electromagnetic_torque(
    back_emf: &PhaseValues,
    currents: &PhaseValues,
    omega: f64,
    params: &MotorParameters,
) -> f64 {
    electromagnetic_torque_with(
        LowSpeedTorque::CurrentSum,
        back_emf,
        currents,
        omega,
        0.0,
        params,
    )
}

/// Rotor speed and position
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RotorState {
    /// Mechanical angular speed (rad/s), never negative
    pub omega: f64,
    /// Mechanical angle (rad), accumulated without wrapping
    pub theta_mechanical: f64,
}

impl RotorState {
    /// Electrical angle, derived from the mechanical angle rather than integrated
    pub fn electrical_angle(&self, params: &MotorParameters) -> f64 {
        self.theta_mechanical * params.pole_pairs_f64()
    }

    /// Advance one Euler step under `torque` against friction and `load_torque`
    pub fn step(
        &self,
        torque: f64,
        load_torque: f64,
        params: &MotorParameters,
        dt: f64,
    ) -> RotorState {
        let domega_dt = (torque - params.friction_nms_per_rad * self.omega - load_torque)
            / params.inertia_kg_m2;
        let omega = (self.omega + domega_dt * dt).max(0.0);

        RotorState {
            omega,
            theta_mechanical: self.theta_mechanical + omega * dt,
        }
    }
}

/// Mechanical speed in revolutions per minute
pub fn rpm(omega: f64) -> f64 {
    omega * 60.0 / (2.0 * std::f64::consts::PI)
}
