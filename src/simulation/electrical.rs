//! # Phase Current Dynamics
//!
//! Each winding is an independent series RL circuit driven by its terminal
//! voltage against its back-EMF:
//!
//! L * di/dt = V - e - R * i
//!
//! Mutual inductance and neutral-point coupling are not modeled. Currents are
//! advanced with forward Euler and never clamped; a step much larger than the
//! electrical time constant L/R will diverge.

use super::params::MotorParameters;
use super::three_phase::PhaseValues;

/// Current derivative di/dt for each phase (A/s)
pub fn current_derivative(
    voltages: &PhaseValues,
    back_emf: &PhaseValues,
    currents: &PhaseValues,
    params: &MotorParameters,
) -> PhaseValues {
    let r = params.resistance_ohm;
    let l = params.inductance_h;
    PhaseValues::new(
        (voltages.a - back_emf.a - r * currents.a) / l,
        (voltages.b - back_emf.b - r * currents.b) / l,
        (voltages.c - back_emf.c - r * currents.c) / l,
    )
}

/// Advance phase currents by one Euler step of `dt` seconds
pub fn step_currents(
    voltages: &PhaseValues,
    back_emf: &PhaseValues,
    currents: &PhaseValues,
    params: &MotorParameters,
    dt: f64,
) -> PhaseValues {
    let di_dt = current_derivative(voltages, back_emf, currents, params);
    PhaseValues::new(
        currents.a + di_dt.a * dt,
        currents.b + di_dt.b * dt,
        currents.c + di_dt.c * dt,
    )
}
