//! # Trapezoidal Back-EMF
//!
//! Each winding induces a back-EMF proportional to electrical speed, shaped by
//! a normalized trapezoid of the electrical angle:
//!
//! ```text
//!  +1 |   ______________
//!     |  /              \
//!   0 |_/________________\__________________/_
//!     |                   \                /
//!  -1 |                    \______________/
//!     0  π/6          5π/6  7π/6       11π/6  2π
//! ```
//!
//! e_x = Ke * ω_e * trapezoid(θ_e + shift_x), with shifts 0, -2π/3, +2π/3 for A, B, C.

use std::f64::consts::PI;

use super::angle::wrap_angle;
use super::params::MotorParameters;
use super::three_phase::PhaseValues;

/// Phase shift between windings (rad, electrical)
pub const PHASE_SHIFT: f64 = 2.0 * PI / 3.0;

/// Normalized trapezoidal back-EMF shape, in `[-1, 1]` with period 2π
pub fn trapezoid(theta: f64) -> f64 {
    let theta = wrap_angle(theta);

    match theta {
        t if t < PI / 6.0 => 6.0 * t / PI,
        t if t < 5.0 * PI / 6.0 => 1.0,
        t if t < 7.0 * PI / 6.0 => 1.0 - 6.0 * (t - 5.0 * PI / 6.0) / PI,
        t if t < 11.0 * PI / 6.0 => -1.0,
        t => -1.0 + 6.0 * (t - 11.0 * PI / 6.0) / PI,
    }
}

/// Normalized shape for each phase at electrical angle `theta_e`
pub fn phase_shapes(theta_e: f64) -> PhaseValues {
    PhaseValues::new(
        trapezoid(theta_e),
        trapezoid(theta_e - PHASE_SHIFT),
        trapezoid(theta_e + PHASE_SHIFT),
    )
}

/// Per-phase back-EMF (V)
///
/// # Arguments
/// * `theta_e` - Electrical angle (rad)
/// * `omega` - Mechanical angular speed (rad/s)
pub fn phase_back_emf(theta_e: f64, omega: f64, params: &MotorParameters) -> PhaseValues {
    let omega_e = omega * params.pole_pairs_f64();
    phase_shapes(theta_e) * (params.ke * omega_e)
}
