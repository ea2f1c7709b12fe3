//! # BLDC Motor Simulation
//!
//! Six-step (trapezoidal) drive of a three-phase brushless DC motor, advanced
//! with a fixed-step forward Euler integrator.
//!
//! ## Components
//!
//! - **Params**: physical constants of one motor
//! - **Back-EMF**: trapezoidal per-phase back-EMF from electrical angle and speed
//! - **Hall**: three digital rotor position sensors
//! - **Commutation**: Hall code to inverter sector to terminal voltages
//! - **Electrical**: per-phase RL current dynamics
//! - **Mechanical**: electromagnetic torque and rotor equation of motion
//! - **Engine**: owns the state, runs the tick loop and records the time series
//!
//! ## Usage
//!
//! ```rust
//! use bldc_sim::simulation::{MotorParameters, SimulationEngine};
//!
//! let mut engine = SimulationEngine::new(MotorParameters::default());
//!
//! // 10 ms at 10 µs steps, 1 mN·m load
//! let result = engine.simulate(0.01, 1e-5, 0.001).unwrap();
//!
//! let summary = result.summary(100);
//! assert!(summary.final_rpm >= 0.0);
//! ```

pub mod angle;
pub mod back_emf;
pub mod commutation;
pub mod electrical;
pub mod engine;
pub mod hall;
pub mod mechanical;
pub mod params;
pub mod result;
pub mod three_phase;

pub use angle::wrap_angle;
pub use back_emf::{phase_back_emf, trapezoid};
pub use commutation::{commutation_state, phase_voltages, CommutationState};
pub use electrical::{current_derivative, step_currents};
pub use engine::{
    EngineStatus, SimulationEngine, SimulationOptions, SimulationState, MAX_STEPS,
};
pub use hall::{hall_signals, HallLayout, HallSignals};
pub use mechanical::{
    electromagnetic_torque, electromagnetic_torque_with, rpm, LowSpeedTorque, RotorState,
    LOW_SPEED_THRESHOLD,
};
pub use params::MotorParameters;
pub use result::{SimulationResult, SimulationSample, SimulationSummary};
pub use three_phase::PhaseValues;
