//! Six-step BLDC motor simulator.
//!
//! Models trapezoidal back-EMF, Hall sensing, six-step commutation, RL phase
//! currents and rotor mechanics. See [`simulation`] for the model and
//! [`config`] for loading run settings.

pub mod config;
pub mod error;
pub mod simulation;
pub mod telemetry;

pub use error::SimulationError;
