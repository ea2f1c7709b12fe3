//! # Simulation Engine
//!
//! Owns the mutable motor state and advances it with a fixed step. Each tick,
//! in order:
//!
//! 1. back-EMF at the current angle and speed
//! 2. Hall outputs at the current angle
//! 3. commutation sector and terminal voltages
//! 4. Euler step of the phase currents
//! 5. torque and Euler step of the rotor
//! 6. electrical angle recomputed from the mechanical angle
//! 7. sample recorded
//!
//! A run is `floor(t_end / dt)` ticks, always starting from rest.

use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;
use tracing::{debug, info, warn};

use super::angle::wrap_angle;
use super::back_emf::phase_back_emf;
use super::commutation::CommutationState;
use super::electrical::step_currents;
use super::mechanical::{electromagnetic_torque_with, rpm, LowSpeedTorque, RotorState};
use super::params::MotorParameters;
use super::result::{SimulationResult, SimulationSample};
use super::three_phase::PhaseValues;
use crate::error::SimulationError;

/// Most ticks a single run may record
pub const MAX_STEPS: usize = 100_000_000;

/// Samples reserved up front; longer runs grow the buffer as they go
const PREALLOCATED_SAMPLES: usize = 1 << 20;

/// Lifecycle of the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EngineStatus {
    /// Not running; the next run starts from rest
    #[default]
    Idle,
    /// Ticks are being produced
    Running,
    /// The last run produced all its ticks
    Completed,
}

/// Mutable motor state, zeroed at the start of every run
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SimulationState {
    /// Electrical angle (rad), unwrapped; always `theta_mechanical * pole_pairs`
    pub theta_electrical: f64,
    /// Mechanical speed (rad/s), never negative
    pub omega: f64,
    /// Mechanical angle (rad), unwrapped
    pub theta_mechanical: f64,
    /// Phase currents (A)
    pub currents: PhaseValues,
    /// Ticks taken since the last reset
    pub steps: usize,
}

/// Run settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationOptions {
    /// Simulated duration (s)
    pub t_end: f64,
    /// Fixed time step (s)
    pub dt: f64,
    /// Constant load torque opposing rotation (N·m)
    pub load_torque: f64,
    /// Abort with [`SimulationError::NonFinite`] once a current or the speed
    /// stops being finite
    pub check_finite: bool,
}

impl Default for SimulationOptions {
    fn default() -> Self {
        Self {
            t_end: 0.05,
            dt: 1e-5,
            load_torque: 0.0,
            check_finite: false,
        }
    }
}

impl SimulationOptions {
    pub fn new(t_end: f64, dt: f64, load_torque: f64) -> Self {
        Self {
            t_end,
            dt,
            load_torque,
            ..Default::default()
        }
    }

    /// Enable the NaN/Inf diagnostic
    pub fn with_finite_check(mut self, enabled: bool) -> Self {
        self.check_finite = enabled;
        self
    }

    /// Ticks a run with these options produces
    pub fn step_count(&self) -> usize {
        (self.t_end / self.dt).floor() as usize
    }

    pub fn validate(&self) -> Result<(), SimulationError> {
        SimulationError::require_positive("t_end", self.t_end)?;
        SimulationError::require_positive("dt", self.dt)?;
        if !self.load_torque.is_finite() {
            return Err(SimulationError::InvalidConfig {
                field: "load_torque",
                value: self.load_torque,
            });
        }
        let steps = (self.t_end / self.dt).floor();
        if steps > MAX_STEPS as f64 {
            return Err(SimulationError::TooManySteps {
                steps,
                limit: MAX_STEPS,
            });
        }
        Ok(())
    }
}

/// Six-step BLDC motor simulator
pub struct SimulationEngine {
    params: MotorParameters,
    low_speed_torque: LowSpeedTorque,
    state: SimulationState,
    status: EngineStatus,
}

impl Default for SimulationEngine {
    fn default() -> Self {
        Self::new(MotorParameters::default())
    }
}

impl SimulationEngine {
    /// Create an idle engine for one motor
    pub fn new(params: MotorParameters) -> Self {
        Self {
            params,
            low_speed_torque: LowSpeedTorque::default(),
            state: SimulationState::default(),
            status: EngineStatus::Idle,
        }
    }

    /// Select the standstill torque estimate
    pub fn with_low_speed_torque(mut self, model: LowSpeedTorque) -> Self {
        self.low_speed_torque = model;
        self
    }

    pub fn params(&self) -> &MotorParameters {
        &self.params
    }

    pub fn low_speed_torque(&self) -> LowSpeedTorque {
        self.low_speed_torque
    }

    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    pub fn status(&self) -> EngineStatus {
        self.status
    }

    /// Zero all state and return to [`EngineStatus::Idle`]
    pub fn reset(&mut self) {
        self.state = SimulationState::default();
        self.status = EngineStatus::Idle;
        debug!("simulation state reset");
    }

    /// Run from rest for `t_end` seconds with step `dt` against `load_torque`
    pub fn simulate(
        &mut self,
        t_end: f64,
        dt: f64,
        load_torque: f64,
    ) -> Result<SimulationResult, SimulationError> {
        self.simulate_with(&SimulationOptions::new(t_end, dt, load_torque))
    }

    /// Run from rest with explicit options
    pub fn simulate_with(
        &mut self,
        options: &SimulationOptions,
    ) -> Result<SimulationResult, SimulationError> {
        options.validate()?;
        self.params.validate()?;

        let steps = options.step_count();
        let tau_e = self.params.electrical_time_constant();
        if options.dt > tau_e / 10.0 {
            warn!(
                dt = options.dt,
                tau_e, "time step is coarse against L/R, currents may diverge"
            );
        }

        self.reset();
        self.status = EngineStatus::Running;
        info!(
            steps,
            dt = options.dt,
            load_torque = options.load_torque,
            "simulation started"
        );

        let mut result = SimulationResult::with_capacity(
            options.dt,
            options.load_torque,
            steps.min(PREALLOCATED_SAMPLES),
        );
        for _ in 0..steps {
            let sample = self.tick(options.dt, options.load_torque);

            if options.check_finite && !self.state_is_finite() {
                warn!(
                    step = self.state.steps,
                    time = sample.time,
                    "non-finite state, aborting run"
                );
                self.status = EngineStatus::Idle;
                return Err(SimulationError::NonFinite {
                    step: self.state.steps - 1,
                    time: sample.time,
                });
            }

            result.push(sample);
        }

        self.status = EngineStatus::Completed;
        info!(
            steps = result.len(),
            final_rpm = rpm(self.state.omega),
            "simulation completed"
        );
        Ok(result)
    }

    /// Advance the motor by one step of `dt` seconds and return the recorded sample
    ///
    /// No validation is done here; [`SimulationEngine::simulate`] checks its
    /// inputs before ticking.
    pub fn tick(&mut self, dt: f64, load_torque: f64) -> SimulationSample {
        self.status = EngineStatus::Running;

        let params = &self.params;
        let time = self.state.steps as f64 * dt;
        let theta_e = self.state.theta_electrical;

        let back_emf = phase_back_emf(theta_e, self.state.omega, params);
        let hall = params.hall_layout.signals(theta_e);
        let commutation = CommutationState::from_hall(hall);
        let voltages = commutation.phase_voltages(params.vdc);

        let currents = step_currents(&voltages, &back_emf, &self.state.currents, params, dt);

        let torque = electromagnetic_torque_with(
            self.low_speed_torque,
            &back_emf,
            &currents,
            self.state.omega,
            theta_e,
            params,
        );
        let rotor = RotorState {
            omega: self.state.omega,
            theta_mechanical: self.state.theta_mechanical,
        }
        .step(torque, load_torque, params, dt);

        self.state = SimulationState {
            theta_electrical: rotor.electrical_angle(params),
            omega: rotor.omega,
            theta_mechanical: rotor.theta_mechanical,
            currents,
            steps: self.state.steps + 1,
        };

        SimulationSample {
            time,
            omega: rotor.omega,
            rpm: rpm(rotor.omega),
            theta_electrical: wrap_angle(self.state.theta_electrical),
            theta_mechanical: rotor.theta_mechanical,
            currents,
            back_emf,
            voltages,
            hall,
            commutation,
            torque,
        }
    }

    fn state_is_finite(&self) -> bool {
        self.state.currents.is_finite() && self.state.omega.is_finite()
    }

    /// Electrical revolutions completed since the last reset
    pub fn electrical_revolutions(&self) -> f64 {
        self.state.theta_electrical / TAU
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::hall::HallLayout;

    fn spinning_motor() -> SimulationEngine {
        let params = MotorParameters {
            hall_layout: HallLayout::Spaced120,
            ..Default::default()
        };
        SimulationEngine::new(params).with_low_speed_torque(LowSpeedTorque::BackEmfWeighted)
    }

    #[test]
    fn test_new_engine_is_idle_and_zeroed() {
        let engine = SimulationEngine::default();
        assert_eq!(engine.status(), EngineStatus::Idle);
        assert_eq!(*engine.state(), SimulationState::default());
    }

    #[test]
    fn test_simulate_completes() {
        let mut engine = SimulationEngine::default();
        let result = engine.simulate(0.001, 1e-5, 0.0).unwrap();
        assert_eq!(result.len(), 100);
        assert_eq!(engine.status(), EngineStatus::Completed);
        assert_eq!(engine.state().steps, 100);
    }

    #[test]
    fn test_reset_returns_to_idle() {
        let mut engine = spinning_motor();
        engine.simulate(0.002, 1e-5, 0.0).unwrap();
        assert!(engine.state().omega > 0.0);

        engine.reset();
        assert_eq!(engine.status(), EngineStatus::Idle);
        assert_eq!(*engine.state(), SimulationState::default());
    }

    #[test]
    fn test_rejects_bad_run_settings() {
        let mut engine = SimulationEngine::default();
        assert!(matches!(
            engine.simulate(0.0, 1e-5, 0.0),
            Err(SimulationError::InvalidConfig { field: "t_end", .. })
        ));
        assert!(matches!(
            engine.simulate(0.01, -1e-5, 0.0),
            Err(SimulationError::InvalidConfig { field: "dt", .. })
        ));
        assert!(matches!(
            engine.simulate(0.01, 1e-5, f64::NAN),
            Err(SimulationError::InvalidConfig { field: "load_torque", .. })
        ));
        assert_eq!(engine.status(), EngineStatus::Idle);
    }

    #[test]
    fn test_rejects_runs_past_the_step_limit() {
        let mut engine = SimulationEngine::default();
        engine.tick(1e-5, 0.0);
        let before = *engine.state();

        assert!(matches!(
            engine.simulate(1e300, 1e-6, 0.0),
            Err(SimulationError::TooManySteps { limit: MAX_STEPS, .. })
        ));
        assert!(matches!(
            engine.simulate(1.0, 1e-300, 0.0),
            Err(SimulationError::TooManySteps { .. })
        ));
        assert!(matches!(
            engine.simulate(1000.0, 1e-6, 0.0),
            Err(SimulationError::TooManySteps { .. })
        ));
        assert_eq!(*engine.state(), before);
        assert!(SimulationOptions::new(10.0, 1e-6, 0.0).validate().is_ok());
    }

    #[test]
    fn test_rejects_bad_motor_before_touching_state() {
        let params = MotorParameters {
            pole_pairs: 0,
            ..Default::default()
        };
        let mut engine = SimulationEngine::new(params);
        engine.tick(1e-5, 0.0);
        let before = *engine.state();

        assert!(matches!(
            engine.simulate(0.01, 1e-5, 0.0),
            Err(SimulationError::InvalidConfig { field: "pole_pairs", .. })
        ));
        assert_eq!(*engine.state(), before);
        assert_eq!(engine.state().steps, 1);
    }

    #[test]
    fn test_first_tick_from_rest() {
        let mut engine = SimulationEngine::default();
        let sample = engine.tick(1e-5, 0.0);

        assert_eq!(sample.time, 0.0);
        assert_eq!(sample.hall.bits(), 0b100);
        assert_eq!(sample.commutation.index(), 2);
        assert_eq!(sample.voltages, PhaseValues::new(24.0, 0.0, -24.0));
        assert_eq!(sample.back_emf.max_abs(), 0.0);
        assert!((sample.currents.a - 0.24).abs() < 1e-12);
        assert!((sample.currents.c + 0.24).abs() < 1e-12);
    }

    #[test]
    fn test_current_sum_model_holds_rotor_at_rest() {
        // A+ C- at θ = 0: the active currents cancel in the current-sum
        // estimate, so no torque is ever developed
        let mut engine = SimulationEngine::default();
        let result = engine.simulate(0.005, 1e-5, 0.0).unwrap();
        assert!(result.iter().all(|s| s.omega == 0.0 && s.torque == 0.0));
        assert_eq!(engine.state().theta_mechanical, 0.0);
    }

    #[test]
    fn test_electrical_angle_tracks_mechanical() {
        let mut engine = spinning_motor();
        for _ in 0..2_000 {
            engine.tick(1e-5, 0.0);
            let s = engine.state();
            assert_eq!(s.theta_electrical, s.theta_mechanical * 4.0);
        }
        let revolutions = engine.electrical_revolutions();
        assert!(revolutions > 0.0);
        assert_eq!(revolutions, engine.state().theta_electrical / TAU);
    }

    #[test]
    fn test_samples_are_time_ordered() {
        let mut engine = spinning_motor();
        let result = engine.simulate(0.002, 1e-5, 0.0).unwrap();
        for (i, s) in result.iter().enumerate() {
            assert_eq!(s.time, i as f64 * 1e-5);
            assert!((0.0..TAU).contains(&s.theta_electrical));
        }
    }

    #[test]
    fn test_finite_check_reports_divergence() {
        let mut engine = spinning_motor();
        let options = SimulationOptions::new(10.0, 0.01, 0.0).with_finite_check(true);
        let err = engine.simulate_with(&options).unwrap_err();
        assert!(matches!(err, SimulationError::NonFinite { .. }));
        assert_eq!(engine.status(), EngineStatus::Idle);
    }

    #[test]
    fn test_divergence_is_silent_by_default() {
        let mut engine = spinning_motor();
        let result = engine.simulate(10.0, 0.01, 0.0).unwrap();
        assert_eq!(result.len(), 1000);
        assert!(result.iter().any(|s| !s.currents.is_finite()));
    }

    #[test]
    fn test_step_count_floors() {
        assert_eq!(SimulationOptions::new(0.05, 1e-6, 0.0).step_count(), 50_000);
        assert_eq!(SimulationOptions::new(0.001, 1e-5, 0.0).step_count(), 100);
        assert_eq!(SimulationOptions::new(1e-6, 1e-5, 0.0).step_count(), 0);
    }
}
