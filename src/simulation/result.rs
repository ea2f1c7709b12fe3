//! # Simulation Output
//!
//! One [`SimulationSample`] per tick, in time order, collected into an
//! immutable [`SimulationResult`]. Column accessors expose each quantity as a
//! plain series for plotting or reporting code.

use serde::{Deserialize, Serialize};

use super::commutation::CommutationState;
use super::hall::HallSignals;
use super::three_phase::PhaseValues;

/// Every quantity recorded at the end of one tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimulationSample {
    /// Tick start time (s)
    pub time: f64,
    /// Mechanical speed (rad/s)
    pub omega: f64,
    /// Mechanical speed (RPM)
    pub rpm: f64,
    /// Electrical angle reduced to `[0, 2π)` (rad)
    pub theta_electrical: f64,
    /// Mechanical angle, unwrapped (rad)
    pub theta_mechanical: f64,
    /// Phase currents after the tick (A)
    pub currents: PhaseValues,
    /// Back-EMF the tick was computed with (V)
    pub back_emf: PhaseValues,
    /// Terminal voltages applied during the tick (V)
    pub voltages: PhaseValues,
    /// Hall outputs the tick was commutated from
    pub hall: HallSignals,
    /// Inverter sector applied during the tick
    pub commutation: CommutationState,
    /// Electromagnetic torque (N·m)
    pub torque: f64,
}

/// Headline numbers of a finished run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimulationSummary {
    /// Speed at the last sample (RPM)
    pub final_rpm: f64,
    /// Largest absolute current on any phase over the whole run (A)
    pub max_phase_current_a: f64,
    /// Mean torque over the trailing samples (N·m)
    pub mean_torque_nm: f64,
    /// Number of trailing samples the mean was taken over
    pub torque_window: usize,
}

/// Complete time series of one run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    dt: f64,
    load_torque: f64,
    samples: Vec<SimulationSample>,
}

impl SimulationResult {
    pub(crate) fn with_capacity(dt: f64, load_torque: f64, capacity: usize) -> Self {
        Self {
            dt,
            load_torque,
            samples: Vec::with_capacity(capacity),
        }
    }

    pub(crate) fn push(&mut self, sample: SimulationSample) {
        self.samples.push(sample);
    }

    /// Time step the run used (s)
    pub fn dt(&self) -> f64 {
        self.dt
    }

    /// Load torque the run used (N·m)
    pub fn load_torque(&self) -> f64 {
        self.load_torque
    }

    pub fn samples(&self) -> &[SimulationSample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn last(&self) -> Option<&SimulationSample> {
        self.samples.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SimulationSample> {
        self.samples.iter()
    }

    fn column(&self, f: impl Fn(&SimulationSample) -> f64) -> Vec<f64> {
        self.samples.iter().map(f).collect()
    }

    pub fn times(&self) -> Vec<f64> {
        self.column(|s| s.time)
    }

    pub fn omega(&self) -> Vec<f64> {
        self.column(|s| s.omega)
    }

    pub fn rpm(&self) -> Vec<f64> {
        self.column(|s| s.rpm)
    }

    pub fn theta_electrical(&self) -> Vec<f64> {
        self.column(|s| s.theta_electrical)
    }

    pub fn theta_mechanical(&self) -> Vec<f64> {
        self.column(|s| s.theta_mechanical)
    }

    pub fn torque(&self) -> Vec<f64> {
        self.column(|s| s.torque)
    }

    pub fn currents(&self) -> Vec<PhaseValues> {
        self.samples.iter().map(|s| s.currents).collect()
    }

    pub fn back_emf(&self) -> Vec<PhaseValues> {
        self.samples.iter().map(|s| s.back_emf).collect()
    }

    pub fn voltages(&self) -> Vec<PhaseValues> {
        self.samples.iter().map(|s| s.voltages).collect()
    }

    pub fn hall(&self) -> Vec<HallSignals> {
        self.samples.iter().map(|s| s.hall).collect()
    }

    /// Samples covering `[start_time, start_time + duration)`
    ///
    /// Indices are `floor(start / dt)` and `floor((start + duration) / dt)`,
    /// clamped to the recorded length, so a window past the end is empty.
    pub fn window(&self, start_time: f64, duration: f64) -> &[SimulationSample] {
        let index = |t: f64| ((t / self.dt).floor().max(0.0) as usize).min(self.samples.len());
        let start = index(start_time);
        let end = index(start_time + duration).max(start);
        &self.samples[start..end]
    }

    /// End-of-run figures; torque is averaged over the last `torque_window` samples
    pub fn summary(&self, torque_window: usize) -> SimulationSummary {
        let tail_len = torque_window.min(self.samples.len());
        let tail = &self.samples[self.samples.len() - tail_len..];
        let mean_torque_nm = if tail.is_empty() {
            0.0
        } else {
            tail.iter().map(|s| s.torque).sum::<f64>() / tail.len() as f64
        };

        SimulationSummary {
            final_rpm: self.last().map_or(0.0, |s| s.rpm),
            max_phase_current_a: self
                .samples
                .iter()
                .map(|s| s.currents.max_abs())
                .fold(0.0, f64::max),
            mean_torque_nm,
            torque_window: tail_len,
        }
    }
}

impl<'a> IntoIterator for &'a SimulationResult {
    type Item = &'a SimulationSample;
    type IntoIter = std::slice::Iter<'a, SimulationSample>;

    fn into_iter(self) -> Self::IntoIter {
        self.samples.iter()
    }
}
