use anyhow::Result;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::simulation::{LowSpeedTorque, MotorParameters, SimulationOptions};

/// Default location of the TOML configuration file
pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// Environment prefix; `BLDC__MOTOR__VDC=36` sets `motor.vdc`
pub const ENV_PREFIX: &str = "BLDC__";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub motor: MotorParameters,
    pub run: RunConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub t_end: f64,
    pub dt: f64,
    pub load_torque: f64,
    pub check_finite: bool,
    pub low_speed_torque: LowSpeedTorque,
    /// Trailing samples the reported mean torque is taken over
    pub summary_window: usize,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            t_end: 0.05,
            dt: 1e-6,
            load_torque: 0.001,
            check_finite: false,
            low_speed_torque: LowSpeedTorque::default(),
            summary_window: 1000,
        }
    }
}

impl RunConfig {
    pub fn options(&self) -> SimulationOptions {
        SimulationOptions::new(self.t_end, self.dt, self.load_torque)
            .with_finite_check(self.check_finite)
    }
}

impl Config {
    /// Defaults, then `path` if it exists, then `BLDC__*` environment variables
    pub fn figment_from(path: impl AsRef<Path>) -> Figment {
        Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file(path.as_ref()))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    pub fn figment() -> Figment {
        Self::figment_from(DEFAULT_CONFIG_PATH)
    }

    pub fn load() -> Result<Self> {
        Ok(Self::figment().extract()?)
    }

    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::figment_from(path).extract()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_reference_run() {
        let cfg = Config::default();
        let options = cfg.run.options();
        assert_eq!(options.step_count(), 50_000);
        assert!((options.load_torque - 0.001).abs() < 1e-12);
        assert_eq!(cfg.motor, MotorParameters::default());
    }

    #[test]
    fn test_partial_toml_keeps_other_defaults() {
        let cfg: Config = Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::string("[motor]\nvdc = 48.0\n"))
            .extract()
            .unwrap();
        assert!((cfg.motor.vdc - 48.0).abs() < 1e-12);
        assert_eq!(cfg.motor.pole_pairs, 4);
        assert_eq!(cfg.run, RunConfig::default());
    }
}
