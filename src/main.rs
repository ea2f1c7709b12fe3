use anyhow::{Context, Result};
use bldc_sim::{config, simulation, telemetry};
use config::Config;
use simulation::SimulationEngine;
use telemetry::init_tracing;
use tracing::{info, warn};

fn main() -> Result<()> {
    init_tracing();

    let cfg = Config::load().context("loading configuration")?;
    info!(
        motor = %serde_json::to_string(&cfg.motor)?,
        t_end = cfg.run.t_end,
        dt = cfg.run.dt,
        load_torque = cfg.run.load_torque,
        "starting BLDC simulation"
    );

    let mut engine =
        SimulationEngine::new(cfg.motor.clone()).with_low_speed_torque(cfg.run.low_speed_torque);
    let result = engine.simulate_with(&cfg.run.options())?;

    let summary = result.summary(cfg.run.summary_window);
    if summary.final_rpm == 0.0 {
        warn!("rotor did not leave standstill");
    }
    info!(
        samples = result.len(),
        electrical_revolutions = engine.electrical_revolutions(),
        final_rpm = summary.final_rpm,
        max_phase_current_a = summary.max_phase_current_a,
        mean_torque_mnm = summary.mean_torque_nm * 1000.0,
        torque_window = summary.torque_window,
        "simulation finished"
    );

    Ok(())
}
