use thiserror::Error;

/// Simulation errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimulationError {
    /// A run or motor parameter that must be strictly positive (and finite) was not
    #[error("Invalid configuration: {field} must be positive and finite, got {value}")]
    InvalidConfig { field: &'static str, value: f64 },

    /// `t_end / dt` asks for more ticks than a single run records
    #[error("Run too long: t_end / dt = {steps} ticks exceeds the limit of {limit}")]
    TooManySteps { steps: f64, limit: usize },

    /// Raised only when the finite-value diagnostic is enabled
    #[error("Numerical instability at step {step} (t = {time}s): state is no longer finite")]
    NonFinite { step: usize, time: f64 },
}

impl SimulationError {
    /// Fail unless `value` is finite and strictly positive
    pub(crate) fn require_positive(field: &'static str, value: f64) -> Result<(), Self> {
        if value.is_finite() && value > 0.0 {
            Ok(())
        } else {
            Err(Self::InvalidConfig { field, value })
        }
    }
}
