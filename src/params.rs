// params.rs - Range checks on run parameters

use crate::error::{ReduceError, Result};

/// Finest step accepted, in decimal places.
pub const STEP_DECIMALS: i32 = 5;

/// Accept `step` only if `0 < step < 1` and it carries at most five
/// decimal places.
pub fn validate_step(step: f64) -> Result<f64> {
    if step >= 1.0 {
        return Err(ReduceError::StepTooLarge(step));
    }
    if step.is_nan() || step <= 0.0 {
        return Err(ReduceError::StepNotPositive(step));
    }
    let scale = 10f64.powi(STEP_DECIMALS);
    if (step * scale).round() / scale != step {
        return Err(ReduceError::StepPrecision(step));
    }
    Ok(step)
}
