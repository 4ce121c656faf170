// src/validation/mod.rs

//! Provides functions to validate a `StateVector` after simulation.

use crate::core::{NORM_TOLERANCE, QsimError, Result, StateVector};

/// Sum of `|a_i|^2` over the whole vector.
pub fn total_probability(state: &StateVector) -> f64 {
    state.amplitudes().iter().map(|c| c.norm_sqr()).sum()
}

/// Checks if the state vector is normalized (sum of squared amplitudes ≈ 1.0).
///
/// # Arguments
/// * `state` - The `StateVector` to check.
/// * `tolerance` - Allowed deviation from 1.0. Defaults to [`NORM_TOLERANCE`].
///
/// # Returns
/// * `Ok(())` if normalized within tolerance.
/// * `Err(QsimError::Incoherence)` if normalization fails.
pub fn check_normalization(state: &StateVector, tolerance: Option<f64>) -> Result<()> {
    let effective_tolerance = tolerance.unwrap_or(NORM_TOLERANCE);
    let norm_sq = total_probability(state);
    if (norm_sq - 1.0).abs() > effective_tolerance || norm_sq.is_nan() {
        Err(QsimError::Incoherence {
            message: format!(
                "State vector normalization failed. Sum(|c_i|^2) = {} (Deviation > {})",
                norm_sq, effective_tolerance
            ),
        })
    } else {
        Ok(())
    }
}

/// `true` when [`check_normalization`] passes with the default tolerance.
pub fn is_normalized(state: &StateVector) -> bool {
    check_normalization(state, None).is_ok()
}

/// Checks that every amplitude is finite.
pub fn check_finite(state: &StateVector) -> Result<()> {
    match state.amplitudes().iter().position(|c| !c.re.is_finite() || !c.im.is_finite()) {
        Some(index) => Err(QsimError::Incoherence {
            message: format!("Amplitude at index {} is not finite: {}", index, state.amplitudes()[index]),
        }),
        None => Ok(()),
    }
}

/// Runs every state check: finite amplitudes, then normalization.
pub fn validate_state(state: &StateVector, norm_tolerance: Option<f64>) -> Result<()> {
    check_finite(state)?;
    check_normalization(state, norm_tolerance)
}
