// src/noise/mod.rs

//! Post-gate perturbations of the state vector.
//!
//! A circuit applies every registered noise model, in order, after each gate.
//! The models here are simplified error channels for simulation experiments:
//! neither is trace preserving and neither renormalizes the state afterwards.
//! Callers that need a normalized state call
//! [`StateVector::normalize`](crate::core::StateVector::normalize).

use crate::core::{QsimError, Result, StateVector};
use num_complex::Complex;
use num_traits::Zero;
use rand::Rng;
use std::fmt;

/// The set of noise channels a circuit can carry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NoiseModel {
    /// Zeroes amplitudes at random.
    Depolarizing(DepolarizingNoise),
    /// Scales every amplitude down by a fixed factor.
    Attenuation(AttenuationNoise),
}

impl NoiseModel {
    /// Depolarizing noise with probability `probability`.
    pub fn depolarizing(probability: f64) -> Result<Self> {
        DepolarizingNoise::new(probability).map(NoiseModel::Depolarizing)
    }

    /// Attenuation noise with probability `probability`.
    pub fn attenuation(probability: f64) -> Result<Self> {
        AttenuationNoise::new(probability).map(NoiseModel::Attenuation)
    }

    /// Short human readable name.
    pub fn name(&self) -> &'static str {
        match self {
            NoiseModel::Depolarizing(_) => "Depolarizing Noise",
            NoiseModel::Attenuation(_) => "Attenuation Noise",
        }
    }

    /// The probability parameter of the channel.
    pub fn probability(&self) -> f64 {
        match self {
            NoiseModel::Depolarizing(noise) => noise.probability(),
            NoiseModel::Attenuation(noise) => noise.probability(),
        }
    }

    /// Perturbs `state` in place, drawing randomness from `rng`.
    pub fn apply<R: Rng + ?Sized>(&self, state: &mut StateVector, rng: &mut R) {
        match self {
            NoiseModel::Depolarizing(noise) => noise.apply(state, rng),
            NoiseModel::Attenuation(noise) => noise.apply(state),
        }
    }
}

impl fmt::Display for NoiseModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(p={})", self.name(), self.probability())
    }
}

fn check_probability(probability: f64) -> Result<f64> {
    if !(0.0..=1.0).contains(&probability) {
        return Err(QsimError::invalid_argument(format!(
            "Probability must be between 0 and 1, got {}",
            probability
        )));
    }
    Ok(probability)
}

/// Each amplitude is independently set to zero with probability `p`.
///
/// This is a placeholder for a real depolarizing channel: it removes
/// probability mass and leaves the state unnormalized.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DepolarizingNoise {
    probability: f64,
}

impl DepolarizingNoise {
    /// # Errors
    /// `InvalidArgument` if `probability` is outside `[0, 1]` or NaN.
    pub fn new(probability: f64) -> Result<Self> {
        Ok(Self { probability: check_probability(probability)? })
    }

    /// Per-amplitude zeroing probability.
    pub fn probability(&self) -> f64 {
        self.probability
    }

    /// Zeroes each amplitude with probability `p`.
    pub fn apply<R: Rng + ?Sized>(&self, state: &mut StateVector, rng: &mut R) {
        if self.probability == 0.0 {
            return;
        }
        for amplitude in state.amplitudes_mut() {
            if rng.random::<f64>() < self.probability {
                *amplitude = Complex::zero();
            }
        }
    }
}

/// Every amplitude is multiplied by `1 - p`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttenuationNoise {
    probability: f64,
}

impl AttenuationNoise {
    /// # Errors
    /// `InvalidArgument` if `probability` is outside `[0, 1]` or NaN.
    pub fn new(probability: f64) -> Result<Self> {
        Ok(Self { probability: check_probability(probability)? })
    }

    /// Attenuation probability.
    pub fn probability(&self) -> f64 {
        self.probability
    }

    /// Scales each amplitude by `1 - p`.
    pub fn apply(&self, state: &mut StateVector) {
        let factor = 1.0 - self.probability;
        for amplitude in state.amplitudes_mut() {
            *amplitude *= factor;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_probability_validation() {
        assert!(DepolarizingNoise::new(1.5).is_err());
        assert!(DepolarizingNoise::new(-0.1).is_err());
        assert!(DepolarizingNoise::new(f64::NAN).is_err());
        assert!(DepolarizingNoise::new(0.0).is_ok());
        assert!(DepolarizingNoise::new(1.0).is_ok());
        assert!(matches!(NoiseModel::attenuation(2.0), Err(QsimError::InvalidArgument { .. })));
    }

    #[test]
    fn test_depolarizing_extremes() {
        let mut rng = StdRng::seed_from_u64(7);

        let mut state = StateVector::uniform(3).unwrap();
        NoiseModel::depolarizing(0.0).unwrap().apply(&mut state, &mut rng);
        assert!((state.norm_sqr() - 1.0).abs() < 1e-12);

        NoiseModel::depolarizing(1.0).unwrap().apply(&mut state, &mut rng);
        assert_eq!(state.norm_sqr(), 0.0);
    }

    #[test]
    fn test_depolarizing_zeroes_roughly_p_of_amplitudes() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut state = StateVector::uniform(12).unwrap();
        NoiseModel::depolarizing(0.25).unwrap().apply(&mut state, &mut rng);
        let zeroed = state.amplitudes().iter().filter(|c| c.is_zero()).count();
        let fraction = zeroed as f64 / state.dim() as f64;
        assert!((fraction - 0.25).abs() < 0.03, "zeroed fraction {}", fraction);
    }

    #[test]
    fn test_attenuation_scales_norm() {
        let mut rng = StdRng::seed_from_u64(0);
        let mut state = StateVector::uniform(2).unwrap();
        NoiseModel::attenuation(0.5).unwrap().apply(&mut state, &mut rng);
        // every amplitude halves, so total probability quarters
        assert!((state.norm_sqr() - 0.25).abs() < 1e-12);
    }
}
