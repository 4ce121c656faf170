// src/measurement/mod.rs

//! Born-rule sampling of a state vector.

use crate::core::StateVector;
use rand::Rng;
use tracing::warn;

/// Samples basis states from a state vector without collapsing it.
///
/// Repeated calls on the same vector are independent draws from the same
/// distribution. Callers that want collapse semantics must replace the vector
/// with the measured basis state themselves.
#[derive(Debug, Default, Clone, Copy)]
pub struct Measurement;

impl Measurement {
    /// Creates a new measurement operator.
    pub fn new() -> Self {
        Self
    }

    /// Samples one basis index using the thread-local generator.
    pub fn measure(&self, state: &StateVector) -> usize {
        self.measure_with_rng(state, &mut rand::rng())
    }

    /// Samples one basis index with probability `|a_i|^2`.
    ///
    /// Draws `r` uniformly from `[0, 1)` and returns the first index whose
    /// cumulative probability exceeds it. If rounding (or an unnormalized
    /// state) lets the walk run off the end, the last index is returned.
    pub fn measure_with_rng<R: Rng + ?Sized>(&self, state: &StateVector, rng: &mut R) -> usize {
        let r: f64 = rng.random();
        select_index(state, r)
    }

    /// Draws `shots` independent samples and returns the per-index counts.
    pub fn sample<R: Rng + ?Sized>(&self, state: &StateVector, shots: usize, rng: &mut R) -> Vec<usize> {
        // Build the cumulative table once instead of walking the vector per shot.
        let mut cumulative = Vec::with_capacity(state.dim());
        let mut total = 0.0;
        for amplitude in state.amplitudes() {
            total += amplitude.norm_sqr();
            cumulative.push(total);
        }

        let mut counts = vec![0usize; state.dim()];
        let last = state.dim() - 1;
        for _ in 0..shots {
            let r: f64 = rng.random();
            let index = cumulative.partition_point(|&c| c <= r).min(last);
            counts[index] += 1;
        }
        if total < 1.0 - crate::core::NORM_TOLERANCE {
            warn!(total_probability = total, "sampling an unnormalized state; excess mass lands on the last index");
        }
        counts
    }
}

fn select_index(state: &StateVector, r: f64) -> usize {
    let mut cumulative = 0.0;
    for (i, amplitude) in state.amplitudes().iter().enumerate() {
        cumulative += amplitude.norm_sqr();
        if cumulative > r {
            return i;
        }
    }
    warn!(
        r,
        total_probability = cumulative,
        "cumulative probability never exceeded the draw, returning the last index"
    );
    state.dim() - 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_complex::Complex;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_basis_state_always_measures_itself() {
        let state = StateVector::basis(3, 6).unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..100 {
            assert_eq!(Measurement::new().measure_with_rng(&state, &mut rng), 6);
        }
    }

    #[test]
    fn test_select_index_walks_cumulative_sum() {
        let state = StateVector::from_real(&[0.5, 0.5, 0.5, 0.5]).unwrap();
        assert_eq!(select_index(&state, 0.0), 0);
        assert_eq!(select_index(&state, 0.24), 0);
        assert_eq!(select_index(&state, 0.26), 1);
        assert_eq!(select_index(&state, 0.99), 3);
    }

    #[test]
    fn test_exhausted_walk_returns_last_index() {
        let state = StateVector::new(vec![Complex::new(0.0, 0.0); 4]).unwrap();
        assert_eq!(select_index(&state, 0.5), 3);
    }

    #[test]
    fn test_measure_does_not_mutate() {
        let state = StateVector::uniform(2).unwrap();
        let before = state.clone();
        let _ = Measurement::new().measure(&state);
        assert_eq!(state, before);
    }

    #[test]
    fn test_sample_matches_distribution() {
        // p = [0.1, 0.2, 0.3, 0.4]
        let amplitudes = [0.1f64, 0.2, 0.3, 0.4].map(f64::sqrt);
        let state = StateVector::from_real(&amplitudes).unwrap();
        let mut rng = StdRng::seed_from_u64(99);
        let counts = Measurement::new().sample(&state, 50_000, &mut rng);
        assert_eq!(counts.iter().sum::<usize>(), 50_000);
        for (i, expected) in [0.1, 0.2, 0.3, 0.4].iter().enumerate() {
            let freq = counts[i] as f64 / 50_000.0;
            assert!((freq - expected).abs() < 0.01, "index {} frequency {}", i, freq);
        }
    }
}
