// src/simulation/mod.rs

//! Drives circuits against state vectors with a reproducible random source.
//!
//! `QuantumCircuit` already knows how to execute itself; the `Simulator` adds
//! what a caller running experiments wants on top: a seeded generator shared by
//! noise and measurement, optional normalization checks, and shot histograms.

mod results;
pub(crate) mod engine; // Kernels are crate visible for the gate definitions

// Re-export the main public interface types
pub use results::SimulationResult;

use crate::circuits::QuantumCircuit;
use crate::core::{NORM_TOLERANCE, Result, StateVector};
use crate::measurement::Measurement;
use crate::validation::check_normalization;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::debug;

/// Simulator settings.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulatorConfig {
    /// Seed for the simulator's generator. `None` seeds from the OS.
    pub seed: Option<u64>,
    /// Verify total probability after running a circuit that carries no noise.
    pub check_normalization: bool,
    /// Allowed deviation from 1 when `check_normalization` is set.
    pub norm_tolerance: f64,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            seed: None,
            check_normalization: false,
            norm_tolerance: NORM_TOLERANCE,
        }
    }
}

/// Runs circuits with a generator owned by the simulator.
pub struct Simulator {
    config: SimulatorConfig,
    rng: StdRng,
}

impl Default for Simulator {
    fn default() -> Self {
        Self::with_config(SimulatorConfig::default())
    }
}

impl Simulator {
    /// Creates a new Simulator with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a simulator whose generator is seeded with `seed`.
    pub fn with_seed(seed: u64) -> Self {
        Self::with_config(SimulatorConfig { seed: Some(seed), ..Default::default() })
    }

    /// Creates a simulator from explicit settings.
    pub fn with_config(config: SimulatorConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self { config, rng }
    }

    /// Current settings.
    pub fn config(&self) -> &SimulatorConfig {
        &self.config
    }

    /// Mutable access to the generator, for callers mixing their own draws
    /// (for example Shor's base selection) into the same reproducible stream.
    pub fn rng_mut(&mut self) -> &mut StdRng {
        &mut self.rng
    }

    /// Executes `circuit` on `state`.
    ///
    /// # Returns
    /// * `Ok(())` once every gate (and the noise after it) has been applied.
    /// * `Err(QsimError)` on a dimension mismatch, a failing gate, or, with
    ///   `check_normalization` enabled on a noiseless circuit, an `Incoherence`
    ///   error when the final state is no longer normalized.
    pub fn execute(&mut self, circuit: &QuantumCircuit, state: &mut StateVector) -> Result<()> {
        circuit.execute_with_rng(state, &mut self.rng)?;
        if self.config.check_normalization && circuit.noise_models().is_empty() {
            check_normalization(state, Some(self.config.norm_tolerance))?;
        }
        Ok(())
    }

    /// Samples one basis index from `state` through `circuit`'s dimension check.
    pub fn measure(&mut self, circuit: &QuantumCircuit, state: &StateVector) -> Result<usize> {
        circuit.measure_with_rng(state, &mut self.rng)
    }

    /// Executes `circuit` on a copy of `initial`, then measures the evolved
    /// state `shots` times.
    ///
    /// Measurement does not collapse the state, so the circuit runs once and
    /// all shots sample the same final distribution.
    pub fn run(&mut self, circuit: &QuantumCircuit, initial: &StateVector, shots: usize) -> Result<SimulationResult> {
        let mut state = initial.clone();
        self.execute(circuit, &mut state)?;
        let counts = Measurement::new().sample(&state, shots, &mut self.rng);
        debug!(shots, qubits = state.num_qubits(), "sampled circuit output");
        Ok(SimulationResult::new(state, counts))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuits::CircuitBuilder;
    use crate::core::QsimError;
    use crate::operations::Gate;
    use num_complex::Complex;

    #[test]
    fn test_seeded_runs_are_reproducible() -> Result<()> {
        let circuit = CircuitBuilder::new(3)
            .add_gates((0..3).map(|q| Gate::Hadamard { target: q }))
            .build()?;
        let initial = StateVector::zero(3)?;

        let first = Simulator::with_seed(11).run(&circuit, &initial, 500)?;
        let second = Simulator::with_seed(11).run(&circuit, &initial, 500)?;
        assert_eq!(first.counts(), second.counts());
        assert_eq!(first.shots(), 500);
        Ok(())
    }

    #[test]
    fn test_strict_mode_flags_non_unitary_custom_gate() -> Result<()> {
        let circuit = CircuitBuilder::new(1)
            .add_gate(Gate::custom("halve", |amps: &mut [Complex<f64>]| {
                for a in amps.iter_mut() {
                    *a *= 0.5;
                }
                Ok(())
            }))
            .build()?;
        let mut simulator = Simulator::with_config(SimulatorConfig {
            seed: Some(3),
            check_normalization: true,
            ..Default::default()
        });
        let mut state = StateVector::zero(1)?;
        let result = simulator.execute(&circuit, &mut state);
        assert!(matches!(result, Err(QsimError::Incoherence { .. })));

        let mut relaxed = Simulator::with_seed(3);
        let mut state = StateVector::zero(1)?;
        assert!(relaxed.execute(&circuit, &mut state).is_ok());
        Ok(())
    }

    #[test]
    fn test_bell_pair_counts() -> Result<()> {
        let circuit = CircuitBuilder::new(2)
            .add_gate(Gate::Hadamard { target: 0 })
            .add_gate(Gate::cnot(0, 1)?)
            .build()?;
        let result = Simulator::with_seed(5).run(&circuit, &StateVector::zero(2)?, 2_000)?;
        // only |00> and |11> can appear
        assert_eq!(result.count(1) + result.count(2), 0);
        assert_eq!(result.count(0) + result.count(3), 2_000);
        assert_eq!(result.most_frequent().map(|(i, _)| i == 0 || i == 3), Some(true));
        Ok(())
    }
}
