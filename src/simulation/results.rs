// src/simulation/results.rs
use crate::core::StateVector;
use std::fmt;

/// Holds the outcome of a sampled simulation run: the evolved state and
/// how often each basis index was measured.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationResult {
    final_state: StateVector,
    /// counts[i] is the number of shots that measured basis index i.
    counts: Vec<usize>,
}

impl SimulationResult {
    /// Creates a result from a final state and per-index counts. (Internal visibility)
    pub(crate) fn new(final_state: StateVector, counts: Vec<usize>) -> Self {
        Self { final_state, counts }
    }

    /// The state after the circuit ran, before any sampling.
    pub fn final_state(&self) -> &StateVector {
        &self.final_state
    }

    /// Per-index measurement counts.
    pub fn counts(&self) -> &[usize] {
        &self.counts
    }

    /// Number of shots that measured `index`. Zero for indices outside the state.
    pub fn count(&self, index: usize) -> usize {
        self.counts.get(index).copied().unwrap_or(0)
    }

    /// Total number of shots.
    pub fn shots(&self) -> usize {
        self.counts.iter().sum()
    }

    /// Empirical frequency of `index`.
    pub fn frequency(&self, index: usize) -> f64 {
        let shots = self.shots();
        if shots == 0 {
            return 0.0;
        }
        self.count(index) as f64 / shots as f64
    }

    /// The most frequently measured index and its count. Ties go to the lower index.
    pub fn most_frequent(&self) -> Option<(usize, usize)> {
        self.counts
            .iter()
            .copied()
            .enumerate()
            .filter(|&(_, c)| c > 0)
            .max_by(|a, b| a.1.cmp(&b.1).then(b.0.cmp(&a.0)))
    }
}

impl fmt::Display for SimulationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Simulation Results:")?;
        let shots = self.shots();
        if shots == 0 {
            writeln!(f, "  No shots were sampled.")?;
            return Ok(());
        }
        let width = self.final_state.num_qubits();
        writeln!(f, "  {} shots:", shots)?;
        for (index, count) in self.counts.iter().enumerate().filter(|(_, c)| **c > 0) {
            writeln!(
                f,
                "    |{:0width$b}>: {} ({:.2}%)",
                index,
                count,
                100.0 * *count as f64 / shots as f64,
                width = width
            )?;
        }
        Ok(())
    }
}
