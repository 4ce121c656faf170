// src/algorithms/grover.rs

//! Grover's amplitude-amplification search.

use crate::circuits::QuantumCircuit;
use crate::core::{QsimError, Result, StateVector};
use crate::operations::{Gate, GroverOracle};
use rand::Rng;
use std::f64::consts::PI;
use tracing::info;

/// Builds and runs a Grover search circuit for one oracle.
///
/// The circuit is assembled in two steps: [`initialize`](Self::initialize)
/// appends one Hadamard per qubit, then each call to
/// [`add_grover_iteration`](Self::add_grover_iteration) appends an oracle and a
/// diffusion gate. The search is meant to start from `|0...0>`, which the
/// Hadamards turn into the uniform superposition.
#[derive(Debug, Clone)]
pub struct GroverSearch {
    number_of_qubits: usize,
    oracle: GroverOracle,
    circuit: QuantumCircuit,
    initialized: bool,
    iterations: usize,
}

impl GroverSearch {
    /// Creates a search over `2^number_of_qubits` basis states.
    ///
    /// # Errors
    /// `InvalidArgument` for an unsupported width or an oracle marking an
    /// index outside the register.
    pub fn new(number_of_qubits: usize, oracle: GroverOracle) -> Result<Self> {
        let circuit = QuantumCircuit::new(number_of_qubits)?;
        oracle
            .validate(1usize << number_of_qubits)
            .map_err(|e| QsimError::invalid_argument(e.to_string()))?;
        Ok(Self { number_of_qubits, oracle, circuit, initialized: false, iterations: 0 })
    }

    /// Appends the Hadamard layer.
    ///
    /// Only the first call appends anything. Later calls return `Ok(())`
    /// without touching the circuit, so the layer is never doubled (a doubled
    /// layer would cancel itself and undo the superposition).
    pub fn initialize(&mut self) -> Result<()> {
        if self.initialized {
            return Ok(());
        }
        self.circuit.add_gates((0..self.number_of_qubits).map(|target| Gate::Hadamard { target }))?;
        self.initialized = true;
        info!(
            qubits = self.number_of_qubits,
            marked = self.oracle.marked_count(self.dim()),
            "initialized Grover search"
        );
        Ok(())
    }

    /// Appends one oracle + diffusion pair.
    pub fn add_grover_iteration(&mut self) -> Result<()> {
        self.circuit.add_gate(Gate::GroverOracle(self.oracle.clone()))?;
        self.circuit.add_gate(Gate::GroverDiffusion)?;
        self.iterations += 1;
        Ok(())
    }

    /// `floor(pi/4 * sqrt(N))` with `N = 2^n`, the iteration count for a
    /// single marked state.
    pub fn optimal_iterations(&self) -> usize {
        self.optimal_iterations_for(1)
    }

    /// `floor(pi/4 * sqrt(N / marked))`. Zero when nothing is marked.
    pub fn optimal_iterations_for(&self, marked: usize) -> usize {
        if marked == 0 {
            return 0;
        }
        (PI / 4.0 * (self.dim() as f64 / marked as f64).sqrt()).floor() as usize
    }

    /// Runs the circuit built so far on `state`.
    ///
    /// `state` must be `|0...0>` (see [`StateVector::zero`]). The Hadamard layer
    /// prepares the uniform superposition from it; a state that is already
    /// uniform is mapped back to `|0...0>` and the iterations then fail to
    /// amplify the marked states.
    pub fn execute(&self, state: &mut StateVector) -> Result<()> {
        self.circuit.execute(state)
    }

    /// Runs the circuit built so far on `state` with an explicit generator.
    /// The same `|0...0>` input requirement as [`execute`](Self::execute) applies.
    pub fn execute_with_rng<R: Rng + ?Sized>(&self, state: &mut StateVector, rng: &mut R) -> Result<()> {
        self.circuit.execute_with_rng(state, rng)
    }

    /// Runs the whole search using the thread-local generator.
    pub fn run(&mut self) -> Result<(usize, StateVector)> {
        self.run_with_rng(&mut rand::rng())
    }

    /// Runs the whole search: if the circuit has not been initialized yet, the
    /// Hadamard layer and the optimal number of iterations for the oracle's
    /// marked count are appended first. The circuit then runs on `|0...0>` and
    /// the result is measured once.
    ///
    /// Returns the measured index and the final state.
    pub fn run_with_rng<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<(usize, StateVector)> {
        if !self.initialized {
            self.initialize()?;
            let iterations = self.optimal_iterations_for(self.oracle.marked_count(self.dim()));
            for _ in 0..iterations {
                self.add_grover_iteration()?;
            }
        }
        let mut state = StateVector::zero(self.number_of_qubits)?;
        self.circuit.execute_with_rng(&mut state, rng)?;
        let measured = self.circuit.measure_with_rng(&state, rng)?;
        Ok((measured, state))
    }

    /// The circuit assembled so far.
    pub fn circuit(&self) -> &QuantumCircuit {
        &self.circuit
    }

    /// The oracle marking the searched states.
    pub fn oracle(&self) -> &GroverOracle {
        &self.oracle
    }

    /// Register width.
    pub fn number_of_qubits(&self) -> usize {
        self.number_of_qubits
    }

    /// Number of oracle + diffusion pairs appended so far.
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    fn dim(&self) -> usize {
        1usize << self.number_of_qubits
    }
}
