// src/lib.rs

//! `qsim` - A library for simulating quantum circuits on a dense state vector
//!
//! The library provides a complex amplitude vector, a closed set of gates, a
//! circuit executor with optional noise injection, Born-rule measurement, and
//! two textbook algorithms built on top: Grover search and Shor period finding.

pub mod core;
pub mod operations;
pub mod noise;
pub mod circuits;
pub mod measurement;
pub mod simulation;
pub mod validation;
pub mod algorithms;

// Re-export the most common types for easier top-level use
pub use crate::core::{QsimError, Result, StateVector};
pub use operations::{CustomGate, Gate, GroverOracle};
pub use noise::{AttenuationNoise, DepolarizingNoise, NoiseModel};
pub use circuits::{CircuitBuilder, QuantumCircuit};
pub use measurement::Measurement;
pub use simulation::{SimulationResult, Simulator, SimulatorConfig};
pub use validation::{check_normalization, validate_state};
pub use algorithms::{GroverSearch, ShorsAlgorithm, factors_from_period, find_period};

// Example 1: Bell pair
// Builds |00> + |11> from a Hadamard and a CNOT and samples it.
/// ```
/// use qsim::{CircuitBuilder, Gate, Simulator, StateVector, QsimError};
///
/// fn main() -> Result<(), QsimError> {
///     let circuit = CircuitBuilder::new(2)
///         .add_gate(Gate::Hadamard { target: 0 })
///         .add_gate(Gate::cnot(0, 1)?)
///         .build()?;
///
///     let mut simulator = Simulator::with_seed(7);
///     let result = simulator.run(&circuit, &StateVector::zero(2)?, 1_000)?;
///     println!("Circuit:\n{}", circuit);
///     println!("Result:\n{}", result);
///
///     // Only the correlated outcomes |00> and |11> can appear.
///     assert_eq!(result.count(0b01) + result.count(0b10), 0);
///     assert!((result.final_state().probability(0b11)? - 0.5).abs() < 1e-12);
///     Ok(())
/// }
/// ```
#[doc(hidden)]
const _: () = (); // Attaches the preceding doc comment block to a hidden item

// Example 2: Grover search on three qubits
// Two iterations lift the marked state from 1/8 to about 0.945.
/// ```
/// use qsim::{GroverOracle, GroverSearch, StateVector, QsimError};
///
/// fn main() -> Result<(), QsimError> {
///     let mut search = GroverSearch::new(3, GroverOracle::mark_one(5))?;
///     search.initialize()?;
///     for _ in 0..search.optimal_iterations() {
///         search.add_grover_iteration()?;
///     }
///
///     let mut state = StateVector::zero(3)?;
///     search.execute(&mut state)?;
///     assert!(state.probability(5)? > 0.9);
///     Ok(())
/// }
/// ```
#[doc(hidden)]
const _: () = (); // Attaches the preceding doc comment block to a hidden item
