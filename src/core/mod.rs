// src/core/mod.rs

//! Core data structures and types

// Declare modules within core
pub mod error;
pub mod state;

// Re-export public types for convenient access via `qsim::core::TypeName`
pub use error::{QsimError, Result};
pub use state::StateVector;

pub mod constants;
pub use constants::qsim_constants::{AMPLITUDE_TOLERANCE, MAX_QUBITS, NORM_TOLERANCE}; // Re-export
