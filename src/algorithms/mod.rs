// src/algorithms/mod.rs

//! Textbook algorithms assembled from circuits, gates and measurement.

pub mod grover;
pub mod shor;

pub use grover::GroverSearch;
pub use shor::{ShorsAlgorithm, factors_from_period, find_period};
