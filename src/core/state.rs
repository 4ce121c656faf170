// src/core/state.rs

use super::constants::qsim_constants::MAX_QUBITS;
use super::error::{QsimError, Result};
use num_complex::Complex;
use num_traits::Zero;
use std::fmt;

/// The dense amplitude array of an n-qubit register.
///
/// Index `i` is the computational basis state whose bit `q` is the value of
/// qubit `q` (qubit 0 is the least significant bit). The vector always holds
/// exactly 2^n amplitudes; gates and noise mutate it in place and never resize it.
///
/// Unitary gates keep the total probability at 1. Noise models do not, and
/// callers that need a normalized state afterwards call [`StateVector::normalize`].
#[derive(Debug, Clone, PartialEq)] // Avoid Eq for floating-point complex numbers
pub struct StateVector {
    amplitudes: Vec<Complex<f64>>,
    num_qubits: usize,
}

impl StateVector {
    /// Wraps caller-supplied amplitudes.
    ///
    /// The length must be a non-zero power of two no larger than `2^MAX_QUBITS`.
    /// Normalization is the caller's responsibility; use
    /// [`crate::validation::check_normalization`] to verify it.
    pub fn new(amplitudes: Vec<Complex<f64>>) -> Result<Self> {
        let dim = amplitudes.len();
        if dim == 0 || !dim.is_power_of_two() {
            return Err(QsimError::dimension_mismatch(dim.max(1).next_power_of_two(), dim));
        }
        let num_qubits = dim.trailing_zeros() as usize;
        if num_qubits > MAX_QUBITS {
            return Err(QsimError::invalid_argument(format!(
                "State of {} qubits exceeds the supported maximum of {}",
                num_qubits, MAX_QUBITS
            )));
        }
        Ok(Self { amplitudes, num_qubits })
    }

    /// Builds a state from real amplitudes.
    pub fn from_real(amplitudes: &[f64]) -> Result<Self> {
        Self::new(amplitudes.iter().map(|&re| Complex::new(re, 0.0)).collect())
    }

    /// The basis state `|index>` of an n-qubit register.
    pub fn basis(num_qubits: usize, index: usize) -> Result<Self> {
        let dim = dimension_for(num_qubits)?;
        if index >= dim {
            return Err(QsimError::index_out_of_range(index, dim));
        }
        let mut amplitudes = vec![Complex::zero(); dim];
        amplitudes[index] = Complex::new(1.0, 0.0);
        Ok(Self { amplitudes, num_qubits })
    }

    /// The all-zero basis state `|0...0>`.
    pub fn zero(num_qubits: usize) -> Result<Self> {
        Self::basis(num_qubits, 0)
    }

    /// The uniform superposition: every amplitude equals `1/sqrt(2^n)`.
    pub fn uniform(num_qubits: usize) -> Result<Self> {
        let dim = dimension_for(num_qubits)?;
        let amplitude = Complex::new(1.0 / (dim as f64).sqrt(), 0.0);
        Ok(Self { amplitudes: vec![amplitude; dim], num_qubits })
    }

    /// Provides read-only access to the amplitudes.
    pub fn amplitudes(&self) -> &[Complex<f64>] {
        &self.amplitudes
    }

    /// Provides mutable access to the amplitudes. The slice cannot be resized.
    pub fn amplitudes_mut(&mut self) -> &mut [Complex<f64>] {
        &mut self.amplitudes
    }

    /// Number of amplitudes (2^n).
    pub fn dim(&self) -> usize {
        self.amplitudes.len()
    }

    /// Number of qubits n.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Born-rule probability of a single basis state.
    pub fn probability(&self, index: usize) -> Result<f64> {
        self.amplitudes
            .get(index)
            .map(|c| c.norm_sqr())
            .ok_or_else(|| QsimError::index_out_of_range(index, self.dim()))
    }

    /// Born-rule probabilities of every basis state, in index order.
    pub fn probabilities(&self) -> Vec<f64> {
        self.amplitudes.iter().map(|c| c.norm_sqr()).collect()
    }

    /// Total probability, `sum |a_i|^2`.
    pub fn norm_sqr(&self) -> f64 {
        self.amplitudes.iter().map(|c| c.norm_sqr()).sum()
    }

    /// Rescales the amplitudes so the total probability is 1 again.
    ///
    /// Fails with `Incoherence` when every amplitude is zero, which is what an
    /// aggressive depolarizing model can leave behind.
    pub fn normalize(&mut self) -> Result<()> {
        let norm = self.norm_sqr().sqrt();
        if norm == 0.0 || !norm.is_finite() {
            return Err(QsimError::Incoherence {
                message: format!("Cannot normalize a state with norm {}", norm),
            });
        }
        for amplitude in &mut self.amplitudes {
            *amplitude /= norm;
        }
        Ok(())
    }

    /// Replaces all amplitudes at once. Used by kernels that compute the new
    /// state into a scratch buffer; the length is required to stay the same.
    pub(crate) fn replace(&mut self, amplitudes: Vec<Complex<f64>>) {
        debug_assert_eq!(amplitudes.len(), self.amplitudes.len());
        self.amplitudes = amplitudes;
    }
}

/// 2^n with the qubit count checked against the supported range.
pub(crate) fn dimension_for(num_qubits: usize) -> Result<usize> {
    if num_qubits == 0 || num_qubits > MAX_QUBITS {
        return Err(QsimError::invalid_argument(format!(
            "Number of qubits must be between 1 and {}, got {}",
            MAX_QUBITS, num_qubits
        )));
    }
    Ok(1usize << num_qubits)
}

impl fmt::Display for StateVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "StateVector[{} qubits]", self.num_qubits)?;
        let width = self.num_qubits;
        for (i, c) in self.amplitudes.iter().enumerate() {
            writeln!(
                f,
                "  |{:0width$b}> {:+.5}{:+.5}i  (p={:.5})",
                i,
                c.re,
                c.im,
                c.norm_sqr(),
                width = width
            )?;
        }
        Ok(())
    }
}
