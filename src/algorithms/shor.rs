// src/algorithms/shor.rs

//! Shor's period-finding skeleton and its classical post-processing.
//!
//! The quantum part prepares a uniform superposition, applies modular
//! multiplication by a random base, wraps the same multiplication in phase
//! estimation, and measures once. The measured integer is turned into a
//! candidate period by a continued-fraction expansion of `measured / 2^n`.
//! The period is only a candidate: callers check it with
//! [`factors_from_period`] and re-run with a new base when it fails.

use crate::circuits::QuantumCircuit;
use crate::core::{QsimError, Result, StateVector};
use crate::operations::Gate;
use crate::simulation::engine::mod_pow;
use rand::Rng;
use tracing::{debug, info, warn};

/// Period finding for one integer.
#[derive(Debug, Clone)]
pub struct ShorsAlgorithm {
    number_to_factor: u64,
    number_of_qubits: usize,
    base: Option<u64>,
    circuit: QuantumCircuit,
}

impl ShorsAlgorithm {
    /// Prepares period finding for `number_to_factor`, using
    /// `ceil(log2(number_to_factor))` qubits.
    ///
    /// # Errors
    /// `InvalidArgument` if `number_to_factor <= 1` or the register would be
    /// wider than [`crate::core::MAX_QUBITS`].
    pub fn new(number_to_factor: u64) -> Result<Self> {
        if number_to_factor <= 1 {
            return Err(QsimError::invalid_argument(format!(
                "Number to factor must be greater than 1, got {}",
                number_to_factor
            )));
        }
        let number_of_qubits = ((number_to_factor - 1).ilog2() + 1) as usize;
        let circuit = QuantumCircuit::new(number_of_qubits)?;
        Ok(Self { number_to_factor, number_of_qubits, base: None, circuit })
    }

    /// Chooses a base with the thread-local generator and builds the circuit.
    pub fn initialize(&mut self) -> Result<()> {
        self.initialize_with_rng(&mut rand::rng())
    }

    /// Chooses a base uniformly from `[2, max(2, N - 2)]` and rebuilds the
    /// circuit as modular multiplication followed by phase estimation of the
    /// same multiplication.
    pub fn initialize_with_rng<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<()> {
        let upper = self.number_to_factor.saturating_sub(2).max(2);
        let base = rng.random_range(2..=upper);
        info!(number_to_factor = self.number_to_factor, base, "chose Shor base");

        let multiply = Gate::modular_exponentiation(base, 1, self.number_to_factor)?;
        let mut circuit = QuantumCircuit::new(self.number_of_qubits)?;
        circuit.add_gate(multiply.clone())?;
        circuit.add_gate(Gate::phase_estimation(self.number_of_qubits, multiply)?)?;

        self.circuit = circuit;
        self.base = Some(base);
        Ok(())
    }

    /// Runs the circuit with the thread-local generator.
    pub fn execute(&self) -> Result<u64> {
        self.execute_with_rng(&mut rand::rng())
    }

    /// Runs the circuit on the uniform superposition, measures once and
    /// returns the candidate period from [`find_period`].
    ///
    /// Running before [`initialize`](Self::initialize) is allowed; the empty
    /// circuit leaves the uniform state unchanged and the period is whatever a
    /// uniformly random measurement yields.
    pub fn execute_with_rng<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<u64> {
        if self.base.is_none() {
            warn!(number_to_factor = self.number_to_factor, "executing Shor circuit before a base was chosen");
        }
        let mut state = StateVector::uniform(self.number_of_qubits)?;
        self.circuit.execute_with_rng(&mut state, rng)?;
        let measured = self.circuit.measure_with_rng(&state, rng)?;
        let period = find_period(measured as u64, self.number_of_qubits as u32)?;
        debug!(measured, period, "post-processed Shor measurement");
        Ok(period)
    }

    /// The integer whose period is being searched for.
    pub fn number_to_factor(&self) -> u64 {
        self.number_to_factor
    }

    /// Register width, `ceil(log2(number_to_factor))`.
    pub fn number_of_qubits(&self) -> usize {
        self.number_of_qubits
    }

    /// The base chosen by the last `initialize`, if any.
    pub fn base(&self) -> Option<u64> {
        self.base
    }

    /// The circuit built by the last `initialize`; empty before that.
    pub fn circuit(&self) -> &QuantumCircuit {
        &self.circuit
    }
}

/// Candidate period from a measurement on `number_of_qubits` qubits.
///
/// Expands `measured_value / 2^number_of_qubits` as a continued fraction with
/// at most `number_of_qubits` partial quotients after the integer part and
/// returns the denominator of the last convergent. The expansion is carried
/// out on exact integers.
///
/// # Errors
/// `InvalidArgument` if `number_of_qubits` is zero or 64 and above.
pub fn find_period(measured_value: u64, number_of_qubits: u32) -> Result<u64> {
    if number_of_qubits == 0 || number_of_qubits >= u64::BITS {
        return Err(QsimError::invalid_argument(format!(
            "Number of qubits must be between 1 and {}, got {}",
            u64::BITS - 1,
            number_of_qubits
        )));
    }
    let mut denominator = 1u128 << number_of_qubits;
    // The integer part only moves convergent numerators.
    let mut numerator = measured_value as u128 % denominator;

    // Convergent denominators k_{-1} = 0, k_0 = 1.
    let (mut previous, mut current) = (0u128, 1u128);
    for _ in 0..number_of_qubits {
        if numerator == 0 {
            break;
        }
        let quotient = denominator / numerator;
        (numerator, denominator) = (denominator % numerator, numerator);
        (previous, current) = (current, quotient * current + previous);
    }
    Ok(current as u64)
}

/// Classical reduction from a period to a factor pair.
///
/// For an even `period` with `base^(period/2) ≢ -1 (mod n)`, returns the
/// non-trivial factors `gcd(base^(period/2) ± 1, n)` ordered smaller first.
/// Returns `None` when the period is odd or zero, the condition fails, or no
/// non-trivial factor comes out.
pub fn factors_from_period(n: u64, base: u64, period: u64) -> Option<(u64, u64)> {
    if n <= 1 || period == 0 || period % 2 != 0 {
        return None;
    }
    let half = mod_pow(base, period / 2, n);
    if half == n - 1 {
        return None;
    }
    let below = half.checked_sub(1).unwrap_or(n - 1);
    [gcd(half + 1, n), gcd(below, n)]
        .into_iter()
        .find(|&f| f > 1 && f < n)
        .map(|f| (f.min(n / f), f.max(n / f)))
}

fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}
