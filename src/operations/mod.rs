// src/operations/mod.rs

//! Defines the gates a circuit can apply to a state vector.
//!
//! The gate set is closed: every gate is a variant of [`Gate`], and the
//! numeric work for each variant lives in `simulation::engine`. Callers that
//! need something outside the set wrap their own function in a [`CustomGate`].

use crate::core::{QsimError, Result, StateVector};
use crate::simulation::engine;
use num_complex::Complex;
use std::fmt;
use std::sync::Arc;

/// Signature of the function wrapped by a [`CustomGate`].
pub type GateFn = dyn Fn(&mut [Complex<f64>]) -> Result<()> + Send + Sync;

/// Signature of the predicate wrapped by a [`PredicateOracle`].
pub type MarkFn = dyn Fn(usize) -> bool + Send + Sync;

/// A unit of evolution over the state vector.
///
/// Qubit `q` addresses bit `1 << q` of the basis index. Every variant except
/// `Custom`, `ModularExponentiation` with a non-coprime multiplier, and the
/// oracle/diffusion pair acting on an unnormalized input preserves the total
/// probability.
#[derive(Debug, Clone, PartialEq)]
pub enum Gate {
    /// Bit flip: swaps the amplitudes of each pair differing in `target`.
    PauliX {
        /// Qubit being flipped.
        target: usize,
    },
    /// `Y = [[0, -i], [i, 0]]`: the amplitude moving from `|..0..>` to `|..1..>`
    /// picks up `+i`, the one moving the other way picks up `-i`.
    PauliY {
        /// Qubit being rotated.
        target: usize,
    },
    /// Phase flip: negates amplitudes whose `target` bit is set.
    PauliZ {
        /// Qubit being phase flipped.
        target: usize,
    },
    /// Maps each pair `(a0, a1)` to `((a0 + a1)/√2, (a0 - a1)/√2)`.
    Hadamard {
        /// Qubit being put into superposition.
        target: usize,
    },
    /// Flips `target` on every basis state where `control` is 1.
    Cnot {
        /// Control qubit.
        control: usize,
        /// Target qubit.
        target: usize,
    },
    /// Flips `target` on every basis state where both controls are 1.
    Toffoli {
        /// First control qubit.
        control1: usize,
        /// Second control qubit.
        control2: usize,
        /// Target qubit.
        target: usize,
    },
    /// Discrete Fourier transform of the low `num_qubits` register, scaled by
    /// `1/sqrt(2^num_qubits)`.
    Qft {
        /// Width of the transformed register.
        num_qubits: usize,
    },
    /// Adjoint of [`Gate::Qft`].
    InverseQft {
        /// Width of the transformed register.
        num_qubits: usize,
    },
    /// Moves amplitude `i` to `(base^exponent * i) mod modulus` for `i < modulus`.
    /// Indices at or above the modulus stay where they are.
    ModularExponentiation {
        /// Multiplier base.
        base: u64,
        /// Power the base is raised to.
        exponent: u64,
        /// Modulus, greater than 1.
        modulus: u64,
    },
    /// Flips the sign of the marked amplitudes.
    GroverOracle(GroverOracle),
    /// Inversion about the mean: `a_i -> 2 * mean - a_i`.
    GroverDiffusion,
    /// Forward transform, `num_qubits` applications of `unitary`, inverse transform.
    PhaseEstimation {
        /// Width of the phase register.
        num_qubits: usize,
        /// Operator whose eigenphase is encoded.
        unitary: Box<Gate>,
    },
    /// Caller-supplied evolution.
    Custom(CustomGate),
}

impl Gate {
    /// Builds a CNOT, rejecting `control == target`.
    pub fn cnot(control: usize, target: usize) -> Result<Self> {
        if control == target {
            return Err(QsimError::invalid_argument(format!(
                "CNOT control and target must differ, both are qubit {}",
                control
            )));
        }
        Ok(Gate::Cnot { control, target })
    }

    /// Builds a Toffoli, rejecting any repeated qubit.
    pub fn toffoli(control1: usize, control2: usize, target: usize) -> Result<Self> {
        if control1 == control2 || control1 == target || control2 == target {
            return Err(QsimError::invalid_argument(format!(
                "Toffoli qubits must be distinct, got ({}, {}, {})",
                control1, control2, target
            )));
        }
        Ok(Gate::Toffoli { control1, control2, target })
    }

    /// Builds a QFT over `num_qubits` qubits.
    pub fn qft(num_qubits: usize) -> Result<Self> {
        if num_qubits == 0 {
            return Err(QsimError::invalid_argument("QFT needs at least one qubit"));
        }
        Ok(Gate::Qft { num_qubits })
    }

    /// Builds a modular exponentiation gate.
    ///
    /// # Errors
    /// `InvalidArgument` if `modulus <= 1` or `base == 0`.
    pub fn modular_exponentiation(base: u64, exponent: u64, modulus: u64) -> Result<Self> {
        check_modular_parameters(base, modulus)?;
        Ok(Gate::ModularExponentiation { base, exponent, modulus })
    }

    /// Builds a phase estimation gate around `unitary`.
    pub fn phase_estimation(num_qubits: usize, unitary: Gate) -> Result<Self> {
        if num_qubits == 0 {
            return Err(QsimError::invalid_argument("Phase estimation needs at least one qubit"));
        }
        Ok(Gate::PhaseEstimation { num_qubits, unitary: Box::new(unitary) })
    }

    /// Wraps a caller-supplied function as a gate.
    pub fn custom<F>(name: impl Into<String>, operation: F) -> Self
    where
        F: Fn(&mut [Complex<f64>]) -> Result<()> + Send + Sync + 'static,
    {
        Gate::Custom(CustomGate::new(name, operation))
    }

    /// Short human readable name, used in error reports and diagrams.
    pub fn name(&self) -> String {
        match self {
            Gate::PauliX { .. } => "Pauli-X".to_string(),
            Gate::PauliY { .. } => "Pauli-Y".to_string(),
            Gate::PauliZ { .. } => "Pauli-Z".to_string(),
            Gate::Hadamard { .. } => "Hadamard".to_string(),
            Gate::Cnot { .. } => "CNOT".to_string(),
            Gate::Toffoli { .. } => "Toffoli".to_string(),
            Gate::Qft { num_qubits } => format!("QFT({})", num_qubits),
            Gate::InverseQft { num_qubits } => format!("QFT†({})", num_qubits),
            Gate::ModularExponentiation { base, exponent, modulus } => {
                format!("ModExp({}^{} mod {})", base, exponent, modulus)
            }
            Gate::GroverOracle(_) => "GroverOracle".to_string(),
            Gate::GroverDiffusion => "GroverDiffusion".to_string(),
            Gate::PhaseEstimation { num_qubits, unitary } => {
                format!("PhaseEstimation({}, {})", num_qubits, unitary.name())
            }
            Gate::Custom(custom) => custom.name().to_string(),
        }
    }

    /// Returns the qubits this gate explicitly addresses.
    ///
    /// Register-wide gates (QFT, modular exponentiation, oracle, diffusion)
    /// report every qubit of the register they span, or nothing when they span
    /// the whole state.
    pub fn qubits(&self) -> Vec<usize> {
        match self {
            Gate::PauliX { target }
            | Gate::PauliY { target }
            | Gate::PauliZ { target }
            | Gate::Hadamard { target } => vec![*target],
            Gate::Cnot { control, target } => vec![*control, *target],
            Gate::Toffoli { control1, control2, target } => vec![*control1, *control2, *target],
            Gate::Qft { num_qubits }
            | Gate::InverseQft { num_qubits }
            | Gate::PhaseEstimation { num_qubits, .. } => (0..*num_qubits).collect(),
            Gate::ModularExponentiation { .. }
            | Gate::GroverOracle(_)
            | Gate::GroverDiffusion
            | Gate::Custom(_) => Vec::new(),
        }
    }

    /// Re-runs the parameter checks of the validating constructors, for gates
    /// built directly from their variant fields. Qubit bounds are checked by
    /// the circuit, which knows the register width.
    ///
    /// # Errors
    /// `InvalidArgument` for repeated qubits, a zero-width transform, or a
    /// modulus `<= 1` / zero base.
    pub fn validate(&self) -> Result<()> {
        match self {
            Gate::Cnot { control, target } => Gate::cnot(*control, *target).map(|_| ()),
            Gate::Toffoli { control1, control2, target } => {
                Gate::toffoli(*control1, *control2, *target).map(|_| ())
            }
            Gate::Qft { num_qubits } | Gate::InverseQft { num_qubits } => Gate::qft(*num_qubits).map(|_| ()),
            Gate::ModularExponentiation { base, modulus, .. } => check_modular_parameters(*base, *modulus),
            Gate::PhaseEstimation { num_qubits, unitary } => {
                if *num_qubits == 0 {
                    return Err(QsimError::invalid_argument("Phase estimation needs at least one qubit"));
                }
                unitary.validate()
            }
            _ => Ok(()),
        }
    }

    /// Applies the gate to `state` in place.
    ///
    /// # Errors
    /// * `IndexOutOfRange` if an addressed qubit, marked index or computed
    ///   destination lies outside the state.
    /// * `DimensionMismatch` if a register-wide gate is wider than the state.
    /// * Whatever a custom gate's function returns.
    pub fn apply(&self, state: &mut StateVector) -> Result<()> {
        match self {
            Gate::PauliX { target } => engine::apply_single_qubit_gate(state, *target, &engine::pauli_x()),
            Gate::PauliY { target } => engine::apply_single_qubit_gate(state, *target, &engine::pauli_y()),
            Gate::PauliZ { target } => engine::apply_single_qubit_gate(state, *target, &engine::pauli_z()),
            Gate::Hadamard { target } => engine::apply_single_qubit_gate(state, *target, &engine::hadamard()),
            Gate::Cnot { control, target } => engine::apply_controlled_flip(state, &[*control], *target),
            Gate::Toffoli { control1, control2, target } => {
                engine::apply_controlled_flip(state, &[*control1, *control2], *target)
            }
            Gate::Qft { num_qubits } => engine::apply_fourier_transform(state, *num_qubits, false),
            Gate::InverseQft { num_qubits } => engine::apply_fourier_transform(state, *num_qubits, true),
            Gate::ModularExponentiation { base, exponent, modulus } => {
                check_modular_parameters(*base, *modulus)?;
                engine::apply_modular_multiplication(state, engine::mod_pow(*base, *exponent, *modulus), *modulus)
            }
            Gate::GroverOracle(oracle) => oracle.apply(state),
            Gate::GroverDiffusion => {
                engine::apply_inversion_about_mean(state);
                Ok(())
            }
            Gate::PhaseEstimation { num_qubits, unitary } => {
                engine::apply_fourier_transform(state, *num_qubits, false)?;
                for _ in 0..*num_qubits {
                    unitary.apply(state)?;
                }
                engine::apply_fourier_transform(state, *num_qubits, true)
            }
            Gate::Custom(custom) => custom.apply(state),
        }
    }
}

impl fmt::Display for Gate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let qubits = self.qubits();
        if qubits.is_empty() {
            write!(f, "{}", self.name())
        } else {
            write!(f, "{}{:?}", self.name(), qubits)
        }
    }
}

fn check_modular_parameters(base: u64, modulus: u64) -> Result<()> {
    if modulus <= 1 {
        return Err(QsimError::invalid_argument(format!(
            "Modulus must be greater than 1, got {}",
            modulus
        )));
    }
    if base == 0 {
        return Err(QsimError::invalid_argument("Base must be positive"));
    }
    Ok(())
}

//-------------------------------------------------------------------------
// Grover oracle
//-------------------------------------------------------------------------

/// Marks one or more basis states by flipping the sign of their amplitude.
#[derive(Debug, Clone, PartialEq)]
pub enum GroverOracle {
    /// Marks exactly one basis state.
    MarkOne {
        /// Index of the marked basis state.
        index: usize,
    },
    /// Marks every listed basis state. The list may be unsorted; duplicates
    /// are flipped once.
    MarkMany {
        /// Indices of the marked basis states.
        indices: Vec<usize>,
    },
    /// Marks every basis state accepted by a predicate.
    Predicate(PredicateOracle),
}

impl GroverOracle {
    /// Oracle marking a single basis state.
    pub fn mark_one(index: usize) -> Self {
        GroverOracle::MarkOne { index }
    }

    /// Oracle marking a set of basis states.
    pub fn mark_many(mut indices: Vec<usize>) -> Self {
        indices.sort_unstable();
        indices.dedup();
        GroverOracle::MarkMany { indices }
    }

    /// Oracle marking every index for which `predicate` holds.
    pub fn predicate<F>(name: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(usize) -> bool + Send + Sync + 'static,
    {
        GroverOracle::Predicate(PredicateOracle { name: name.into(), predicate: Arc::new(predicate) })
    }

    /// Checks that every explicitly marked index is below `dim`.
    pub fn validate(&self, dim: usize) -> Result<()> {
        match self {
            GroverOracle::MarkOne { index } if *index >= dim => Err(QsimError::index_out_of_range(*index, dim)),
            GroverOracle::MarkMany { indices } => match indices.iter().find(|&&i| i >= dim) {
                Some(&index) => Err(QsimError::index_out_of_range(index, dim)),
                None => Ok(()),
            },
            _ => Ok(()),
        }
    }

    /// Number of marked basis states within a register of `dim` states.
    pub fn marked_count(&self, dim: usize) -> usize {
        match self {
            GroverOracle::MarkOne { index } => usize::from(*index < dim),
            GroverOracle::MarkMany { indices } => distinct(indices).into_iter().filter(|&i| i < dim).count(),
            GroverOracle::Predicate(oracle) => (0..dim).filter(|&i| (oracle.predicate)(i)).count(),
        }
    }

    /// Whether `index` is marked.
    pub fn is_marked(&self, index: usize) -> bool {
        match self {
            GroverOracle::MarkOne { index: marked } => *marked == index,
            GroverOracle::MarkMany { indices } => indices.contains(&index),
            GroverOracle::Predicate(oracle) => (oracle.predicate)(index),
        }
    }

    fn apply(&self, state: &mut StateVector) -> Result<()> {
        self.validate(state.dim())?;
        match self {
            GroverOracle::MarkOne { index } => engine::negate_amplitudes(state, std::iter::once(*index)),
            GroverOracle::MarkMany { indices } => engine::negate_amplitudes(state, distinct(indices)),
            GroverOracle::Predicate(oracle) => {
                let marked: Vec<usize> = (0..state.dim()).filter(|&i| (oracle.predicate)(i)).collect();
                engine::negate_amplitudes(state, marked)
            }
        }
    }
}

// `MarkMany` can be built without `mark_many`, so its list may be unsorted or repeat indices.
fn distinct(indices: &[usize]) -> Vec<usize> {
    let mut indices = indices.to_vec();
    indices.sort_unstable();
    indices.dedup();
    indices
}

/// An oracle backed by an arbitrary `Fn(usize) -> bool`.
#[derive(Clone)]
pub struct PredicateOracle {
    name: String,
    predicate: Arc<MarkFn>,
}

impl PredicateOracle {
    /// Name given at construction.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Debug for PredicateOracle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PredicateOracle").field("name", &self.name).finish_non_exhaustive()
    }
}

// Two predicate oracles are equal only when they share the same closure.
impl PartialEq for PredicateOracle {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && Arc::ptr_eq(&self.predicate, &other.predicate)
    }
}

//-------------------------------------------------------------------------
// Custom gate
//-------------------------------------------------------------------------

/// A named, caller-supplied gate. Useful for test doubles and one-off oracles.
#[derive(Clone)]
pub struct CustomGate {
    name: String,
    operation: Arc<GateFn>,
}

impl CustomGate {
    /// Wraps `operation` under `name`.
    pub fn new<F>(name: impl Into<String>, operation: F) -> Self
    where
        F: Fn(&mut [Complex<f64>]) -> Result<()> + Send + Sync + 'static,
    {
        Self { name: name.into(), operation: Arc::new(operation) }
    }

    /// Name given at construction.
    pub fn name(&self) -> &str {
        &self.name
    }

    fn apply(&self, state: &mut StateVector) -> Result<()> {
        (self.operation)(state.amplitudes_mut())
    }
}

impl fmt::Debug for CustomGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomGate").field("name", &self.name).finish_non_exhaustive()
    }
}

impl PartialEq for CustomGate {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && Arc::ptr_eq(&self.operation, &other.operation)
    }
}
