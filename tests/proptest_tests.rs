//! Property-based tests for qsim using proptest
//!
//! Gate and measurement properties that must hold for any normalized input.

use num_complex::Complex;
use proptest::prelude::*;
use qsim::{CircuitBuilder, Gate, Measurement, StateVector, check_normalization, find_period};
use rand::SeedableRng;
use rand::rngs::StdRng;

const NUM_QUBITS: usize = 3;

// Random normalized 3-qubit states
fn arb_state() -> impl Strategy<Value = StateVector> {
    prop::collection::vec((-1.0f64..1.0, -1.0f64..1.0), 1 << NUM_QUBITS)
        .prop_filter("needs non-zero norm", |pairs| pairs.iter().any(|(re, im)| re.abs() + im.abs() > 1e-3))
        .prop_map(|pairs| {
            let amplitudes = pairs.into_iter().map(|(re, im)| Complex::new(re, im)).collect();
            let mut state = StateVector::new(amplitudes).expect("power of two length");
            state.normalize().expect("non-zero norm");
            state
        })
}

fn arb_gate() -> impl Strategy<Value = Gate> {
    let q = 0..NUM_QUBITS;
    prop_oneof![
        q.clone().prop_map(|target| Gate::PauliX { target }),
        q.clone().prop_map(|target| Gate::PauliY { target }),
        q.clone().prop_map(|target| Gate::PauliZ { target }),
        q.clone().prop_map(|target| Gate::Hadamard { target }),
        (q.clone(), q.clone())
            .prop_filter("distinct qubits", |(c, t)| c != t)
            .prop_map(|(control, target)| Gate::Cnot { control, target }),
        Just(Gate::Toffoli { control1: 0, control2: 1, target: 2 }),
        Just(Gate::Toffoli { control1: 2, control2: 0, target: 1 }),
    ]
}

fn apply(gates: Vec<Gate>, state: &mut StateVector) {
    let circuit = CircuitBuilder::new(NUM_QUBITS).add_gates(gates).build().expect("valid circuit");
    circuit.execute(state).expect("gates apply");
}

// ============================================================================
// Gate Properties
// ============================================================================

proptest! {
    /// Property: every unitary gate keeps the total probability at 1
    #[test]
    fn gates_preserve_normalization(state in arb_state(), gates in prop::collection::vec(arb_gate(), 1..12)) {
        let mut state = state;
        apply(gates, &mut state);
        prop_assert!(check_normalization(&state, Some(1e-9)).is_ok());
    }

    /// Property: Pauli, Hadamard, CNOT and Toffoli are their own inverses
    #[test]
    fn gates_are_involutions(state in arb_state(), gate in arb_gate()) {
        let mut evolved = state.clone();
        apply(vec![gate.clone(), gate], &mut evolved);
        for (a, b) in evolved.amplitudes().iter().zip(state.amplitudes()) {
            prop_assert!((a - b).norm() < 1e-9);
        }
    }

    /// Property: the inverse QFT undoes the QFT on any sub-register
    #[test]
    fn qft_round_trip(state in arb_state(), width in 1..=NUM_QUBITS) {
        let mut evolved = state.clone();
        apply(vec![Gate::Qft { num_qubits: width }, Gate::InverseQft { num_qubits: width }], &mut evolved);
        for (a, b) in evolved.amplitudes().iter().zip(state.amplitudes()) {
            prop_assert!((a - b).norm() < 1e-9);
        }
    }
}

// ============================================================================
// Measurement and Post-Processing Properties
// ============================================================================

proptest! {
    /// Property: measurement never returns an index with zero probability
    /// and never mutates the state
    #[test]
    fn measurement_respects_support(index in 0usize..8, seed in any::<u64>()) {
        let state = StateVector::basis(NUM_QUBITS, index).expect("index in range");
        let before = state.clone();
        let mut rng = StdRng::seed_from_u64(seed);
        prop_assert_eq!(Measurement::new().measure_with_rng(&state, &mut rng), index);
        prop_assert_eq!(state, before);
    }

    /// Property: convergent denominators never exceed the register size
    #[test]
    fn period_is_bounded_by_register_size(measured in 0u64..1024, qubits in 1u32..=10) {
        let period = find_period(measured, qubits).expect("valid width");
        prop_assert!(period >= 1);
        prop_assert!(period <= 1u64 << qubits);
    }
}
