// src/simulation/engine.rs

//! Numeric kernels behind every gate variant.
//!
//! All kernels work on the dense state vector in place (or through a scratch
//! buffer that replaces it atomically) and address qubit `q` as bit `1 << q`
//! of the basis index.

use crate::core::{QsimError, Result, StateVector};
use num_complex::Complex;
use num_traits::{One, Zero};
use std::f64::consts::{FRAC_1_SQRT_2, PI};

/// A 2×2 complex matrix, row-major: `matrix[row][col]`.
pub(crate) type Matrix2 = [[Complex<f64>; 2]; 2];

/// X = [[0, 1], [1, 0]]
pub(crate) fn pauli_x() -> Matrix2 {
    [
        [Complex::zero(), Complex::one()],
        [Complex::one(), Complex::zero()],
    ]
}

/// Y = [[0, -i], [i, 0]]
pub(crate) fn pauli_y() -> Matrix2 {
    [
        [Complex::zero(), -Complex::i()],
        [Complex::i(), Complex::zero()],
    ]
}

/// Z = [[1, 0], [0, -1]]
pub(crate) fn pauli_z() -> Matrix2 {
    [
        [Complex::one(), Complex::zero()],
        [Complex::zero(), Complex::new(-1.0, 0.0)],
    ]
}

/// H = (1/√2) [[1, 1], [1, -1]]
pub(crate) fn hadamard() -> Matrix2 {
    let h = Complex::new(FRAC_1_SQRT_2, 0.0);
    [[h, h], [h, -h]]
}

fn check_qubit(state: &StateVector, qubit: usize) -> Result<()> {
    if qubit >= state.num_qubits() {
        return Err(QsimError::index_out_of_range(qubit, state.num_qubits()));
    }
    Ok(())
}

/// Applies a 2×2 matrix to `target`, acting as identity on every other qubit.
pub(crate) fn apply_single_qubit_gate(state: &mut StateVector, target: usize, matrix: &Matrix2) -> Result<()> {
    check_qubit(state, target)?;
    let mask = 1usize << target;
    let amplitudes = state.amplitudes_mut();

    // Visit each pair of basis states differing only at the target bit once,
    // from the member with the bit clear.
    for i0 in 0..amplitudes.len() {
        if i0 & mask != 0 {
            continue;
        }
        let i1 = i0 | mask;
        let psi_0 = amplitudes[i0];
        let psi_1 = amplitudes[i1];
        amplitudes[i0] = matrix[0][0] * psi_0 + matrix[0][1] * psi_1;
        amplitudes[i1] = matrix[1][0] * psi_0 + matrix[1][1] * psi_1;
    }
    Ok(())
}

/// Flips `target` on every basis state where all `controls` are 1.
pub(crate) fn apply_controlled_flip(state: &mut StateVector, controls: &[usize], target: usize) -> Result<()> {
    check_qubit(state, target)?;
    let mut control_mask = 0usize;
    for &control in controls {
        check_qubit(state, control)?;
        if control == target {
            return Err(QsimError::invalid_argument(format!(
                "Qubit {} cannot be both control and target",
                control
            )));
        }
        control_mask |= 1 << control;
    }
    let target_mask = 1usize << target;
    let amplitudes = state.amplitudes_mut();

    for i in 0..amplitudes.len() {
        // Swap each pair once, from the side where the target bit is clear.
        if i & control_mask == control_mask && i & target_mask == 0 {
            amplitudes.swap(i, i | target_mask);
        }
    }
    Ok(())
}

/// Discrete Fourier transform of the low `num_qubits` register.
///
/// `a'_k = 2^{-m/2} Σ_j a_j e^{±2πi jk / 2^m}` with `+` for the forward transform.
/// The higher qubits are spectators: each block of `2^m` amplitudes sharing the
/// same high bits is transformed on its own.
pub(crate) fn apply_fourier_transform(state: &mut StateVector, num_qubits: usize, inverse: bool) -> Result<()> {
    if num_qubits == 0 || num_qubits > state.num_qubits() {
        return Err(QsimError::dimension_mismatch(1usize << num_qubits.min(usize::BITS as usize - 1), state.dim()));
    }
    let block = 1usize << num_qubits;
    let sign = if inverse { -1.0 } else { 1.0 };
    let scale = 1.0 / (block as f64).sqrt();

    // Twiddle factors e^{±2πi t / block}, t = 0..block.
    let twiddles: Vec<Complex<f64>> = (0..block)
        .map(|t| Complex::from_polar(1.0, sign * 2.0 * PI * t as f64 / block as f64))
        .collect();

    let input = state.amplitudes();
    let mut output = vec![Complex::zero(); input.len()];
    for (chunk_in, chunk_out) in input.chunks(block).zip(output.chunks_mut(block)) {
        for (k, out) in chunk_out.iter_mut().enumerate() {
            let mut acc = Complex::zero();
            for (j, a) in chunk_in.iter().enumerate() {
                acc += a * twiddles[(j * k) % block];
            }
            *out = acc * scale;
        }
    }
    state.replace(output);
    Ok(())
}

/// `base^exponent mod modulus` by square-and-multiply.
pub(crate) fn mod_pow(base: u64, mut exponent: u64, modulus: u64) -> u64 {
    if modulus == 1 {
        return 0;
    }
    let m = modulus as u128;
    let mut result: u128 = 1;
    let mut b = base as u128 % m;
    while exponent > 0 {
        if exponent & 1 == 1 {
            result = result * b % m;
        }
        b = b * b % m;
        exponent >>= 1;
    }
    result as u64
}

/// Moves amplitude `i` to `(multiplier * i) mod modulus` for `i < modulus`;
/// amplitudes at or above the modulus stay put.
///
/// A destination outside the state is an error and leaves the state untouched.
/// If the multiplier shares a factor with the modulus the map is not injective
/// and colliding amplitudes are summed, so the result is no longer normalized.
pub(crate) fn apply_modular_multiplication(state: &mut StateVector, multiplier: u64, modulus: u64) -> Result<()> {
    let dim = state.dim();
    let input = state.amplitudes();
    let mut output = vec![Complex::zero(); dim];

    for (i, amplitude) in input.iter().enumerate() {
        let destination = if (i as u64) < modulus {
            ((multiplier as u128 * i as u128) % modulus as u128) as u64
        } else {
            i as u64
        };
        let destination = usize::try_from(destination)
            .ok()
            .filter(|&d| d < dim)
            .ok_or_else(|| QsimError::index_out_of_range(destination as usize, dim))?;
        output[destination] += *amplitude;
    }
    state.replace(output);
    Ok(())
}

/// Negates the amplitudes at `indices`. Every index is checked before any
/// amplitude changes.
pub(crate) fn negate_amplitudes<I>(state: &mut StateVector, indices: I) -> Result<()>
where
    I: IntoIterator<Item = usize>,
{
    let dim = state.dim();
    let indices: Vec<usize> = indices.into_iter().collect();
    if let Some(&bad) = indices.iter().find(|&&i| i >= dim) {
        return Err(QsimError::index_out_of_range(bad, dim));
    }
    let amplitudes = state.amplitudes_mut();
    for i in indices {
        amplitudes[i] = -amplitudes[i];
    }
    Ok(())
}

/// Grover diffusion: `a_i -> 2 * mean - a_i` over the whole vector.
pub(crate) fn apply_inversion_about_mean(state: &mut StateVector) {
    let dim = state.dim() as f64;
    let amplitudes = state.amplitudes_mut();
    let mean = amplitudes.iter().sum::<Complex<f64>>() / dim;
    for amplitude in amplitudes.iter_mut() {
        *amplitude = mean * 2.0 - *amplitude;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_TOLERANCE: f64 = 1e-9;

    fn assert_complex_vec_approx_equal(actual: &[Complex<f64>], expected: &[Complex<f64>], context: &str) {
        assert_eq!(actual.len(), expected.len(), "Vector length mismatch - {}", context);
        for i in 0..actual.len() {
            let dist_sq = (actual[i] - expected[i]).norm_sqr();
            assert!(
                dist_sq < TEST_TOLERANCE * TEST_TOLERANCE,
                "Vector mismatch at index {} - Actual: {}, Expected: {}, Context: {}",
                i, actual[i], expected[i], context
            );
        }
    }

    fn c(re: f64, im: f64) -> Complex<f64> {
        Complex::new(re, im)
    }

    #[test]
    fn test_pauli_x_on_qubit_one() -> Result<()> {
        // |01> (index 1) -> X on qubit 1 -> |11> (index 3)
        let mut state = StateVector::basis(2, 1)?;
        apply_single_qubit_gate(&mut state, 1, &pauli_x())?;
        assert_complex_vec_approx_equal(
            state.amplitudes(),
            &[c(0.0, 0.0), c(0.0, 0.0), c(0.0, 0.0), c(1.0, 0.0)],
            "X on qubit 1",
        );
        Ok(())
    }

    #[test]
    fn test_pauli_y_phase_convention() -> Result<()> {
        // Y|0> = i|1>, Y|1> = -i|0>
        let mut zero = StateVector::basis(1, 0)?;
        apply_single_qubit_gate(&mut zero, 0, &pauli_y())?;
        assert_complex_vec_approx_equal(zero.amplitudes(), &[c(0.0, 0.0), c(0.0, 1.0)], "Y|0>");

        let mut one = StateVector::basis(1, 1)?;
        apply_single_qubit_gate(&mut one, 0, &pauli_y())?;
        assert_complex_vec_approx_equal(one.amplitudes(), &[c(0.0, -1.0), c(0.0, 0.0)], "Y|1>");
        Ok(())
    }

    #[test]
    fn test_hadamard_only_touches_target_pairs() -> Result<()> {
        // |10> (qubit 1 set) -> H on qubit 0 -> (|10> + |11>)/√2
        let mut state = StateVector::basis(2, 2)?;
        apply_single_qubit_gate(&mut state, 0, &hadamard())?;
        let h = FRAC_1_SQRT_2;
        assert_complex_vec_approx_equal(
            state.amplitudes(),
            &[c(0.0, 0.0), c(0.0, 0.0), c(h, 0.0), c(h, 0.0)],
            "H on qubit 0 of |10>",
        );
        Ok(())
    }

    #[test]
    fn test_qubit_out_of_range() {
        let mut state = StateVector::zero(2).unwrap();
        let err = apply_single_qubit_gate(&mut state, 2, &pauli_x()).unwrap_err();
        assert_eq!(err, QsimError::index_out_of_range(2, 2));
    }

    #[test]
    fn test_controlled_flip() -> Result<()> {
        // control qubit 0, target qubit 1: |01> (index 1) -> |11> (index 3)
        let mut state = StateVector::basis(2, 1)?;
        apply_controlled_flip(&mut state, &[0], 1)?;
        assert_eq!(state.probability(3)?, 1.0);

        // control clear: |10> unchanged
        let mut state = StateVector::basis(2, 2)?;
        apply_controlled_flip(&mut state, &[0], 1)?;
        assert_eq!(state.probability(2)?, 1.0);

        // Toffoli on |011> flips qubit 2 -> |111>
        let mut state = StateVector::basis(3, 3)?;
        apply_controlled_flip(&mut state, &[0, 1], 2)?;
        assert_eq!(state.probability(7)?, 1.0);
        Ok(())
    }

    #[test]
    fn test_qft_of_zero_is_uniform() -> Result<()> {
        let mut state = StateVector::zero(3)?;
        apply_fourier_transform(&mut state, 3, false)?;
        let expected = vec![c(1.0 / 8f64.sqrt(), 0.0); 8];
        assert_complex_vec_approx_equal(state.amplitudes(), &expected, "QFT|000>");
        Ok(())
    }

    #[test]
    fn test_qft_of_basis_state_has_linear_phase() -> Result<()> {
        // QFT|1> over 2 qubits: (1/2) Σ_k i^k |k>
        let mut state = StateVector::basis(2, 1)?;
        apply_fourier_transform(&mut state, 2, false)?;
        assert_complex_vec_approx_equal(
            state.amplitudes(),
            &[c(0.5, 0.0), c(0.0, 0.5), c(-0.5, 0.0), c(0.0, -0.5)],
            "QFT|01>",
        );
        apply_fourier_transform(&mut state, 2, true)?;
        assert_complex_vec_approx_equal(
            state.amplitudes(),
            &[c(0.0, 0.0), c(1.0, 0.0), c(0.0, 0.0), c(0.0, 0.0)],
            "QFT† QFT |01>",
        );
        Ok(())
    }

    #[test]
    fn test_qft_wider_than_state() {
        let mut state = StateVector::zero(2).unwrap();
        assert!(matches!(
            apply_fourier_transform(&mut state, 3, false),
            Err(QsimError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_mod_pow() {
        assert_eq!(mod_pow(2, 4, 15), 1);
        assert_eq!(mod_pow(7, 2, 15), 4);
        assert_eq!(mod_pow(3, 0, 7), 1);
        assert_eq!(mod_pow(5, 3, 1), 0);
        assert_eq!(mod_pow(10, 18, 1_000_000_007), 49);
    }

    #[test]
    fn test_modular_multiplication_permutes_below_modulus() -> Result<()> {
        // multiplier 2 mod 3 on 2 qubits: 1 -> 2, 2 -> 1, 0 -> 0, 3 stays
        let mut state = StateVector::from_real(&[0.1, 0.2, 0.3, 0.4])?;
        apply_modular_multiplication(&mut state, 2, 3)?;
        assert_complex_vec_approx_equal(
            state.amplitudes(),
            &[c(0.1, 0.0), c(0.3, 0.0), c(0.2, 0.0), c(0.4, 0.0)],
            "2x mod 3",
        );
        Ok(())
    }

    #[test]
    fn test_modular_multiplication_out_of_range_leaves_state() -> Result<()> {
        // modulus 7 on a 2 qubit state: 3 * 1 mod 7 = 3 fits, 3 * 2 mod 7 = 6 does not
        let mut state = StateVector::uniform(2)?;
        let before = state.clone();
        let err = apply_modular_multiplication(&mut state, 3, 7).unwrap_err();
        assert_eq!(err, QsimError::index_out_of_range(6, 4));
        assert_eq!(state, before);
        Ok(())
    }

    #[test]
    fn test_inversion_about_mean() -> Result<()> {
        let mut state = StateVector::from_real(&[0.5, 0.5, 0.5, -0.5])?;
        apply_inversion_about_mean(&mut state);
        // mean = 0.25, 2*mean = 0.5
        assert_complex_vec_approx_equal(
            state.amplitudes(),
            &[c(0.0, 0.0), c(0.0, 0.0), c(0.0, 0.0), c(1.0, 0.0)],
            "diffusion",
        );
        Ok(())
    }

    #[test]
    fn test_negate_checks_all_indices_first() -> Result<()> {
        let mut state = StateVector::uniform(1)?;
        let before = state.clone();
        assert!(negate_amplitudes(&mut state, vec![0, 5]).is_err());
        assert_eq!(state, before);
        Ok(())
    }
}
