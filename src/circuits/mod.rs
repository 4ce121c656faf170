// src/circuits/mod.rs

//! Defines the circuit executor: an ordered list of gates plus an ordered list
//! of noise models, run against a caller-supplied state vector.
//!
//! A circuit is built once (`add_gate` / `add_noise_model`, or the chained
//! [`CircuitBuilder`]) and may then be executed any number of times. It never
//! owns a state vector; each call to `execute` borrows one.

use crate::core::state::dimension_for;
use crate::core::{QsimError, Result, StateVector};
use crate::measurement::Measurement;
use crate::noise::NoiseModel;
use crate::operations::Gate;
use rand::Rng;
use std::fmt;
use tracing::{debug, trace};

/// An ordered sequence of gates, with noise injected after every gate.
///
/// The register width is fixed at construction; every state vector handed to
/// [`execute`](QuantumCircuit::execute) or [`measure`](QuantumCircuit::measure)
/// must hold exactly `2^number_of_qubits` amplitudes.
#[derive(Clone, PartialEq)] // PartialEq useful for testing circuits
pub struct QuantumCircuit {
    number_of_qubits: usize,
    dim: usize,
    gates: Vec<Gate>,
    noise_models: Vec<NoiseModel>,
}

impl QuantumCircuit {
    /// Creates an empty circuit over `number_of_qubits` qubits.
    ///
    /// # Errors
    /// `InvalidArgument` if the width is zero or above [`crate::core::MAX_QUBITS`].
    pub fn new(number_of_qubits: usize) -> Result<Self> {
        let dim = dimension_for(number_of_qubits)?;
        Ok(Self { number_of_qubits, dim, gates: Vec::new(), noise_models: Vec::new() })
    }

    /// Appends a gate.
    ///
    /// # Errors
    /// `InvalidArgument` if the gate addresses a qubit outside the register or
    /// carries parameters its constructor would have rejected.
    pub fn add_gate(&mut self, gate: Gate) -> Result<()> {
        gate.validate()?;
        if let Some(&qubit) = gate.qubits().iter().find(|&&q| q >= self.number_of_qubits) {
            return Err(QsimError::invalid_argument(format!(
                "Gate {} addresses qubit {} but the circuit has {} qubits",
                gate.name(),
                qubit,
                self.number_of_qubits
            )));
        }
        if let Gate::GroverOracle(oracle) = &gate {
            oracle.validate(self.dim).map_err(|e| QsimError::invalid_argument(e.to_string()))?;
        }
        self.gates.push(gate);
        Ok(())
    }

    /// Appends multiple gates, stopping at the first invalid one.
    pub fn add_gates<I>(&mut self, gates: I) -> Result<()>
    where
        I: IntoIterator<Item = Gate>,
    {
        for gate in gates {
            self.add_gate(gate)?;
        }
        Ok(())
    }

    /// Appends a noise model. Noise models run after every gate, in insertion order.
    pub fn add_noise_model(&mut self, model: NoiseModel) {
        self.noise_models.push(model);
    }

    /// Runs every gate on `state` using the thread-local generator for noise.
    pub fn execute(&self, state: &mut StateVector) -> Result<()> {
        self.execute_with_rng(state, &mut rand::rng())
    }

    /// Runs every gate on `state`, applying all noise models after each gate.
    ///
    /// # Errors
    /// * `DimensionMismatch` if `state` does not have `2^number_of_qubits`
    ///   amplitudes. The state is left untouched.
    /// * `GateFailed` naming the position and name of the first gate that
    ///   failed. The state is partially evolved and must not be reused.
    pub fn execute_with_rng<R: Rng + ?Sized>(&self, state: &mut StateVector, rng: &mut R) -> Result<()> {
        self.check_dimension(state)?;
        debug!(
            qubits = self.number_of_qubits,
            gates = self.gates.len(),
            noise_models = self.noise_models.len(),
            "executing circuit"
        );

        for (index, gate) in self.gates.iter().enumerate() {
            trace!(index, gate = %gate, "applying gate");
            gate.apply(state).map_err(|e| QsimError::gate_failed(index, gate.name(), e))?;
            for model in &self.noise_models {
                model.apply(state, rng);
            }
        }
        Ok(())
    }

    /// Samples one basis index from `state` using the thread-local generator.
    pub fn measure(&self, state: &StateVector) -> Result<usize> {
        self.measure_with_rng(state, &mut rand::rng())
    }

    /// Samples one basis index from `state` (see [`Measurement`]).
    ///
    /// # Errors
    /// `DimensionMismatch` if `state` does not match the register width.
    pub fn measure_with_rng<R: Rng + ?Sized>(&self, state: &StateVector, rng: &mut R) -> Result<usize> {
        self.check_dimension(state)?;
        Ok(Measurement::new().measure_with_rng(state, rng))
    }

    fn check_dimension(&self, state: &StateVector) -> Result<()> {
        if state.dim() != self.dim {
            return Err(QsimError::dimension_mismatch(self.dim, state.dim()));
        }
        Ok(())
    }

    /// Register width.
    pub fn number_of_qubits(&self) -> usize {
        self.number_of_qubits
    }

    /// Returns a slice containing the ordered gates.
    pub fn gates(&self) -> &[Gate] {
        &self.gates
    }

    /// Returns a slice containing the ordered noise models.
    pub fn noise_models(&self) -> &[NoiseModel] {
        &self.noise_models
    }

    /// Returns the number of gates.
    pub fn len(&self) -> usize {
        self.gates.len()
    }

    /// Returns `true` if the circuit contains no gates.
    pub fn is_empty(&self) -> bool {
        self.gates.is_empty()
    }
}

//-------------------------------------------------------------------------
// Circuit Builder
//-------------------------------------------------------------------------

/// A helper struct for programmatically constructing `QuantumCircuit` instances
/// using method chaining. The first invalid gate is remembered and reported by
/// [`build`](CircuitBuilder::build).
pub struct CircuitBuilder {
    circuit: Result<QuantumCircuit>,
}

impl CircuitBuilder {
    /// Starts a circuit over `number_of_qubits` qubits.
    pub fn new(number_of_qubits: usize) -> Self {
        Self { circuit: QuantumCircuit::new(number_of_qubits) }
    }

    /// Adds a single gate to the circuit being built.
    pub fn add_gate(mut self, gate: Gate) -> Self {
        if let Ok(circuit) = &mut self.circuit {
            if let Err(e) = circuit.add_gate(gate) {
                self.circuit = Err(e);
            }
        }
        self
    }

    /// Adds multiple gates from an iterator to the circuit being built.
    pub fn add_gates<I>(self, gates: I) -> Self
    where
        I: IntoIterator<Item = Gate>,
    {
        gates.into_iter().fold(self, |builder, gate| builder.add_gate(gate))
    }

    /// Adds a noise model to the circuit being built.
    pub fn add_noise_model(mut self, model: NoiseModel) -> Self {
        if let Ok(circuit) = &mut self.circuit {
            circuit.add_noise_model(model);
        }
        self
    }

    /// Finalizes the construction process and returns the built `QuantumCircuit`,
    /// or the first error encountered while building.
    pub fn build(self) -> Result<QuantumCircuit> {
        self.circuit
    }
}

impl fmt::Display for QuantumCircuit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let num_gates = self.gates.len();
        let num_qubits = self.number_of_qubits;
        writeln!(f, "qsim::QuantumCircuit[{} gates on {} qubits]", num_gates, num_qubits)?;
        if num_gates == 0 {
            return Ok(());
        }

        // Grid dimensions and padding
        const GATE_WIDTH: usize = 7; // e.g., "───H───"
        const WIRE: &str = "───────"; // GATE_WIDTH dashes
        const V_WIRE: char = '│';
        const H_WIRE: char = '─';

        // op_grid[row][time] stores the gate/wire segment string
        let mut op_grid: Vec<Vec<String>> = vec![vec![WIRE.to_string(); num_gates]; num_qubits];
        // v_connect[row][time] stores the vertical connector char below this row at this time
        let mut v_connect: Vec<Vec<char>> = vec![vec![' '; num_gates]; num_qubits];

        fn format_gate(symbol: &str) -> String {
            let slen = symbol.chars().count();
            if slen >= GATE_WIDTH {
                symbol.chars().take(GATE_WIDTH).collect()
            } else {
                let total_dashes = GATE_WIDTH - slen;
                let pre_dashes = total_dashes / 2;
                let post_dashes = total_dashes - pre_dashes;
                format!("{}{}{}", H_WIRE.to_string().repeat(pre_dashes), symbol, H_WIRE.to_string().repeat(post_dashes))
            }
        }

        fn connect(v_connect: &mut [Vec<char>], rows: &[usize], t: usize) {
            let r_min = rows.iter().copied().min().unwrap_or(0);
            let r_max = rows.iter().copied().max().unwrap_or(0);
            for row_vec in v_connect.iter_mut().take(r_max).skip(r_min) {
                row_vec[t] = V_WIRE;
            }
        }

        // Register-wide gates are drawn as a labelled box on every row they span.
        fn span(grid: &mut [Vec<String>], v_connect: &mut [Vec<char>], rows: usize, t: usize, symbol: &str) {
            let rows = rows.min(grid.len());
            for row in grid.iter_mut().take(rows) {
                row[t] = format_gate(symbol);
            }
            if rows > 1 {
                connect(v_connect, &[0, rows - 1], t);
            }
        }

        for (t, gate) in self.gates.iter().enumerate() {
            match gate {
                Gate::PauliX { target } => op_grid[*target][t] = format_gate("X"),
                Gate::PauliY { target } => op_grid[*target][t] = format_gate("Y"),
                Gate::PauliZ { target } => op_grid[*target][t] = format_gate("Z"),
                Gate::Hadamard { target } => op_grid[*target][t] = format_gate("H"),
                Gate::Cnot { control, target } => {
                    op_grid[*control][t] = format_gate("@");
                    op_grid[*target][t] = format_gate("X");
                    connect(&mut v_connect, &[*control, *target], t);
                }
                Gate::Toffoli { control1, control2, target } => {
                    op_grid[*control1][t] = format_gate("@");
                    op_grid[*control2][t] = format_gate("@");
                    op_grid[*target][t] = format_gate("X");
                    connect(&mut v_connect, &[*control1, *control2, *target], t);
                }
                Gate::Qft { num_qubits: m } => span(&mut op_grid, &mut v_connect, *m, t, "QFT"),
                Gate::InverseQft { num_qubits: m } => span(&mut op_grid, &mut v_connect, *m, t, "QFT†"),
                Gate::PhaseEstimation { num_qubits: m, .. } => span(&mut op_grid, &mut v_connect, *m, t, "PE"),
                Gate::ModularExponentiation { .. } => span(&mut op_grid, &mut v_connect, num_qubits, t, "MOD"),
                Gate::GroverOracle(_) => span(&mut op_grid, &mut v_connect, num_qubits, t, "Uf"),
                Gate::GroverDiffusion => span(&mut op_grid, &mut v_connect, num_qubits, t, "D"),
                Gate::Custom(_) => span(&mut op_grid, &mut v_connect, num_qubits, t, "?"),
            }
        }

        let max_label_width = format!("q{}", num_qubits - 1).len();
        let label_padding = " ".repeat(max_label_width + 2); // Label + ": "
        for r in 0..num_qubits {
            let label = format!("q{}: ", r);
            write!(f, "{:<width$}", label, width = max_label_width + 2)?;
            writeln!(f, "{}", op_grid[r].join(""))?;

            // Print vertical connector row (if not the last qubit)
            if r < num_qubits - 1 {
                write!(f, "{}", label_padding)?;
                for t in 0..num_gates {
                    let connector = v_connect[r][t];
                    let padding_needed = GATE_WIDTH.saturating_sub(1);
                    let pre_pad = padding_needed / 2;
                    let post_pad = padding_needed - pre_pad;
                    write!(f, "{}{}{}", " ".repeat(pre_pad), connector, " ".repeat(post_pad))?;
                }
                writeln!(f)?;
            }
        }
        if !self.noise_models.is_empty() {
            let names: Vec<String> = self.noise_models.iter().map(|m| m.to_string()).collect();
            writeln!(f, "noise after each gate: {}", names.join(", "))?;
        }
        Ok(())
    }
}

// Keep the Debug impl delegating to Display
impl fmt::Debug for QuantumCircuit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_new_rejects_zero_qubits() {
        assert!(matches!(QuantumCircuit::new(0), Err(QsimError::InvalidArgument { .. })));
    }

    #[test]
    fn test_add_gate_checks_qubits() {
        let mut circuit = QuantumCircuit::new(2).unwrap();
        assert!(circuit.add_gate(Gate::Hadamard { target: 1 }).is_ok());
        assert!(circuit.add_gate(Gate::Hadamard { target: 2 }).is_err());
        assert!(circuit.add_gate(Gate::Qft { num_qubits: 3 }).is_err());
        assert!(circuit.add_gate(Gate::GroverOracle(crate::operations::GroverOracle::mark_one(4))).is_err());
        assert_eq!(circuit.len(), 1);
    }

    #[test]
    fn test_add_gate_rejects_directly_built_zero_modulus() {
        let result = CircuitBuilder::new(2)
            .add_gate(Gate::ModularExponentiation { base: 2, exponent: 1, modulus: 0 })
            .build();
        assert!(matches!(result, Err(QsimError::InvalidArgument { .. })));

        let mut circuit = QuantumCircuit::new(2).unwrap();
        assert!(circuit.add_gate(Gate::Toffoli { control1: 0, control2: 0, target: 1 }).is_err());
        assert!(circuit.is_empty());
    }

    #[test]
    fn test_builder_reports_first_error() {
        let result = CircuitBuilder::new(2)
            .add_gate(Gate::PauliX { target: 0 })
            .add_gate(Gate::PauliX { target: 5 })
            .add_gate(Gate::PauliX { target: 1 })
            .build();
        assert!(matches!(result, Err(QsimError::InvalidArgument { .. })));
    }

    #[test]
    fn test_gate_failure_is_attributed() {
        let circuit = CircuitBuilder::new(2)
            .add_gate(Gate::Hadamard { target: 0 })
            .add_gate(Gate::custom("boom", |_| Err(QsimError::invalid_argument("broken"))))
            .build()
            .unwrap();
        let mut state = StateVector::zero(2).unwrap();
        let err = circuit.execute_with_rng(&mut state, &mut StdRng::seed_from_u64(0)).unwrap_err();
        match err {
            QsimError::GateFailed { index, name, .. } => {
                assert_eq!(index, 1);
                assert_eq!(name, "boom");
            }
            e => panic!("Expected GateFailed, got {:?}", e),
        }
    }

    #[test]
    fn test_noise_runs_after_every_gate() {
        // attenuation 0.5 halves every amplitude after each of the two gates
        let circuit = CircuitBuilder::new(1)
            .add_gate(Gate::PauliX { target: 0 })
            .add_gate(Gate::PauliX { target: 0 })
            .add_noise_model(NoiseModel::attenuation(0.5).unwrap())
            .build()
            .unwrap();
        let mut state = StateVector::zero(1).unwrap();
        circuit.execute(&mut state).unwrap();
        assert!((state.amplitudes()[0].re - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_display_draws_cnot() {
        let circuit = CircuitBuilder::new(2)
            .add_gate(Gate::Hadamard { target: 0 })
            .add_gate(Gate::cnot(0, 1).unwrap())
            .build()
            .unwrap();
        let rendered = circuit.to_string();
        assert!(rendered.starts_with("qsim::QuantumCircuit[2 gates on 2 qubits]"));
        assert!(rendered.contains("q0: ───H──────@───"));
        assert!(rendered.contains("q1: ──────────X───"));
        assert!(rendered.contains('│'));
    }
}
