//! Numeric tolerances and limits shared by the simulator.

/// Simulation limits and tolerances
pub mod qsim_constants {
    /// Allowed deviation of the total probability from 1.
    pub const NORM_TOLERANCE: f64 = 1e-9;
    /// Amplitudes with squared magnitude below this are treated as zero.
    pub const AMPLITUDE_TOLERANCE: f64 = 1e-12;
    /// Widest register a circuit accepts. The dense state holds 2^n amplitudes,
    /// so memory runs out long before time does.
    pub const MAX_QUBITS: usize = 30;
}
