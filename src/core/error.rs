//! Error handling logic

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, QsimError>;

/// Error types raised by state construction, gate application, circuit
/// execution and the algorithms built on top of them.
///
/// All of them are local and synchronous: they describe programmer or
/// configuration mistakes, so nothing in the crate retries on them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QsimError {
    /// A parameter is outside its allowed domain (probability outside [0, 1],
    /// non-positive modulus, repeated qubit in a multi-qubit gate, ...).
    #[error("Invalid Argument: {message}")]
    InvalidArgument {
        /// InvalidArgument failure message
        message: String,
    },

    /// A state vector does not have the length the circuit or gate expects.
    #[error("Dimension Mismatch: expected {expected} amplitudes, got {actual}")]
    DimensionMismatch {
        /// Required number of amplitudes
        expected: usize,
        /// Number of amplitudes actually supplied
        actual: usize,
    },

    /// A gate computed (or was configured with) a basis index or qubit outside the state.
    #[error("Index Out Of Range: index {index} is not below {bound}")]
    IndexOutOfRange {
        /// The offending index
        index: usize,
        /// Exclusive upper bound for valid indices
        bound: usize,
    },

    /// A gate failed during circuit execution. The state vector passed to
    /// `execute` must be considered invalid afterwards.
    #[error("Gate {index} ({name}) failed: {source}")]
    GateFailed {
        /// Position of the gate in the circuit
        index: usize,
        /// Name of the failing gate
        name: String,
        /// Underlying failure
        source: Box<QsimError>,
    },

    /// Total probability drifted away from 1.
    #[error("Incoherence Violation: {message}")]
    Incoherence {
        /// Incoherence failure message
        message: String,
    },
}

impl QsimError {
    /// Create an invalid argument error.
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument { message: message.into() }
    }

    /// Create a dimension mismatch error.
    pub fn dimension_mismatch(expected: usize, actual: usize) -> Self {
        Self::DimensionMismatch { expected, actual }
    }

    /// Create an index out of range error.
    pub fn index_out_of_range(index: usize, bound: usize) -> Self {
        Self::IndexOutOfRange { index, bound }
    }

    /// Wrap an error raised while applying gate `index` of a circuit.
    pub(crate) fn gate_failed(index: usize, name: impl Into<String>, source: QsimError) -> Self {
        Self::GateFailed { index, name: name.into(), source: Box::new(source) }
    }

    /// Returns the innermost error, looking through `GateFailed` wrappers.
    pub fn root_cause(&self) -> &QsimError {
        match self {
            QsimError::GateFailed { source, .. } => source.root_cause(),
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = QsimError::dimension_mismatch(8, 4);
        assert!(err.to_string().contains('8'));
        assert!(err.to_string().contains('4'));

        let err = QsimError::invalid_argument("probability must be in [0, 1]");
        assert!(err.to_string().contains("[0, 1]"));
    }

    #[test]
    fn test_root_cause_unwraps_gate_failure() {
        let inner = QsimError::index_out_of_range(20, 16);
        let err = QsimError::gate_failed(1, "ModExp(7^1 mod 21)", inner.clone());
        assert!(err.to_string().contains("ModExp"));
        assert_eq!(err.root_cause(), &inner);
    }
}
