//! Error types for the linear-algebra crate.

use thiserror::Error;

/// Errors produced by the sparse and dense kernels.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum LinalgError {
    /// Operation requires a square matrix.
    #[error("matrix must be square, got {rows}x{cols}")]
    NotSquare {
        /// Number of rows.
        rows: usize,
        /// Number of columns.
        cols: usize,
    },

    /// Operand shapes do not conform.
    #[error("dimension mismatch in {operation}: expected {expected}, got {got}")]
    DimensionMismatch {
        /// Name of the failing operation.
        operation: &'static str,
        /// Expected length along the contracted axis.
        expected: usize,
        /// Length actually supplied.
        got: usize,
    },

    /// A triplet addresses an entry outside the matrix.
    #[error("entry ({row}, {col}) is outside a {rows}x{cols} matrix")]
    IndexOutOfBounds {
        /// Row of the offending entry.
        row: usize,
        /// Column of the offending entry.
        col: usize,
        /// Number of rows.
        rows: usize,
        /// Number of columns.
        cols: usize,
    },

    /// An iterative method hit its iteration limit.
    #[error("{method} did not converge after {iterations} iterations (residual {residual:e})")]
    NoConvergence {
        /// Name of the iterative method.
        method: &'static str,
        /// Iterations performed.
        iterations: usize,
        /// Last observed residual.
        residual: f64,
    },

    /// A result contains NaN or infinite entries.
    #[error("{operation} produced non-finite values")]
    NonFinite {
        /// Name of the failing operation.
        operation: &'static str,
    },
}

/// Result type for linear-algebra operations.
pub type LinalgResult<T> = Result<T, LinalgError>;
