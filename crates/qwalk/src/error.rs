//! Error types for the dynamics engine.

use qwalk_linalg::LinalgError;
use thiserror::Error;

/// A malformed model / parameter / marked-set combination.
///
/// Raised while a dynamics instance is being constructed, or when an entry
/// point receives an argument outside its domain.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum ConfigurationError {
    /// A matrix that must be square is not.
    #[error("{name} must be square, got {rows}x{cols}")]
    NotSquare {
        /// Which matrix.
        name: &'static str,
        /// Number of rows.
        rows: usize,
        /// Number of columns.
        cols: usize,
    },

    /// A matrix or vector has the wrong order.
    #[error("{name} must have order {expected}, got {got}")]
    DimensionMismatch {
        /// Which matrix or vector.
        name: &'static str,
        /// Required order.
        expected: usize,
        /// Supplied order.
        got: usize,
    },

    /// A stochastic matrix has a negative entry.
    #[error("stochastic matrix has negative entry {value} at ({row}, {col})")]
    NegativeEntry {
        /// Row of the entry.
        row: usize,
        /// Column of the entry.
        col: usize,
        /// The entry.
        value: f64,
    },

    /// A stochastic matrix column does not sum to one.
    #[error("stochastic matrix column {column} sums to {sum}, expected 1")]
    NotStochastic {
        /// Offending column.
        column: usize,
        /// Its sum.
        sum: f64,
    },

    /// A Hamiltonian is not symmetric.
    #[error("Hamiltonian is not symmetric (max deviation above {tolerance:e})")]
    NotSymmetric {
        /// Tolerance that was exceeded.
        tolerance: f64,
    },

    /// A vertex without outgoing edges has no uniform-walk column.
    #[error("vertex {0} has no outgoing edges; the uniform random walk is undefined")]
    IsolatedVertex(usize),

    /// A search was requested over no vertices.
    #[error("marked set must not be empty")]
    EmptyMarkedSet,

    /// A vertex index is outside `0..vertex_count`.
    #[error("vertex {vertex} is out of range for a graph with {vertex_count} vertices")]
    VertexOutOfRange {
        /// Offending vertex.
        vertex: usize,
        /// Graph order.
        vertex_count: usize,
    },

    /// A vertex appears twice in a marked set.
    #[error("vertex {0} appears more than once in the marked set")]
    DuplicateVertex(usize),

    /// Penalty must be finite and non-negative.
    #[error("penalty must be finite and non-negative, got {0}")]
    InvalidPenalty(f64),

    /// Jumping rate must be finite and positive.
    #[error("jumping rate must be finite and positive, got {0}")]
    InvalidJumpingRate(f64),

    /// Maximisation bound must be positive.
    #[error("maximal runtime must be positive, got {0}")]
    NonPositiveRuntime(f64),

    /// Unknown continuous-time Hamiltonian mode.
    #[error("unknown Hamiltonian mode '{0}' (expected 'adjacency' or 'laplacian')")]
    UnknownHamiltonian(String),

    /// `execute` called without choosing a variant.
    #[error("execute requires choosing `measured` and/or `all` explicitly")]
    AmbiguousExecution,

    /// An engine configuration value is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Errors produced by the dynamics engine.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QwError {
    /// Invalid model / parameter / argument combination.
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    /// The request is well-formed but not defined for this model.
    #[error("unsupported operation: {operation} is not defined for {model}")]
    UnsupportedOperation {
        /// The rejected operation.
        operation: &'static str,
        /// The model it was requested on.
        model: &'static str,
    },

    /// A linear-algebra primitive failed.
    #[error("numerical failure: {0}")]
    Numerical(#[from] LinalgError),
}

impl QwError {
    /// Shorthand for [`QwError::UnsupportedOperation`].
    pub fn unsupported(operation: &'static str, model: &'static str) -> Self {
        QwError::UnsupportedOperation { operation, model }
    }

    /// True for [`QwError::Configuration`].
    pub fn is_configuration(&self) -> bool {
        matches!(self, QwError::Configuration(_))
    }

    /// True for [`QwError::UnsupportedOperation`].
    pub fn is_unsupported(&self) -> bool {
        matches!(self, QwError::UnsupportedOperation { .. })
    }
}

/// Result type for dynamics operations.
pub type QwResult<T> = Result<T, QwError>;
