//! Largest-magnitude eigenvalue estimation.

use ndarray::Array1;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::error::{LinalgError, LinalgResult};
use crate::sparse::CsrMatrix;

/// Iteration limits for [`spectral_radius`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EigenConfig {
    /// Maximum number of power iterations.
    pub max_iterations: usize,
    /// Relative change of the estimate that counts as converged.
    pub tolerance: f64,
}

impl Default for EigenConfig {
    fn default() -> Self {
        Self {
            max_iterations: 10_000,
            tolerance: 1e-10,
        }
    }
}

/// Spectral radius (largest eigenvalue magnitude) of a non-negative square
/// matrix, by power iteration from the all-ones vector.
///
/// The estimate is `‖A·x‖` for the normalised iterate `x`, which converges
/// even when `ρ` and `-ρ` are both eigenvalues (bipartite graphs), where the
/// iterate itself oscillates. Returns `0.0` for the zero matrix.
pub fn spectral_radius(a: &CsrMatrix<f64>, config: &EigenConfig) -> LinalgResult<f64> {
    a.ensure_square()?;
    let n = a.rows();
    if n == 0 || a.nnz() == 0 {
        return Ok(0.0);
    }

    let mut x = Array1::from_elem(n, 1.0 / (n as f64).sqrt());
    let mut estimate = 0.0f64;
    let mut residual = f64::INFINITY;
    for iteration in 1..=config.max_iterations {
        let y = a.mul_vec(&x)?;
        let norm = y.dot(&y).sqrt();
        if !norm.is_finite() {
            return Err(LinalgError::NonFinite {
                operation: "spectral_radius",
            });
        }
        if norm == 0.0 {
            return Ok(0.0);
        }
        residual = (norm - estimate).abs();
        estimate = norm;
        x = y / norm;
        if residual <= config.tolerance * estimate {
            trace!(iteration, estimate, "power iteration converged");
            return Ok(estimate);
        }
    }

    Err(LinalgError::NoConvergence {
        method: "power iteration",
        iterations: config.max_iterations,
        residual,
    })
}
