//! Krylov-subspace action of the matrix exponential.
//!
//! For a real symmetric `H`, `exp(i·t·H)·v` is approximated in the Lanczos
//! basis `V_m` of `K_m(H, v)`:
//!
//!   exp(i·t·H)·v ≈ ‖v‖ · V_m · exp(i·t·T_m) · e₁
//!
//! where `T_m` is the tridiagonal projection of `H`. Only `m x m` dense
//! exponentials are formed. Long times are split into sub-steps with
//! `‖H‖₁·|Δt| ≤ max_step_norm` so a fixed `m` stays accurate.

use nalgebra::DMatrix;
use ndarray::Array1;
use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::dense::exp_checked;
use crate::error::{LinalgError, LinalgResult};
use crate::sparse::CsrMatrix;

/// Limits for [`expm_multiply`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KrylovConfig {
    /// Krylov subspace dimension `m`.
    pub dimension: usize,
    /// Upper bound on `‖H‖₁·|Δt|` per sub-step.
    pub max_step_norm: f64,
    /// Residual norm below which the Lanczos recurrence stops early.
    pub breakdown_tolerance: f64,
}

impl Default for KrylovConfig {
    fn default() -> Self {
        Self {
            dimension: 30,
            max_step_norm: 8.0,
            breakdown_tolerance: 1e-12,
        }
    }
}

/// Compute `exp(i·t·h)·v` for a real symmetric sparse `h` without forming
/// the exponential.
pub fn expm_multiply(
    h: &CsrMatrix<f64>,
    v: &Array1<Complex64>,
    t: f64,
    config: &KrylovConfig,
) -> LinalgResult<Array1<Complex64>> {
    h.ensure_square()?;
    if v.len() != h.cols() {
        return Err(LinalgError::DimensionMismatch {
            operation: "expm_multiply",
            expected: h.cols(),
            got: v.len(),
        });
    }
    if !t.is_finite() {
        return Err(LinalgError::NonFinite {
            operation: "expm_multiply",
        });
    }
    if t == 0.0 || h.nnz() == 0 {
        return Ok(v.clone());
    }

    let norm = h.norm_one();
    let substeps = ((norm * t.abs()) / config.max_step_norm).ceil().max(1.0) as usize;
    let dt = t / substeps as f64;
    let dimension = config.dimension.clamp(1, h.rows());
    debug!(
        n = h.rows(),
        nnz = h.nnz(),
        dimension,
        substeps,
        "krylov exponential action"
    );

    let mut w = v.clone();
    for _ in 0..substeps {
        w = lanczos_step(h, &w, dt, dimension, config.breakdown_tolerance)?;
    }

    if w.iter().any(|z| !z.re.is_finite() || !z.im.is_finite()) {
        return Err(LinalgError::NonFinite {
            operation: "expm_multiply",
        });
    }
    Ok(w)
}

/// Hermitian inner product `⟨a, b⟩ = Σ conj(a_i)·b_i`.
pub fn inner(a: &Array1<Complex64>, b: &Array1<Complex64>) -> Complex64 {
    a.iter().zip(b.iter()).map(|(x, y)| x.conj() * y).sum()
}

fn norm(a: &Array1<Complex64>) -> f64 {
    a.iter().map(Complex64::norm_sqr).sum::<f64>().sqrt()
}

fn lanczos_step(
    h: &CsrMatrix<f64>,
    v: &Array1<Complex64>,
    dt: f64,
    dimension: usize,
    breakdown_tolerance: f64,
) -> LinalgResult<Array1<Complex64>> {
    let beta0 = norm(v);
    if beta0 == 0.0 {
        return Ok(v.clone());
    }

    let mut basis: Vec<Array1<Complex64>> = Vec::with_capacity(dimension);
    basis.push(v.mapv(|z| z / beta0));
    let mut alphas: Vec<f64> = Vec::with_capacity(dimension);
    let mut betas: Vec<f64> = Vec::with_capacity(dimension);

    for j in 0..dimension {
        let mut u = h.mul_vec(&basis[j])?;
        let alpha = inner(&basis[j], &u).re;
        alphas.push(alpha);
        u.scaled_add(Complex64::new(-alpha, 0.0), &basis[j]);
        if j > 0 {
            u.scaled_add(Complex64::new(-betas[j - 1], 0.0), &basis[j - 1]);
        }
        // Full reorthogonalisation; m is small.
        for q in &basis {
            let overlap = inner(q, &u);
            u.scaled_add(-overlap, q);
        }

        let beta = norm(&u);
        if beta <= breakdown_tolerance * beta0.max(1.0) {
            trace!(step = j, "lanczos happy breakdown");
            break;
        }
        if j + 1 < dimension {
            betas.push(beta);
            basis.push(u.mapv(|z| z / beta));
        }
    }

    let m = alphas.len();
    let t_m = DMatrix::from_fn(m, m, |i, j| {
        if i == j {
            alphas[i]
        } else if i + 1 == j {
            betas[i]
        } else if j + 1 == i {
            betas[j]
        } else {
            0.0
        }
    });
    let propagator = exp_checked(t_m.map(|x| Complex64::new(0.0, x * dt)), "expm_multiply")?;

    let mut result = Array1::<Complex64>::zeros(v.len());
    for (i, q) in basis.iter().take(m).enumerate() {
        result.scaled_add(propagator[(i, 0)] * beta0, q);
    }
    Ok(result)
}
