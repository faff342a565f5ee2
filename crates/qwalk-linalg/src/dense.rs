//! Dense matrix exponential.
//!
//! The exponential itself comes from `nalgebra` (Padé approximation with
//! scaling and squaring); this module converts at the `ndarray` boundary
//! and rejects inputs the solver cannot handle.

use nalgebra::DMatrix;
use ndarray::Array2;
use num_complex::Complex64;

use crate::error::{LinalgError, LinalgResult};

fn is_finite(z: &Complex64) -> bool {
    z.re.is_finite() && z.im.is_finite()
}

/// Copy into an `nalgebra` matrix.
pub(crate) fn to_nalgebra(a: &Array2<Complex64>) -> DMatrix<Complex64> {
    let (rows, cols) = a.dim();
    DMatrix::from_fn(rows, cols, |i, j| a[[i, j]])
}

/// Copy out of an `nalgebra` matrix.
pub(crate) fn from_nalgebra(m: &DMatrix<Complex64>) -> Array2<Complex64> {
    Array2::from_shape_fn(m.shape(), |(i, j)| m[(i, j)])
}

/// `exp(m)` of a square `nalgebra` matrix with finite entries.
pub(crate) fn exp_checked(
    m: DMatrix<Complex64>,
    operation: &'static str,
) -> LinalgResult<DMatrix<Complex64>> {
    let (rows, cols) = m.shape();
    if rows != cols {
        return Err(LinalgError::NotSquare { rows, cols });
    }
    if rows == 0 {
        return Ok(m);
    }
    if !m.iter().all(is_finite) {
        return Err(LinalgError::NonFinite { operation });
    }
    let e = m.exp();
    if !e.iter().all(is_finite) {
        return Err(LinalgError::NonFinite { operation });
    }
    Ok(e)
}

/// Matrix exponential `exp(a)` of a square complex matrix.
pub fn expm(a: &Array2<Complex64>) -> LinalgResult<Array2<Complex64>> {
    let (rows, cols) = a.dim();
    if rows != cols {
        return Err(LinalgError::NotSquare { rows, cols });
    }
    let e = exp_checked(to_nalgebra(a), "expm")?;
    Ok(from_nalgebra(&e))
}

/// The unitary propagator `exp(i·t·h)` of a real symmetric matrix `h`.
pub fn unitary_propagator(h: &Array2<f64>, t: f64) -> LinalgResult<Array2<Complex64>> {
    let (rows, cols) = h.dim();
    if rows != cols {
        return Err(LinalgError::NotSquare { rows, cols });
    }
    let generator = DMatrix::from_fn(rows, cols, |i, j| Complex64::new(0.0, h[[i, j]] * t));
    let u = exp_checked(generator, "unitary_propagator")?;
    Ok(from_nalgebra(&u))
}
