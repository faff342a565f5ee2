//! `qwalk-linalg`: linear-algebra kernels for the qwalk dynamics engine.
//!
//! - [`CsrMatrix`]: compressed sparse row storage with products, Kronecker
//!   products and block-diagonal composition
//! - [`expm`]: dense matrix exponential, computed by `nalgebra`
//! - [`spectral_radius`]: largest eigenvalue magnitude by power iteration
//! - [`expm_multiply`]: Lanczos approximation of `exp(i·t·H)·v`
//!
//! Every iterative routine takes its limits from a config struct and reports
//! non-convergence as [`LinalgError::NoConvergence`]; nothing retries.
//!
//! # Example
//!
//! ```rust
//! use ndarray::Array1;
//! use num_complex::Complex64;
//! use qwalk_linalg::{CsrMatrix, KrylovConfig, expm_multiply};
//!
//! // Two coupled sites: H = X
//! let h = CsrMatrix::from_triplets(2, 2, vec![(0, 1, 1.0), (1, 0, 1.0)]).unwrap();
//! let v = Array1::from(vec![Complex64::new(1.0, 0.0), Complex64::new(0.0, 0.0)]);
//! let w = expm_multiply(&h, &v, std::f64::consts::FRAC_PI_2, &KrylovConfig::default()).unwrap();
//! // exp(iπ/2·X)|0⟩ = i|1⟩
//! assert!((w[1] - Complex64::new(0.0, 1.0)).norm() < 1e-10);
//! ```

pub mod dense;
pub mod eigen;
pub mod error;
pub mod krylov;
pub mod sparse;

pub use dense::{expm, unitary_propagator};
pub use eigen::{EigenConfig, spectral_radius};
pub use error::{LinalgError, LinalgResult};
pub use krylov::{KrylovConfig, expm_multiply, inner};
pub use sparse::{CsrMatrix, Scalar};
