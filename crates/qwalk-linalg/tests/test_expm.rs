//! Tests for the dense exponential, the eigenvalue estimator and the Krylov
//! exponential action.

use std::f64::consts::PI;

use ndarray::{Array1, Array2};
use num_complex::Complex64;
use qwalk_linalg::{
    CsrMatrix, EigenConfig, KrylovConfig, LinalgError, expm, expm_multiply, spectral_radius,
    unitary_propagator,
};

fn c(re: f64, im: f64) -> Complex64 {
    Complex64::new(re, im)
}

fn cycle_adjacency(n: usize) -> CsrMatrix<f64> {
    let triplets = (0..n).flat_map(|i| {
        let j = (i + 1) % n;
        [(i, j, 1.0), (j, i, 1.0)]
    });
    CsrMatrix::from_triplets(n, n, triplets).unwrap()
}

fn complete_adjacency(n: usize) -> CsrMatrix<f64> {
    let triplets = (0..n).flat_map(|i| (0..n).filter(move |&j| j != i).map(move |j| (i, j, 1.0)));
    CsrMatrix::from_triplets(n, n, triplets).unwrap()
}

fn max_diff(a: &Array1<Complex64>, b: &Array1<Complex64>) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y).norm())
        .fold(0.0, f64::max)
}

// ---------------------------------------------------------------------------
// Dense exponential
// ---------------------------------------------------------------------------

#[test]
fn expm_of_zero_is_identity() {
    let z = Array2::<Complex64>::zeros((3, 3));
    let e = expm(&z).unwrap();
    assert_eq!(e, Array2::<Complex64>::eye(3));
}

#[test]
fn expm_of_diagonal() {
    let mut a = Array2::<Complex64>::zeros((2, 2));
    a[[0, 0]] = c(1.0, 0.0);
    a[[1, 1]] = c(-2.0, 0.0);
    let e = expm(&a).unwrap();
    assert!((e[[0, 0]] - c(1f64.exp(), 0.0)).norm() < 1e-12);
    assert!((e[[1, 1]] - c((-2f64).exp(), 0.0)).norm() < 1e-12);
    assert!(e[[0, 1]].norm() < 1e-15);
}

#[test]
fn expm_large_norm_rotation() {
    // exp(θ·[[0, -1], [1, 0]]) is a rotation by θ; θ = 20 forces squaring.
    let theta = 20.0;
    let mut a = Array2::<Complex64>::zeros((2, 2));
    a[[0, 1]] = c(-theta, 0.0);
    a[[1, 0]] = c(theta, 0.0);
    let e = expm(&a).unwrap();
    assert!((e[[0, 0]] - c(theta.cos(), 0.0)).norm() < 1e-9);
    assert!((e[[1, 0]] - c(theta.sin(), 0.0)).norm() < 1e-9);
}

#[test]
fn unitary_propagator_of_pauli_x() {
    // exp(i·t·X) = cos t · I + i sin t · X
    let x = Array2::from_shape_vec((2, 2), vec![0.0, 1.0, 1.0, 0.0]).unwrap();
    let t = 0.7;
    let u = unitary_propagator(&x, t).unwrap();
    assert!((u[[0, 0]] - c(t.cos(), 0.0)).norm() < 1e-12);
    assert!((u[[0, 1]] - c(0.0, t.sin())).norm() < 1e-12);
}

#[test]
fn unitary_propagator_is_unitary() {
    let h = cycle_adjacency(7).to_dense();
    let u = unitary_propagator(&h, 2.3).unwrap();
    let product = u.t().mapv(|z| z.conj()).dot(&u);
    let identity = Array2::<Complex64>::eye(7);
    let diff = (&product - &identity)
        .iter()
        .fold(0.0f64, |m, z| m.max(z.norm()));
    assert!(diff < 1e-12);
}

#[test]
fn expm_rejects_non_finite_entries() {
    let mut a = Array2::<Complex64>::zeros((2, 2));
    a[[1, 1]] = c(f64::INFINITY, 0.0);
    assert!(matches!(expm(&a), Err(LinalgError::NonFinite { .. })));
}

// ---------------------------------------------------------------------------
// Spectral radius
// ---------------------------------------------------------------------------

#[test]
fn spectral_radius_complete_graph() {
    // K_n has largest eigenvalue n - 1.
    let rho = spectral_radius(&complete_adjacency(6), &EigenConfig::default()).unwrap();
    assert!((rho - 5.0).abs() < 1e-8);
}

#[test]
fn spectral_radius_bipartite_cycle() {
    // C_6 is bipartite: eigenvalues ±2 both extreme.
    let rho = spectral_radius(&cycle_adjacency(6), &EigenConfig::default()).unwrap();
    assert!((rho - 2.0).abs() < 1e-8);
}

#[test]
fn spectral_radius_rejects_non_square() {
    let a = CsrMatrix::<f64>::zeros(2, 3);
    assert!(matches!(
        spectral_radius(&a, &EigenConfig::default()),
        Err(LinalgError::NotSquare { .. })
    ));
}

// ---------------------------------------------------------------------------
// Krylov exponential action
// ---------------------------------------------------------------------------

#[test]
fn krylov_matches_dense_on_cycle() {
    let h = cycle_adjacency(12).scale(0.5);
    let mut v = Array1::<Complex64>::zeros(12);
    v[0] = c(1.0, 0.0);
    let t = 3.3;

    let dense = unitary_propagator(&h.to_dense(), t).unwrap().dot(&v);
    let krylov = expm_multiply(&h, &v, t, &KrylovConfig::default()).unwrap();
    assert!(max_diff(&dense, &krylov) < 1e-9);
}

#[test]
fn krylov_long_time_uses_substeps() {
    let h = complete_adjacency(9);
    let v = Array1::from_elem(9, c(1.0 / 3.0, 0.0));
    let t = 40.0;
    let config = KrylovConfig {
        dimension: 6,
        ..KrylovConfig::default()
    };

    let dense = unitary_propagator(&h.to_dense(), t).unwrap().dot(&v);
    let krylov = expm_multiply(&h, &v, t, &config).unwrap();
    assert!(max_diff(&dense, &krylov) < 1e-8);
}

#[test]
fn krylov_preserves_norm() {
    let h = cycle_adjacency(20);
    let mut v = Array1::<Complex64>::zeros(20);
    v[3] = c(0.6, 0.0);
    v[7] = c(0.0, 0.8);
    let w = expm_multiply(&h, &v, 5.0, &KrylovConfig::default()).unwrap();
    let norm: f64 = w.iter().map(|z| z.norm_sqr()).sum();
    assert!((norm - 1.0).abs() < 1e-10);
}

#[test]
fn krylov_zero_time_is_identity() {
    let h = cycle_adjacency(5);
    let v = Array1::from_elem(5, c(0.2, 0.1));
    let w = expm_multiply(&h, &v, 0.0, &KrylovConfig::default()).unwrap();
    assert_eq!(w, v);
}

#[test]
fn krylov_dimension_mismatch() {
    let h = cycle_adjacency(5);
    let v = Array1::from_elem(4, c(0.5, 0.0));
    assert!(matches!(
        expm_multiply(&h, &v, 1.0, &KrylovConfig::default()),
        Err(LinalgError::DimensionMismatch { .. })
    ));
}

#[test]
fn krylov_half_period_on_single_edge() {
    // exp(i·π·X)|0⟩ = -|0⟩
    let h = CsrMatrix::from_triplets(2, 2, vec![(0, 1, 1.0), (1, 0, 1.0)]).unwrap();
    let v = Array1::from(vec![c(1.0, 0.0), c(0.0, 0.0)]);
    let w = expm_multiply(&h, &v, PI, &KrylovConfig::default()).unwrap();
    assert!((w[0] - c(-1.0, 0.0)).norm() < 1e-10);
    assert!(w[1].norm() < 1e-10);
}
