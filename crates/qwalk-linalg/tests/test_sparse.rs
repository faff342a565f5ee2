//! Tests for the CSR matrix kernel.

use ndarray::{Array1, Array2};
use proptest::prelude::*;
use qwalk_linalg::CsrMatrix;

fn dense_matmul(a: &Array2<f64>, b: &Array2<f64>) -> Array2<f64> {
    a.dot(b)
}

fn small_matrix(rows: usize, cols: usize) -> impl Strategy<Value = Array2<f64>> {
    prop::collection::vec(
        prop_oneof![3 => Just(0.0), 2 => (-4i32..=4).prop_map(f64::from)],
        rows * cols,
    )
    .prop_map(move |v| Array2::from_shape_vec((rows, cols), v).unwrap())
}

// ---------------------------------------------------------------------------
// Construction
// ---------------------------------------------------------------------------

#[test]
fn identity_has_unit_diagonal() {
    let id = CsrMatrix::<f64>::identity(4);
    assert_eq!(id.nnz(), 4);
    assert_eq!(id.diagonal(), vec![1.0; 4]);
    assert_eq!(id.get(0, 1), 0.0);
}

#[test]
fn from_diagonal_skips_zeros() {
    let d = CsrMatrix::from_diagonal(&[1.0, 0.0, -1.0]);
    assert_eq!(d.nnz(), 2);
    assert_eq!(d.get(2, 2), -1.0);
}

#[test]
fn dense_round_trip_preserves_entries() {
    let dense = Array2::from_shape_vec((2, 3), vec![0.0, 1.5, 0.0, -2.0, 0.0, 3.0]).unwrap();
    let sparse = CsrMatrix::from_dense(&dense);
    assert_eq!(sparse.nnz(), 3);
    assert_eq!(sparse.to_dense(), dense);
}

#[test]
fn column_and_row_sums() {
    let m = CsrMatrix::from_triplets(2, 2, vec![(0, 0, 0.25), (1, 0, 0.75), (0, 1, 1.0)])
        .unwrap();
    assert_eq!(m.column_sums(), vec![1.0, 1.0]);
    assert_eq!(m.row_sums(), vec![1.25, 0.75]);
}

// ---------------------------------------------------------------------------
// Structured products
// ---------------------------------------------------------------------------

#[test]
fn kron_with_identity_places_blocks() {
    let a = CsrMatrix::from_triplets(2, 2, vec![(0, 1, 2.0), (1, 0, 3.0)]).unwrap();
    let id = CsrMatrix::<f64>::identity(2);

    // a ⊗ I: a's entries scale 2x2 identity blocks
    let left = a.kron(&id);
    assert_eq!(left.shape(), (4, 4));
    assert_eq!(left.get(0, 2), 2.0);
    assert_eq!(left.get(1, 3), 2.0);
    assert_eq!(left.get(2, 0), 3.0);

    // I ⊗ a: a repeated along the diagonal
    let right = id.kron(&a);
    assert_eq!(right.get(0, 1), 2.0);
    assert_eq!(right.get(2, 3), 2.0);
    assert_eq!(right.get(3, 2), 3.0);
}

#[test]
fn block_diag_offsets_blocks() {
    let a = CsrMatrix::from_triplets(1, 1, vec![(0, 0, 5.0)]).unwrap();
    let b = CsrMatrix::from_triplets(2, 2, vec![(0, 1, 1.0), (1, 1, 2.0)]).unwrap();
    let m = CsrMatrix::block_diag(&[a, b]);
    assert_eq!(m.shape(), (3, 3));
    assert_eq!(m.get(0, 0), 5.0);
    assert_eq!(m.get(1, 2), 1.0);
    assert_eq!(m.get(2, 2), 2.0);
    assert_eq!(m.nnz(), 3);
}

#[test]
fn mul_vec_real_operator_on_complex_vector() {
    use num_complex::Complex64;
    let m = CsrMatrix::from_triplets(2, 2, vec![(0, 1, 2.0), (1, 0, -1.0)]).unwrap();
    let v = Array1::from(vec![Complex64::new(1.0, 1.0), Complex64::new(0.0, 2.0)]);
    let w = m.mul_vec(&v).unwrap();
    assert_eq!(w[0], Complex64::new(0.0, 4.0));
    assert_eq!(w[1], Complex64::new(-1.0, -1.0));
}

#[test]
fn mul_vec_dimension_mismatch() {
    let m = CsrMatrix::<f64>::identity(3);
    assert!(m.mul_vec(&Array1::<f64>::zeros(2)).is_err());
}

#[test]
fn norm_one_and_symmetry() {
    let m = CsrMatrix::from_triplets(2, 2, vec![(0, 1, -3.0), (1, 0, -3.0), (1, 1, 1.0)])
        .unwrap();
    assert_eq!(m.norm_one(), 4.0);
    assert!(m.is_symmetric(0.0));
    let skewed = CsrMatrix::from_triplets(2, 2, vec![(0, 1, 1.0)]).unwrap();
    assert!(!skewed.is_symmetric(1e-12));
}

// ---------------------------------------------------------------------------
// Properties against dense arithmetic
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn matmul_matches_dense(a in small_matrix(4, 3), b in small_matrix(3, 5)) {
        let product = CsrMatrix::from_dense(&a)
            .matmul(&CsrMatrix::from_dense(&b))
            .unwrap();
        prop_assert_eq!(product.to_dense(), dense_matmul(&a, &b));
    }

    #[test]
    fn transpose_matches_dense(a in small_matrix(3, 4)) {
        let t = CsrMatrix::from_dense(&a).transpose();
        prop_assert_eq!(t.to_dense(), a.t().to_owned());
    }

    #[test]
    fn add_then_sub_restores(a in small_matrix(3, 3), b in small_matrix(3, 3)) {
        let sa = CsrMatrix::from_dense(&a);
        let sb = CsrMatrix::from_dense(&b);
        let restored = sa.add(&sb).unwrap().sub(&sb).unwrap();
        prop_assert_eq!(restored, sa);
    }

    #[test]
    fn mul_vec_matches_dense(a in small_matrix(4, 4), x in prop::collection::vec(-3i32..=3, 4)) {
        let x = Array1::from(x.into_iter().map(f64::from).collect::<Vec<_>>());
        let y = CsrMatrix::from_dense(&a).mul_vec(&x).unwrap();
        prop_assert_eq!(y, a.dot(&x));
    }
}
