//! Compressed sparse row matrices.
//!
//! [`CsrMatrix`] is the storage used for every walk operator in qwalk:
//! Szegedy reflections, oracles, stochastic matrices and sparse Hamiltonians.
//! Rows keep their column indices sorted and explicit zeros are never stored,
//! so two matrices built along different paths compare equal entry by entry.

use std::fmt::Debug;
use std::ops::{Add, Mul, Neg, Sub};

use ndarray::{Array1, Array2};
use num_traits::{One, Zero};
use serde::{Deserialize, Serialize};

use crate::error::{LinalgError, LinalgResult};

/// Element type of a [`CsrMatrix`].
pub trait Scalar:
    Copy
    + Debug
    + PartialEq
    + Zero
    + One
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Neg<Output = Self>
    + Send
    + Sync
    + 'static
{
}

impl<T> Scalar for T where
    T: Copy
        + Debug
        + PartialEq
        + Zero
        + One
        + Add<Output = T>
        + Sub<Output = T>
        + Mul<Output = T>
        + Neg<Output = T>
        + Send
        + Sync
        + 'static
{
}

/// A sparse matrix in compressed sparse row layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CsrMatrix<T> {
    rows: usize,
    cols: usize,
    /// `indptr[r]..indptr[r + 1]` addresses row `r` in `indices`/`data`.
    indptr: Vec<usize>,
    indices: Vec<usize>,
    data: Vec<T>,
}

impl<T: Scalar> CsrMatrix<T> {
    /// An all-zero matrix.
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            indptr: vec![0; rows + 1],
            indices: Vec::new(),
            data: Vec::new(),
        }
    }

    /// The `n x n` identity.
    pub fn identity(n: usize) -> Self {
        Self::from_diagonal(&vec![T::one(); n])
    }

    /// A square matrix with `diagonal` on its main diagonal.
    pub fn from_diagonal(diagonal: &[T]) -> Self {
        let n = diagonal.len();
        let mut indptr = Vec::with_capacity(n + 1);
        let mut indices = Vec::with_capacity(n);
        let mut data = Vec::with_capacity(n);
        indptr.push(0);
        for (i, &value) in diagonal.iter().enumerate() {
            if value != T::zero() {
                indices.push(i);
                data.push(value);
            }
            indptr.push(indices.len());
        }
        Self {
            rows: n,
            cols: n,
            indptr,
            indices,
            data,
        }
    }

    /// Build a matrix from `(row, col, value)` triplets.
    ///
    /// Duplicate coordinates are summed; entries that end up zero are dropped.
    pub fn from_triplets<I>(rows: usize, cols: usize, triplets: I) -> LinalgResult<Self>
    where
        I: IntoIterator<Item = (usize, usize, T)>,
    {
        let mut entries = Vec::new();
        for (row, col, value) in triplets {
            if row >= rows || col >= cols {
                return Err(LinalgError::IndexOutOfBounds {
                    row,
                    col,
                    rows,
                    cols,
                });
            }
            entries.push((row, col, value));
        }
        entries.sort_by_key(|&(row, col, _)| (row, col));

        let mut indptr = vec![0usize; rows + 1];
        let mut indices = Vec::with_capacity(entries.len());
        let mut data = Vec::with_capacity(entries.len());
        let mut iter = entries.into_iter().peekable();
        while let Some((row, col, mut value)) = iter.next() {
            while let Some(&(next_row, next_col, next_value)) = iter.peek() {
                if next_row != row || next_col != col {
                    break;
                }
                value = value + next_value;
                iter.next();
            }
            if value != T::zero() {
                indices.push(col);
                data.push(value);
                indptr[row + 1] += 1;
            }
        }
        for r in 0..rows {
            indptr[r + 1] += indptr[r];
        }

        Ok(Self {
            rows,
            cols,
            indptr,
            indices,
            data,
        })
    }

    /// Convert a dense matrix, skipping zero entries.
    pub fn from_dense(dense: &Array2<T>) -> Self {
        let (rows, cols) = dense.dim();
        let mut indptr = Vec::with_capacity(rows + 1);
        let mut indices = Vec::new();
        let mut data = Vec::new();
        indptr.push(0);
        for r in 0..rows {
            for c in 0..cols {
                let value = dense[[r, c]];
                if value != T::zero() {
                    indices.push(c);
                    data.push(value);
                }
            }
            indptr.push(indices.len());
        }
        Self {
            rows,
            cols,
            indptr,
            indices,
            data,
        }
    }

    /// Number of rows.
    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// `(rows, cols)`.
    #[inline]
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Number of stored (non-zero) entries.
    #[inline]
    pub fn nnz(&self) -> usize {
        self.data.len()
    }

    /// True if the matrix has as many rows as columns.
    #[inline]
    pub fn is_square(&self) -> bool {
        self.rows == self.cols
    }

    /// Fail with [`LinalgError::NotSquare`] unless the matrix is square.
    pub fn ensure_square(&self) -> LinalgResult<()> {
        if self.is_square() {
            Ok(())
        } else {
            Err(LinalgError::NotSquare {
                rows: self.rows,
                cols: self.cols,
            })
        }
    }

    /// Entry at `(row, col)`; zero when not stored or out of range.
    pub fn get(&self, row: usize, col: usize) -> T {
        if row >= self.rows {
            return T::zero();
        }
        let span = self.indptr[row]..self.indptr[row + 1];
        match self.indices[span.clone()].binary_search(&col) {
            Ok(offset) => self.data[span.start + offset],
            Err(_) => T::zero(),
        }
    }

    /// Stored entries of one row as `(col, value)`, in column order.
    pub fn row(&self, row: usize) -> impl Iterator<Item = (usize, T)> + '_ {
        let span = self.indptr[row]..self.indptr[row + 1];
        self.indices[span.clone()]
            .iter()
            .copied()
            .zip(self.data[span].iter().copied())
    }

    /// All stored entries as `(row, col, value)`, in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, T)> + '_ {
        (0..self.rows).flat_map(move |r| self.row(r).map(move |(c, v)| (r, c, v)))
    }

    /// Main diagonal (length `min(rows, cols)`).
    pub fn diagonal(&self) -> Vec<T> {
        (0..self.rows.min(self.cols)).map(|i| self.get(i, i)).collect()
    }

    /// Sum of each column.
    pub fn column_sums(&self) -> Vec<T> {
        let mut sums = vec![T::zero(); self.cols];
        for (&c, &v) in self.indices.iter().zip(&self.data) {
            sums[c] = sums[c] + v;
        }
        sums
    }

    /// Sum of each row.
    pub fn row_sums(&self) -> Vec<T> {
        (0..self.rows)
            .map(|r| self.row(r).fold(T::zero(), |acc, (_, v)| acc + v))
            .collect()
    }

    /// Dense copy.
    pub fn to_dense(&self) -> Array2<T> {
        let mut dense = Array2::from_elem((self.rows, self.cols), T::zero());
        for (r, c, v) in self.iter() {
            dense[[r, c]] = v;
        }
        dense
    }

    /// Apply `f` to every stored entry. Entries mapped to zero are dropped.
    pub fn map<U: Scalar>(&self, f: impl Fn(T) -> U) -> CsrMatrix<U> {
        let mut indptr = Vec::with_capacity(self.rows + 1);
        let mut indices = Vec::with_capacity(self.nnz());
        let mut data = Vec::with_capacity(self.nnz());
        indptr.push(0);
        for r in 0..self.rows {
            for (c, v) in self.row(r) {
                let mapped = f(v);
                if mapped != U::zero() {
                    indices.push(c);
                    data.push(mapped);
                }
            }
            indptr.push(indices.len());
        }
        CsrMatrix {
            rows: self.rows,
            cols: self.cols,
            indptr,
            indices,
            data,
        }
    }

    /// Multiply every entry by `factor`.
    pub fn scale(&self, factor: T) -> Self {
        self.map(|v| v * factor)
    }

    /// Transpose (no conjugation).
    pub fn transpose(&self) -> Self {
        let nnz = self.nnz();
        let mut indptr = vec![0usize; self.cols + 1];
        for &c in &self.indices {
            indptr[c + 1] += 1;
        }
        for c in 0..self.cols {
            indptr[c + 1] += indptr[c];
        }
        let mut next = indptr.clone();
        let mut indices = vec![0usize; nnz];
        let mut data = vec![T::zero(); nnz];
        for r in 0..self.rows {
            for (c, v) in self.row(r) {
                let dst = next[c];
                indices[dst] = r;
                data[dst] = v;
                next[c] += 1;
            }
        }
        Self {
            rows: self.cols,
            cols: self.rows,
            indptr,
            indices,
            data,
        }
    }

    /// Matrix–vector product `self · x`.
    ///
    /// The vector element type may differ from the matrix element type, so a
    /// real operator can act on a complex state.
    pub fn mul_vec<V>(&self, x: &Array1<V>) -> LinalgResult<Array1<V>>
    where
        V: Copy + Zero + Mul<T, Output = V>,
    {
        if x.len() != self.cols {
            return Err(LinalgError::DimensionMismatch {
                operation: "mul_vec",
                expected: self.cols,
                got: x.len(),
            });
        }
        Ok(Array1::from_shape_fn(self.rows, |r| {
            let mut acc = V::zero();
            for k in self.indptr[r]..self.indptr[r + 1] {
                acc = acc + x[self.indices[k]] * self.data[k];
            }
            acc
        }))
    }

    /// Sparse matrix product `self · other` (Gustavson's row-by-row scheme).
    pub fn matmul(&self, other: &Self) -> LinalgResult<Self> {
        if self.cols != other.rows {
            return Err(LinalgError::DimensionMismatch {
                operation: "matmul",
                expected: self.cols,
                got: other.rows,
            });
        }
        let mut indptr = Vec::with_capacity(self.rows + 1);
        let mut indices = Vec::new();
        let mut data = Vec::new();
        let mut acc = vec![T::zero(); other.cols];
        let mut marker = vec![usize::MAX; other.cols];
        let mut touched = Vec::new();
        indptr.push(0);

        for r in 0..self.rows {
            touched.clear();
            for (k, a) in self.row(r) {
                for (c, b) in other.row(k) {
                    if marker[c] != r {
                        marker[c] = r;
                        acc[c] = T::zero();
                        touched.push(c);
                    }
                    acc[c] = acc[c] + a * b;
                }
            }
            touched.sort_unstable();
            for &c in &touched {
                if acc[c] != T::zero() {
                    indices.push(c);
                    data.push(acc[c]);
                }
            }
            indptr.push(indices.len());
        }

        Ok(Self {
            rows: self.rows,
            cols: other.cols,
            indptr,
            indices,
            data,
        })
    }

    /// Kronecker product `self ⊗ other`.
    pub fn kron(&self, other: &Self) -> Self {
        let rows = self.rows * other.rows;
        let cols = self.cols * other.cols;
        let mut indptr = Vec::with_capacity(rows + 1);
        let mut indices = Vec::with_capacity(self.nnz() * other.nnz());
        let mut data = Vec::with_capacity(self.nnz() * other.nnz());
        indptr.push(0);
        for i in 0..self.rows {
            for k in 0..other.rows {
                for (j, a) in self.row(i) {
                    for (l, b) in other.row(k) {
                        let value = a * b;
                        if value != T::zero() {
                            indices.push(j * other.cols + l);
                            data.push(value);
                        }
                    }
                }
                indptr.push(indices.len());
            }
        }
        Self {
            rows,
            cols,
            indptr,
            indices,
            data,
        }
    }

    /// Block-diagonal direct sum of `blocks`.
    pub fn block_diag(blocks: &[Self]) -> Self {
        let rows = blocks.iter().map(|b| b.rows).sum();
        let cols = blocks.iter().map(|b| b.cols).sum();
        let nnz = blocks.iter().map(Self::nnz).sum();
        let mut indptr = Vec::with_capacity(rows + 1);
        let mut indices = Vec::with_capacity(nnz);
        let mut data = Vec::with_capacity(nnz);
        indptr.push(0);
        let mut col_offset = 0;
        for block in blocks {
            for r in 0..block.rows {
                for (c, v) in block.row(r) {
                    indices.push(col_offset + c);
                    data.push(v);
                }
                indptr.push(indices.len());
            }
            col_offset += block.cols;
        }
        Self {
            rows,
            cols,
            indptr,
            indices,
            data,
        }
    }

    /// Element-wise sum.
    pub fn add(&self, other: &Self) -> LinalgResult<Self> {
        self.merge(other, "add", |a, b| a + b)
    }

    /// Element-wise difference.
    pub fn sub(&self, other: &Self) -> LinalgResult<Self> {
        self.merge(other, "sub", |a, b| a - b)
    }

    fn merge(
        &self,
        other: &Self,
        operation: &'static str,
        op: impl Fn(T, T) -> T,
    ) -> LinalgResult<Self> {
        if self.shape() != other.shape() {
            let expected = self.rows * self.cols;
            return Err(LinalgError::DimensionMismatch {
                operation,
                expected,
                got: other.rows * other.cols,
            });
        }
        let mut indptr = Vec::with_capacity(self.rows + 1);
        let mut indices = Vec::with_capacity(self.nnz() + other.nnz());
        let mut data = Vec::with_capacity(self.nnz() + other.nnz());
        indptr.push(0);
        for r in 0..self.rows {
            let mut lhs = self.row(r).peekable();
            let mut rhs = other.row(r).peekable();
            loop {
                let (col, value) = match (lhs.peek().copied(), rhs.peek().copied()) {
                    (Some((ca, a)), Some((cb, b))) if ca == cb => {
                        lhs.next();
                        rhs.next();
                        (ca, op(a, b))
                    }
                    (Some((ca, a)), Some((cb, _))) if ca < cb => {
                        lhs.next();
                        (ca, op(a, T::zero()))
                    }
                    (Some(_), Some((cb, b))) => {
                        rhs.next();
                        (cb, op(T::zero(), b))
                    }
                    (Some((ca, a)), None) => {
                        lhs.next();
                        (ca, op(a, T::zero()))
                    }
                    (None, Some((cb, b))) => {
                        rhs.next();
                        (cb, op(T::zero(), b))
                    }
                    (None, None) => break,
                };
                if value != T::zero() {
                    indices.push(col);
                    data.push(value);
                }
            }
            indptr.push(indices.len());
        }
        Ok(Self {
            rows: self.rows,
            cols: self.cols,
            indptr,
            indices,
            data,
        })
    }
}

impl CsrMatrix<f64> {
    /// Induced 1-norm: the largest absolute column sum.
    pub fn norm_one(&self) -> f64 {
        let mut sums = vec![0.0f64; self.cols];
        for (&c, &v) in self.indices.iter().zip(&self.data) {
            sums[c] += v.abs();
        }
        sums.into_iter().fold(0.0, f64::max)
    }

    /// Largest absolute entry-wise difference to `other`.
    pub fn max_abs_diff(&self, other: &Self) -> LinalgResult<f64> {
        let diff = self.sub(other)?;
        Ok(diff.data.iter().fold(0.0f64, |m, v| m.max(v.abs())))
    }

    /// True if `|a_ij - a_ji| <= tolerance` for every entry.
    pub fn is_symmetric(&self, tolerance: f64) -> bool {
        self.is_square()
            && self
                .max_abs_diff(&self.transpose())
                .is_ok_and(|diff| diff <= tolerance)
    }
}
