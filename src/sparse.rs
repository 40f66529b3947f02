//! Square sparse matrix in compressed row storage with mutable structure.
//!
//! Entries inside a row are kept in insertion order, not sorted by column.
//! A stored value is never exactly zero: writing zero removes the entry.

use std::{
  fmt,
  ops::{Add, AddAssign, Div, Mul, MulAssign, Sub, SubAssign},
};

use itertools::Itertools;

use crate::vector::Vector;

#[derive(Debug, Clone)]
pub struct SparseMatrix {
  size: usize,
  /// Half-open range of every row into `col_ind` and `values`.
  row_ptr: Vec<usize>,
  col_ind: Vec<usize>,
  values: Vec<f64>,
}

impl Default for SparseMatrix {
  fn default() -> Self {
    Self::new(0)
  }
}

// constructors
impl SparseMatrix {
  pub fn new(size: usize) -> Self {
    Self {
      size,
      row_ptr: vec![0; size + 1],
      col_ind: Vec::new(),
      values: Vec::new(),
    }
  }

  /// `value` on the diagonal, zero elsewhere.
  pub fn from_diagonal(size: usize, value: f64) -> Self {
    let mut mat = Self::new(size);
    for i in 0..size {
      mat.set(i, i, value);
    }
    mat
  }

  pub fn identity(size: usize) -> Self {
    Self::from_diagonal(size, 1.0)
  }

  /// Builds a matrix from raw compressed row data without reordering.
  ///
  /// The caller vouches for the structural invariants; they are only checked
  /// in debug builds.
  pub fn from_raw_parts(
    size: usize,
    row_ptr: Vec<usize>,
    col_ind: Vec<usize>,
    values: Vec<f64>,
  ) -> Self {
    debug_assert_eq!(row_ptr.len(), size + 1);
    debug_assert_eq!(col_ind.len(), values.len());
    debug_assert_eq!(row_ptr.last().copied(), Some(values.len()));
    debug_assert!(row_ptr.windows(2).all(|w| w[0] <= w[1]));
    Self {
      size,
      row_ptr,
      col_ind,
      values,
    }
  }
}

// getters
impl SparseMatrix {
  pub fn size(&self) -> usize {
    self.size
  }
  pub fn nrows(&self) -> usize {
    self.size
  }
  pub fn ncols(&self) -> usize {
    self.size
  }
  /// Number of stored entries.
  pub fn nnz(&self) -> usize {
    self.values.len()
  }
  pub fn row_ptr(&self) -> &[usize] {
    &self.row_ptr
  }
  pub fn col_ind(&self) -> &[usize] {
    &self.col_ind
  }
  pub fn values(&self) -> &[f64] {
    &self.values
  }

  pub fn row_count(&self, r: usize) -> usize {
    self.row_ptr[r + 1] - self.row_ptr[r]
  }

  /// The `i`-th stored `(column, value)` pair of row `r`, in storage order.
  pub fn entry_at(&self, r: usize, i: usize) -> (usize, f64) {
    let k = self.row_ptr[r] + i;
    (self.col_ind[k], self.values[k])
  }

  pub fn row_iter(&self, r: usize) -> impl Iterator<Item = (usize, f64)> + '_ {
    let range = self.row_ptr[r]..self.row_ptr[r + 1];
    self.col_ind[range.clone()]
      .iter()
      .copied()
      .zip(self.values[range].iter().copied())
  }

  /// All stored `(row, column, value)` triplets, row by row.
  pub fn triplet_iter(&self) -> impl Iterator<Item = (usize, usize, f64)> + '_ {
    (0..self.size).flat_map(move |r| self.row_iter(r).map(move |(c, v)| (r, c, v)))
  }

  fn position(&self, r: usize, c: usize) -> Option<usize> {
    (self.row_ptr[r]..self.row_ptr[r + 1]).find(|&k| self.col_ind[k] == c)
  }

  /// Stored value or zero.
  pub fn get(&self, r: usize, c: usize) -> f64 {
    self.position(r, c).map_or(0.0, |k| self.values[k])
  }

  pub fn diagonal(&self) -> Vector {
    Vector::from_fn(self.size, |i| self.get(i, i))
  }
}

// mutation
impl SparseMatrix {
  fn insert_at_row_end(&mut self, r: usize, c: usize, value: f64) -> usize {
    let k = self.row_ptr[r + 1];
    self.values.insert(k, value);
    self.col_ind.insert(k, c);
    self.row_ptr[r + 1..].iter_mut().for_each(|p| *p += 1);
    k
  }

  fn remove_at(&mut self, r: usize, k: usize) {
    self.values.remove(k);
    self.col_ind.remove(k);
    self.row_ptr[r + 1..].iter_mut().for_each(|p| *p -= 1);
  }

  /// Get-or-insert access to the slot of `(r, c)`.
  ///
  /// A missing entry is created with value zero. Writing zero through the
  /// returned slot keeps the entry stored; use [`Self::set`] to remove it.
  pub fn entry_mut(&mut self, r: usize, c: usize) -> &mut f64 {
    let k = match self.position(r, c) {
      Some(k) => k,
      None => self.insert_at_row_end(r, c, 0.0),
    };
    &mut self.values[k]
  }

  /// Inserts or overwrites for nonzero `value`, removes the entry for zero.
  pub fn set(&mut self, r: usize, c: usize, value: f64) {
    match self.position(r, c) {
      Some(k) if value == 0.0 => self.remove_at(r, k),
      Some(k) => self.values[k] = value,
      None if value != 0.0 => {
        self.insert_at_row_end(r, c, value);
      }
      None => {}
    }
  }

  /// `A(r, c) += delta`, with the same zero policy as [`Self::set`].
  pub fn accumulate(&mut self, r: usize, c: usize, delta: f64) {
    let value = self.get(r, c) + delta;
    self.set(r, c, value);
  }

  /// Removes every stored entry of row `r`.
  pub fn clear_row(&mut self, r: usize) {
    let range = self.row_ptr[r]..self.row_ptr[r + 1];
    let n = range.len();
    self.values.drain(range.clone());
    self.col_ind.drain(range);
    self.row_ptr[r + 1..].iter_mut().for_each(|p| *p -= n);
  }

  pub fn resize(&mut self, size: usize) {
    *self = Self::new(size);
  }

  /// Drops all entries, keeping the dimension.
  pub fn clear(&mut self) {
    self.resize(self.size);
  }

  fn prune_zeros(&mut self) {
    let mut row_ptr = Vec::with_capacity(self.size + 1);
    let mut col_ind = Vec::with_capacity(self.nnz());
    let mut values = Vec::with_capacity(self.nnz());
    row_ptr.push(0);
    for r in 0..self.size {
      for (c, v) in self.row_iter(r).filter(|&(_, v)| v != 0.0) {
        col_ind.push(c);
        values.push(v);
      }
      row_ptr.push(values.len());
    }
    self.row_ptr = row_ptr;
    self.col_ind = col_ind;
    self.values = values;
  }
}

// algebra
impl SparseMatrix {
  fn zip_rows_with<F>(&self, other: &SparseMatrix, op: F) -> SparseMatrix
  where
    F: Fn(f64, f64) -> f64,
  {
    let n = self.size.min(other.size);
    let mut res = SparseMatrix::new(n);
    for r in 0..n {
      if self.row_count(r) == 0 && other.row_count(r) == 0 {
        continue;
      }
      for c in 0..n {
        res.set(r, c, op(self.get(r, c), other.get(r, c)));
      }
    }
    res
  }

  /// Hadamard product.
  pub fn elementwise_mul(&self, other: &SparseMatrix) -> SparseMatrix {
    self.zip_rows_with(other, |a, b| a * b)
  }

  pub fn transpose(&self) -> SparseMatrix {
    let mut res = SparseMatrix::new(self.size);
    for (r, c, v) in self.triplet_iter() {
      res.set(c, r, v);
    }
    res
  }

  /// Compares logical values instead of storage layout.
  pub fn approx_eq_values(&self, other: &SparseMatrix, tol: f64) -> bool {
    self.size == other.size
      && self
        .triplet_iter()
        .chain(other.triplet_iter())
        .all(|(r, c, _)| (self.get(r, c) - other.get(r, c)).abs() <= tol)
  }

  /// Dense rendering, one line per row.
  pub fn dump(&self, precision: usize) -> String {
    (0..self.size)
      .map(|r| {
        (0..self.size)
          .map(|c| format!("{:.precision$}", self.get(r, c)))
          .join(" ")
      })
      .join("\n")
  }

  pub fn to_nalgebra_coo(&self) -> nas::CooMatrix<f64> {
    let mut coo = nas::CooMatrix::new(self.size, self.size);
    for (r, c, v) in self.triplet_iter() {
      coo.push(r, c, v);
    }
    coo
  }

  pub fn to_nalgebra_csr(&self) -> nas::CsrMatrix<f64> {
    (&self.to_nalgebra_coo()).into()
  }

  pub fn to_nalgebra_dense(&self) -> na::DMatrix<f64> {
    na::DMatrix::from_fn(self.size, self.size, |r, c| self.get(r, c))
  }
}

impl From<&nas::CsrMatrix<f64>> for SparseMatrix {
  fn from(m: &nas::CsrMatrix<f64>) -> Self {
    let mut res = SparseMatrix::new(m.nrows().max(m.ncols()));
    for (r, c, &v) in m.triplet_iter() {
      res.accumulate(r, c, v);
    }
    res
  }
}

/// Structural equality: identical value, column and row pointer sequences.
///
/// Two matrices holding the same logical entries inserted in different order
/// compare unequal. See [`SparseMatrix::approx_eq_values`].
impl PartialEq for SparseMatrix {
  fn eq(&self, other: &Self) -> bool {
    self.values == other.values && self.col_ind == other.col_ind && self.row_ptr == other.row_ptr
  }
}

impl fmt::Display for SparseMatrix {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "[{}]", self.dump(5))
  }
}

impl Add<&SparseMatrix> for &SparseMatrix {
  type Output = SparseMatrix;
  fn add(self, rhs: &SparseMatrix) -> SparseMatrix {
    self.zip_rows_with(rhs, |a, b| a + b)
  }
}
impl Sub<&SparseMatrix> for &SparseMatrix {
  type Output = SparseMatrix;
  fn sub(self, rhs: &SparseMatrix) -> SparseMatrix {
    self.zip_rows_with(rhs, |a, b| a - b)
  }
}
/// Elementwise division. Division by an absent entry yields non-finite values.
impl Div<&SparseMatrix> for &SparseMatrix {
  type Output = SparseMatrix;
  fn div(self, rhs: &SparseMatrix) -> SparseMatrix {
    self.zip_rows_with(rhs, |a, b| a / b)
  }
}

/// Dense matrix product, cubic in the dimension.
impl Mul<&SparseMatrix> for &SparseMatrix {
  type Output = SparseMatrix;
  fn mul(self, rhs: &SparseMatrix) -> SparseMatrix {
    let n = self.size.min(rhs.size);
    let mut res = SparseMatrix::new(n);
    for r in 0..n {
      for c in 0..n {
        let sum = (0..n).map(|k| self.get(r, k) * rhs.get(k, c)).sum();
        res.set(r, c, sum);
      }
    }
    res
  }
}

impl Mul<f64> for &SparseMatrix {
  type Output = SparseMatrix;
  fn mul(self, rhs: f64) -> SparseMatrix {
    let mut res = self.clone();
    res *= rhs;
    res
  }
}
impl Mul<&SparseMatrix> for f64 {
  type Output = SparseMatrix;
  fn mul(self, rhs: &SparseMatrix) -> SparseMatrix {
    rhs * self
  }
}

/// Matrix-vector product; columns beyond the vector length are ignored.
impl Mul<&Vector> for &SparseMatrix {
  type Output = Vector;
  fn mul(self, rhs: &Vector) -> Vector {
    Vector::from_fn(self.size, |r| {
      self
        .row_iter(r)
        .filter(|&(c, _)| c < rhs.len())
        .map(|(c, v)| v * rhs[c])
        .sum()
    })
  }
}

impl AddAssign<&SparseMatrix> for SparseMatrix {
  fn add_assign(&mut self, rhs: &SparseMatrix) {
    *self = &*self + rhs;
  }
}
impl SubAssign<&SparseMatrix> for SparseMatrix {
  fn sub_assign(&mut self, rhs: &SparseMatrix) {
    *self = &*self - rhs;
  }
}
impl MulAssign<f64> for SparseMatrix {
  fn mul_assign(&mut self, rhs: f64) {
    self.values.iter_mut().for_each(|v| *v *= rhs);
    self.prune_zeros();
  }
}
