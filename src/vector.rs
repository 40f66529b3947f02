use std::{
  fmt,
  ops::{Add, AddAssign, Div, DivAssign, Index, IndexMut, Mul, MulAssign, Sub, SubAssign},
};

use itertools::Itertools;

/// Dense vector of fixed length.
///
/// Binary operations between two vectors pair entries by index and truncate
/// to the shorter operand.
#[derive(Debug, Default, Clone)]
pub struct Vector {
  data: Vec<f64>,
}

impl Vector {
  pub fn zeros(len: usize) -> Self {
    Self::from_element(len, 0.0)
  }
  pub fn from_element(len: usize, value: f64) -> Self {
    Self {
      data: vec![value; len],
    }
  }
  pub fn from_fn<F>(len: usize, f: F) -> Self
  where
    F: FnMut(usize) -> f64,
  {
    (0..len).map(f).collect()
  }

  pub fn len(&self) -> usize {
    self.data.len()
  }
  pub fn is_empty(&self) -> bool {
    self.data.is_empty()
  }
  pub fn as_slice(&self) -> &[f64] {
    &self.data
  }
  pub fn as_mut_slice(&mut self) -> &mut [f64] {
    &mut self.data
  }
  pub fn iter(&self) -> std::slice::Iter<'_, f64> {
    self.data.iter()
  }
  pub fn into_vec(self) -> Vec<f64> {
    self.data
  }

  pub fn fill(&mut self, value: f64) {
    self.data.fill(value);
  }
  pub fn fill_with_index<F>(&mut self, mut f: F)
  where
    F: FnMut(usize) -> f64,
  {
    self.data.iter_mut().enumerate().for_each(|(i, v)| *v = f(i));
  }
  pub fn fill_with<F>(&mut self, f: F)
  where
    F: FnMut() -> f64,
  {
    self.data.fill_with(f);
  }
  /// Zero-fills, keeping the length.
  pub fn clear(&mut self) {
    self.fill(0.0);
  }

  pub fn dot(&self, other: &Vector) -> f64 {
    self.iter().zip(other.iter()).map(|(a, b)| a * b).sum()
  }
  pub fn norm(&self) -> f64 {
    self.dot(self).sqrt()
  }

  /// Whitespace-joined listing of all entries.
  pub fn dump(&self) -> String {
    self.data.iter().join(" ")
  }

  pub fn to_nalgebra(&self) -> na::DVector<f64> {
    na::DVector::from_column_slice(&self.data)
  }
}

impl From<Vec<f64>> for Vector {
  fn from(data: Vec<f64>) -> Self {
    Self { data }
  }
}
impl From<&na::DVector<f64>> for Vector {
  fn from(v: &na::DVector<f64>) -> Self {
    v.iter().copied().collect()
  }
}
impl FromIterator<f64> for Vector {
  fn from_iter<I: IntoIterator<Item = f64>>(iter: I) -> Self {
    Self {
      data: iter.into_iter().collect(),
    }
  }
}
impl<'a> IntoIterator for &'a Vector {
  type Item = &'a f64;
  type IntoIter = std::slice::Iter<'a, f64>;
  fn into_iter(self) -> Self::IntoIter {
    self.iter()
  }
}

impl Index<usize> for Vector {
  type Output = f64;
  fn index(&self, i: usize) -> &f64 {
    &self.data[i]
  }
}
impl IndexMut<usize> for Vector {
  fn index_mut(&mut self, i: usize) -> &mut f64 {
    &mut self.data[i]
  }
}

impl PartialEq for Vector {
  fn eq(&self, other: &Self) -> bool {
    self.data == other.data
  }
}

impl fmt::Display for Vector {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "<{}>", self.dump())
  }
}

macro_rules! impl_vector_ops {
  ($Op:ident, $op:ident, $OpAssign:ident, $op_assign:ident, $sym:tt) => {
    impl $Op<&Vector> for &Vector {
      type Output = Vector;
      fn $op(self, rhs: &Vector) -> Vector {
        self.iter().zip(rhs.iter()).map(|(a, b)| a $sym b).collect()
      }
    }
    impl $Op<Vector> for Vector {
      type Output = Vector;
      fn $op(self, rhs: Vector) -> Vector {
        (&self).$op(&rhs)
      }
    }
    impl $Op<f64> for &Vector {
      type Output = Vector;
      fn $op(self, rhs: f64) -> Vector {
        self.iter().map(|a| a $sym rhs).collect()
      }
    }
    impl $Op<f64> for Vector {
      type Output = Vector;
      fn $op(self, rhs: f64) -> Vector {
        (&self).$op(rhs)
      }
    }
    impl $OpAssign<&Vector> for Vector {
      fn $op_assign(&mut self, rhs: &Vector) {
        self
          .data
          .iter_mut()
          .zip(rhs.iter())
          .for_each(|(a, b)| a.$op_assign(*b));
      }
    }
    impl $OpAssign<f64> for Vector {
      fn $op_assign(&mut self, rhs: f64) {
        self.data.iter_mut().for_each(|a| a.$op_assign(rhs));
      }
    }
  };
}
impl_vector_ops!(Add, add, AddAssign, add_assign, +);
impl_vector_ops!(Sub, sub, SubAssign, sub_assign, -);
impl_vector_ops!(Mul, mul, MulAssign, mul_assign, *);
impl_vector_ops!(Div, div, DivAssign, div_assign, /);

impl Mul<&Vector> for f64 {
  type Output = Vector;
  fn mul(self, rhs: &Vector) -> Vector {
    rhs * self
  }
}
impl Mul<Vector> for f64 {
  type Output = Vector;
  fn mul(self, rhs: Vector) -> Vector {
    &rhs * self
  }
}

#[cfg(test)]
mod test {
  use super::Vector;

  #[test]
  fn elementwise_ops_truncate_to_shorter() {
    let a = Vector::from(vec![1.0, 2.0, 3.0]);
    let b = Vector::from(vec![4.0, 5.0]);
    assert_eq!(&a + &b, Vector::from(vec![5.0, 7.0]));
    assert_eq!(&b - &a, Vector::from(vec![3.0, 3.0]));
    assert_eq!(&a * &b, Vector::from(vec![4.0, 10.0]));
    assert_eq!(&b / &a, Vector::from(vec![4.0, 2.5]));
  }

  #[test]
  fn compound_ops_keep_length() {
    let mut a = Vector::from(vec![1.0, 2.0, 3.0]);
    a += &Vector::from(vec![1.0]);
    assert_eq!(a, Vector::from(vec![2.0, 2.0, 3.0]));
    a -= 1.0;
    assert_eq!(a, Vector::from(vec![1.0, 1.0, 2.0]));
    a *= 3.0;
    a /= &Vector::from(vec![3.0, 1.0, 2.0, 7.0]);
    assert_eq!(a, Vector::from(vec![1.0, 3.0, 3.0]));
  }

  #[test]
  fn scalar_broadcast() {
    let a = Vector::from(vec![2.0, -4.0]);
    assert_eq!(&a + 1.0, Vector::from(vec![3.0, -3.0]));
    assert_eq!(&a - 1.0, Vector::from(vec![1.0, -5.0]));
    assert_eq!(0.5 * &a, Vector::from(vec![1.0, -2.0]));
    assert_eq!(&a / 2.0, Vector::from(vec![1.0, -2.0]));
  }

  #[test]
  fn fill_and_clear() {
    let mut v = Vector::zeros(4);
    v.fill(2.5);
    assert!(v.iter().all(|&x| x == 2.5));
    v.fill_with_index(|i| i as f64 * 2.0);
    assert_eq!(v, Vector::from(vec![0.0, 2.0, 4.0, 6.0]));
    let mut counter = 0.0;
    v.fill_with(|| {
      counter += 1.0;
      counter
    });
    assert_eq!(v, Vector::from(vec![1.0, 2.0, 3.0, 4.0]));
    v.clear();
    assert_eq!(v, Vector::zeros(4));
    assert_eq!(v.len(), 4);
  }

  #[test]
  fn reductions() {
    let a = Vector::from(vec![3.0, 4.0]);
    assert_eq!(a.dot(&a), 25.0);
    assert_eq!(a.norm(), 5.0);
    assert_eq!(a.dump(), "3 4");
    assert_eq!(a.to_string(), "<3 4>");
  }

  #[test]
  fn nalgebra_conversion() {
    let a = Vector::from_fn(3, |i| i as f64);
    let na_a = a.to_nalgebra();
    assert_eq!(na_a, na::DVector::from_column_slice(&[0.0, 1.0, 2.0]));
    assert_eq!(Vector::from(&na_a), a);
  }
}
