//! Iterative solvers for `A x = b`.
//!
//! Both solvers start from `x = 0` and stop either at the residual threshold or
//! after the iteration cap. Running out of iterations is not an error: the last
//! iterate is returned and the `*_report` variants expose the final residual.

use crate::{sparse::SparseMatrix, vector::Vector};

pub const RESIDUAL_TOLERANCE: f64 = 1e-20;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum SolverKind {
  #[default]
  GaussSeidel,
  /// Only valid for symmetric positive definite systems.
  ConjugateGradient,
}

#[derive(Debug, Clone)]
pub struct SolveReport {
  pub solution: Vector,
  pub iterations: usize,
  /// $norm(A x - b)$ of the returned solution.
  pub residual: f64,
}

/// `|A_ii| >= sum_(j != i) |A_ij|` for every row.
pub fn diag_dominant(a: &SparseMatrix) -> bool {
  (0..a.size()).all(|i| {
    let off: f64 = a
      .row_iter(i)
      .filter(|&(j, _)| j != i)
      .map(|(_, v)| v.abs())
      .sum();
    a.get(i, i).abs() >= off
  })
}

fn residual(a: &SparseMatrix, x: &Vector, b: &Vector) -> f64 {
  (&(a * x) - b).norm()
}

pub fn gauss_seidel_report(a: &SparseMatrix, b: &Vector, max_iterations: usize) -> SolveReport {
  let n = b.len();
  let mut x = Vector::zeros(n);
  let mut iterations = 0;
  let mut res = residual(a, &x, b);
  while iterations < max_iterations {
    iterations += 1;
    for i in 0..n {
      let mut sigma = 0.0;
      let mut diag = 0.0;
      for (j, v) in a.row_iter(i).filter(|&(j, _)| j < n) {
        if i == j {
          diag = v;
        } else {
          sigma += v * x[j];
        }
      }
      // A zero diagonal is not guarded against and yields non-finite values.
      x[i] = (b[i] - sigma) / diag;
    }
    res = residual(a, &x, b);
    if res <= RESIDUAL_TOLERANCE {
      break;
    }
  }
  SolveReport {
    solution: x,
    iterations,
    residual: res,
  }
}

/// Gauss-Seidel sweeps updating `x` in place.
///
/// Converges for strictly diagonally dominant systems, see [`diag_dominant`].
pub fn gauss_seidel(a: &SparseMatrix, b: &Vector, max_iterations: usize) -> Vector {
  gauss_seidel_report(a, b, max_iterations).solution
}

pub fn conjugate_gradient_report(
  a: &SparseMatrix,
  b: &Vector,
  max_iterations: usize,
) -> SolveReport {
  let mut x = Vector::zeros(b.len());
  let mut r = b - &(a * &x);
  let mut p = r.clone();
  let mut rho_prev = r.dot(&r);

  let mut iterations = 0;
  while iterations < max_iterations && rho_prev > RESIDUAL_TOLERANCE {
    iterations += 1;
    let ap = a * &p;
    let alpha = rho_prev / p.dot(&ap);
    x += &(&p * alpha);
    r -= &(&ap * alpha);
    let rho_new = r.dot(&r);
    if rho_new < RESIDUAL_TOLERANCE {
      break;
    }
    p = &r + &(&p * (rho_new / rho_prev));
    rho_prev = rho_new;
  }

  let residual = residual(a, &x, b);
  SolveReport {
    solution: x,
    iterations,
    residual,
  }
}

/// Conjugate gradient method for symmetric positive definite `A`.
pub fn conjugate_gradient(a: &SparseMatrix, b: &Vector, max_iterations: usize) -> Vector {
  conjugate_gradient_report(a, b, max_iterations).solution
}

pub fn solve_with_report(
  kind: SolverKind,
  a: &SparseMatrix,
  b: &Vector,
  max_iterations: usize,
) -> SolveReport {
  match kind {
    SolverKind::GaussSeidel => gauss_seidel_report(a, b, max_iterations),
    SolverKind::ConjugateGradient => conjugate_gradient_report(a, b, max_iterations),
  }
}

pub fn solve_with(kind: SolverKind, a: &SparseMatrix, b: &Vector, max_iterations: usize) -> Vector {
  solve_with_report(kind, a, b, max_iterations).solution
}

/// Solves with Gauss-Seidel.
///
/// The assembled systems are generally not symmetric, so conjugate gradient is
/// never picked automatically.
pub fn solve(a: &SparseMatrix, b: &Vector, max_iterations: usize) -> Vector {
  gauss_seidel(a, b, max_iterations)
}

#[cfg(test)]
mod test {
  use super::*;

  use approx::assert_relative_eq;

  fn dominant_system() -> (SparseMatrix, Vector) {
    let mut a = SparseMatrix::from_diagonal(3, 4.0);
    a.set(0, 1, 1.0);
    a.set(1, 0, 1.0);
    a.set(1, 2, 1.0);
    a.set(2, 1, 1.0);
    let b = Vector::from(vec![6.0, 6.0, 6.0]);
    (a, b)
  }

  #[test]
  fn dominance_check() {
    let (a, _) = dominant_system();
    assert!(diag_dominant(&a));
    let mut weak = a.clone();
    weak.set(0, 2, 3.5);
    assert!(!diag_dominant(&weak));
    assert!(diag_dominant(&SparseMatrix::new(4)));
  }

  #[test]
  fn gauss_seidel_converges_on_dominant_system() {
    let (a, b) = dominant_system();
    let report = gauss_seidel_report(&a, &b, 50);
    assert!(report.residual <= 1e-10);
    assert!(report.iterations <= 50);
    let x = report.solution;
    // exact solution is (9/7, 6/7, 9/7)
    assert_relative_eq!(x[0], 9.0 / 7.0, epsilon = 1e-10);
    assert_relative_eq!(x[1], 6.0 / 7.0, epsilon = 1e-10);
    assert_relative_eq!(x[2], 9.0 / 7.0, epsilon = 1e-10);
  }

  #[test]
  fn gauss_seidel_identity_in_one_sweep() {
    let a = SparseMatrix::identity(4);
    let b = Vector::from(vec![1.0, -2.0, 3.0, 0.5]);
    let report = gauss_seidel_report(&a, &b, 10);
    assert_eq!(report.iterations, 1);
    assert_eq!(report.solution, b);
  }

  #[test]
  fn zero_iterations_returns_zero() {
    let (a, b) = dominant_system();
    assert_eq!(gauss_seidel(&a, &b, 0), Vector::zeros(3));
    assert_eq!(conjugate_gradient(&a, &b, 0), Vector::zeros(3));
  }

  #[test]
  fn zero_diagonal_is_not_finite() {
    let mut a = SparseMatrix::new(2);
    a.set(0, 1, 1.0);
    a.set(1, 0, 1.0);
    let x = gauss_seidel(&a, &Vector::from(vec![1.0, 1.0]), 3);
    assert!(!x[0].is_finite());
  }

  #[test]
  fn conjugate_gradient_on_spd_system() {
    // 1d laplacian
    let n = 6;
    let mut a = SparseMatrix::new(n);
    for i in 0..n {
      a.set(i, i, 2.0);
      if i > 0 {
        a.set(i, i - 1, -1.0);
      }
      if i + 1 < n {
        a.set(i, i + 1, -1.0);
      }
    }
    let b = Vector::from_fn(n, |i| i as f64 + 1.0);
    let report = conjugate_gradient_report(&a, &b, n);
    assert!(report.iterations <= n);
    assert!(report.residual < 1e-8);
    let back = &a * &report.solution;
    for i in 0..n {
      assert_relative_eq!(back[i], b[i], epsilon = 1e-8);
    }
  }

  #[test]
  fn conjugate_gradient_zero_rhs() {
    let (a, _) = dominant_system();
    let report = conjugate_gradient_report(&a, &Vector::zeros(3), 10);
    assert_eq!(report.iterations, 0);
    assert_eq!(report.solution, Vector::zeros(3));
  }

  #[test]
  fn solve_uses_gauss_seidel() {
    let (a, b) = dominant_system();
    assert_eq!(solve(&a, &b, 7), gauss_seidel(&a, &b, 7));
    assert_eq!(
      solve_with(SolverKind::ConjugateGradient, &a, &b, 7),
      conjugate_gradient(&a, &b, 7)
    );
    assert_eq!(SolverKind::default(), SolverKind::GaussSeidel);
  }
}
