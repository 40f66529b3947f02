//! Piecewise linear (P1) Lagrange basis on triangles.
//!
//! The local basis function `i` of an element is its `i`-th barycentric
//! coordinate. Functions on degenerate elements evaluate to zero.

use crate::{mesh::TriangleMesh, vector::Vector, ElementIdx, LocalIdx, NodeIdx};

/// $phi_i (x, y)$ on element `ielement`.
pub fn local(mesh: &TriangleMesh, x: f64, y: f64, ielement: ElementIdx, ilocal: LocalIdx) -> f64 {
  mesh
    .barycentric(ielement, x, y)
    .map_or(0.0, |lambda| lambda[ilocal])
}

/// $partial_x phi_i$, constant over the element.
pub fn dlocal_dx(
  mesh: &TriangleMesh,
  _x: f64,
  _y: f64,
  ielement: ElementIdx,
  ilocal: LocalIdx,
) -> f64 {
  mesh
    .barycentric_gradients(ielement)
    .map_or(0.0, |grads| grads[ilocal].x)
}

/// $partial_y phi_i$, constant over the element.
pub fn dlocal_dy(
  mesh: &TriangleMesh,
  _x: f64,
  _y: f64,
  ielement: ElementIdx,
  ilocal: LocalIdx,
) -> f64 {
  mesh
    .barycentric_gradients(ielement)
    .map_or(0.0, |grads| grads[ilocal].y)
}

/// Global basis function of `inode` restricted to `ielement`.
///
/// Zero if the node is not a vertex of the element.
pub fn global(mesh: &TriangleMesh, x: f64, y: f64, inode: NodeIdx, ielement: ElementIdx) -> f64 {
  mesh
    .triangle(ielement)
    .iter()
    .position(|&v| v == inode)
    .map_or(0.0, |ilocal| local(mesh, x, y, ielement, ilocal))
}

/// Reconstructs $u_h (x, y) = sum_i u_i phi_i (x, y)$ on the element
/// containing the point.
pub fn approx(x: f64, y: f64, ielement: ElementIdx, coeffs: &Vector, mesh: &TriangleMesh) -> f64 {
  mesh
    .triangle(ielement)
    .iter()
    .enumerate()
    .map(|(ilocal, &inode)| coeffs[inode] * local(mesh, x, y, ielement, ilocal))
    .sum()
}

/// Central difference of `f` in direction `dir` (0 for x, 1 for y).
pub fn derivative<F>(f: F, x: f64, y: f64, dir: usize, h: f64) -> f64
where
  F: Fn(f64, f64) -> f64,
{
  if h == 0.0 {
    return 0.0;
  }
  let (dx, dy) = if dir == 0 { (h, 0.0) } else { (0.0, h) };
  (f(x + dx, y + dy) - f(x - dx, y - dy)) / (2.0 * h)
}

#[cfg(test)]
mod test {
  use super::*;
  use crate::mesh::{Point, TriangleMesh};

  use approx::assert_relative_eq;

  fn tria() -> TriangleMesh {
    let points = vec![Point::new(0.0, 0.0), Point::new(2.0, 0.0), Point::new(0.0, 1.0)];
    TriangleMesh::with_topological_boundary(points, vec![[0, 1, 2]], 0).unwrap()
  }

  #[test]
  fn partition_of_unity() {
    let mesh = tria();
    for &(x, y) in &[(0.1, 0.1), (1.0, 0.25), (0.3, 0.6)] {
      let sum: f64 = (0..3).map(|i| local(&mesh, x, y, 0, i)).sum();
      assert_relative_eq!(sum, 1.0, epsilon = 1e-14);
      let dsum: f64 = (0..3).map(|i| dlocal_dx(&mesh, x, y, 0, i)).sum();
      assert_relative_eq!(dsum, 0.0, epsilon = 1e-14);
    }
  }

  #[test]
  fn gradients() {
    let mesh = tria();
    // phi_1 = x / 2, phi_2 = y
    assert_relative_eq!(dlocal_dx(&mesh, 0.0, 0.0, 0, 1), 0.5);
    assert_relative_eq!(dlocal_dy(&mesh, 0.0, 0.0, 0, 1), 0.0);
    assert_relative_eq!(dlocal_dx(&mesh, 0.0, 0.0, 0, 2), 0.0);
    assert_relative_eq!(dlocal_dy(&mesh, 0.0, 0.0, 0, 2), 1.0);
    assert_relative_eq!(dlocal_dx(&mesh, 0.0, 0.0, 0, 0), -0.5);
    assert_relative_eq!(dlocal_dy(&mesh, 0.0, 0.0, 0, 0), -1.0);
  }

  #[test]
  fn global_basis() {
    let mesh = tria();
    assert_relative_eq!(global(&mesh, 1.0, 0.0, 1, 0), 0.5);
    assert_eq!(global(&mesh, 1.0, 0.0, 7, 0), 0.0);
  }

  #[test]
  fn approx_reproduces_linear() {
    let mesh = tria();
    let f = |x: f64, y: f64| 1.0 + 2.0 * x - 3.0 * y;
    let u: Vector = mesh.points().iter().map(|p| f(p.x, p.y)).collect();
    assert_relative_eq!(approx(0.4, 0.3, 0, &u, &mesh), f(0.4, 0.3), epsilon = 1e-13);
  }

  #[test]
  fn central_difference() {
    let f = |x: f64, y: f64| x * x + 3.0 * y;
    assert_relative_eq!(derivative(f, 1.5, 0.0, 0, 0.1), 3.0, epsilon = 1e-12);
    assert_relative_eq!(derivative(f, 1.5, 0.0, 1, 0.1), 3.0, epsilon = 1e-12);
    assert_eq!(derivative(f, 1.5, 0.0, 0, 0.0), 0.0);
  }
}
