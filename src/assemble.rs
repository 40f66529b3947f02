//! Assembly of the Galerkin matrices and vectors and enforcement of
//! Dirichlet boundary conditions.
//!
//! Element contributions are integrated with the 64-point rule of
//! [`crate::quadrature`] and accumulated into the global system.

use crate::{
  coeffs::Coefficients,
  diagnostics::Diagnostics,
  fe,
  mesh::TriangleMesh,
  quadrature,
  sparse::SparseMatrix,
  vector::Vector,
  ElementIdx, LocalIdx,
};

/// Pointwise integrand of an element contribution.
pub trait Integrand {
  fn element(&self) -> ElementIdx;
  fn eval(&self, x: f64, y: f64) -> f64;
}

/// $integral_K "integrand"$ over its element.
pub fn integrate_element(integrand: &impl Integrand, mesh: &TriangleMesh) -> f64 {
  quadrature::integrate_element(|x, y| integrand.eval(x, y), mesh, integrand.element())
}

/// $phi_i phi_j$, entry of the mass matrix `G`.
pub struct MassIntegrand<'a> {
  pub mesh: &'a TriangleMesh,
  pub ielement: ElementIdx,
  pub i: LocalIdx,
  pub j: LocalIdx,
}
impl Integrand for MassIntegrand<'_> {
  fn element(&self) -> ElementIdx {
    self.ielement
  }
  fn eval(&self, x: f64, y: f64) -> f64 {
    let e = self.ielement;
    fe::local(self.mesh, x, y, e, self.i) * fe::local(self.mesh, x, y, e, self.j)
  }
}

/// $-sum_(r,c) (partial_r A_(r c) phi_i + A_(r c) partial_r phi_i) partial_c phi_j$
///
/// The derivative of the coefficient is a central difference with the grain
/// size of the element as step.
pub struct DiffusionIntegrand<'a> {
  pub mesh: &'a TriangleMesh,
  pub coeffs: &'a dyn Coefficients,
  pub ielement: ElementIdx,
  pub i: LocalIdx,
  pub j: LocalIdx,
}
impl Integrand for DiffusionIntegrand<'_> {
  fn element(&self) -> ElementIdx {
    self.ielement
  }
  fn eval(&self, x: f64, y: f64) -> f64 {
    let (mesh, e) = (self.mesh, self.ielement);
    let h = mesh.grain_size(e);
    let phi_i = fe::local(mesh, x, y, e, self.i);
    let dphi_i = [
      fe::dlocal_dx(mesh, x, y, e, self.i),
      fe::dlocal_dy(mesh, x, y, e, self.i),
    ];
    let dphi_j = [
      fe::dlocal_dx(mesh, x, y, e, self.j),
      fe::dlocal_dy(mesh, x, y, e, self.j),
    ];

    let mut sum = 0.0;
    for r in 0..2 {
      for c in 0..2 {
        let a_rc = self.coeffs.a(x, y, r, c);
        let da_rc = fe::derivative(|x, y| self.coeffs.a(x, y, r, c), x, y, r, h);
        sum -= (da_rc * phi_i + a_rc * dphi_i[r]) * dphi_j[c];
      }
    }
    sum
  }
}

/// $(B_0 partial_x phi_j + B_1 partial_y phi_j) phi_i$
pub struct AdvectionIntegrand<'a> {
  pub mesh: &'a TriangleMesh,
  pub coeffs: &'a dyn Coefficients,
  pub ielement: ElementIdx,
  pub i: LocalIdx,
  pub j: LocalIdx,
}
impl Integrand for AdvectionIntegrand<'_> {
  fn element(&self) -> ElementIdx {
    self.ielement
  }
  fn eval(&self, x: f64, y: f64) -> f64 {
    let (mesh, e) = (self.mesh, self.ielement);
    let phi_i = fe::local(mesh, x, y, e, self.i);
    self.coeffs.b(x, y, 0) * phi_i * fe::dlocal_dx(mesh, x, y, e, self.j)
      + self.coeffs.b(x, y, 1) * phi_i * fe::dlocal_dy(mesh, x, y, e, self.j)
  }
}

/// $C phi_i phi_j$
pub struct ReactionIntegrand<'a> {
  pub mesh: &'a TriangleMesh,
  pub coeffs: &'a dyn Coefficients,
  pub ielement: ElementIdx,
  pub i: LocalIdx,
  pub j: LocalIdx,
}
impl Integrand for ReactionIntegrand<'_> {
  fn element(&self) -> ElementIdx {
    self.ielement
  }
  fn eval(&self, x: f64, y: f64) -> f64 {
    let (mesh, e) = (self.mesh, self.ielement);
    self.coeffs.c(x, y) * fe::local(mesh, x, y, e, self.i) * fe::local(mesh, x, y, e, self.j)
  }
}

/// $phi_i f(x, y, t)$
pub struct ForcingIntegrand<'a> {
  pub mesh: &'a TriangleMesh,
  pub coeffs: &'a dyn Coefficients,
  pub ielement: ElementIdx,
  pub i: LocalIdx,
  pub t: f64,
}
impl Integrand for ForcingIntegrand<'_> {
  fn element(&self) -> ElementIdx {
    self.ielement
  }
  fn eval(&self, x: f64, y: f64) -> f64 {
    fe::local(self.mesh, x, y, self.ielement, self.i) * self.coeffs.forcing(x, y, self.t)
  }
}

/// Assembly algorithm for the mass matrix `G` and the operator matrix `M`.
pub fn assemble_matrices(
  mesh: &TriangleMesh,
  coeffs: &dyn Coefficients,
  diag: &dyn Diagnostics,
) -> (SparseMatrix, SparseMatrix) {
  let n = mesh.npoints();
  let mut galmat_mass = SparseMatrix::new(n);
  let mut galmat_op = SparseMatrix::new(n);
  for (ielement, tria) in mesh.triangles().iter().enumerate() {
    for (i, &iglobal) in tria.iter().enumerate() {
      for (j, &jglobal) in tria.iter().enumerate() {
        let mass = MassIntegrand {
          mesh,
          ielement,
          i,
          j,
        };
        let diffusion = DiffusionIntegrand {
          mesh,
          coeffs,
          ielement,
          i,
          j,
        };
        let advection = AdvectionIntegrand {
          mesh,
          coeffs,
          ielement,
          i,
          j,
        };
        let reaction = ReactionIntegrand {
          mesh,
          coeffs,
          ielement,
          i,
          j,
        };
        galmat_mass.accumulate(iglobal, jglobal, integrate_element(&mass, mesh));
        let op = integrate_element(&diffusion, mesh)
          + integrate_element(&advection, mesh)
          + integrate_element(&reaction, mesh);
        galmat_op.accumulate(iglobal, jglobal, op);
      }
    }
  }
  diag.debug(&format!(
    "assembled matrices: {} elements, nnz G = {}, nnz M = {}",
    mesh.ntriangles(),
    galmat_mass.nnz(),
    galmat_op.nnz()
  ));
  (galmat_mass, galmat_op)
}

/// Assembly algorithm for the forcing vector at time `t`.
pub fn assemble_forcing(
  mesh: &TriangleMesh,
  coeffs: &dyn Coefficients,
  t: f64,
  diag: &dyn Diagnostics,
) -> Vector {
  let mut galvec = Vector::zeros(mesh.npoints());
  for (ielement, tria) in mesh.triangles().iter().enumerate() {
    for (i, &iglobal) in tria.iter().enumerate() {
      let forcing = ForcingIntegrand {
        mesh,
        coeffs,
        ielement,
        i,
        t,
      };
      galvec[iglobal] += integrate_element(&forcing, mesh);
    }
  }
  diag.debug(&format!("assembled forcing at t = {t}"));
  galvec
}

/// Nodal interpolation of the initial condition.
pub fn assemble_init(mesh: &TriangleMesh, coeffs: &dyn Coefficients) -> Vector {
  mesh
    .points()
    .iter()
    .map(|p| coeffs.init(p.x, p.y))
    .collect()
}

/// Replaces every boundary row by the corresponding identity row.
pub fn apply_bc_matrix(mesh: &TriangleMesh, galmat: &mut SparseMatrix) {
  for (inode, _) in mesh.boundary_nodes() {
    galmat.clear_row(inode);
    galmat.set(inode, inode, 1.0);
  }
}

/// Overwrites every boundary entry with the Dirichlet data at time `t`.
pub fn apply_bc_vector(mesh: &TriangleMesh, coeffs: &dyn Coefficients, galvec: &mut Vector, t: f64) {
  for (inode, segment) in mesh.boundary_nodes() {
    let p = mesh.point(inode);
    galvec[inode] = coeffs.boundary(segment, p.x, p.y, t);
  }
}
