//! End-to-end stationary solves.

mod common;

use trifem::{
  coeffs::FnCoefficients,
  diagnostics::NoopSink,
  io::{save_vector, Checkpoint},
  mesh::{rectangle::Rectangle, Point, TriangleMesh},
  pde::{Pde, PdeConfig},
  vector::Vector,
};

use approx::assert_relative_eq;
use std::f64::consts::PI;

fn config(name: &str) -> PdeConfig {
  PdeConfig::default()
    .with_dest_dir(common::scratch_dir(name))
    .with_save(false)
}

#[test]
fn single_triangle_takes_boundary_values() {
  let points = vec![Point::new(0.0, 0.0), Point::new(2.0, 0.0), Point::new(0.0, 1.0)];
  let mesh = TriangleMesh::with_topological_boundary(points, vec![[0, 1, 2]], 3).unwrap();
  let coeffs = FnCoefficients::new()
    .with_forcing(|_, _, _| 5.0)
    .with_boundary(|seg, x, y, _| seg as f64 + x - y);
  let mut pde = Pde::new(mesh, coeffs, config("single")).with_diagnostics(&NoopSink);
  let u = pde.solve_time_indep();
  assert_eq!(u, Vector::from(vec![3.0, 5.0, 2.0]));
}

#[test]
fn linear_harmonic_is_reproduced() {
  let coeffs = FnCoefficients::new().with_boundary(|_, x, y, _| x + y);
  let mut pde =
    Pde::new(common::square_with_center(), coeffs, config("center")).with_diagnostics(&NoopSink);
  let u = pde.solve_time_indep();
  assert_relative_eq!(u[4], 1.0, epsilon = 1e-12);
  assert_relative_eq!(pde.approx(0.25, 0.1, 0), 0.35, epsilon = 1e-12);
}

#[test]
fn poisson_error_decreases_with_refinement() {
  let exact = |x: f64, y: f64| (PI * x).sin() * (PI * y).sin();
  let error = |n: usize| {
    let mesh = Rectangle::new_unit().to_grid_mesh(n, n).unwrap();
    let coeffs =
      FnCoefficients::new().with_forcing(move |x, y, _| -2.0 * PI * PI * exact(x, y));
    let config = config(&format!("poisson-{n}")).with_max_iterations(2000);
    let mut pde = Pde::new(mesh, coeffs, config).with_diagnostics(&NoopSink);
    let u = pde.solve_time_indep();
    pde
      .mesh()
      .points()
      .iter()
      .zip(u.iter())
      .map(|(p, u)| (exact(p.x, p.y) - u).abs())
      .fold(0.0, f64::max)
  };
  let coarse = error(4);
  let fine = error(8);
  assert!(coarse < 0.1, "coarse error {coarse}");
  assert!(fine < 0.5 * coarse, "fine error {fine} vs coarse {coarse}");
}

#[test]
fn checkpoints_are_written_and_reused() {
  let dir = common::scratch_dir("reuse");
  let config = PdeConfig::default().with_dest_dir(&dir);
  let coeffs = FnCoefficients::new().with_boundary(|_, x, y, _| x + y);
  let mut pde =
    Pde::new(common::square_with_center(), coeffs, config.clone()).with_diagnostics(&NoopSink);
  let first = pde.solve_time_indep();
  for name in [
    Checkpoint::STIFFNESS,
    Checkpoint::OPERATOR,
    Checkpoint::FORCING,
    Checkpoint::SOLUTION,
  ] {
    assert!(dir.join(name).is_file(), "{name} missing");
  }

  // different data, but the stored solution wins
  let coeffs = FnCoefficients::new().with_boundary(|_, _, _, _| 100.0);
  let mut pde =
    Pde::new(common::square_with_center(), coeffs, config.clone()).with_diagnostics(&NoopSink);
  assert_eq!(pde.solve_time_indep(), first);

  // a seeded solution is returned verbatim
  let seeded = Vector::from(vec![7.0, 8.0, 9.0, 10.0, 11.0]);
  save_vector(&seeded, dir.join(Checkpoint::SOLUTION)).unwrap();
  let mut pde = Pde::new(common::square_with_center(), FnCoefficients::new(), config)
    .with_diagnostics(&NoopSink);
  assert_eq!(pde.solve_time_indep(), seeded);

  std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn reloaded_matrices_match_assembled() {
  let dir = common::scratch_dir("matrices");
  let config = PdeConfig::default().with_dest_dir(&dir);
  let mesh = Rectangle::new_unit().to_grid_mesh(3, 3).unwrap();
  let coeffs = || FnCoefficients::new().with_c(|x, _| x);

  let mut pde = Pde::new(mesh.clone(), coeffs(), config.clone()).with_diagnostics(&NoopSink);
  pde.construct_matrices();
  let mut again = Pde::new(mesh, coeffs(), config).with_diagnostics(&NoopSink);
  again.construct_matrices();
  assert_eq!(pde.mass_matrix(), again.mass_matrix());
  assert_eq!(pde.operator_matrix(), again.operator_matrix());

  std::fs::remove_dir_all(&dir).unwrap();
}
