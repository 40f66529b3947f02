//! Crank–Nicolson time stepping.

mod common;

use trifem::{
  coeffs::FnCoefficients,
  diagnostics::NoopSink,
  io::{save_vector, Checkpoint},
  mesh::rectangle::Rectangle,
  pde::{Pde, PdeConfig},
  vector::Vector,
};

use approx::assert_relative_eq;
use std::f64::consts::PI;

#[test]
fn stationary_state_stays_fixed() {
  let linear = |x: f64, y: f64| x + 2.0 * y;
  let mesh = Rectangle::new_unit().to_grid_mesh(4, 4).unwrap();
  let coeffs = FnCoefficients::new()
    .with_scalar_a(|_, _| -1.0)
    .with_init(linear)
    .with_boundary(move |_, x, y, _| linear(x, y));
  let config = PdeConfig::default()
    .with_dest_dir(common::scratch_dir("fixed"))
    .with_save(false)
    .with_max_iterations(200)
    .with_time(0.1, 0.5);
  let mut pde = Pde::new(mesh, coeffs, config).with_diagnostics(&NoopSink);
  let states = pde.solve_time_dep();
  assert_eq!(states.len(), 6);
  for state in &states {
    for (u, u0) in state.iter().zip(states[0].iter()) {
      assert_relative_eq!(*u, *u0, epsilon = 1e-9);
    }
  }
  assert_relative_eq!(pde.time(), 0.5, epsilon = 1e-12);
}

#[test]
fn heat_mode_decays() {
  let kappa = 1.0;
  let mode = |x: f64, y: f64| (PI * x).sin() * (PI * y).sin();
  let mesh = Rectangle::new_unit().to_grid_mesh(8, 8).unwrap();
  let center = (0..mesh.npoints())
    .find(|&i| mesh.point(i) == trifem::mesh::Point::new(0.5, 0.5))
    .unwrap();
  let coeffs = FnCoefficients::new()
    .with_scalar_a(move |_, _| -kappa)
    .with_init(mode);
  let config = PdeConfig::default()
    .with_dest_dir(common::scratch_dir("decay"))
    .with_save(false)
    .with_max_iterations(400)
    .with_time(0.01, 0.1);
  let mut pde = Pde::new(mesh, coeffs, config).with_diagnostics(&NoopSink);
  let states = pde.solve_time_dep();
  assert_eq!(states.len(), 11);

  let amplitudes: Vec<f64> = states.iter().map(|u| u[center]).collect();
  assert!(amplitudes.windows(2).all(|w| w[1] < w[0]));
  let exact = (-2.0 * PI * PI * kappa * 0.1).exp();
  assert_relative_eq!(amplitudes[10], exact, max_relative = 0.15);
}

#[test]
fn step_checkpoints_are_reused() {
  let dir = common::scratch_dir("steps");
  let mesh = Rectangle::new_unit().to_grid_mesh(3, 3).unwrap();
  let coeffs = || {
    FnCoefficients::new()
      .with_scalar_a(|_, _| -0.5)
      .with_forcing(|_, _, t| 1.0 + t)
      .with_init(|x, _| x)
  };
  let config = PdeConfig::default()
    .with_dest_dir(&dir)
    .with_max_iterations(200)
    .with_time(0.05, 0.1);

  let mut pde = Pde::new(mesh.clone(), coeffs(), config.clone()).with_diagnostics(&NoopSink);
  let first = pde.solve_time_dep();
  assert_eq!(first.len(), 3);
  for istep in 0..3 {
    assert!(dir.join(Checkpoint::step_name(istep)).is_file());
  }

  let seeded = Vector::from_element(mesh.npoints(), 42.0);
  save_vector(&seeded, dir.join(Checkpoint::step_name(2))).unwrap();
  let mut pde = Pde::new(mesh, coeffs(), config).with_diagnostics(&NoopSink);
  let second = pde.solve_time_dep();
  assert_eq!(second[0], first[0]);
  assert_eq!(second[1], first[1]);
  assert_eq!(second[2], seeded);

  std::fs::remove_dir_all(&dir).unwrap();
}
