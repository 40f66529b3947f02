use trifem::{
  coeffs::FnCoefficients,
  mesh::rectangle::Rectangle,
  pde::{Pde, PdeConfig},
};

use std::f64::consts::PI;

/// Heat equation $dot(u) = kappa Delta u$ on the unit square, started from the
/// first eigenmode, which decays like $e^(-2 pi^2 kappa t)$.
fn main() -> trifem::Result<()> {
  tracing_subscriber::fmt::init();

  let kappa = 0.1;
  let dt = 0.01;
  let t_max = 0.5;

  let mesh = Rectangle::new_unit().to_grid_mesh(12, 12)?;
  let mode = |x: f64, y: f64| (PI * x).sin() * (PI * y).sin();
  let coeffs = FnCoefficients::new()
    .with_scalar_a(move |_, _| -kappa)
    .with_init(mode);

  let config = PdeConfig::default()
    .with_dest_dir(PdeConfig::dest_dir_for_script("heat_square"))
    .with_time(dt, t_max);
  let mut pde = Pde::new(mesh, coeffs, config);
  let states = pde.solve_time_dep();

  for (istep, state) in states.iter().enumerate().step_by(10) {
    let t = istep as f64 * dt;
    let decay = (-2.0 * PI * PI * kappa * t).exp();
    let err = pde
      .mesh()
      .points()
      .iter()
      .zip(state.iter())
      .map(|(p, u)| (decay * mode(p.x, p.y) - u).abs())
      .fold(0.0, f64::max);
    println!("t = {t:.2}: max nodal error {err:.3e}");
  }
  Ok(())
}
