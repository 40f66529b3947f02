use trifem::{
  coeffs::FnCoefficients,
  mesh::{gmsh::load_gmsh, rectangle::Rectangle, triangle::load_triangle, TriangleMesh},
  pde::{Pde, PdeConfig},
};

use std::f64::consts::PI;

/// Solves $Delta u = -2 pi^2 sin(pi x) sin(pi y)$ with homogeneous Dirichlet
/// data. Pass a `.msh` file or a Triangle `.node`/`.ele` basename to use a
/// mesh other than the structured unit square.
fn main() -> trifem::Result<()> {
  tracing_subscriber::fmt::init();

  let mesh: TriangleMesh = match std::env::args().nth(1) {
    Some(path) if path.ends_with(".msh") => load_gmsh(&path)?,
    Some(base) => load_triangle(&base)?,
    None => Rectangle::new_unit().to_grid_mesh(16, 16)?,
  };

  let exact = |x: f64, y: f64| (PI * x).sin() * (PI * y).sin();
  let coeffs =
    FnCoefficients::new().with_forcing(move |x, y, _| -2.0 * PI * PI * exact(x, y));

  let config = PdeConfig::default()
    .with_dest_dir(PdeConfig::dest_dir_for_script("poisson_square"))
    .with_timed(true);
  let mut pde = Pde::new(mesh, coeffs, config);
  let solution = pde.solve_time_indep();

  let nodal_error = pde
    .mesh()
    .points()
    .iter()
    .zip(solution.iter())
    .map(|(p, u)| (exact(p.x, p.y) - u).abs())
    .fold(0.0, f64::max);
  println!("max nodal error: {nodal_error:.3e}");
  if let Some(err) = pde.max_error(exact, 100) {
    println!("max sampled error: {err:.3e}");
  }
  Ok(())
}
