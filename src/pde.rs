//! Problem driver: assembles, applies boundary conditions and solves, reusing
//! checkpointed intermediate results from the destination directory.

use crate::{
  assemble,
  coeffs::Coefficients,
  diagnostics::{Diagnostics, TracingSink},
  fe,
  io::Checkpoint,
  mesh::TriangleMesh,
  solver::{self, SolverKind},
  sparse::SparseMatrix,
  vector::Vector,
  ElementIdx,
};

use std::{
  path::{Path, PathBuf},
  time::Instant,
};

/// Final residuals above this are reported as non-converged.
pub const CONVERGENCE_WARN_THRESHOLD: f64 = 1e-10;

#[derive(Debug, Clone)]
pub struct PdeConfig {
  /// Directory of the checkpoint files.
  pub dest_dir: PathBuf,
  /// Whether computed results are written to `dest_dir`.
  pub save: bool,
  /// Iteration cap of the solver, the number of unknowns if `None`.
  pub max_iterations: Option<usize>,
  pub solver: SolverKind,
  pub dt: f64,
  pub t_max: f64,
  /// Log the wall time of every phase.
  pub timed: bool,
}

impl Default for PdeConfig {
  fn default() -> Self {
    Self {
      dest_dir: PathBuf::from("./out/"),
      save: true,
      max_iterations: None,
      solver: SolverKind::default(),
      dt: 0.0,
      t_max: 0.0,
      timed: false,
    }
  }
}

impl PdeConfig {
  pub fn with_dest_dir(mut self, dest_dir: impl Into<PathBuf>) -> Self {
    self.dest_dir = dest_dir.into();
    self
  }
  pub fn with_save(mut self, save: bool) -> Self {
    self.save = save;
    self
  }
  pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
    self.max_iterations = Some(max_iterations);
    self
  }
  pub fn with_solver(mut self, solver: SolverKind) -> Self {
    self.solver = solver;
    self
  }
  pub fn with_time(mut self, dt: f64, t_max: f64) -> Self {
    self.dt = dt;
    self.t_max = t_max;
    self
  }
  pub fn with_timed(mut self, timed: bool) -> Self {
    self.timed = timed;
    self
  }

  /// $floor(t_max / dt)$, zero without a positive time step.
  pub fn time_steps(&self) -> usize {
    if self.dt > 0.0 && self.t_max > 0.0 {
      (self.t_max / self.dt).floor() as usize
    } else {
      0
    }
  }

  /// `./<stem>/` for a problem description at `script`.
  pub fn dest_dir_for_script(script: impl AsRef<Path>) -> PathBuf {
    let stem = script
      .as_ref()
      .file_stem()
      .map(|s| s.to_string_lossy().into_owned())
      .unwrap_or_default();
    Path::new(".").join(stem).join("")
  }
}

pub struct Pde<'d, C> {
  mesh: TriangleMesh,
  coeffs: C,
  config: PdeConfig,
  checkpoint: Checkpoint,
  diag: &'d dyn Diagnostics,

  galmat_mass: Option<SparseMatrix>,
  galmat_op: Option<SparseMatrix>,
  forcing: Option<Vector>,
  solution: Vector,
  time: f64,
}

impl<C: Coefficients> Pde<'static, C> {
  pub fn new(mesh: TriangleMesh, coeffs: C, config: PdeConfig) -> Self {
    let checkpoint = Checkpoint::new(config.dest_dir.clone(), config.save);
    let solution = Vector::zeros(mesh.npoints());
    Self {
      mesh,
      coeffs,
      config,
      checkpoint,
      diag: &TracingSink,
      galmat_mass: None,
      galmat_op: None,
      forcing: None,
      solution,
      time: 0.0,
    }
  }
}

// getters
impl<'d, C: Coefficients> Pde<'d, C> {
  pub fn with_diagnostics<'e>(self, diag: &'e dyn Diagnostics) -> Pde<'e, C> {
    Pde {
      mesh: self.mesh,
      coeffs: self.coeffs,
      config: self.config,
      checkpoint: self.checkpoint,
      diag,
      galmat_mass: self.galmat_mass,
      galmat_op: self.galmat_op,
      forcing: self.forcing,
      solution: self.solution,
      time: self.time,
    }
  }

  pub fn mesh(&self) -> &TriangleMesh {
    &self.mesh
  }
  pub fn coeffs(&self) -> &C {
    &self.coeffs
  }
  pub fn config(&self) -> &PdeConfig {
    &self.config
  }
  pub fn checkpoint(&self) -> &Checkpoint {
    &self.checkpoint
  }
  pub fn mass_matrix(&self) -> Option<&SparseMatrix> {
    self.galmat_mass.as_ref()
  }
  pub fn operator_matrix(&self) -> Option<&SparseMatrix> {
    self.galmat_op.as_ref()
  }
  pub fn forcing(&self) -> Option<&Vector> {
    self.forcing.as_ref()
  }
  pub fn solution(&self) -> &Vector {
    &self.solution
  }
  pub fn time(&self) -> f64 {
    self.time
  }
}

impl<C: Coefficients> Pde<'_, C> {
  fn timed<T>(&mut self, phase: &str, f: impl FnOnce(&mut Self) -> T) -> T {
    let start = self.config.timed.then(Instant::now);
    let out = f(self);
    if let Some(start) = start {
      self
        .diag
        .info(&format!("{phase}: {:.6}s", start.elapsed().as_secs_f64()));
    }
    out
  }

  fn max_iterations(&self) -> usize {
    self.config.max_iterations.unwrap_or(self.mesh.npoints())
  }

  fn solve_system(&self, galmat: &SparseMatrix, galvec: &Vector) -> Vector {
    let report =
      solver::solve_with_report(self.config.solver, galmat, galvec, self.max_iterations());
    self.diag.debug(&format!(
      "{:?}: {} iterations, residual {:e}",
      self.config.solver, report.iterations, report.residual
    ));
    if report.residual.is_nan() || report.residual > CONVERGENCE_WARN_THRESHOLD {
      self.diag.warn(&format!(
        "{:?} did not converge: residual {:e} after {} iterations",
        self.config.solver, report.residual, report.iterations
      ));
    }
    report.solution
  }

  /// Loads `G.mat` and `M.mat` if both are available, assembles them otherwise.
  pub fn construct_matrices(&mut self) {
    self.timed("construct matrices", |this| {
      let n = this.mesh.npoints();
      this.diag.info(&format!(
        "mesh: {} vertices, {} triangles",
        n,
        this.mesh.ntriangles()
      ));
      let loaded = if this.checkpoint.exists(Checkpoint::STIFFNESS)
        && this.checkpoint.exists(Checkpoint::OPERATOR)
      {
        this
          .checkpoint
          .load_matrix(Checkpoint::STIFFNESS, n, this.diag)
          .zip(this.checkpoint.load_matrix(Checkpoint::OPERATOR, n, this.diag))
      } else {
        None
      };
      let (galmat_mass, galmat_op) = match loaded {
        Some(pair) => pair,
        None => {
          let (g, m) = assemble::assemble_matrices(&this.mesh, &this.coeffs, this.diag);
          this.checkpoint.store_matrix(Checkpoint::STIFFNESS, &g, this.diag);
          this.checkpoint.store_matrix(Checkpoint::OPERATOR, &m, this.diag);
          (g, m)
        }
      };
      this.galmat_mass = Some(galmat_mass);
      this.galmat_op = Some(galmat_op);
    });
  }

  /// Forcing vector at time `t`.
  ///
  /// Only the forcing at `t = 0` is checkpointed in `F.vec`. Later times are
  /// always assembled, so a saved `F.vec` never freezes a time-dependent
  /// forcing.
  pub fn construct_forcing(&mut self, t: f64) {
    self.time = t;
    self.timed("construct forcing", |this| {
      let n = this.mesh.npoints();
      let checkpointed = t == 0.0;
      let loaded = if checkpointed {
        this.checkpoint.load_vector(Checkpoint::FORCING, n, this.diag)
      } else {
        None
      };
      let forcing = loaded.unwrap_or_else(|| {
        let f = assemble::assemble_forcing(&this.mesh, &this.coeffs, t, this.diag);
        if checkpointed {
          this.checkpoint.store_vector(Checkpoint::FORCING, &f, this.diag);
        }
        f
      });
      this.forcing = Some(forcing);
    });
  }

  /// Loads `U0000.vec` or interpolates the initial condition.
  pub fn construct_init(&mut self) {
    self.time = 0.0;
    self.timed("construct initial", |this| {
      let name = Checkpoint::step_name(0);
      let n = this.mesh.npoints();
      if !this.coeffs.has_init() {
        this.diag.warn("no initial condition given, starting from zero");
      }
      this.solution = this
        .checkpoint
        .load_vector(&name, n, this.diag)
        .unwrap_or_else(|| {
          let u0 = assemble::assemble_init(&this.mesh, &this.coeffs);
          this.checkpoint.store_vector(&name, &u0, this.diag);
          u0
        });
    });
  }

  fn ensure_matrices(&mut self) -> (SparseMatrix, SparseMatrix) {
    if self.galmat_mass.is_none() || self.galmat_op.is_none() {
      self.construct_matrices();
    }
    let g = self.galmat_mass.clone().unwrap_or_default();
    let m = self.galmat_op.clone().unwrap_or_default();
    (g, m)
  }

  /// Solves $M u = F$ with boundary conditions enforced.
  ///
  /// Returns `U.vec` verbatim if it exists.
  pub fn solve_time_indep(&mut self) -> Vector {
    let (_, mut galmat) = self.ensure_matrices();
    if self.forcing.is_none() {
      self.construct_forcing(0.0);
    }
    let mut galvec = self.forcing.clone().unwrap_or_default();
    assemble::apply_bc_matrix(&self.mesh, &mut galmat);
    assemble::apply_bc_vector(&self.mesh, &self.coeffs, &mut galvec, self.time);

    self.timed("solve time independent", |this| {
      let n = this.mesh.npoints();
      this.solution = match this.checkpoint.load_vector(Checkpoint::SOLUTION, n, this.diag) {
        Some(u) => u,
        None => {
          let u = this.solve_system(&galmat, &galvec);
          this.checkpoint.store_vector(Checkpoint::SOLUTION, &u, this.diag);
          u
        }
      };
    });
    self.solution.clone()
  }

  /// Crank–Nicolson time stepping of $G dot(u) + M u = F$.
  ///
  /// Returns the states at $t = 0, dt, ..., N dt$ with $N = floor(t_max / dt)$.
  pub fn solve_time_dep(&mut self) -> Vec<Vector> {
    let dt = self.config.dt;
    let nsteps = self.config.time_steps();
    let (galmat_mass, galmat_op) = self.ensure_matrices();
    self.construct_init();
    self.construct_forcing(0.0);

    let half_op = &galmat_op * (0.5 * dt);
    let mut lhs = &galmat_mass + &half_op;
    let rhs = &galmat_mass - &half_op;
    assemble::apply_bc_matrix(&self.mesh, &mut lhs);

    let mut states = Vec::with_capacity(nsteps + 1);
    states.push(self.solution.clone());
    for istep in 0..nsteps {
      let t_next = (istep + 1) as f64 * dt;
      let forcing_prev = self.forcing.clone().unwrap_or_default();
      self.construct_forcing(t_next);

      let name = Checkpoint::step_name(istep + 1);
      let n = self.mesh.npoints();
      self.timed("time step", |this| {
        this.solution = match this.checkpoint.load_vector(&name, n, this.diag) {
          Some(u) => u,
          None => {
            let forcing = this.forcing.as_ref().unwrap_or(&forcing_prev);
            let mut galvec = &(&rhs * &this.solution) + &(&(forcing + &forcing_prev) * (0.5 * dt));
            assemble::apply_bc_vector(&this.mesh, &this.coeffs, &mut galvec, t_next);
            let u = this.solve_system(&lhs, &galvec);
            this.checkpoint.store_vector(&name, &u, this.diag);
            u
          }
        };
      });
      self.diag.info(&format!("step {}/{nsteps}: t = {t_next}", istep + 1));
      states.push(self.solution.clone());
    }
    states
  }

  /// Value of the discrete solution at `(x, y)` inside element `ielement`.
  pub fn approx(&self, x: f64, y: f64, ielement: ElementIdx) -> f64 {
    fe::approx(x, y, ielement, &self.solution, &self.mesh)
  }

  /// Largest deviation from `exact` over a `resolution`² sample grid of the
  /// bounding box. Samples outside the mesh are skipped; `None` if none hit.
  pub fn max_error<F>(&self, exact: F, resolution: usize) -> Option<f64>
  where
    F: Fn(f64, f64) -> f64,
  {
    let bounds = self.mesh.bounds();
    let res = resolution.max(1);
    let step = bounds.side_lengths() / res as f64;
    let mut max: Option<f64> = None;
    for iy in 0..=res {
      for ix in 0..=res {
        let x = bounds.min.x + ix as f64 * step.x;
        let y = bounds.min.y + iy as f64 * step.y;
        if let Some(e) = self.mesh.locate(x, y) {
          let err = (exact(x, y) - self.approx(x, y, e)).abs();
          max = Some(max.map_or(err, |m| m.max(err)));
        }
      }
    }
    max
  }
}
