//! Coefficient functions of the problem.
//!
//! The stationary problem is
//! $div(A grad u) + B dot grad u + C u = f$ in the domain and $u = g$ on the
//! boundary. The transient problem reads $G dot(u) + M u = f$ where `M` is the
//! operator assembled from `A`, `B` and `C`. With this sign convention the heat
//! equation $dot(u) = kappa Delta u$ takes $A = -kappa I$.

use crate::SegmentId;

pub trait Coefficients {
  /// Diffusion tensor entry $A_(r c)$, indices 0-based.
  fn a(&self, x: f64, y: f64, row: usize, col: usize) -> f64;
  /// Advection vector component $B_k$.
  fn b(&self, x: f64, y: f64, component: usize) -> f64;
  /// Reaction coefficient.
  fn c(&self, x: f64, y: f64) -> f64;
  fn forcing(&self, x: f64, y: f64, t: f64) -> f64;
  /// Dirichlet data on boundary segment `segment`.
  fn boundary(&self, segment: SegmentId, x: f64, y: f64, t: f64) -> f64;
  fn init(&self, x: f64, y: f64) -> f64;
  fn has_init(&self) -> bool;
}

type Scalar2 = Box<dyn Fn(f64, f64) -> f64>;
type Scalar3 = Box<dyn Fn(f64, f64, f64) -> f64>;

/// [`Coefficients`] made of closures.
///
/// Defaults to $A = I$, $B = 0$, $C = 0$, $f = 0$, $g = 0$ and no initial
/// condition.
pub struct FnCoefficients {
  a: Box<dyn Fn(f64, f64, usize, usize) -> f64>,
  b: Box<dyn Fn(f64, f64, usize) -> f64>,
  c: Scalar2,
  forcing: Scalar3,
  boundary: Box<dyn Fn(SegmentId, f64, f64, f64) -> f64>,
  init: Option<Scalar2>,
}

impl Default for FnCoefficients {
  fn default() -> Self {
    Self {
      a: Box::new(|_, _, r, c| if r == c { 1.0 } else { 0.0 }),
      b: Box::new(|_, _, _| 0.0),
      c: Box::new(|_, _| 0.0),
      forcing: Box::new(|_, _, _| 0.0),
      boundary: Box::new(|_, _, _, _| 0.0),
      init: None,
    }
  }
}

impl FnCoefficients {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_a(mut self, a: impl Fn(f64, f64, usize, usize) -> f64 + 'static) -> Self {
    self.a = Box::new(a);
    self
  }
  /// Isotropic diffusion $A = k(x, y) I$.
  pub fn with_scalar_a(self, k: impl Fn(f64, f64) -> f64 + 'static) -> Self {
    self.with_a(move |x, y, r, c| if r == c { k(x, y) } else { 0.0 })
  }
  pub fn with_b(mut self, b: impl Fn(f64, f64, usize) -> f64 + 'static) -> Self {
    self.b = Box::new(b);
    self
  }
  pub fn with_c(mut self, c: impl Fn(f64, f64) -> f64 + 'static) -> Self {
    self.c = Box::new(c);
    self
  }
  pub fn with_forcing(mut self, f: impl Fn(f64, f64, f64) -> f64 + 'static) -> Self {
    self.forcing = Box::new(f);
    self
  }
  pub fn with_boundary(mut self, g: impl Fn(SegmentId, f64, f64, f64) -> f64 + 'static) -> Self {
    self.boundary = Box::new(g);
    self
  }
  pub fn with_init(mut self, u0: impl Fn(f64, f64) -> f64 + 'static) -> Self {
    self.init = Some(Box::new(u0));
    self
  }
}

impl Coefficients for FnCoefficients {
  fn a(&self, x: f64, y: f64, row: usize, col: usize) -> f64 {
    (self.a)(x, y, row, col)
  }
  fn b(&self, x: f64, y: f64, component: usize) -> f64 {
    (self.b)(x, y, component)
  }
  fn c(&self, x: f64, y: f64) -> f64 {
    (self.c)(x, y)
  }
  fn forcing(&self, x: f64, y: f64, t: f64) -> f64 {
    (self.forcing)(x, y, t)
  }
  fn boundary(&self, segment: SegmentId, x: f64, y: f64, t: f64) -> f64 {
    (self.boundary)(segment, x, y, t)
  }
  /// Zero without an initial condition.
  fn init(&self, x: f64, y: f64) -> f64 {
    self.init.as_ref().map_or(0.0, |u0| u0(x, y))
  }
  fn has_init(&self) -> bool {
    self.init.is_some()
  }
}

#[cfg(test)]
mod test {
  use super::{Coefficients, FnCoefficients};

  #[test]
  fn defaults() {
    let coeffs = FnCoefficients::new();
    assert_eq!(coeffs.a(0.3, 0.2, 0, 0), 1.0);
    assert_eq!(coeffs.a(0.3, 0.2, 1, 1), 1.0);
    assert_eq!(coeffs.a(0.3, 0.2, 0, 1), 0.0);
    assert_eq!(coeffs.b(0.3, 0.2, 1), 0.0);
    assert_eq!(coeffs.c(0.3, 0.2), 0.0);
    assert_eq!(coeffs.forcing(0.3, 0.2, 1.0), 0.0);
    assert_eq!(coeffs.boundary(3, 0.3, 0.2, 1.0), 0.0);
    assert!(!coeffs.has_init());
    assert_eq!(coeffs.init(0.3, 0.2), 0.0);
  }

  #[test]
  fn builder_overrides() {
    let coeffs = FnCoefficients::new()
      .with_scalar_a(|x, _| -x)
      .with_b(|_, y, k| if k == 0 { y } else { 2.0 })
      .with_boundary(|seg, x, _, t| seg as f64 + x + t)
      .with_init(|x, y| x * y);
    assert_eq!(coeffs.a(2.0, 0.0, 1, 1), -2.0);
    assert_eq!(coeffs.a(2.0, 0.0, 1, 0), 0.0);
    assert_eq!(coeffs.b(0.0, 5.0, 0), 5.0);
    assert_eq!(coeffs.b(0.0, 5.0, 1), 2.0);
    assert_eq!(coeffs.boundary(2, 1.0, 0.0, 0.5), 3.5);
    assert!(coeffs.has_init());
    assert_eq!(coeffs.init(2.0, 3.0), 6.0);
  }
}
