//! Linear PDE solver on unstructured triangle meshes using piecewise-linear
//! finite elements.
//!
//! The stationary problem solved is $div(A grad u) + B dot grad u + C u = f$
//! with Dirichlet data on the boundary. The transient problem discretizes
//! $G dot(u) + M u = f$ with the Crank–Nicolson scheme.

extern crate nalgebra as na;
extern crate nalgebra_sparse as nas;

pub mod assemble;
pub mod coeffs;
pub mod diagnostics;
pub mod error;
pub mod fe;
pub mod io;
pub mod mesh;
pub mod pde;
pub mod quadrature;
pub mod solver;
pub mod sparse;
pub mod vector;

pub use error::{FemError, Result};

pub type NodeIdx = usize;
pub type ElementIdx = usize;
pub type LocalIdx = usize;
pub type SegmentId = u32;
