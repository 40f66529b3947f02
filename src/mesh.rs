//! Unstructured triangle mesh.
//!
//! Stores the node coordinates, the triangles as node triples and, per node,
//! whether it lies on the Dirichlet boundary together with the identifier of
//! the boundary segment it belongs to.

pub mod boundary;
pub mod gmsh;
pub mod rectangle;
pub mod triangle;

use crate::{ElementIdx, FemError, NodeIdx, Result, SegmentId};

use itertools::Itertools;

pub type Point = na::Vector2<f64>;

/// Tolerance of the point-in-triangle test, in barycentric units.
const LOCATE_TOLERANCE: f64 = 1e-12;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
  pub min: Point,
  pub max: Point,
}
impl Bounds {
  fn of_points(points: &[Point]) -> Self {
    let init = Self {
      min: Point::from_element(f64::INFINITY),
      max: Point::from_element(f64::NEG_INFINITY),
    };
    points.iter().fold(init, |b, p| Self {
      min: b.min.inf(p),
      max: b.max.sup(p),
    })
  }
  pub fn side_lengths(&self) -> Point {
    self.max - self.min
  }
}

#[derive(Debug, Clone)]
pub struct TriangleMesh {
  points: Vec<Point>,
  triangles: Vec<[NodeIdx; 3]>,
  boundary: Vec<Option<SegmentId>>,
  bounds: Bounds,
}

// constructors
impl TriangleMesh {
  /// `boundary[i]` is the segment of node `i`, or `None` for interior nodes.
  pub fn new(
    points: Vec<Point>,
    triangles: Vec<[NodeIdx; 3]>,
    boundary: Vec<Option<SegmentId>>,
  ) -> Result<Self> {
    if boundary.len() != points.len() {
      return Err(FemError::Mesh(format!(
        "{} boundary flags for {} points",
        boundary.len(),
        points.len()
      )));
    }
    if let Some((ielement, tria)) = triangles
      .iter()
      .find_position(|t| t.iter().any(|&i| i >= points.len()))
    {
      return Err(FemError::Mesh(format!(
        "triangle {ielement} references node {:?} but there are only {} points",
        tria,
        points.len()
      )));
    }
    let bounds = Bounds::of_points(&points);
    Ok(Self {
      points,
      triangles,
      boundary,
      bounds,
    })
  }

  /// Derives the boundary from the topology: every node on an edge that is
  /// shared by exactly one triangle is a boundary node of `segment`.
  pub fn with_topological_boundary(
    points: Vec<Point>,
    triangles: Vec<[NodeIdx; 3]>,
    segment: SegmentId,
  ) -> Result<Self> {
    let boundary = boundary::flag_boundary_nodes(&triangles, points.len())
      .into_iter()
      .map(|b| b.then_some(segment))
      .collect();
    Self::new(points, triangles, boundary)
  }
}

// getters
impl TriangleMesh {
  pub fn npoints(&self) -> usize {
    self.points.len()
  }
  pub fn ntriangles(&self) -> usize {
    self.triangles.len()
  }
  pub fn points(&self) -> &[Point] {
    &self.points
  }
  pub fn point(&self, inode: NodeIdx) -> Point {
    self.points[inode]
  }
  pub fn triangles(&self) -> &[[NodeIdx; 3]] {
    &self.triangles
  }
  pub fn triangle(&self, ielement: ElementIdx) -> [NodeIdx; 3] {
    self.triangles[ielement]
  }
  pub fn is_boundary(&self, inode: NodeIdx) -> bool {
    self.boundary[inode].is_some()
  }
  pub fn segment(&self, inode: NodeIdx) -> Option<SegmentId> {
    self.boundary[inode]
  }
  pub fn boundary_nodes(&self) -> impl Iterator<Item = (NodeIdx, SegmentId)> + '_ {
    self
      .boundary
      .iter()
      .enumerate()
      .filter_map(|(i, s)| s.map(|s| (i, s)))
  }
  pub fn bounds(&self) -> Bounds {
    self.bounds
  }
}

// geometry
impl TriangleMesh {
  pub fn element_vertices(&self, ielement: ElementIdx) -> [Point; 3] {
    self.triangles[ielement].map(|i| self.points[i])
  }

  pub fn area(&self, ielement: ElementIdx) -> f64 {
    crate::quadrature::triangle_area(&self.element_vertices(ielement))
  }

  /// Length of the longest edge.
  pub fn grain_size(&self, ielement: ElementIdx) -> f64 {
    let [a, b, c] = self.element_vertices(ielement);
    (b - a).norm().max((c - b).norm()).max((a - c).norm())
  }

  /// Barycentric coordinates of `(x, y)` with respect to the element.
  ///
  /// `None` for degenerate triangles.
  pub fn barycentric(&self, ielement: ElementIdx, x: f64, y: f64) -> Option<[f64; 3]> {
    let [p1, p2, p3] = self.element_vertices(ielement);
    let det = (p2.y - p3.y) * (p1.x - p3.x) + (p3.x - p2.x) * (p1.y - p3.y);
    if det == 0.0 {
      return None;
    }
    let l1 = ((p2.y - p3.y) * (x - p3.x) + (p3.x - p2.x) * (y - p3.y)) / det;
    let l2 = ((p3.y - p1.y) * (x - p3.x) + (p1.x - p3.x) * (y - p3.y)) / det;
    Some([l1, l2, 1.0 - l1 - l2])
  }

  /// Gradients of the barycentric coordinates, constant over the element.
  pub fn barycentric_gradients(&self, ielement: ElementIdx) -> Option<[Point; 3]> {
    let [p1, p2, p3] = self.element_vertices(ielement);
    let det = (p2.y - p3.y) * (p1.x - p3.x) + (p3.x - p2.x) * (p1.y - p3.y);
    if det == 0.0 {
      return None;
    }
    let g1 = Point::new(p2.y - p3.y, p3.x - p2.x) / det;
    let g2 = Point::new(p3.y - p1.y, p1.x - p3.x) / det;
    Some([g1, g2, -g1 - g2])
  }

  pub fn contains(&self, ielement: ElementIdx, x: f64, y: f64) -> bool {
    self
      .barycentric(ielement, x, y)
      .is_some_and(|l| l.iter().all(|&li| li >= -LOCATE_TOLERANCE))
  }

  /// First triangle containing `(x, y)`, boundary included.
  pub fn locate(&self, x: f64, y: f64) -> Option<ElementIdx> {
    (0..self.ntriangles()).find(|&e| self.contains(e, x, y))
  }
}
