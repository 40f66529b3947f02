use super::{Point, TriangleMesh};
use crate::{FemError, Result, SegmentId};

/// Segment ids of the sides of a [`Rectangle`] mesh.
///
/// A corner takes the id of the bottom or top side it lies on.
pub const BOTTOM: SegmentId = 1;
pub const RIGHT: SegmentId = 2;
pub const TOP: SegmentId = 3;
pub const LEFT: SegmentId = 4;

#[derive(Debug, Clone, Copy)]
pub struct Rectangle {
  min: Point,
  max: Point,
}

// constructors
impl Rectangle {
  pub fn new_min_max(min: Point, max: Point) -> Self {
    Self { min, max }
  }
  pub fn new_unit() -> Self {
    Self::new_min_max(Point::zeros(), Point::from_element(1.0))
  }
}

// getters
impl Rectangle {
  pub fn min(&self) -> Point {
    self.min
  }
  pub fn max(&self) -> Point {
    self.max
  }
  pub fn side_lengths(&self) -> Point {
    self.max - self.min
  }
}

impl Rectangle {
  /// Structured mesh with `nx * ny` cells, each split along its diagonal
  /// from lower left to upper right.
  ///
  /// Nodes are numbered row by row starting at the lower left corner.
  pub fn to_grid_mesh(&self, nx: usize, ny: usize) -> Result<TriangleMesh> {
    if nx == 0 || ny == 0 {
      return Err(FemError::Mesh(format!("grid with {nx}x{ny} cells")));
    }
    let h = self.side_lengths().component_div(&Point::new(nx as f64, ny as f64));
    let node = |ix: usize, iy: usize| iy * (nx + 1) + ix;

    let mut points = Vec::with_capacity((nx + 1) * (ny + 1));
    let mut boundary = Vec::with_capacity(points.capacity());
    for iy in 0..=ny {
      for ix in 0..=nx {
        points.push(self.min + Point::new(ix as f64 * h.x, iy as f64 * h.y));
        let segment = if iy == 0 {
          Some(BOTTOM)
        } else if iy == ny {
          Some(TOP)
        } else if ix == nx {
          Some(RIGHT)
        } else if ix == 0 {
          Some(LEFT)
        } else {
          None
        };
        boundary.push(segment);
      }
    }

    let mut triangles = Vec::with_capacity(2 * nx * ny);
    for iy in 0..ny {
      for ix in 0..nx {
        let ll = node(ix, iy);
        let lr = node(ix + 1, iy);
        let ul = node(ix, iy + 1);
        let ur = node(ix + 1, iy + 1);
        triangles.push([ll, lr, ur]);
        triangles.push([ll, ur, ul]);
      }
    }

    TriangleMesh::new(points, triangles, boundary)
  }
}

#[cfg(test)]
mod test {
  use super::*;

  use approx::assert_relative_eq;

  #[test]
  fn unit_grid() {
    let mesh = Rectangle::new_unit().to_grid_mesh(3, 2).unwrap();
    assert_eq!(mesh.npoints(), 12);
    assert_eq!(mesh.ntriangles(), 12);
    let total: f64 = (0..mesh.ntriangles()).map(|e| mesh.area(e)).sum();
    assert_relative_eq!(total, 1.0, epsilon = 1e-14);

    // interior nodes are 5 and 6
    let interior: Vec<_> = (0..mesh.npoints()).filter(|&i| !mesh.is_boundary(i)).collect();
    assert_eq!(interior, vec![5, 6]);
    assert_eq!(mesh.segment(0), Some(BOTTOM));
    assert_eq!(mesh.segment(4), Some(LEFT));
    assert_eq!(mesh.segment(7), Some(RIGHT));
    assert_eq!(mesh.segment(11), Some(TOP));
  }

  #[test]
  fn matches_topological_boundary() {
    let mesh = Rectangle::new_min_max(Point::new(-1.0, 2.0), Point::new(1.0, 3.0))
      .to_grid_mesh(4, 4)
      .unwrap();
    let flags = crate::mesh::boundary::flag_boundary_nodes(mesh.triangles(), mesh.npoints());
    for (i, flag) in flags.into_iter().enumerate() {
      assert_eq!(mesh.is_boundary(i), flag);
    }
    assert_eq!(mesh.bounds().min, Point::new(-1.0, 2.0));
    assert_relative_eq!(mesh.bounds().max.x, 1.0);
    assert_relative_eq!(mesh.grain_size(0), (0.5f64.powi(2) + 0.25f64.powi(2)).sqrt());
  }

  #[test]
  fn empty_grid_is_rejected() {
    assert!(Rectangle::new_unit().to_grid_mesh(0, 3).is_err());
  }
}
