#![allow(dead_code)]

use trifem::mesh::{Point, TriangleMesh};

use std::path::PathBuf;

/// Fresh, empty scratch directory unique to this test process.
pub fn scratch_dir(name: &str) -> PathBuf {
  let dir = std::env::temp_dir().join(format!("trifem-{name}-{}", std::process::id()));
  if dir.exists() {
    std::fs::remove_dir_all(&dir).unwrap();
  }
  dir
}

/// Unit square split into four triangles around the center node 4.
pub fn square_with_center() -> TriangleMesh {
  let points = vec![
    Point::new(0.0, 0.0),
    Point::new(1.0, 0.0),
    Point::new(1.0, 1.0),
    Point::new(0.0, 1.0),
    Point::new(0.5, 0.5),
  ];
  let triangles = vec![[0, 1, 4], [1, 2, 4], [2, 3, 4], [3, 0, 4]];
  TriangleMesh::with_topological_boundary(points, triangles, 1).unwrap()
}
