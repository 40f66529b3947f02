use crate::NodeIdx;

use itertools::Itertools;

/// Edges of the triangles, with sorted endpoints.
fn edges(triangles: &[[NodeIdx; 3]]) -> impl Iterator<Item = [NodeIdx; 2]> + '_ {
  triangles.iter().flat_map(|&[a, b, c]| {
    [[a, b], [b, c], [c, a]].map(|[u, v]| if u < v { [u, v] } else { [v, u] })
  })
}

/// For a triangle mesh computes the boundary edges.
///
/// The boundary edges are characterized by the fact that they
/// only have 1 triangle as super entity.
pub fn boundary_edges(triangles: &[[NodeIdx; 3]]) -> Vec<[NodeIdx; 2]> {
  edges(triangles)
    .counts()
    .into_iter()
    .filter(|&(_, n)| n == 1)
    .map(|(e, _)| e)
    .sorted()
    .collect()
}

/// The nodes that lie on the boundary of the mesh, ascending.
pub fn boundary_nodes(triangles: &[[NodeIdx; 3]]) -> Vec<NodeIdx> {
  boundary_edges(triangles)
    .into_iter()
    .flatten()
    .sorted()
    .dedup()
    .collect()
}

pub fn flag_boundary_nodes(triangles: &[[NodeIdx; 3]], npoints: usize) -> Vec<bool> {
  let mut flags = vec![false; npoints];
  for inode in boundary_nodes(triangles) {
    flags[inode] = true;
  }
  flags
}

#[cfg(test)]
mod test {
  use super::{boundary_edges, boundary_nodes, flag_boundary_nodes};

  #[test]
  fn single_triangle_is_all_boundary() {
    let trias = [[0, 1, 2]];
    assert_eq!(boundary_edges(&trias), vec![[0, 1], [0, 2], [1, 2]]);
    assert_eq!(flag_boundary_nodes(&trias, 4), vec![true, true, true, false]);
  }

  #[test]
  fn shared_edge_is_interior() {
    // two triangles glued along 1-2
    let trias = [[0, 1, 2], [2, 1, 3]];
    let edges = boundary_edges(&trias);
    assert_eq!(edges.len(), 4);
    assert!(!edges.contains(&[1, 2]));
  }

  #[test]
  fn fan_center_is_interior() {
    let trias = [[0, 1, 4], [1, 2, 4], [2, 3, 4], [3, 0, 4]];
    assert_eq!(boundary_nodes(&trias), vec![0, 1, 2, 3]);
  }
}
