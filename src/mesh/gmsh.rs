use super::{Point, TriangleMesh};
use crate::{FemError, NodeIdx, Result, SegmentId};

use std::path::Path;
use tracing::warn;

/// Load Gmsh `.msh` file (version 4.1).
///
/// `Tri3` blocks make up the mesh. The nodes of `Lin2` blocks are boundary
/// nodes whose segment is the entity tag of the block. Without any `Lin2`
/// block the boundary is derived from the topology with segment `0`.
pub fn gmsh2mesh(path: &Path, bytes: &[u8]) -> Result<TriangleMesh> {
  let msh = mshio::parse_msh_bytes(bytes)
    .map_err(|err| FemError::parse(path, 0, format!("gmsh: {err:?}")))?;

  let nodes = msh
    .data
    .nodes
    .ok_or_else(|| FemError::parse(path, 0, "no node section"))?;
  let points: Vec<Point> = nodes
    .node_blocks
    .iter()
    .flat_map(|block| block.nodes.iter())
    .map(|node| Point::new(node.x, node.y))
    .collect();

  let elements = msh
    .data
    .elements
    .ok_or_else(|| FemError::parse(path, 0, "no element section"))?;

  // node tags are 1-based
  let node_index = |tag: u64| -> Result<NodeIdx> {
    (tag as usize)
      .checked_sub(1)
      .ok_or_else(|| FemError::Mesh(format!("invalid gmsh node tag {tag}")))
  };

  let mut triangles = Vec::new();
  let mut segments: Vec<(NodeIdx, SegmentId)> = Vec::new();
  for block in elements.element_blocks {
    type ElType = mshio::ElementType;
    match block.element_type {
      ElType::Tri3 => {
        for e in block.elements {
          let [a, b, c] = e.nodes[..] else {
            return Err(FemError::Mesh(format!("triangle with {} nodes", e.nodes.len())));
          };
          triangles.push([
            node_index(a as u64)?,
            node_index(b as u64)?,
            node_index(c as u64)?,
          ]);
        }
      }
      ElType::Lin2 => {
        let segment = SegmentId::try_from(block.entity_tag as i64)
          .map_err(|_| FemError::Mesh(format!("negative entity tag {}", block.entity_tag)))?;
        for e in block.elements {
          for &tag in &e.nodes {
            segments.push((node_index(tag as u64)?, segment));
          }
        }
      }
      ElType::Pnt => {}
      _ => warn!("unsupported gmsh ElementType: {:?}", block.element_type),
    }
  }

  if triangles.is_empty() {
    return Err(FemError::Mesh("gmsh file contains no triangles".to_owned()));
  }
  if segments.is_empty() {
    return TriangleMesh::with_topological_boundary(points, triangles, 0);
  }

  let mut boundary = vec![None; points.len()];
  for (inode, segment) in segments {
    let slot = boundary
      .get_mut(inode)
      .ok_or_else(|| FemError::Mesh(format!("boundary node {inode} out of range")))?;
    // nodes shared by two segments keep the first one
    slot.get_or_insert(segment);
  }
  TriangleMesh::new(points, triangles, boundary)
}

pub fn load_gmsh(path: impl AsRef<Path>) -> Result<TriangleMesh> {
  let path = path.as_ref();
  let bytes = std::fs::read(path).map_err(|e| FemError::io(path, e))?;
  let mesh = gmsh2mesh(path, &bytes)?;
  tracing::info!(
    "loaded {}: {} vertices, {} triangles",
    path.display(),
    mesh.npoints(),
    mesh.ntriangles()
  );
  Ok(mesh)
}
