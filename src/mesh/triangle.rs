//! Loader for meshes in the `.node`/`.ele` format of Shewchuk's Triangle.
//!
//! The optional boundary marker column of the `.node` file becomes the segment
//! identifier of a node, marker `0` meaning interior. Without a marker column
//! the boundary is derived from the topology and assigned segment `0`.
//! Numbering may start at either 0 or 1; the first vertex number decides.

use super::{Point, TriangleMesh};
use crate::{FemError, NodeIdx, Result, SegmentId};

use std::path::{Path, PathBuf};

/// Non-empty lines with comments stripped, paired with their line number.
fn data_lines<'a>(content: &'a str) -> impl Iterator<Item = (usize, Vec<&'a str>)> + 'a {
  content.lines().enumerate().filter_map(|(i, line)| {
    let line = line.split('#').next().unwrap_or("");
    let tokens: Vec<_> = line.split_whitespace().collect();
    (!tokens.is_empty()).then_some((i + 1, tokens))
  })
}

struct Field<'a> {
  path: &'a Path,
  line: usize,
  tokens: &'a [&'a str],
}
impl Field<'_> {
  fn get<T: std::str::FromStr>(&self, i: usize, what: &str) -> Result<T> {
    let token = self
      .tokens
      .get(i)
      .ok_or_else(|| FemError::parse(self.path, self.line, format!("missing {what}")))?;
    token
      .parse()
      .map_err(|_| FemError::parse(self.path, self.line, format!("invalid {what} `{token}`")))
  }

  /// Like [`Field::get`], but `default` if the token is absent.
  fn get_or<T: std::str::FromStr>(&self, i: usize, what: &str, default: T) -> Result<T> {
    if i < self.tokens.len() {
      self.get(i, what)
    } else {
      Ok(default)
    }
  }
}

struct NodeFile {
  first_index: usize,
  points: Vec<Point>,
  markers: Option<Vec<SegmentId>>,
}

fn parse_nodes(path: &Path, content: &str) -> Result<NodeFile> {
  let mut lines = data_lines(content);
  let (line, header) = lines
    .next()
    .ok_or_else(|| FemError::parse(path, 1, "missing header"))?;
  let header = Field {
    path,
    line,
    tokens: &header,
  };
  let npoints: usize = header.get(0, "vertex count")?;
  let dim: usize = header.get(1, "dimension")?;
  if dim != 2 {
    return Err(FemError::parse(path, line, format!("dimension {dim}, expected 2")));
  }
  let nattributes: usize = header.get_or(2, "attribute count", 0)?;
  let has_marker = header.get_or::<usize>(3, "marker count", 0)? > 0;

  let mut first_index = 0;
  let mut points = Vec::new();
  let mut markers = Vec::new();
  for k in 0..npoints {
    let (line, tokens) = lines
      .next()
      .ok_or_else(|| FemError::parse(path, line, format!("expected {npoints} vertices, found {k}")))?;
    let field = Field {
      path,
      line,
      tokens: &tokens,
    };
    let index: usize = field.get(0, "vertex number")?;
    if k == 0 {
      first_index = index;
    }
    points.push(Point::new(field.get(1, "x")?, field.get(2, "y")?));
    if has_marker {
      markers.push(field.get(3 + nattributes, "boundary marker")?);
    }
  }
  Ok(NodeFile {
    first_index,
    points,
    markers: has_marker.then_some(markers),
  })
}

fn parse_elements(path: &Path, content: &str, first_index: usize) -> Result<Vec<[NodeIdx; 3]>> {
  let mut lines = data_lines(content);
  let (line, header) = lines
    .next()
    .ok_or_else(|| FemError::parse(path, 1, "missing header"))?;
  let header = Field {
    path,
    line,
    tokens: &header,
  };
  let ntriangles: usize = header.get(0, "triangle count")?;
  let nodes_per_triangle: usize = header.get_or(1, "nodes per triangle", 3)?;
  if nodes_per_triangle < 3 {
    return Err(FemError::parse(
      path,
      line,
      format!("{nodes_per_triangle} nodes per triangle"),
    ));
  }

  let mut triangles = Vec::new();
  for k in 0..ntriangles {
    let (line, tokens) = lines.next().ok_or_else(|| {
      FemError::parse(path, line, format!("expected {ntriangles} triangles, found {k}"))
    })?;
    let field = Field {
      path,
      line,
      tokens: &tokens,
    };
    let mut tria = [0; 3];
    for (i, slot) in tria.iter_mut().enumerate() {
      let node: usize = field.get(1 + i, "node number")?;
      *slot = node
        .checked_sub(first_index)
        .ok_or_else(|| FemError::parse(path, line, format!("node number {node} below base")))?;
    }
    triangles.push(tria);
  }
  Ok(triangles)
}

/// Builds a mesh from the contents of a `.node` and an `.ele` file.
pub fn parse_triangle(
  node_path: &Path,
  node_content: &str,
  ele_path: &Path,
  ele_content: &str,
) -> Result<TriangleMesh> {
  let nodes = parse_nodes(node_path, node_content)?;
  let triangles = parse_elements(ele_path, ele_content, nodes.first_index)?;
  match nodes.markers {
    Some(markers) => {
      let boundary = markers.into_iter().map(|m| (m != 0).then_some(m)).collect();
      TriangleMesh::new(nodes.points, triangles, boundary)
    }
    None => TriangleMesh::with_topological_boundary(nodes.points, triangles, 0),
  }
}

/// Loads `<base>.node` and `<base>.ele`.
pub fn load_triangle(base: impl AsRef<Path>) -> Result<TriangleMesh> {
  let base = base.as_ref();
  let with_ext = |ext: &str| -> PathBuf {
    let mut p = base.as_os_str().to_owned();
    p.push(ext);
    PathBuf::from(p)
  };
  let node_path = with_ext(".node");
  let ele_path = with_ext(".ele");
  let node_content =
    std::fs::read_to_string(&node_path).map_err(|e| FemError::io(&node_path, e))?;
  let ele_content = std::fs::read_to_string(&ele_path).map_err(|e| FemError::io(&ele_path, e))?;
  let mesh = parse_triangle(&node_path, &node_content, &ele_path, &ele_content)?;
  tracing::info!(
    "loaded {}: {} vertices, {} triangles",
    base.display(),
    mesh.npoints(),
    mesh.ntriangles()
  );
  Ok(mesh)
}
