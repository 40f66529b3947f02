//! Plain-text persistence of matrices and vectors, and the checkpoint store
//! built on top of it.
//!
//! Matrix files start with the dimension `N`, followed by one line per row:
//! the cumulative entry count `row_ptr[r+1]` and then `column value` pairs.
//! Vector files written here start with the entry count.

use crate::{
  diagnostics::Diagnostics,
  error::{FemError, Result},
  sparse::SparseMatrix,
  vector::Vector,
};

use std::{
  fs::File,
  io::{BufWriter, Write},
  path::{Path, PathBuf},
  str::FromStr,
};

pub fn write_matrix<W: Write>(mut writer: W, matrix: &SparseMatrix) -> std::io::Result<()> {
  writeln!(writer, "{}", matrix.size())?;
  for r in 0..matrix.size() {
    write!(writer, "{}", matrix.row_ptr()[r + 1])?;
    for (c, v) in matrix.row_iter(r) {
      write!(writer, " {c} {v}")?;
    }
    writeln!(writer)?;
  }
  Ok(())
}

pub fn write_vector<W: Write>(mut writer: W, vector: &Vector) -> std::io::Result<()> {
  writeln!(writer, "{}", vector.len())?;
  for v in vector {
    writeln!(writer, "{v}")?;
  }
  Ok(())
}

pub fn save_matrix(matrix: &SparseMatrix, path: impl AsRef<Path>) -> Result<()> {
  let path = path.as_ref();
  let file = File::create(path).map_err(|e| FemError::io(path, e))?;
  let mut writer = BufWriter::new(file);
  write_matrix(&mut writer, matrix)
    .and_then(|_| writer.flush())
    .map_err(|e| FemError::io(path, e))
}

pub fn save_vector(vector: &Vector, path: impl AsRef<Path>) -> Result<()> {
  let path = path.as_ref();
  let file = File::create(path).map_err(|e| FemError::io(path, e))?;
  let mut writer = BufWriter::new(file);
  write_vector(&mut writer, vector)
    .and_then(|_| writer.flush())
    .map_err(|e| FemError::io(path, e))
}

/// Whitespace separated tokens tagged with their (1-based) line number.
struct Tokens<'a> {
  path: &'a Path,
  iter: Box<dyn Iterator<Item = (usize, &'a str)> + 'a>,
  line: usize,
}
impl<'a> Tokens<'a> {
  fn new(path: &'a Path, content: &'a str) -> Self {
    let iter = content
      .lines()
      .enumerate()
      .flat_map(|(iline, line)| line.split_whitespace().map(move |t| (iline + 1, t)));
    Self {
      path,
      iter: Box::new(iter),
      line: 1,
    }
  }

  fn parse_next<T: FromStr>(&mut self, what: &str) -> Result<T> {
    let (line, token) = self
      .iter
      .next()
      .ok_or_else(|| FemError::parse(self.path, self.line, format!("missing {what}")))?;
    self.line = line;
    token
      .parse()
      .map_err(|_| FemError::parse(self.path, line, format!("invalid {what} `{token}`")))
  }

  fn rest<T: FromStr>(&mut self, what: &str) -> Result<Vec<T>> {
    let mut values = Vec::new();
    while let Some((line, token)) = self.iter.next() {
      self.line = line;
      let value = token
        .parse()
        .map_err(|_| FemError::parse(self.path, line, format!("invalid {what} `{token}`")))?;
      values.push(value);
    }
    Ok(values)
  }
}

fn read_file(path: &Path) -> Result<String> {
  std::fs::read_to_string(path).map_err(|e| FemError::io(path, e))
}

pub fn parse_matrix(path: &Path, content: &str) -> Result<SparseMatrix> {
  let mut tokens = Tokens::new(path, content);
  let size: usize = tokens.parse_next("dimension")?;

  let mut row_ptr = Vec::new();
  let mut col_ind = Vec::new();
  let mut values = Vec::new();
  row_ptr.push(0);
  for _ in 0..size {
    let row_end: usize = tokens.parse_next("row pointer")?;
    let row_start = values.len();
    if row_end < row_start {
      return Err(FemError::parse(
        path,
        tokens.line,
        format!("decreasing row pointer {row_end} < {row_start}"),
      ));
    }
    for _ in row_start..row_end {
      let c: usize = tokens.parse_next("column index")?;
      if c >= size {
        return Err(FemError::parse(
          path,
          tokens.line,
          format!("column {c} out of range for dimension {size}"),
        ));
      }
      col_ind.push(c);
      values.push(tokens.parse_next("value")?);
    }
    row_ptr.push(row_end);
  }
  Ok(SparseMatrix::from_raw_parts(size, row_ptr, col_ind, values))
}

pub fn load_matrix(path: impl AsRef<Path>) -> Result<SparseMatrix> {
  let path = path.as_ref();
  parse_matrix(path, &read_file(path)?)
}

/// Loads a vector whose first token is its length.
pub fn load_vector(path: impl AsRef<Path>) -> Result<Vector> {
  let path = path.as_ref();
  let content = read_file(path)?;
  let mut tokens = Tokens::new(path, &content);
  let len: usize = tokens.parse_next("length")?;
  let mut values = Vec::new();
  for _ in 0..len {
    values.push(tokens.parse_next("value")?);
  }
  Ok(Vector::from(values))
}

/// Loads a vector from bare values; the length is the number of tokens.
pub fn load_vector_implicit(path: impl AsRef<Path>) -> Result<Vector> {
  let path = path.as_ref();
  let content = read_file(path)?;
  let values = Tokens::new(path, &content).rest("value")?;
  Ok(Vector::from(values))
}

/// On-disk memoization of assembled artifacts under a destination directory.
///
/// A file that cannot be opened counts as absent. A file that opens but does
/// not parse is reported and also treated as absent. Well-formed files are
/// trusted verbatim.
#[derive(Debug, Clone)]
pub struct Checkpoint {
  dir: PathBuf,
  save: bool,
}

impl Checkpoint {
  pub const STIFFNESS: &'static str = "G.mat";
  pub const OPERATOR: &'static str = "M.mat";
  pub const FORCING: &'static str = "F.vec";
  pub const SOLUTION: &'static str = "U.vec";

  pub fn new(dir: impl Into<PathBuf>, save: bool) -> Self {
    Self {
      dir: dir.into(),
      save,
    }
  }

  /// `U0000.vec`, `U0001.vec`, ...
  pub fn step_name(istep: usize) -> String {
    format!("U{istep:04}.vec")
  }

  pub fn dir(&self) -> &Path {
    &self.dir
  }
  pub fn saves(&self) -> bool {
    self.save
  }
  pub fn path(&self, name: &str) -> PathBuf {
    self.dir.join(name)
  }
  pub fn exists(&self, name: &str) -> bool {
    self.path(name).is_file()
  }

  pub fn load_matrix(
    &self,
    name: &str,
    size: usize,
    diag: &dyn Diagnostics,
  ) -> Option<SparseMatrix> {
    let path = self.path(name);
    let content = std::fs::read_to_string(&path).ok()?;
    let loaded = parse_matrix(&path, &content).and_then(|m| {
      if m.size() == size {
        Ok(m)
      } else {
        Err(FemError::DimensionMismatch {
          expected: size,
          found: m.size(),
        })
      }
    });
    self.report(loaded, &path, diag)
  }

  pub fn load_vector(&self, name: &str, len: usize, diag: &dyn Diagnostics) -> Option<Vector> {
    let path = self.path(name);
    if !path.is_file() {
      return None;
    }
    let loaded = load_vector(&path).and_then(|v| {
      if v.len() == len {
        Ok(v)
      } else {
        Err(FemError::DimensionMismatch {
          expected: len,
          found: v.len(),
        })
      }
    });
    self.report(loaded, &path, diag)
  }

  fn report<T>(&self, loaded: Result<T>, path: &Path, diag: &dyn Diagnostics) -> Option<T> {
    match loaded {
      Ok(t) => {
        diag.debug(&format!("loaded checkpoint `{}`", path.display()));
        Some(t)
      }
      Err(FemError::Io { .. }) => None,
      Err(e) => {
        diag.warn(&format!("ignoring checkpoint `{}`: {e}", path.display()));
        None
      }
    }
  }

  fn ensure_dir(&self) -> Result<()> {
    std::fs::create_dir_all(&self.dir).map_err(|e| FemError::io(&self.dir, e))
  }

  /// Writes `matrix` if saving is enabled. Failures are reported, not raised.
  pub fn store_matrix(&self, name: &str, matrix: &SparseMatrix, diag: &dyn Diagnostics) {
    if !self.save {
      return;
    }
    let path = self.path(name);
    if let Err(e) = self.ensure_dir().and_then(|_| save_matrix(matrix, &path)) {
      diag.error(&format!("failed to save checkpoint: {e}"));
    }
  }

  /// Writes `vector` if saving is enabled. Failures are reported, not raised.
  pub fn store_vector(&self, name: &str, vector: &Vector, diag: &dyn Diagnostics) {
    if !self.save {
      return;
    }
    let path = self.path(name);
    if let Err(e) = self.ensure_dir().and_then(|_| save_vector(vector, &path)) {
      diag.error(&format!("failed to save checkpoint: {e}"));
    }
  }
}
