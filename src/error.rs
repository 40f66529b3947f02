use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FemError {
  #[error("failed to access `{path}`")]
  Io {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },
  #[error("malformed file `{path}` at line {line}: {message}")]
  Parse {
    path: PathBuf,
    line: usize,
    message: String,
  },
  #[error("invalid mesh: {0}")]
  Mesh(String),
  #[error("dimension mismatch: expected {expected}, found {found}")]
  DimensionMismatch { expected: usize, found: usize },
}

impl FemError {
  pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
    Self::Io {
      path: path.into(),
      source,
    }
  }

  pub fn parse(path: impl Into<PathBuf>, line: usize, message: impl Into<String>) -> Self {
    Self::Parse {
      path: path.into(),
      line,
      message: message.into(),
    }
  }
}

pub type Result<T> = std::result::Result<T, FemError>;
