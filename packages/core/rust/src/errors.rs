/* packages/core/rust/src/errors.rs */

use std::fmt;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
  Io,
  Parse,
  Config,
}

impl ErrorKind {
  pub fn code(self) -> &'static str {
    match self {
      Self::Io => "IO_ERROR",
      Self::Parse => "PARSE_ERROR",
      Self::Config => "CONFIG_ERROR",
    }
  }
}

#[derive(Debug)]
pub struct TreeError {
  kind: ErrorKind,
  message: String,
  path: Option<PathBuf>,
}

pub type Result<T> = std::result::Result<T, TreeError>;

impl TreeError {
  pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
    Self { kind, message: message.into(), path: None }
  }

  pub fn io(path: &Path, err: std::io::Error) -> Self {
    Self { kind: ErrorKind::Io, message: err.to_string(), path: Some(path.to_path_buf()) }
  }

  pub fn parse(path: &Path, msg: impl Into<String>) -> Self {
    Self { kind: ErrorKind::Parse, message: msg.into(), path: Some(path.to_path_buf()) }
  }

  pub fn config(msg: impl Into<String>) -> Self {
    Self::new(ErrorKind::Config, msg)
  }

  pub fn kind(&self) -> ErrorKind {
    self.kind
  }

  pub fn code(&self) -> &'static str {
    self.kind.code()
  }

  pub fn message(&self) -> &str {
    &self.message
  }

  pub fn path(&self) -> Option<&Path> {
    self.path.as_deref()
  }

  /// HTTP status used when the error surfaces through the routes endpoint.
  /// Every kind is a server-side fault from the caller's point of view.
  pub fn status(&self) -> u16 {
    500
  }
}

impl fmt::Display for TreeError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match &self.path {
      Some(path) => write!(f, "{}: {} ({})", self.code(), self.message, path.display()),
      None => write!(f, "{}: {}", self.code(), self.message),
    }
  }
}

impl std::error::Error for TreeError {}
