/* packages/core/rust/src/artifact/mod.rs */

// Persists a route collection: data file (json or js module) plus the
// optional HTML index. Each file is written independently; one failure
// never prevents the others.

mod html;
mod script;

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::collection::RouteCollection;
use crate::config::{OutputConfig, OutputFormat};
use crate::errors::{ErrorKind, TreeError};

pub use html::render_index_html;
pub use script::{parse_script, render_json, render_script};

pub const INDEX_FILE: &str = "index.html";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
  Json,
  Script,
  Html,
  Endpoint,
}

impl ArtifactKind {
  pub fn label(self) -> &'static str {
    match self {
      Self::Json => "json",
      Self::Script => "js",
      Self::Html => "html",
      Self::Endpoint => "endpoint",
    }
  }
}

#[derive(Debug)]
pub struct ArtifactOutcome {
  pub kind: ArtifactKind,
  pub path: PathBuf,
  pub error: Option<TreeError>,
}

impl ArtifactOutcome {
  pub fn written(kind: ArtifactKind, path: PathBuf) -> Self {
    Self { kind, path, error: None }
  }

  pub fn failed(kind: ArtifactKind, path: PathBuf, error: TreeError) -> Self {
    Self { kind, path, error: Some(error) }
  }

  pub fn is_written(&self) -> bool {
    self.error.is_none()
  }
}

/// Create `dir` and all parents; succeeds when it already exists.
pub async fn ensure_dir(dir: &Path) -> crate::errors::Result<()> {
  tokio::fs::create_dir_all(dir).await.map_err(|e| TreeError::io(dir, e))
}

/// Truncate-and-write `content` to `path`.
pub async fn write_file(path: &Path, content: &str) -> crate::errors::Result<()> {
  tokio::fs::write(path, content).await.map_err(|e| TreeError::io(path, e))
}

pub struct ArtifactWriter<'a> {
  output_dir: PathBuf,
  config: &'a OutputConfig,
}

impl<'a> ArtifactWriter<'a> {
  pub fn new(output_dir: impl Into<PathBuf>, config: &'a OutputConfig) -> Self {
    Self { output_dir: output_dir.into(), config }
  }

  pub fn data_path(&self) -> PathBuf {
    self.output_dir.join(self.config.format.file_name())
  }

  fn planned(&self) -> Vec<(ArtifactKind, PathBuf)> {
    let data_kind = match self.config.format {
      OutputFormat::Json => ArtifactKind::Json,
      OutputFormat::Js => ArtifactKind::Script,
    };
    let mut plan = vec![(data_kind, self.data_path())];
    if self.config.html {
      plan.push((ArtifactKind::Html, self.output_dir.join(INDEX_FILE)));
    }
    plan
  }

  fn render(
    &self,
    kind: ArtifactKind,
    collection: &RouteCollection,
    generated_at: DateTime<Utc>,
  ) -> crate::errors::Result<String> {
    let rendered = match kind {
      ArtifactKind::Json => render_json(collection),
      ArtifactKind::Script => render_script(collection),
      ArtifactKind::Html => {
        let data_file = self.config.format.file_name();
        return Ok(render_index_html(collection, data_file, generated_at));
      }
      ArtifactKind::Endpoint => {
        return Err(TreeError::config("endpoint descriptor is written by the endpoint module"));
      }
    };
    rendered.map_err(|e| TreeError::new(ErrorKind::Parse, e.to_string()))
  }

  /// Write every configured artifact. Never fails as a whole.
  pub async fn write_all(
    &self,
    collection: &RouteCollection,
    generated_at: DateTime<Utc>,
  ) -> Vec<ArtifactOutcome> {
    let plan = self.planned();

    if let Err(e) = ensure_dir(&self.output_dir).await {
      warn!(dir = %self.output_dir.display(), error = %e, "cannot create output directory");
      return plan
        .into_iter()
        .map(|(kind, path)| {
          let err = TreeError::new(ErrorKind::Io, format!("output directory unavailable: {e}"));
          ArtifactOutcome::failed(kind, path, err)
        })
        .collect();
    }

    let mut outcomes = Vec::with_capacity(plan.len());
    for (kind, path) in plan {
      let result = match self.render(kind, collection, generated_at) {
        Ok(content) => write_file(&path, &content).await,
        Err(e) => Err(e),
      };
      match result {
        Ok(()) => {
          info!(artifact = kind.label(), path = %path.display(), "artifact written");
          outcomes.push(ArtifactOutcome::written(kind, path));
        }
        Err(e) => {
          warn!(artifact = kind.label(), path = %path.display(), error = %e, "artifact failed");
          outcomes.push(ArtifactOutcome::failed(kind, path, e));
        }
      }
    }
    outcomes
  }
}
