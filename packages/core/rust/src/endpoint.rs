/* packages/core/rust/src/endpoint.rs */

// Declarative description of the routes endpoint. The build writes it next
// to the artifacts; a reusable handler reads it and serves the collection.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::artifact::{ensure_dir, parse_script, write_file};
use crate::collection::RouteCollection;
use crate::config::{OutputFormat, PagesTreeConfig};
use crate::errors::{Result, TreeError};

pub const DESCRIPTOR_FILE: &str = "endpoint.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EndpointDescriptor {
  /// Request path the handler is mounted at.
  pub route: String,
  /// Artifact location, relative to the project root unless absolute.
  pub artifact: PathBuf,
  pub format: OutputFormat,
  pub cache_control: String,
}

pub fn cache_control_for(max_age: u32) -> String {
  format!("public, max-age={max_age}, s-maxage={max_age}, stale-while-revalidate=60")
}

/// Where the descriptor lives for a given project.
pub fn descriptor_path(project_root: &Path, config: &PagesTreeConfig) -> PathBuf {
  project_root.join(&config.output.path).join(DESCRIPTOR_FILE)
}

impl EndpointDescriptor {
  pub fn from_config(config: &PagesTreeConfig) -> Self {
    Self {
      route: config.endpoint.route.clone(),
      artifact: config.output.path.join(config.output.format.file_name()),
      format: config.output.format,
      cache_control: cache_control_for(config.endpoint.max_age),
    }
  }

  pub async fn load(path: &Path) -> Result<Self> {
    let content = tokio::fs::read_to_string(path).await.map_err(|e| TreeError::io(path, e))?;
    serde_json::from_str(&content).map_err(|e| TreeError::parse(path, e.to_string()))
  }

  pub async fn write(&self, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
      ensure_dir(parent).await?;
    }
    let mut json =
      serde_json::to_string_pretty(self).map_err(|e| TreeError::parse(path, e.to_string()))?;
    json.push('\n');
    write_file(path, &json).await
  }

  pub fn artifact_path(&self, project_root: &Path) -> PathBuf {
    project_root.join(&self.artifact)
  }

  /// Re-read the persisted collection. A missing artifact yields an empty
  /// collection; unreadable or malformed content is an error.
  pub async fn load_collection(&self, project_root: &Path) -> Result<RouteCollection> {
    let path = self.artifact_path(project_root);
    let content = match tokio::fs::read_to_string(&path).await {
      Ok(c) => c,
      Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
        return Ok(RouteCollection::default());
      }
      Err(e) => return Err(TreeError::io(&path, e)),
    };
    match self.format {
      OutputFormat::Json => {
        serde_json::from_str(&content).map_err(|e| TreeError::parse(&path, e.to_string()))
      }
      OutputFormat::Js => parse_script(&content).map_err(|msg| TreeError::parse(&path, msg)),
    }
  }
}
