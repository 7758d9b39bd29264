/* packages/core/rust/src/manifest.rs */

// Reads the route manifests the host build tool leaves in its output
// directory. Only route keys are kept; per-route metadata is opaque.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::errors::{Result, TreeError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ManifestKind {
  AppPaths,
  AppBuild,
  Pages,
}

impl ManifestKind {
  /// Fixed read order; insertion-ordered output follows it.
  pub const ALL: [ManifestKind; 3] = [Self::AppPaths, Self::AppBuild, Self::Pages];

  /// Location relative to the build output directory.
  pub fn relative_path(self) -> &'static str {
    match self {
      Self::AppPaths => "server/app-paths-manifest.json",
      // also carries layout entries such as `/layout`, listed like any page
      Self::AppBuild => "app-build-manifest.json",
      Self::Pages => "server/pages-manifest.json",
    }
  }

  pub fn label(self) -> &'static str {
    match self {
      Self::AppPaths => "app-paths",
      Self::AppBuild => "app-build",
      Self::Pages => "pages",
    }
  }
}

/// Raw route keys from one manifest file, in file order.
#[derive(Debug, Clone)]
pub struct ManifestSource {
  pub kind: ManifestKind,
  pub path: PathBuf,
  pub keys: Vec<String>,
}

/// Extract route keys from manifest text.
///
/// Accepts either a flat object keyed by route, or the app-build shape where
/// the route object sits under a `pages` member. Anything else is malformed.
pub fn parse_route_keys(content: &str) -> std::result::Result<Vec<String>, String> {
  let value: serde_json::Value = serde_json::from_str(content).map_err(|e| e.to_string())?;
  let serde_json::Value::Object(mut map) = value else {
    return Err("expected a JSON object at the top level".to_string());
  };

  let nested = map.get("pages").is_some_and(serde_json::Value::is_object)
    && !map.keys().any(|k| k.starts_with('/'));
  if nested && let Some(serde_json::Value::Object(pages)) = map.remove("pages") {
    return Ok(pages.into_iter().map(|(k, _)| k).collect());
  }

  Ok(map.into_iter().map(|(k, _)| k).collect())
}

/// Read one manifest. `Ok(None)` when the file does not exist.
pub async fn read_manifest(
  build_dir: &Path,
  kind: ManifestKind,
) -> Result<Option<ManifestSource>> {
  let path = build_dir.join(kind.relative_path());
  let content = match tokio::fs::read_to_string(&path).await {
    Ok(c) => c,
    Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
    Err(e) => return Err(TreeError::io(&path, e)),
  };
  let keys = parse_route_keys(&content).map_err(|msg| TreeError::parse(&path, msg))?;
  Ok(Some(ManifestSource { kind, path, keys }))
}

/// Read every known manifest, skipping absent files and logging malformed ones.
pub async fn read_manifests(build_dir: &Path) -> Vec<ManifestSource> {
  let mut sources = Vec::new();
  for kind in ManifestKind::ALL {
    match read_manifest(build_dir, kind).await {
      Ok(Some(source)) => {
        debug!(manifest = kind.label(), keys = source.keys.len(), "manifest loaded");
        sources.push(source);
      }
      Ok(None) => debug!(manifest = kind.label(), "manifest absent, skipping"),
      Err(e) => warn!(manifest = kind.label(), error = %e, "manifest unreadable, ignoring"),
    }
  }
  sources
}

/// True when at least one known manifest file exists.
pub fn manifests_present(build_dir: &Path) -> bool {
  ManifestKind::ALL.iter().any(|k| build_dir.join(k.relative_path()).is_file())
}

/// True when `path` names one of the known manifest files.
pub fn is_manifest_path(path: &Path) -> bool {
  ManifestKind::ALL.iter().any(|k| path.ends_with(k.relative_path()))
}
