/* packages/core/rust/src/collection.rs */

use serde::{Deserialize, Serialize};

/// Canonical route list produced by one build.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteCollection {
  #[serde(rename = "appRoutes")]
  pub app_routes: Vec<String>,
}

impl RouteCollection {
  pub fn new(app_routes: Vec<String>) -> Self {
    Self { app_routes }
  }

  pub fn len(&self) -> usize {
    self.app_routes.len()
  }

  pub fn is_empty(&self) -> bool {
    self.app_routes.is_empty()
  }

  pub fn iter(&self) -> impl Iterator<Item = &str> {
    self.app_routes.iter().map(String::as_str)
  }

  /// Pretty-printed JSON with a trailing newline, stable for diffs.
  pub fn to_json_pretty(&self) -> serde_json::Result<String> {
    let mut out = serde_json::to_string_pretty(self)?;
    out.push('\n');
    Ok(out)
  }
}
