/* packages/core/rust/src/config.rs */

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::errors::{Result, TreeError};

/// Prefix that is always excluded: API handlers are not pages.
pub const API_PREFIX: &str = "/api/";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
  #[default]
  Json,
  Js,
}

impl OutputFormat {
  pub fn file_name(self) -> &'static str {
    match self {
      Self::Json => "routes.json",
      Self::Js => "routes.js",
    }
  }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RouteOrder {
  /// Lexicographic byte order of the canonical path.
  #[default]
  Sorted,
  /// First-seen order across manifests, in manifest read order.
  Insertion,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PagesTreeConfig {
  #[serde(default)]
  pub output: OutputConfig,
  #[serde(default)]
  pub endpoint: EndpointConfig,
  #[serde(default)]
  pub readiness: ReadinessPolicy,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
  #[serde(default = "default_output_path")]
  pub path: PathBuf,
  #[serde(default)]
  pub format: OutputFormat,
  #[serde(default)]
  pub order: RouteOrder,
  #[serde(default = "default_true")]
  pub html: bool,
  /// Extra excluded prefixes. Next.js app builds also list framework
  /// internals (`/_app`, `/_document`, `/_error`, `/_not-found`);
  /// `exclude = ["/_"]` hides them.
  #[serde(default)]
  pub exclude: Vec<String>,
}

impl Default for OutputConfig {
  fn default() -> Self {
    Self {
      path: default_output_path(),
      format: OutputFormat::default(),
      order: RouteOrder::default(),
      html: true,
      exclude: Vec::new(),
    }
  }
}

#[derive(Debug, Clone, Deserialize)]
pub struct EndpointConfig {
  #[serde(default = "default_true")]
  pub enabled: bool,
  #[serde(default = "default_endpoint_route")]
  pub route: String,
  #[serde(default = "default_max_age")]
  pub max_age: u32,
}

impl Default for EndpointConfig {
  fn default() -> Self {
    Self { enabled: true, route: default_endpoint_route(), max_age: default_max_age() }
  }
}

/// Backoff schedule for waiting on the host tool to finish writing manifests.
#[derive(Debug, Clone, Deserialize)]
pub struct ReadinessPolicy {
  #[serde(default = "default_attempts")]
  pub attempts: u32,
  #[serde(default = "default_initial_delay_ms")]
  pub initial_delay_ms: u64,
  #[serde(default = "default_max_delay_ms")]
  pub max_delay_ms: u64,
}

impl Default for ReadinessPolicy {
  fn default() -> Self {
    Self {
      attempts: default_attempts(),
      initial_delay_ms: default_initial_delay_ms(),
      max_delay_ms: default_max_delay_ms(),
    }
  }
}

impl ReadinessPolicy {
  /// Poll once, never sleep.
  pub fn immediate() -> Self {
    Self { attempts: 1, initial_delay_ms: 0, max_delay_ms: 0 }
  }

  /// Delay before retry number `attempt` (0-based), doubling and capped.
  pub fn delay(&self, attempt: u32) -> Duration {
    let factor = 1u64.checked_shl(attempt.min(32)).unwrap_or(u64::MAX);
    let ms = self.initial_delay_ms.saturating_mul(factor).min(self.max_delay_ms);
    Duration::from_millis(ms)
  }
}

fn default_output_path() -> PathBuf {
  PathBuf::from(".next/static/pages-tree")
}

fn default_true() -> bool {
  true
}

fn default_endpoint_route() -> String {
  "/pages-tree".to_string()
}

fn default_max_age() -> u32 {
  3600
}

fn default_attempts() -> u32 {
  6
}

fn default_initial_delay_ms() -> u64 {
  50
}

fn default_max_delay_ms() -> u64 {
  1000
}

impl PagesTreeConfig {
  pub fn validate(&self) -> Result<()> {
    if self.output.path.as_os_str().is_empty() {
      return Err(TreeError::config("output.path must not be empty"));
    }
    let route = &self.endpoint.route;
    if !route.starts_with('/') || route.len() < 2 {
      return Err(TreeError::config(format!(
        "endpoint.route \"{route}\" must start with '/' and name a path segment"
      )));
    }
    if route.contains(['{', '}', '*']) {
      return Err(TreeError::config(format!(
        "endpoint.route \"{route}\" must be a literal path"
      )));
    }
    if let Some(bad) = self.output.exclude.iter().find(|p| !p.starts_with('/')) {
      return Err(TreeError::config(format!("output.exclude entry \"{bad}\" must start with '/'")));
    }
    if self.readiness.attempts == 0 {
      return Err(TreeError::config("readiness.attempts must be at least 1"));
    }
    Ok(())
  }

  /// Prefix of the tool's own route namespace, excluded from the listing.
  pub fn namespace(&self) -> &str {
    &self.endpoint.route
  }

  /// All excluded prefixes: the API prefix, the own namespace, then user entries.
  pub fn excluded_prefixes(&self) -> Vec<String> {
    let mut prefixes = vec![API_PREFIX.to_string(), self.namespace().to_string()];
    for p in &self.output.exclude {
      if !prefixes.contains(p) {
        prefixes.push(p.clone());
      }
    }
    prefixes
  }
}
