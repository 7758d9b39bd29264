/* packages/core/rust/src/normalize.rs */

// Turns raw manifest keys into the canonical route list:
// exclude -> canonicalize -> dedupe -> order.

use std::collections::HashSet;

use crate::collection::RouteCollection;
use crate::config::{API_PREFIX, PagesTreeConfig, RouteOrder};
use crate::manifest::ManifestSource;

/// Trailing segments that mark a page component or a route handler.
const MARKERS: [&str; 2] = ["/page", "/route"];

/// Prefix-based exclusion. The API prefix is always present.
#[derive(Debug, Clone)]
pub struct RouteFilter {
  prefixes: Vec<String>,
}

impl RouteFilter {
  pub fn new<I, S>(prefixes: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    let mut all = vec![API_PREFIX.to_string()];
    for p in prefixes {
      let p = p.into();
      if !p.is_empty() && !all.contains(&p) {
        all.push(p);
      }
    }
    Self { prefixes: all }
  }

  pub fn from_config(config: &PagesTreeConfig) -> Self {
    Self::new(config.excluded_prefixes())
  }

  pub fn prefixes(&self) -> &[String] {
    &self.prefixes
  }

  pub fn is_excluded(&self, path: &str) -> bool {
    self.prefixes.iter().any(|p| path.starts_with(p.as_str()))
  }
}

impl Default for RouteFilter {
  fn default() -> Self {
    Self::new(PagesTreeConfig::default().excluded_prefixes())
  }
}

/// Strip one trailing `/page` or `/route` segment. The root marker maps to `/`.
pub fn canonicalize(key: &str) -> String {
  for marker in MARKERS {
    if let Some(stripped) = key.strip_suffix(marker) {
      if stripped.is_empty() {
        return "/".to_string();
      }
      return stripped.to_string();
    }
  }
  key.to_string()
}

pub fn normalize<I, S>(keys: I, filter: &RouteFilter, order: RouteOrder) -> RouteCollection
where
  I: IntoIterator<Item = S>,
  S: AsRef<str>,
{
  let mut seen = HashSet::new();
  let mut routes = Vec::new();

  for key in keys {
    let key = key.as_ref();
    if filter.is_excluded(key) {
      continue;
    }
    let path = canonicalize(key);
    // `/pages-tree/route` canonicalizes into the namespace itself
    if filter.is_excluded(&path) {
      continue;
    }
    if seen.insert(path.clone()) {
      routes.push(path);
    }
  }

  if order == RouteOrder::Sorted {
    routes.sort();
  }
  RouteCollection::new(routes)
}

/// Normalize the keys of several manifests, taken in source order.
pub fn normalize_sources(
  sources: &[ManifestSource],
  filter: &RouteFilter,
  order: RouteOrder,
) -> RouteCollection {
  normalize(sources.iter().flat_map(|s| s.keys.iter()), filter, order)
}
