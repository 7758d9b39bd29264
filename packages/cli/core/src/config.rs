/* packages/cli/core/src/config.rs */

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use pages_tree::{BuildContext, PagesTreeConfig};
use serde::Deserialize;

pub const CONFIG_FILE: &str = "pages-tree.toml";

/// Contents of `pages-tree.toml`. `[output]`, `[endpoint]` and `[readiness]`
/// are the core library's sections; `[build]` and `[serve]` are CLI-only.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CliConfig {
  #[serde(default)]
  pub build: BuildSection,
  #[serde(default)]
  pub serve: ServeSection,
  #[serde(flatten)]
  pub tree: PagesTreeConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BuildSection {
  #[serde(default = "default_build_dir")]
  pub dir: PathBuf,
}

impl Default for BuildSection {
  fn default() -> Self {
    Self { dir: default_build_dir() }
  }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServeSection {
  #[serde(default = "default_port")]
  pub port: u16,
}

impl Default for ServeSection {
  fn default() -> Self {
    Self { port: default_port() }
  }
}

fn default_build_dir() -> PathBuf {
  PathBuf::from(".next")
}

fn default_port() -> u16 {
  3000
}

/// Walk upward from `start` to find `pages-tree.toml`, like Cargo.toml discovery
pub fn find_config(start: &Path) -> Result<Option<PathBuf>> {
  let mut dir =
    start.canonicalize().with_context(|| format!("failed to canonicalize {}", start.display()))?;
  loop {
    let candidate = dir.join(CONFIG_FILE);
    if candidate.is_file() {
      return Ok(Some(candidate));
    }
    if !dir.pop() {
      return Ok(None);
    }
  }
}

pub fn load_config(path: &Path) -> Result<CliConfig> {
  let content =
    std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
  let config: CliConfig =
    toml::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))?;
  config.tree.validate().with_context(|| format!("invalid {}", path.display()))?;
  Ok(config)
}

/// A project root plus the configuration that applies to it.
#[derive(Debug, Clone)]
pub struct Project {
  pub root: PathBuf,
  pub config: CliConfig,
  pub config_path: Option<PathBuf>,
}

impl Project {
  pub fn with_defaults(root: impl Into<PathBuf>) -> Self {
    Self { root: root.into(), config: CliConfig::default(), config_path: None }
  }

  pub fn context(&self) -> BuildContext {
    BuildContext::new(&self.root, &self.config.build.dir)
  }

  pub fn build_dir(&self) -> PathBuf {
    self.context().build_dir
  }
}

/// Resolve the project from CLI flags. An explicit `--config` must exist;
/// otherwise the file is searched upward from `--root` (or the cwd) and
/// defaults apply when none is found.
pub fn resolve_project(
  config: Option<PathBuf>,
  root: Option<PathBuf>,
  build_dir: Option<PathBuf>,
) -> Result<Project> {
  let config_path = match config {
    Some(p) => Some(p),
    None => {
      let start = match &root {
        Some(r) => r.clone(),
        None => std::env::current_dir().context("failed to get cwd")?,
      };
      find_config(&start)?
    }
  };

  let mut project = match &config_path {
    Some(path) => {
      let cfg = load_config(path)?;
      let root = match root {
        Some(r) => r,
        None => path.parent().map_or_else(|| PathBuf::from("."), Path::to_path_buf),
      };
      Project { root, config: cfg, config_path }
    }
    None => {
      let root = match root {
        Some(r) => r,
        None => std::env::current_dir().context("failed to get cwd")?,
      };
      Project::with_defaults(root)
    }
  };

  if let Some(dir) = build_dir {
    project.config.build.dir = dir;
  }
  Ok(project)
}
