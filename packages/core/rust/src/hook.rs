/* packages/core/rust/src/hook.rs */

// Build-completion adapter. The host integration owns a one-shot signal per
// build; the hook runs the pipeline only when a server build completes.

use std::path::PathBuf;

use tokio::sync::oneshot;
use tracing::debug;

use crate::config::PagesTreeConfig;
use crate::pipeline::{BuildContext, BuildReport, run_once};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildTarget {
  Server,
  Client,
  Edge,
}

#[derive(Debug, Clone)]
pub struct BuildCompleted {
  pub target: BuildTarget,
  /// Build output directory, relative to the project root unless absolute.
  pub build_dir: PathBuf,
}

impl BuildCompleted {
  pub fn server(build_dir: impl Into<PathBuf>) -> Self {
    Self { target: BuildTarget::Server, build_dir: build_dir.into() }
  }
}

/// Sending half of a build-completion signal. Consumed on fire.
#[derive(Debug)]
pub struct BuildSignal(oneshot::Sender<BuildCompleted>);

impl BuildSignal {
  /// Returns false when the listener is already gone.
  pub fn fire(self, event: BuildCompleted) -> bool {
    self.0.send(event).is_ok()
  }
}

/// Receiving half of a build-completion signal.
#[derive(Debug)]
pub struct HookListener(oneshot::Receiver<BuildCompleted>);

impl HookListener {
  /// Wait for the signal and run the hook. `None` when the signal was
  /// dropped without firing or the build does not qualify.
  pub async fn wait(self, hook: &BuildHook) -> Option<BuildReport> {
    let Ok(event) = self.0.await else {
      debug!("build signal dropped before firing");
      return None;
    };
    hook.on_build_complete(event).await
  }
}

pub fn build_signal() -> (BuildSignal, HookListener) {
  let (tx, rx) = oneshot::channel();
  (BuildSignal(tx), HookListener(rx))
}

/// Holds the configuration for the lifetime of one host integration.
#[derive(Debug, Clone)]
pub struct BuildHook {
  project_root: PathBuf,
  config: PagesTreeConfig,
}

impl BuildHook {
  pub fn new(project_root: impl Into<PathBuf>, config: PagesTreeConfig) -> Self {
    Self { project_root: project_root.into(), config }
  }

  pub fn config(&self) -> &PagesTreeConfig {
    &self.config
  }

  pub fn project_root(&self) -> &std::path::Path {
    &self.project_root
  }

  pub async fn on_build_complete(&self, event: BuildCompleted) -> Option<BuildReport> {
    if event.target != BuildTarget::Server {
      debug!(target = ?event.target, "not a server build, skipping");
      return None;
    }
    let ctx = BuildContext::new(&self.project_root, &event.build_dir);
    Some(run_once(&ctx, &self.config).await)
  }
}
