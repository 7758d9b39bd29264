/* packages/core/rust/src/pipeline.rs */

// One run per build: Idle -> Triggered -> Reading -> Normalizing -> Writing -> Done.
// A failure jumps straight to Done. Nothing here returns an error to the caller.

use std::path::{Path, PathBuf};

use chrono::Utc;
use tracing::{debug, error, info, instrument, warn};

use crate::artifact::{ArtifactKind, ArtifactOutcome, ArtifactWriter};
use crate::collection::RouteCollection;
use crate::config::PagesTreeConfig;
use crate::endpoint::{EndpointDescriptor, descriptor_path};
use crate::manifest::{ManifestKind, read_manifests};
use crate::normalize::{RouteFilter, normalize_sources};
use crate::readiness::{Readiness, wait_for_manifests};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
  Idle,
  Triggered,
  Reading,
  Normalizing,
  Writing,
  Done,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
  /// Every planned artifact was written.
  Written,
  /// Some artifacts were written, some failed.
  Partial { failed: usize },
  /// Normalization produced nothing; no artifacts were touched.
  NoRoutes,
  Failed { stage: PipelineStage, message: String },
}

#[derive(Debug, Clone)]
pub struct BuildContext {
  pub project_root: PathBuf,
  pub build_dir: PathBuf,
}

impl BuildContext {
  /// `build_dir` is resolved against `project_root` unless absolute.
  pub fn new(project_root: impl Into<PathBuf>, build_dir: impl AsRef<Path>) -> Self {
    let project_root = project_root.into();
    let build_dir = project_root.join(build_dir);
    Self { project_root, build_dir }
  }

  pub fn output_dir(&self, config: &PagesTreeConfig) -> PathBuf {
    self.project_root.join(&config.output.path)
  }
}

#[derive(Debug)]
pub struct BuildReport {
  pub routes: RouteCollection,
  pub sources: Vec<ManifestKind>,
  pub readiness: Option<Readiness>,
  pub artifacts: Vec<ArtifactOutcome>,
  pub outcome: Outcome,
  /// Stages entered, in order. Always ends with `Done`.
  pub stages: Vec<PipelineStage>,
}

impl BuildReport {
  fn new() -> Self {
    Self {
      routes: RouteCollection::default(),
      sources: Vec::new(),
      readiness: None,
      artifacts: Vec::new(),
      outcome: Outcome::NoRoutes,
      stages: vec![PipelineStage::Idle],
    }
  }

  fn enter(&mut self, stage: PipelineStage) {
    debug!(?stage, "pipeline stage");
    self.stages.push(stage);
  }

  fn finish(mut self, outcome: Outcome) -> Self {
    self.outcome = outcome;
    self.enter(PipelineStage::Done);
    self
  }

  pub fn stage(&self) -> PipelineStage {
    self.stages.last().copied().unwrap_or(PipelineStage::Idle)
  }

  pub fn written(&self) -> impl Iterator<Item = &ArtifactOutcome> {
    self.artifacts.iter().filter(|a| a.is_written())
  }
}

fn classify(artifacts: &[ArtifactOutcome]) -> Outcome {
  let failed = artifacts.iter().filter(|a| !a.is_written()).count();
  if failed == 0 {
    Outcome::Written
  } else if failed == artifacts.len() {
    let message = "no artifact could be written".to_string();
    Outcome::Failed { stage: PipelineStage::Writing, message }
  } else {
    Outcome::Partial { failed }
  }
}

async fn write_descriptor(ctx: &BuildContext, config: &PagesTreeConfig) -> ArtifactOutcome {
  let path = descriptor_path(&ctx.project_root, config);
  let descriptor = EndpointDescriptor::from_config(config);
  match descriptor.write(&path).await {
    Ok(()) => {
      info!(route = %descriptor.route, path = %path.display(), "endpoint descriptor written");
      ArtifactOutcome::written(ArtifactKind::Endpoint, path)
    }
    Err(e) => {
      warn!(path = %path.display(), error = %e, "endpoint descriptor failed");
      ArtifactOutcome::failed(ArtifactKind::Endpoint, path, e)
    }
  }
}

/// Run the whole pipeline once for a finished build.
#[instrument(skip_all, fields(build_dir = %ctx.build_dir.display()))]
pub async fn run_once(ctx: &BuildContext, config: &PagesTreeConfig) -> BuildReport {
  let mut report = BuildReport::new();
  report.enter(PipelineStage::Triggered);

  if let Err(e) = config.validate() {
    error!(error = %e, "invalid configuration, skipping route collection");
    let message = e.to_string();
    return report.finish(Outcome::Failed { stage: PipelineStage::Triggered, message });
  }

  report.enter(PipelineStage::Reading);
  let readiness = wait_for_manifests(&ctx.build_dir, &config.readiness).await;
  if let Readiness::TimedOut { attempts } = readiness {
    debug!(attempts, "manifests not settled, reading what is on disk");
  }
  report.readiness = Some(readiness);
  let sources = read_manifests(&ctx.build_dir).await;
  report.sources = sources.iter().map(|s| s.kind).collect();

  report.enter(PipelineStage::Normalizing);
  let filter = RouteFilter::from_config(config);
  let routes = normalize_sources(&sources, &filter, config.output.order);
  if routes.is_empty() {
    warn!(manifests = sources.len(), "no routes found, skipping artifact generation");
    return report.finish(Outcome::NoRoutes);
  }
  info!(routes = routes.len(), "route collection built");

  report.enter(PipelineStage::Writing);
  let output_dir = ctx.output_dir(config);
  let writer = ArtifactWriter::new(&output_dir, &config.output);
  let mut artifacts = writer.write_all(&routes, Utc::now()).await;
  if config.endpoint.enabled {
    artifacts.push(write_descriptor(ctx, config).await);
  }

  let outcome = classify(&artifacts);
  if let Outcome::Failed { message, .. } = &outcome {
    error!(dir = %output_dir.display(), "{message}");
  }
  report.routes = routes;
  report.artifacts = artifacts;
  report.finish(outcome)
}

#[cfg(test)]
mod tests;
