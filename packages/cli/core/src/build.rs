/* packages/cli/core/src/build.rs */

// Acts as the host integration: one server build-completion signal per run.

use std::path::Path;

use anyhow::{Context, Result, bail};
use pages_tree::{BuildCompleted, BuildHook, BuildReport, Outcome, build_signal};

use crate::config::Project;
use crate::ui;

/// Fire a fresh one-shot signal for a completed server build and wait for the report.
pub async fn fire_once(hook: &BuildHook, build_dir: &Path) -> Result<BuildReport> {
  let (signal, listener) = build_signal();
  let hook = hook.clone();
  let waiter = tokio::spawn(async move { listener.wait(&hook).await });

  if !signal.fire(BuildCompleted::server(build_dir)) {
    bail!("build hook listener stopped before the build completed");
  }
  waiter
    .await
    .context("build hook task panicked")?
    .context("server build completion produced no report")
}

pub fn print_report(hook: &BuildHook, report: &BuildReport) {
  let root = hook.project_root();
  let count = report.routes.len();
  let sources: Vec<_> = report.sources.iter().map(|k| k.label()).collect();
  if !sources.is_empty() {
    ui::arrow(&format!("read {}", sources.join(", ")));
  }

  match &report.outcome {
    Outcome::Written => {
      let out = hook.config().output.path.display();
      ui::ok(&format!("{count} routes collected into {out}"));
    }
    Outcome::Partial { failed } => {
      ui::warn(&format!("{count} routes collected, {failed} artifacts failed"));
    }
    Outcome::NoRoutes => ui::warn("no routes found, nothing written"),
    Outcome::Failed { stage, message } => ui::fail(&format!("{stage:?}: {message}")),
  }

  for artifact in &report.artifacts {
    let line = format!("{:<9} {}", artifact.kind.label(), ui::rel(root, &artifact.path));
    match &artifact.error {
      None => ui::detail_ok(&line),
      Some(e) => ui::detail_fail(&format!("{line}  {}", e.message())),
    }
  }
}

pub async fn run_build(project: &Project) -> Result<BuildReport> {
  ui::banner("build");
  if let Some(path) = &project.config_path {
    ui::arrow(&format!("config {}", ui::rel(&project.root, path)));
  }
  let hook = BuildHook::new(&project.root, project.config.tree.clone());
  let report = fire_once(&hook, &project.config.build.dir).await?;
  print_report(&hook, &report);
  ui::blank();
  Ok(report)
}
