/* packages/cli/core/src/watch.rs */

use std::time::Duration;

use anyhow::{Context, Result};
use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use pages_tree::BuildHook;
use pages_tree::manifest::is_manifest_path;
use tokio::signal;
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::build::{fire_once, print_report};
use crate::config::Project;
use crate::ui::{self, DIM, RESET};

const DEBOUNCE: Duration = Duration::from_millis(300);

/// Only manifest writes matter; our own artifacts land inside the build dir too.
fn is_relevant(event: &notify::Event) -> bool {
  !event.kind.is_access() && event.paths.iter().any(|p| is_manifest_path(p))
}

fn setup_watcher() -> Result<(RecommendedWatcher, mpsc::Receiver<()>)> {
  let (tx, rx) = mpsc::channel(16);
  let watcher = RecommendedWatcher::new(
    move |res: notify::Result<notify::Event>| {
      if let Ok(event) = res
        && is_relevant(&event)
      {
        let _ = tx.blocking_send(());
      }
    },
    notify::Config::default(),
  )?;
  Ok((watcher, rx))
}

pub async fn run_watch(project: &Project) -> Result<()> {
  ui::banner("watch");
  let build_dir = project.build_dir();
  std::fs::create_dir_all(&build_dir)
    .with_context(|| format!("failed to create {}", build_dir.display()))?;

  let (mut watcher, mut rx) = setup_watcher()?;
  watcher
    .watch(&build_dir, RecursiveMode::Recursive)
    .with_context(|| format!("failed to watch {}", build_dir.display()))?;
  ui::arrow(&format!("watching {}", ui::rel(&project.root, &build_dir)));
  ui::blank();

  let hook = BuildHook::new(&project.root, project.config.tree.clone());
  let mut runs = 0u32;

  loop {
    tokio::select! {
      _ = signal::ctrl_c() => {
        ui::blank();
        println!("  {DIM}shutting down...{RESET}");
        break;
      }
      Some(()) = rx.recv() => {
        // Debounce: wait, then drain whatever queued up meanwhile
        tokio::time::sleep(DEBOUNCE).await;
        let mut coalesced = 0;
        while rx.try_recv().is_ok() {
          coalesced += 1;
        }
        runs += 1;
        debug!(coalesced, "manifest events drained");
        info!(run = runs, "manifests changed, collecting routes");
        let report = fire_once(&hook, &project.config.build.dir).await?;
        print_report(&hook, &report);
        ui::blank();
      }
    }
  }

  Ok(())
}
