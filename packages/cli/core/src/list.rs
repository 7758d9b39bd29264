/* packages/cli/core/src/list.rs */

use anyhow::{Result, bail};
use pages_tree::RouteCollection;
use pages_tree::manifest::{ManifestKind, manifests_present, read_manifests};
use pages_tree::normalize::{RouteFilter, normalize_sources};

use crate::config::Project;
use crate::ui;

/// Read and normalize without touching the output directory.
pub async fn collect_routes(project: &Project) -> Result<(Vec<ManifestKind>, RouteCollection)> {
  let build_dir = project.build_dir();
  if !manifests_present(&build_dir) {
    bail!("no build manifests in {} (run the framework build first)", build_dir.display());
  }
  let sources = read_manifests(&build_dir).await;
  let filter = RouteFilter::from_config(&project.config.tree);
  let routes = normalize_sources(&sources, &filter, project.config.tree.output.order);
  Ok((sources.iter().map(|s| s.kind).collect(), routes))
}

pub async fn run_list(project: &Project, json: bool) -> Result<()> {
  let (kinds, routes) = collect_routes(project).await?;
  if json {
    print!("{}", routes.to_json_pretty()?);
    return Ok(());
  }

  let labels: Vec<_> = kinds.iter().map(|k| k.label()).collect();
  ui::arrow(&format!("read {}", labels.join(", ")));
  for route in routes.iter() {
    ui::detail(route);
  }
  ui::ok(&format!("{} routes", routes.len()));
  Ok(())
}
