/* packages/core/rust/src/pipeline/tests.rs */

use std::path::Path;

use super::PipelineStage::{Done, Idle, Normalizing, Reading, Triggered, Writing};
use super::*;
use crate::config::{OutputFormat, ReadinessPolicy, RouteOrder};

fn write(dir: &Path, rel: &str, content: &str) {
  let path = dir.join(rel);
  std::fs::create_dir_all(path.parent().unwrap()).unwrap();
  std::fs::write(path, content).unwrap();
}

fn config() -> PagesTreeConfig {
  let mut config = PagesTreeConfig::default();
  config.readiness = ReadinessPolicy::immediate();
  config
}

fn next_project(root: &Path) {
  write(
    root,
    ".next/server/app-paths-manifest.json",
    r#"{
      "/page": "app/page.js",
      "/about/page": "app/about/page.js",
      "/blog/[slug]/page": "app/blog/[slug]/page.js",
      "/api/users/route": "app/api/users/route.js",
      "/pages-tree/route": "app/pages-tree/route.js"
    }"#,
  );
  write(
    root,
    ".next/app-build-manifest.json",
    r#"{ "pages": { "/page": ["a.js"], "/about/page": ["b.js"] } }"#,
  );
}

#[tokio::test]
async fn full_run_writes_all_artifacts() {
  let dir = tempfile::tempdir().unwrap();
  next_project(dir.path());
  let ctx = BuildContext::new(dir.path(), ".next");

  let report = run_once(&ctx, &config()).await;

  assert_eq!(report.outcome, Outcome::Written);
  assert_eq!(report.stages, vec![Idle, Triggered, Reading, Normalizing, Writing, Done]);
  assert_eq!(report.routes.app_routes, vec!["/", "/about", "/blog/[slug]"]);
  assert_eq!(report.sources, vec![ManifestKind::AppPaths, ManifestKind::AppBuild]);
  assert_eq!(report.written().count(), 3);

  let out = dir.path().join(".next/static/pages-tree");
  let json = std::fs::read_to_string(out.join("routes.json")).unwrap();
  let back: RouteCollection = serde_json::from_str(&json).unwrap();
  assert_eq!(back, report.routes);
  assert!(out.join("index.html").is_file());
  assert!(out.join("endpoint.json").is_file());
}

#[tokio::test]
async fn no_manifests_produces_no_artifacts() {
  let dir = tempfile::tempdir().unwrap();
  let ctx = BuildContext::new(dir.path(), ".next");

  let report = run_once(&ctx, &config()).await;

  assert_eq!(report.outcome, Outcome::NoRoutes);
  assert_eq!(report.stages, vec![Idle, Triggered, Reading, Normalizing, Done]);
  assert_eq!(report.readiness, Some(Readiness::TimedOut { attempts: 1 }));
  assert!(report.artifacts.is_empty());
  assert!(!dir.path().join(".next/static/pages-tree").exists());
}

#[tokio::test]
async fn only_excluded_keys_is_no_routes() {
  let dir = tempfile::tempdir().unwrap();
  write(
    dir.path(),
    ".next/server/app-paths-manifest.json",
    r#"{"/api/a/route":"x","/pages-tree/route":"y"}"#,
  );
  let report = run_once(&BuildContext::new(dir.path(), ".next"), &config()).await;
  assert_eq!(report.outcome, Outcome::NoRoutes);
  assert!(report.artifacts.is_empty());
}

#[tokio::test]
async fn malformed_manifest_does_not_block_others() {
  let dir = tempfile::tempdir().unwrap();
  write(dir.path(), ".next/server/app-paths-manifest.json", "{ not json");
  write(dir.path(), ".next/server/pages-manifest.json", r#"{"/legacy":"l.js","/api/x":"a.js"}"#);

  let report = run_once(&BuildContext::new(dir.path(), ".next"), &config()).await;

  assert_eq!(report.outcome, Outcome::Written);
  assert_eq!(report.sources, vec![ManifestKind::Pages]);
  assert_eq!(report.routes.app_routes, vec!["/legacy"]);
}

#[tokio::test]
async fn js_format_without_html_or_endpoint() {
  let dir = tempfile::tempdir().unwrap();
  next_project(dir.path());
  let mut cfg = config();
  cfg.output.format = OutputFormat::Js;
  cfg.output.html = false;
  cfg.endpoint.enabled = false;
  cfg.output.path = "public/meta".into();

  let report = run_once(&BuildContext::new(dir.path(), ".next"), &cfg).await;

  assert_eq!(report.outcome, Outcome::Written);
  assert_eq!(report.artifacts.len(), 1);
  assert_eq!(report.artifacts[0].kind, ArtifactKind::Script);
  let out = dir.path().join("public/meta");
  assert!(out.join("routes.js").is_file());
  assert!(!out.join("index.html").exists());
  assert!(!out.join("endpoint.json").exists());
}

#[tokio::test]
async fn insertion_order_follows_manifests() {
  let dir = tempfile::tempdir().unwrap();
  write(
    dir.path(),
    ".next/server/app-paths-manifest.json",
    r#"{"/zeta/page":"z","/page":"r","/alpha/page":"a"}"#,
  );
  write(dir.path(), ".next/server/pages-manifest.json", r#"{"/beta":"b","/zeta":"z"}"#);
  let mut cfg = config();
  cfg.output.order = RouteOrder::Insertion;

  let report = run_once(&BuildContext::new(dir.path(), ".next"), &cfg).await;

  assert_eq!(report.routes.app_routes, vec!["/zeta", "/", "/alpha", "/beta"]);
}

#[tokio::test]
async fn identical_route_sets_give_identical_bytes() {
  let a = tempfile::tempdir().unwrap();
  let b = tempfile::tempdir().unwrap();
  write(a.path(), ".next/server/app-paths-manifest.json", r#"{"/b/page":"1","/a/page":"2"}"#);
  write(b.path(), ".next/server/app-paths-manifest.json", r#"{"/a/page":"2","/b/page":"1"}"#);

  run_once(&BuildContext::new(a.path(), ".next"), &config()).await;
  run_once(&BuildContext::new(b.path(), ".next"), &config()).await;

  let rel = ".next/static/pages-tree/routes.json";
  let left = std::fs::read(a.path().join(rel)).unwrap();
  let right = std::fs::read(b.path().join(rel)).unwrap();
  assert_eq!(left, right);
}

#[tokio::test]
async fn unwritable_output_is_reported_not_raised() {
  let dir = tempfile::tempdir().unwrap();
  next_project(dir.path());
  write(dir.path(), "blocked", "a file where a directory should be");
  let mut cfg = config();
  cfg.output.path = "blocked/out".into();

  let report = run_once(&BuildContext::new(dir.path(), ".next"), &cfg).await;

  assert!(matches!(report.outcome, Outcome::Failed { stage: PipelineStage::Writing, .. }));
  assert_eq!(report.stage(), Done);
  assert_eq!(report.written().count(), 0);
}

#[tokio::test]
async fn invalid_config_fails_at_trigger() {
  let dir = tempfile::tempdir().unwrap();
  next_project(dir.path());
  let mut cfg = config();
  cfg.endpoint.route = "no-slash".into();

  let report = run_once(&BuildContext::new(dir.path(), ".next"), &cfg).await;

  assert!(matches!(report.outcome, Outcome::Failed { stage: PipelineStage::Triggered, .. }));
  assert_eq!(report.stages, vec![Idle, Triggered, Done]);
}

#[test]
fn build_context_resolves_relative_build_dir() {
  let ctx = BuildContext::new("/srv/app", ".next");
  assert_eq!(ctx.build_dir, Path::new("/srv/app/.next"));
  let ctx = BuildContext::new("/srv/app", "/tmp/out");
  assert_eq!(ctx.build_dir, Path::new("/tmp/out"));
  assert_eq!(
    ctx.output_dir(&PagesTreeConfig::default()),
    Path::new("/srv/app/.next/static/pages-tree")
  );
}
