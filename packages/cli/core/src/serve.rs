/* packages/cli/core/src/serve.rs */

// Local preview: the routes endpoint plus the generated files.

use anyhow::{Context, Result, bail};
use axum::Router;
use pages_tree::EndpointDescriptor;
use pages_tree_axum::{IntoAxumRouter, RoutesEndpoint};
use tokio::signal;
use tower_http::services::ServeDir;
use tracing::{info, warn};

use crate::config::Project;
use crate::ui::{self, DIM, RESET};

pub const STATIC_MOUNT: &str = "/_pages-tree";

/// Prefer the descriptor the last build wrote; fall back to the configuration.
async fn endpoint(project: &Project) -> RoutesEndpoint {
  match RoutesEndpoint::load(&project.root, &project.config.tree).await {
    Ok(endpoint) => endpoint,
    Err(e) => {
      warn!(error = %e, "no endpoint descriptor, using configured route");
      let descriptor = EndpointDescriptor::from_config(&project.config.tree);
      RoutesEndpoint::new(&project.root, descriptor)
    }
  }
}

/// Returns the app and the endpoint route it serves.
pub async fn router(project: &Project) -> Result<(Router, String)> {
  let endpoint = endpoint(project).await;
  let route = endpoint.route().to_string();
  if route.starts_with(STATIC_MOUNT) {
    bail!("endpoint route {route} collides with the static mount {STATIC_MOUNT}");
  }
  let output_dir = project.root.join(&project.config.tree.output.path);
  let app = endpoint.into_axum_router()?.nest_service(STATIC_MOUNT, ServeDir::new(output_dir));
  Ok((app, route))
}

pub async fn run_serve(project: &Project, port: Option<u16>) -> Result<()> {
  ui::banner("serve");
  let port = port.unwrap_or(project.config.serve.port);
  let (app, route) = router(project).await?;

  let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}"))
    .await
    .with_context(|| format!("failed to bind port {port}"))?;
  let local_addr = listener.local_addr()?;
  let origin = format!("http://localhost:{}", local_addr.port());
  ui::url("routes", &format!("{origin}{route}"));
  ui::url("index", &format!("{origin}{STATIC_MOUNT}/"));
  ui::blank();
  info!(%local_addr, %route, "serving");

  axum::serve(listener, app)
    .with_graceful_shutdown(async {
      let _ = signal::ctrl_c().await;
      ui::blank();
      println!("  {DIM}shutting down...{RESET}");
    })
    .await
    .context("server error")?;
  Ok(())
}

#[cfg(test)]
mod tests {
  use axum::body::Body;
  use axum::http::{Request, StatusCode};
  use http_body_util::BodyExt;
  use pages_tree::config::ReadinessPolicy;
  use tower::ServiceExt;

  use super::*;
  use crate::build::run_build;

  async fn built_project(root: &std::path::Path) -> Project {
    let server = root.join(".next/server");
    std::fs::create_dir_all(&server).unwrap();
    std::fs::write(server.join("app-paths-manifest.json"), r#"{"/page":"a","/shop/page":"b"}"#)
      .unwrap();
    let mut project = Project::with_defaults(root);
    project.config.tree.readiness = ReadinessPolicy::immediate();
    run_build(&project).await.unwrap();
    project
  }

  async fn get(app: Router, uri: &str) -> (StatusCode, String) {
    let req = Request::builder().uri(uri).body(Body::empty()).unwrap();
    let resp = app.oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
  }

  #[tokio::test]
  async fn serves_endpoint_and_static_files() {
    let dir = tempfile::tempdir().unwrap();
    let project = built_project(dir.path()).await;
    let (app, route) = router(&project).await.unwrap();
    assert_eq!(route, "/pages-tree");

    let (status, body) = get(app.clone(), "/pages-tree").await;
    assert_eq!(status, StatusCode::OK);
    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["appRoutes"], serde_json::json!(["/", "/shop"]));

    let (status, body) = get(app.clone(), "/_pages-tree/routes.json").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("\"/shop\""));

    let (status, body) = get(app, "/_pages-tree/index.html").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("<a href=\"/shop\">/shop</a>"));
  }

  #[tokio::test]
  async fn falls_back_to_configured_route() {
    let dir = tempfile::tempdir().unwrap();
    let project = Project::with_defaults(dir.path());
    let (app, route) = router(&project).await.unwrap();
    assert_eq!(route, "/pages-tree");

    let (status, body) = get(app, "/pages-tree").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, r#"{"appRoutes":[]}"#);
  }
}
