/* packages/adapter/axum/src/handler.rs */

use std::path::PathBuf;
use std::sync::Arc;

use axum::extract::State;
use axum::http::header;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use pages_tree::{EndpointDescriptor, TreeError};
use tracing::{debug, error};

use crate::error::AxumError;

pub(crate) struct EndpointState {
  pub project_root: PathBuf,
  pub descriptor: EndpointDescriptor,
}

fn check_route(route: &str) -> Result<(), TreeError> {
  if !route.starts_with('/') || route.len() < 2 || route.contains(['{', '}', '*']) {
    return Err(TreeError::config(format!("endpoint route '{route}' is not a static path")));
  }
  Ok(())
}

/// Router with a single GET route at `descriptor.route` serving the
/// persisted collection. Other methods get axum's 405.
pub fn routes_router(
  project_root: impl Into<PathBuf>,
  descriptor: EndpointDescriptor,
) -> Result<Router, TreeError> {
  check_route(&descriptor.route)?;
  let route = descriptor.route.clone();
  let state = Arc::new(EndpointState { project_root: project_root.into(), descriptor });
  Ok(Router::new().route(&route, get(handle_routes)).with_state(state))
}

async fn handle_routes(
  State(state): State<Arc<EndpointState>>,
) -> Result<impl IntoResponse, AxumError> {
  let collection =
    state.descriptor.load_collection(&state.project_root).await.map_err(|e| {
      error!(error = %e, "failed to load route collection");
      AxumError(e)
    })?;
  debug!(routes = collection.len(), "serving route collection");
  let headers = [(header::CACHE_CONTROL, state.descriptor.cache_control.clone())];
  Ok((headers, axum::Json(collection)))
}

#[cfg(test)]
mod tests {
  use std::path::Path;

  use axum::body::Body;
  use axum::http::{Method, Request, StatusCode};
  use http_body_util::BodyExt;
  use pages_tree::artifact::render_script;
  use pages_tree::{OutputFormat, PagesTreeConfig, RouteCollection};
  use tower::ServiceExt;

  use super::*;

  fn descriptor(format: OutputFormat) -> EndpointDescriptor {
    let mut config = PagesTreeConfig::default();
    config.output.format = format;
    EndpointDescriptor::from_config(&config)
  }

  fn seed(root: &Path, d: &EndpointDescriptor, content: &str) {
    let path = d.artifact_path(root);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, content).unwrap();
  }

  async fn call(router: Router, method: Method, uri: &str) -> axum::response::Response {
    let req = Request::builder().method(method).uri(uri).body(Body::empty()).unwrap();
    router.oneshot(req).await.unwrap()
  }

  async fn body_json(resp: axum::response::Response) -> serde_json::Value {
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
  }

  #[tokio::test]
  async fn serves_json_artifact_with_cache_headers() {
    let dir = tempfile::tempdir().unwrap();
    let d = descriptor(OutputFormat::Json);
    let routes = RouteCollection::new(vec!["/".into(), "/about".into()]);
    seed(dir.path(), &d, &routes.to_json_pretty().unwrap());

    let resp = call(routes_router(dir.path(), d).unwrap(), Method::GET, "/pages-tree").await;

    assert_eq!(resp.status(), StatusCode::OK);
    let headers = resp.headers();
    assert_eq!(headers[header::CONTENT_TYPE], "application/json");
    assert_eq!(
      headers[header::CACHE_CONTROL],
      "public, max-age=3600, s-maxage=3600, stale-while-revalidate=60"
    );
    let json = body_json(resp).await;
    assert_eq!(json, serde_json::json!({ "appRoutes": ["/", "/about"] }));
  }

  #[tokio::test]
  async fn serves_script_artifact_as_json() {
    let dir = tempfile::tempdir().unwrap();
    let d = descriptor(OutputFormat::Js);
    let routes = RouteCollection::new(vec!["/docs".into()]);
    seed(dir.path(), &d, &render_script(&routes).unwrap());

    let resp = call(routes_router(dir.path(), d).unwrap(), Method::GET, "/pages-tree").await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await["appRoutes"][0], "/docs");
  }

  #[tokio::test]
  async fn missing_artifact_is_empty_list() {
    let dir = tempfile::tempdir().unwrap();
    let d = descriptor(OutputFormat::Json);

    let resp = call(routes_router(dir.path(), d).unwrap(), Method::GET, "/pages-tree").await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await, serde_json::json!({ "appRoutes": [] }));
  }

  #[tokio::test]
  async fn malformed_artifact_is_server_error() {
    let dir = tempfile::tempdir().unwrap();
    let d = descriptor(OutputFormat::Json);
    seed(dir.path(), &d, "{ \"appRoutes\": ");

    let resp = call(routes_router(dir.path(), d).unwrap(), Method::GET, "/pages-tree").await;

    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = body_json(resp).await;
    assert_eq!(json["ok"], false);
    assert_eq!(json["error"]["code"], "PARSE_ERROR");
  }

  #[tokio::test]
  async fn non_get_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let router = routes_router(dir.path(), descriptor(OutputFormat::Json)).unwrap();
    let resp = call(router, Method::POST, "/pages-tree").await;
    assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
  }

  #[test]
  fn rejects_dynamic_route() {
    let mut d = descriptor(OutputFormat::Json);
    d.route = "/routes/{id}".into();
    assert!(routes_router("/tmp", d).is_err());
    let mut d = descriptor(OutputFormat::Json);
    d.route = "routes".into();
    assert!(routes_router("/tmp", d).is_err());
  }
}
