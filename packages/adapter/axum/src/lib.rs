/* packages/adapter/axum/src/lib.rs */

mod error;
mod handler;

use std::path::{Path, PathBuf};

use pages_tree::endpoint::descriptor_path;
use pages_tree::{EndpointDescriptor, PagesTreeConfig, TreeError};
use tracing::info;

pub use handler::routes_router;

/// Re-export pages-tree core for convenience
pub use pages_tree;

/// The routes endpoint of one project, ready to mount.
#[derive(Debug, Clone)]
pub struct RoutesEndpoint {
  project_root: PathBuf,
  descriptor: EndpointDescriptor,
}

impl RoutesEndpoint {
  pub fn new(project_root: impl Into<PathBuf>, descriptor: EndpointDescriptor) -> Self {
    Self { project_root: project_root.into(), descriptor }
  }

  /// Read the descriptor a previous build left in the output directory.
  pub async fn load(project_root: &Path, config: &PagesTreeConfig) -> Result<Self, TreeError> {
    let descriptor = EndpointDescriptor::load(&descriptor_path(project_root, config)).await?;
    Ok(Self::new(project_root, descriptor))
  }

  pub fn route(&self) -> &str {
    &self.descriptor.route
  }
}

/// Extension trait that converts an endpoint into an Axum router.
pub trait IntoAxumRouter {
  fn into_axum_router(self) -> Result<axum::Router, TreeError>;
  fn serve(
    self,
    addr: &str,
  ) -> impl std::future::Future<Output = Result<(), Box<dyn std::error::Error>>> + Send;
}

impl IntoAxumRouter for RoutesEndpoint {
  fn into_axum_router(self) -> Result<axum::Router, TreeError> {
    routes_router(self.project_root, self.descriptor)
  }

  async fn serve(self, addr: &str) -> Result<(), Box<dyn std::error::Error>> {
    let route = self.descriptor.route.clone();
    let router = self.into_axum_router()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    let local_addr = listener.local_addr()?;
    info!(%route, "routes endpoint on http://localhost:{}{route}", local_addr.port());
    axum::serve(listener, router).await?;
    Ok(())
  }
}
