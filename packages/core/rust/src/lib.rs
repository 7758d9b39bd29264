/* packages/core/rust/src/lib.rs */

pub mod artifact;
pub mod collection;
pub mod config;
pub mod endpoint;
pub mod errors;
pub mod escape;
pub mod hook;
pub mod manifest;
pub mod normalize;
pub mod pipeline;
pub mod readiness;

// Re-exports for ergonomic use
pub use collection::RouteCollection;
pub use config::{OutputFormat, PagesTreeConfig, RouteOrder};
pub use endpoint::EndpointDescriptor;
pub use errors::{Result, TreeError};
pub use hook::{BuildCompleted, BuildHook, BuildTarget, build_signal};
pub use pipeline::{BuildContext, BuildReport, Outcome, PipelineStage, run_once};
