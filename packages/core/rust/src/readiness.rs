/* packages/core/rust/src/readiness.rs */

// The build-completion signal can arrive while the host tool is still
// flushing manifests. Poll with backoff until the manifests look complete.

use std::path::Path;

use tracing::debug;

use crate::config::ReadinessPolicy;
use crate::manifest::{ManifestKind, parse_route_keys};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Readiness {
  /// At least one manifest exists and every present manifest parses.
  Ready { attempts: u32 },
  /// Attempts exhausted; the pipeline proceeds with whatever is on disk.
  TimedOut { attempts: u32 },
}

impl Readiness {
  pub fn is_ready(self) -> bool {
    matches!(self, Self::Ready { .. })
  }
}

/// One probe: `true` when some manifest exists and none is half-written.
async fn probe(build_dir: &Path) -> bool {
  let mut found = false;
  for kind in ManifestKind::ALL {
    let path = build_dir.join(kind.relative_path());
    match tokio::fs::read_to_string(&path).await {
      Ok(content) => {
        if parse_route_keys(&content).is_err() {
          return false;
        }
        found = true;
      }
      Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
      Err(_) => return false,
    }
  }
  found
}

pub async fn wait_for_manifests(build_dir: &Path, policy: &ReadinessPolicy) -> Readiness {
  let attempts = policy.attempts.max(1);
  for attempt in 0..attempts {
    if probe(build_dir).await {
      return Readiness::Ready { attempts: attempt + 1 };
    }
    if attempt + 1 < attempts {
      let delay = policy.delay(attempt);
      debug!(attempt = attempt + 1, ?delay, "manifests not ready, retrying");
      tokio::time::sleep(delay).await;
    }
  }
  Readiness::TimedOut { attempts }
}
