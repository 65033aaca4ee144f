use crate::forward_config::{HeaderPolicy, RelayMode};

/// Immutable per-process forwarding options, shared across workers.
#[derive(Debug)]
pub struct ForwarderConfig {
  pub upstream_host: Box<str>,
  pub header_policy: HeaderPolicy,
  pub relay_mode: RelayMode,
  pub timeout_ms: u64,
}

impl ForwarderConfig {
  /// Builds the outbound URL from the raw, already-escaped path capture.
  /// The capture is never decoded or re-encoded on the way through.
  pub fn target_url(&self, path: &str) -> String {
    format!("http://{}/{}", self.upstream_host, path)
  }
}
