use thiserror::Error;

use crate::forward_config::{ForwardConfigFile, DEFAULT_TIMEOUT_MS};
use crate::proxy_service::forwarder_config::ForwarderConfig;

pub mod error;
pub mod forward_factory;
pub mod forward_service;
pub mod forwarder_config;

#[derive(Debug, Error, PartialEq)]
pub enum InvalidUpstreamError {
  #[error("upstream_host is empty")]
  EmptyHost,
  #[error("upstream_host '{0}' must not include a scheme")]
  SchemeIncluded(String),
}

impl TryFrom<ForwardConfigFile> for ForwarderConfig {
  type Error = InvalidUpstreamError;

  fn try_from(value: ForwardConfigFile) -> Result<Self, Self::Error> {
    let host = value.upstream_host.trim().trim_end_matches('/');

    if host.is_empty() {
      return Err(InvalidUpstreamError::EmptyHost);
    }

    if host.contains("://") {
      return Err(InvalidUpstreamError::SchemeIncluded(host.into()));
    }

    Ok(ForwarderConfig {
      upstream_host: Box::from(host),
      header_policy: value.header_policy.unwrap_or_default(),
      relay_mode: value.relay_mode.unwrap_or_default(),
      timeout_ms: value.timeout_ms.unwrap_or(DEFAULT_TIMEOUT_MS),
    })
  }
}
