use serde::Serialize;
use thiserror::Error;

/// Terminal failure of a single forwarding attempt. Every variant maps to a
/// synthesized 500 response; no retries happen anywhere.
#[derive(Debug, Error)]
pub enum ForwardError {
  #[error("upstream unreachable: {0}")]
  Unreachable(String),
  #[error("upstream request timed out")]
  Timeout,
  #[error("upstream body is not valid JSON: {0}")]
  Malformed(String),
  #[error("upstream transfer failed: {0}")]
  Transfer(String),
}

impl From<reqwest::Error> for ForwardError {
  fn from(err: reqwest::Error) -> Self {
    if err.is_timeout() {
      ForwardError::Timeout
    } else if err.is_connect() {
      ForwardError::Unreachable(err.to_string())
    } else {
      ForwardError::Transfer(err.to_string())
    }
  }
}

/// Body of every synthesized failure response: `{"error": "<message>"}`.
#[derive(Serialize, Debug)]
pub struct ErrorEnvelope {
  pub error: String,
}

impl From<&ForwardError> for ErrorEnvelope {
  fn from(err: &ForwardError) -> Self {
    ErrorEnvelope {
      error: err.to_string(),
    }
  }
}
