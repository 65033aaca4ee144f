use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::fs::File;
use std::io::ErrorKind;

pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

#[derive(Serialize, Deserialize, PartialEq, Debug, Clone, Copy, Hash, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum HttpMethod {
  #[default]
  Get,
  Post,
  Put,
  Delete,
  Head,
  Patch,
}

/// Governs which inbound headers reach the upstream request.
///
/// `Minimal` is the default: headers are rebuilt from scratch with
/// `Content-Type: application/json`, and `Authorization` is carried over
/// when the caller sent one. `CopyAll` forwards the whole inbound set.
#[derive(Serialize, Deserialize, PartialEq, Debug, Clone, Copy, Hash, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum HeaderPolicy {
  CopyAll,
  #[default]
  Minimal,
}

/// Governs how the upstream body is relayed back to the caller.
///
/// `Passthrough` keeps the body byte-for-byte. `ReencodeJson` decodes the
/// body as JSON and re-serializes it, rejecting non-JSON upstream bodies.
#[derive(Serialize, Deserialize, PartialEq, Debug, Clone, Copy, Hash, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum RelayMode {
  #[default]
  Passthrough,
  ReencodeJson,
}

#[derive(Serialize, Deserialize, PartialEq, Debug, Clone)]
pub struct ForwardConfigFile {
  pub upstream_host: String,
  pub header_policy: Option<HeaderPolicy>,
  pub relay_mode: Option<RelayMode>,
  pub timeout_ms: Option<u64>,
}

impl ForwardConfigFile {
  pub fn load_from_file(file: &File) -> Result<ForwardConfigFile, std::io::Error> {
    let config: ForwardConfigFile =
      serde_yaml::from_reader(file).map_err(|err| std::io::Error::new(ErrorKind::Other, err))?;

    Ok(config)
  }
}

impl HttpMethod {
  pub fn carries_body(&self) -> bool {
    matches!(self, HttpMethod::Post | HttpMethod::Put | HttpMethod::Patch)
  }
}

impl TryFrom<&str> for HttpMethod {
  type Error = ();

  fn try_from(value: &str) -> Result<Self, Self::Error> {
    match value.to_lowercase().as_str() {
      "get" => Ok(HttpMethod::Get),
      "post" => Ok(HttpMethod::Post),
      "patch" => Ok(HttpMethod::Patch),
      "put" => Ok(HttpMethod::Put),
      "head" => Ok(HttpMethod::Head),
      "delete" => Ok(HttpMethod::Delete),
      _ => Err(()),
    }
  }
}

impl Display for HttpMethod {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    match self {
      HttpMethod::Get => f.write_str("get"),
      HttpMethod::Post => f.write_str("post"),
      HttpMethod::Put => f.write_str("put"),
      HttpMethod::Delete => f.write_str("delete"),
      HttpMethod::Head => f.write_str("head"),
      HttpMethod::Patch => f.write_str("patch"),
    }
  }
}
