use std::sync::Arc;

use actix_web::body::BoxBody;
use actix_web::dev::{Payload, Service, ServiceRequest, ServiceResponse};
use actix_web::{dev, HttpRequest, HttpResponse, ResponseError};
use bytes::Bytes;
use futures_core::future::LocalBoxFuture;
use futures_core::Stream;
use futures_util::StreamExt;
use log::{debug, error, info};
use reqwest::header::{
  HeaderName, HeaderValue, AUTHORIZATION, CONNECTION, CONTENT_LENGTH, CONTENT_TYPE, HOST,
  TRANSFER_ENCODING,
};
use reqwest::{Client, RequestBuilder, Response};

use crate::forward_config::{HeaderPolicy, HttpMethod, RelayMode};
use crate::proxy_service::error::{ErrorEnvelope, ForwardError};
use crate::proxy_service::forwarder_config::ForwarderConfig;

/// Relays one inbound request to the configured upstream host and maps the
/// result back, or synthesizes a 500 JSON envelope when the upstream call
/// fails. Requests are independent; the service keeps no cross-request state.
pub struct ForwardService {
  pub(super) config: Arc<ForwarderConfig>,
  pub(super) http_client: Client,
}

impl Service<ServiceRequest> for ForwardService {
  type Response = ServiceResponse;
  type Error = actix_web::Error;
  type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

  dev::always_ready!();

  fn call(&self, req: ServiceRequest) -> Self::Future {
    let (http_request, payload) = req.into_parts();

    let method = match HttpMethod::try_from(http_request.method().as_str()) {
      Ok(method) => method,
      Err(_) => {
        let response = HttpResponse::MethodNotAllowed().json(ErrorEnvelope {
          error: format!("method '{}' is not forwarded", http_request.method()),
        });
        return Box::pin(async move { Ok(ServiceResponse::new(http_request, response)) });
      }
    };

    let target_url = self.config.target_url(tail_path(&http_request));
    info!("forwarding {} '{}' to '{}'", http_request.method(), http_request.path(), &target_url);

    let builder = self.init_request(method, &target_url, &http_request);
    let relay_mode = self.config.relay_mode;

    Box::pin(ForwardService::exec(
      builder,
      relay_mode,
      method.carries_body(),
      http_request,
      payload,
      target_url,
    ))
  }
}

impl ForwardService {
  async fn exec(
    builder: RequestBuilder,
    relay_mode: RelayMode,
    forward_body: bool,
    http: HttpRequest,
    mut payload: Payload,
    target_url: String,
  ) -> Result<ServiceResponse, actix_web::Error> {
    let mut builder = builder;

    if forward_body {
      let (size, _) = payload.size_hint();
      let mut body_buffer: Vec<u8> = Vec::with_capacity(size);

      while let Some(chunk) = payload.next().await {
        match chunk {
          Ok(bytes) => {
            body_buffer.extend_from_slice(&bytes);
          }
          Err(err) => {
            let error_response = err.error_response();
            return Ok(ServiceResponse::new(http, error_response));
          }
        }
      }

      builder = builder.body(body_buffer);
    }

    let upstream_response = builder.send().await;
    debug!("upstream response {:?}", &upstream_response);

    match upstream_response {
      Ok(data) => match relay_response(data, relay_mode).await {
        Ok(response) => Ok(ServiceResponse::new(http, response)),
        Err(err) => {
          error!("relaying response from '{}' failed: {}", target_url, err);
          Ok(ServiceResponse::new(http, synth_error_response(&err)))
        }
      },
      Err(err) => {
        let err = ForwardError::from(err);
        error!("forwarding to '{}' failed: {}", target_url, err);
        Ok(ServiceResponse::new(http, synth_error_response(&err)))
      }
    }
  }

  fn init_request(&self, method: HttpMethod, target_url: &str, source_request: &HttpRequest) -> RequestBuilder {
    let builder = match method {
      HttpMethod::Get => self.http_client.get(target_url),
      HttpMethod::Post => self.http_client.post(target_url),
      HttpMethod::Put => self.http_client.put(target_url),
      HttpMethod::Delete => self.http_client.delete(target_url),
      HttpMethod::Head => self.http_client.head(target_url),
      HttpMethod::Patch => self.http_client.patch(target_url),
    };

    builder.headers(build_outbound_headers(self.config.header_policy, source_request))
  }
}

/// Raw remainder of the request path after the mount segment. Kept as the
/// caller escaped it; no decode or re-encode on the way through.
fn tail_path(request: &HttpRequest) -> &str {
  request
    .path()
    .trim_start_matches('/')
    .splitn(2, '/')
    .nth(1)
    .unwrap_or("")
}

pub(crate) fn build_outbound_headers(
  policy: HeaderPolicy,
  source_request: &HttpRequest,
) -> reqwest::header::HeaderMap {
  let mut header_map = reqwest::header::HeaderMap::new();

  match policy {
    HeaderPolicy::CopyAll => {
      for (name, value) in source_request.headers().iter() {
        if is_upstream_owned_header(name) {
          continue;
        }

        header_map.append(name.clone(), value.clone());
      }
    }
    HeaderPolicy::Minimal => {
      header_map.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

      if let Some(auth) = source_request.headers().get(AUTHORIZATION) {
        header_map.insert(AUTHORIZATION, auth.clone());
      }
    }
  }

  header_map
}

// Authority and framing headers are rewritten by the outbound transport.
fn is_upstream_owned_header(name: &HeaderName) -> bool {
  *name == HOST || *name == CONNECTION || *name == CONTENT_LENGTH || *name == TRANSFER_ENCODING
}

async fn relay_response(data: Response, relay_mode: RelayMode) -> Result<HttpResponse, ForwardError> {
  let head = map_response_head(&data);
  let bytes = data
    .bytes()
    .await
    .map_err(|err| ForwardError::Transfer(err.to_string()))?;

  let body = match relay_mode {
    RelayMode::Passthrough => bytes,
    RelayMode::ReencodeJson => {
      let value: serde_json::Value =
        serde_json::from_slice(&bytes).map_err(|err| ForwardError::Malformed(err.to_string()))?;
      let encoded =
        serde_json::to_vec(&value).map_err(|err| ForwardError::Malformed(err.to_string()))?;

      Bytes::from(encoded)
    }
  };

  Ok(head.set_body(BoxBody::new(body)))
}

fn map_response_head(response: &Response) -> HttpResponse {
  let mut http_response = HttpResponse::new(response.status());
  let headers = http_response.headers_mut();

  for (name, value) in response.headers() {
    if *name == CONNECTION || *name == TRANSFER_ENCODING || *name == CONTENT_LENGTH || *name == CONTENT_TYPE {
      continue;
    }

    headers.append(name.clone(), value.clone());
  }

  headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

  http_response
}

fn synth_error_response(err: &ForwardError) -> HttpResponse {
  HttpResponse::InternalServerError().json(ErrorEnvelope::from(err))
}
