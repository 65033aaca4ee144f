use std::sync::Arc;
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use futures_core::future::LocalBoxFuture;
use reqwest::Client;
use crate::proxy_service::forward_service::ForwardService;
use crate::proxy_service::forwarder_config::ForwarderConfig;

pub struct ForwardServiceFactory {
  pub config: Arc<ForwarderConfig>,
  pub http_client: Client,
}

impl ServiceFactory<ServiceRequest> for ForwardServiceFactory {
  type Response = ServiceResponse;
  type Error = actix_web::Error;
  type Config = ();
  type Service = ForwardService;
  type InitError = ();
  type Future = LocalBoxFuture<'static, Result<Self::Service, Self::InitError>>;

  fn new_service(&self, _: Self::Config) -> Self::Future {
    let service = ForwardService {
      config: self.config.clone(),
      http_client: self.http_client.clone(),
    };

    Box::pin(async move { Ok(service) })
  }
}

impl ForwardServiceFactory {
  pub fn create(http_client: Client, config: Arc<ForwarderConfig>) -> Self {
    Self {
      config,
      http_client,
    }
  }
}
