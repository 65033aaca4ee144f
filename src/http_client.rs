use reqwest::redirect::Policy;
use reqwest::Client;
use std::time::Duration;

pub struct HttpClientConfig {
  pub timeout_ms: u64,
  pub http_proxy: Option<String>,
  pub user: Option<String>,
  pub pass: Option<String>,
}

impl HttpClientConfig {
  pub fn to_client(self) -> Result<Client, reqwest::Error> {
    let HttpClientConfig {
      timeout_ms,
      http_proxy,
      user,
      pass,
    } = self;

    // Redirect statuses are relayed to the caller, never followed here.
    let mut client_builder = reqwest::ClientBuilder::new()
      .timeout(Duration::from_millis(timeout_ms))
      .redirect(Policy::none());

    if let Some(proxy_url) = http_proxy {
      let mut proxy = reqwest::Proxy::all(proxy_url)?;

      if let (Some(user_name), Some(password)) = (user, pass) {
        proxy = proxy.basic_auth(&user_name, &password);
      }

      client_builder = client_builder.proxy(proxy);
    }

    let client = client_builder.build()?;

    Ok(client)
  }
}
