use std::io::{ErrorKind, Result};
use std::sync::Arc;
use std::{env, fs};

use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use clap::Parser;
use log::info;

use api_relay::forward_config::ForwardConfigFile;
use api_relay::http_client::HttpClientConfig;
use api_relay::proxy_service::forward_factory::ForwardServiceFactory;
use api_relay::proxy_service::forwarder_config::ForwarderConfig;
use api_relay::std_logger::StdLogger;

static LOGGER: StdLogger = StdLogger;

struct Config {
    port: u16,
    worker_count: usize,
    bind: String,
    config_file: String,
    proxy_url: Option<String>,
    proxy_auth_user: Option<String>,
    proxy_auth_pass: Option<String>,
    log_level: log::LevelFilter,
}

/// Relays 'ANY /api/{path...}' to a configured upstream host.
#[derive(Parser, Debug)]
#[command(name = "api_relay")]
struct CliArgs {
    /// Listen address, overrides HTTP_BIND.
    #[arg(long)]
    bind: Option<String>,
    /// Listen port, overrides HTTP_PORT.
    #[arg(long)]
    port: Option<u16>,
    /// Worker count, overrides HTTP_WORKER_COUNT.
    #[arg(long)]
    workers: Option<usize>,
    /// Forwarding config file, overrides RELAY_CONF_LOCATION.
    #[arg(long)]
    config: Option<String>,
}

#[actix_web::main]
async fn main() -> Result<()> {
    let args = CliArgs::parse();
    let config = read_env_vars(args);

    log::set_logger(&LOGGER)
        .map_err(|error| std::io::Error::new(ErrorKind::Other, error.to_string()))?;
    log::set_max_level(config.log_level);

    let config_fd = fs::File::open(&config.config_file)?;
    let forward_file = ForwardConfigFile::load_from_file(&config_fd)?;
    let forwarder_config: ForwarderConfig = forward_file
        .try_into()
        .map_err(|error| std::io::Error::new(ErrorKind::Other, error))?;

    let http_client = HttpClientConfig {
        timeout_ms: forwarder_config.timeout_ms,
        http_proxy: config.proxy_url,
        user: config.proxy_auth_user,
        pass: config.proxy_auth_pass,
    }
    .to_client()
    .map_err(|error| std::io::Error::new(ErrorKind::Other, error))?;

    let forwarder_config = Arc::new(forwarder_config);
    info!("relaying '/api/*' to 'http://{}'.", &forwarder_config.upstream_host);

    HttpServer::new(move || {
        App::new().wrap(Cors::permissive()).service(
            web::service("/api/{path:.+}")
                .finish(ForwardServiceFactory::create(http_client.clone(), forwarder_config.clone())),
        )
    })
    .workers(config.worker_count)
    .bind((config.bind, config.port))?
    .run()
    .await
}

fn read_env_vars(args: CliArgs) -> Config {
    const DEFAULT_PORT: u16 = 8080;
    const DEFAULT_WORKER_COUNT: usize = 4;
    const DEFAULT_BIND: &str = "0.0.0.0";

    let bind = args
        .bind
        .or_else(|| env::var("HTTP_BIND").ok())
        .unwrap_or_else(|| DEFAULT_BIND.into());
    let port = args
        .port
        .or_else(|| env::var("HTTP_PORT").ok().and_then(|e| e.parse::<u16>().ok()))
        .unwrap_or(DEFAULT_PORT);
    let worker_count = args
        .workers
        .or_else(|| env::var("HTTP_WORKER_COUNT").ok().and_then(|e| e.parse::<usize>().ok()))
        .unwrap_or(DEFAULT_WORKER_COUNT);
    let config_file = args
        .config
        .or_else(|| env::var("RELAY_CONF_LOCATION").ok())
        .unwrap_or_else(|| "config.yaml".into());
    let proxy_url = env::var("HTTP_PROXY_URL").ok();
    let proxy_auth_user = env::var("HTTP_PROXY_USER").ok();
    let proxy_auth_pass = env::var("HTTP_PROXY_PASS").ok();
    let log_level = env::var("LOG_LEVEL")
        .ok()
        .and_then(|e| e.parse().ok())
        .unwrap_or(log::LevelFilter::Info);

    Config {
        port,
        worker_count,
        bind,
        config_file,
        proxy_url,
        proxy_auth_user,
        proxy_auth_pass,
        log_level,
    }
}
