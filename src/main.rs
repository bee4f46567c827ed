mod config;
mod geo;
mod logging;
mod models;
mod request_id;
mod router;
mod weather;

use axum::{Router, routing::get};
use clap::Parser;
use config::Config;
use router::AppState;
use std::str::FromStr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::{Level, info};

#[derive(Parser, Debug)]
#[command(name = "hello-weather")]
#[command(about = "Greets a visitor with their inferred location and local temperature")]
struct Args {
    /// Bind address, overrides the config file
    #[arg(short, long)]
    ip: Option<String>,

    /// Bind port, overrides the config file
    #[arg(short, long)]
    port: Option<u16>,

    /// Path to config file
    #[arg(short, long)]
    config: Option<String>,

    /// trace, debug, info, warn, error
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Append logs to this file in addition to stdout
    #[arg(long)]
    log_file: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_level = Level::from_str(&args.log_level).unwrap_or_else(|_| {
        eprintln!("Invalid log level: {}. Using INFO level.", args.log_level);
        Level::INFO
    });
    logging::init_logging(log_level, args.log_file.as_deref())?;

    let mut config = match &args.config {
        Some(path) => {
            let config = Config::from_file(path)?;
            info!("Configuration loaded from: {}", path);
            config
        }
        None => Config::default(),
    };
    if let Some(ip) = args.ip {
        config.host = ip;
    }
    if let Some(port) = args.port {
        config.port = port;
    }

    let http_client = Arc::new(reqwest::Client::new());
    let bind_address = format!("{}:{}", config.host, config.port);

    let app_state = AppState {
        http_client,
        config: Arc::new(config),
    };

    // Trailing slash on the hello route is tolerated
    let app = Router::new()
        .route("/api/hello", get(router::hello))
        .route("/api/hello/", get(router::hello))
        .route("/health", get(|| async { "OK" }))
        .layer(axum::middleware::from_fn(request_id::inject_request_id))
        .layer(CorsLayer::permissive())
        .with_state(app_state);

    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    info!("Server started on http://{}", bind_address);

    axum::serve(listener, app).await?;
    Ok(())
}
