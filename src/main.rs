use std::process::ExitCode;

use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

mod api;
mod config;
mod html;
mod models;
mod services;
mod utils;

use api::feeds::FeedClient;
use config::AppConfig;
use services::fetch_service::load_layers;
use services::map_service::MapSession;
use services::snapshot_service::render_snapshot;

#[tokio::main]
async fn main() -> ExitCode {
    dotenv::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env()
            .add_directive("quakemap=debug".parse().unwrap())
            .add_directive("reqwest=warn".parse().unwrap())
            .add_directive("hyper=warn".parse().unwrap()))
        .with_target(true)
        .with_thread_ids(true)
        .init();

    info!("🌋 Starting quakemap v{}...", env!("CARGO_PKG_VERSION"));

    let config = match AppConfig::from_env() {
        Ok(c) => c,
        Err(e) => {
            error!("Configuration error: {}", e);
            return ExitCode::FAILURE;
        }
    };
    debug!(
        "Feeds: {} | {} (timeout {:?})",
        config.earthquakes_url, config.plates_url, config.http_timeout
    );

    let client = match FeedClient::with_urls(
        config.earthquakes_url.clone(),
        config.plates_url.clone(),
        config.http_timeout,
    ) {
        Ok(c) => c,
        Err(e) => {
            error!("Failed to create feed client: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let mut session = MapSession::new(config.mapbox_api_key.clone(), config.encoder);
    load_layers(&client, &mut session).await;

    if !session.has_content() {
        error!("Both feeds failed, nothing to render");
        return ExitCode::FAILURE;
    }

    let page = match session.render_html() {
        Ok(p) => p,
        Err(e) => {
            error!("Failed to render map page: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = std::fs::write(&config.output_path, page) {
        error!("Failed to write {}: {}", config.output_path.display(), e);
        return ExitCode::FAILURE;
    }
    info!("Map written to {}", config.output_path.display());

    if let Some(path) = &config.snapshot_path {
        let (width, height) = config.snapshot_size;
        if let Err(e) = render_snapshot(&session, path, width, height) {
            // The HTML map is the primary output; a missing snapshot is not fatal
            warn!("Failed to render snapshot {}: {}", path.display(), e);
        }
    }

    ExitCode::SUCCESS
}
