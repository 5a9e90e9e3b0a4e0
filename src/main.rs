mod config;
mod error;
mod handlers;
mod host;
mod models;
mod source;
mod state;
mod utils;
mod view;

#[cfg(test)]
mod test_support;

use std::sync::Arc;

use axum::{Router, routing::get};
use tracing::info;
use tower_http::trace::TraceLayer;

use crate::{
    config::Config,
    handlers::{files_page, health_check, not_found},
    source::HttpFileSource,
    state::AppState,
    utils::DownloadLinks,
};

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::fmt::init();

    let config = Config::from_env()?;

    let source = HttpFileSource::new(&config.api_base_url, config.fetch_timeout())?;
    let links = DownloadLinks::new(config.api_base_url.clone())?;
    info!("Listing files from {}", links.base());

    let app_state = AppState {
        source: Arc::new(source),
        links,
    };

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app(app_state)).await?;

    Ok(())
}

fn app(state: AppState) -> Router {
    Router::new()
        .route("/", get(files_page))
        .route("/health", get(health_check))
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
