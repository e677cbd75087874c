mod config;
mod errors;
mod layout;
mod measure_client;
mod models;
mod render;
mod routes;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::layout::default_page_geometry;
use crate::measure_client::HttpMeasurementSurface;
use crate::render::{HtmlSectionRenderer, RenderContext};
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Vitae API v{}", env!("CARGO_PKG_VERSION"));

    // Measurement surface: sessions are opened per pagination request
    let measure_surface = HttpMeasurementSurface::new(
        &config.measure_service_url,
        Duration::from_secs(config.measure_timeout_secs),
    )?;
    info!("Measurement surface configured at {}", config.measure_service_url);

    // Renderer helpers are resolved once here and never mutated afterwards
    let renderer = HtmlSectionRenderer::new(RenderContext::standard());

    let geometry = default_page_geometry(config.page_capacity_cm);
    info!(
        "Page geometry: {}x{}cm, base capacity {}cm",
        geometry.page_width_cm, geometry.page_height_cm, geometry.base_capacity_cm
    );

    let state = AppState {
        config: config.clone(),
        geometry,
        renderer: Arc::new(renderer),
        measure_surface: Arc::new(measure_surface),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict CORS to the editor origin once it is configurable

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
