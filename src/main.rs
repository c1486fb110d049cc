//! Factura Server
//!
//! A self-hosted invoice data extraction server: uploads go through OCR
//! and an AI completion endpoint and come back as structured records.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::signal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use factura_server::config::Config;
use factura_server::document::DocumentLoader;
use factura_server::extract::{CerebrasClient, ExtractionService};
use factura_server::ocr::OcrService;
use factura_server::pipeline::InvoicePipeline;
use factura_server::routes;
use factura_server::state::AppState;

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "factura_server=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();

    let config = Config::from_env().unwrap_or_else(|e| {
        tracing::warn!("Failed to load config from env: {}, using defaults", e);
        Config::default()
    });

    tracing::info!("Starting Factura Server v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("AI endpoint: {} ({})", config.ai.base_url, config.ai.model);
    tracing::info!(
        "Upload limit: {} bytes, render target: {} DPI",
        config.upload.max_file_size,
        config.render.dpi
    );

    if let Some(message) = config.missing_credential() {
        tracing::warn!("{}; extraction requests will fail until it is set", message);
    }

    // Assemble the pipeline
    let loader = DocumentLoader::new(&config.render);
    let ocr = OcrService::new(&config.ocr);
    let extractor = ExtractionService::new(Arc::new(CerebrasClient::new(&config.ai)));
    let pipeline = InvoicePipeline::new(loader, ocr, extractor, config.upload.max_file_size);

    let state = AppState::new(config.clone(), pipeline);
    let app = routes::app(state);

    // Start server with graceful shutdown
    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Factura Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("failed to bind listen address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("server error");

    tracing::info!("Server shutdown complete");
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, starting graceful shutdown...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown...");
        },
    }
}
