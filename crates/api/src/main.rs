//! API server entry point.

use api::config::Config;
use axum::Router;
use record_store::{InMemoryRecordStore, JsonFileRecordStore};
use tokio::signal;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Waits for a shutdown signal (SIGINT or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install SIGINT handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("received SIGINT, starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("received SIGTERM, starting graceful shutdown");
        }
    }
}

async fn serve(app: Router, addr: String) {
    tracing::info!(%addr, "starting shipment API server");

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind address");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("server error");

    tracing::info!("server shut down gracefully");
}

#[tokio::main]
async fn main() {
    let config = Config::from_env();

    // 1. Initialize tracing
    let registry = tracing_subscriber::registry().with(
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
    );
    if config.log_json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    // 2. Install Prometheus metrics recorder
    let metrics_handle = metrics_exporter_prometheus::PrometheusBuilder::new()
        .install_recorder()
        .expect("failed to install Prometheus recorder");

    // 3. Open the record store and build the application
    let app = match &config.db_path {
        Some(path) => {
            let store = JsonFileRecordStore::open(path, api::SHIPMENTS_COLLECTION)
                .await
                .expect("failed to open shipment file");
            tracing::info!(path = %path.display(), "using JSON file store");
            api::create_app(
                api::create_default_state(store),
                metrics_handle,
                &config.api_prefix,
            )
        }
        None => {
            tracing::info!("using in-memory store");
            api::create_app(
                api::create_default_state(InMemoryRecordStore::new()),
                metrics_handle,
                &config.api_prefix,
            )
        }
    };

    // 4. Start server
    serve(app, config.addr()).await;
}
