//! siggate Server Binary
//!
//! Loads configuration, builds the signer source chain and serves the HTTP
//! adapter.

use std::env;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

use siggate_service::{create_router, AppState, ServiceConfig, SignatureService};

#[tokio::main]
async fn main() {
    // Initialize logging
    let log_level = env::var("SIGGATE_LOG_LEVEL")
        .unwrap_or_else(|_| "info".into())
        .parse()
        .unwrap_or(Level::INFO);

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(true)
        .with_thread_ids(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set tracing subscriber");

    // Configuration
    let port: u16 = env::var("SIGGATE_PORT")
        .unwrap_or_else(|_| "8080".into())
        .parse()
        .expect("SIGGATE_PORT must be a valid port number");

    let config_path = env::args()
        .nth(1)
        .or_else(|| env::var("SIGGATE_CONFIG").ok())
        .map(PathBuf::from);

    let config = match ServiceConfig::load(config_path.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, path = ?config_path, "Invalid configuration");
            std::process::exit(1);
        }
    };

    let service = match SignatureService::from_config(&config) {
        Ok(service) => service,
        Err(e) => {
            error!(error = %e, "Failed to initialize signature service");
            std::process::exit(1);
        }
    };

    let initial = service.check_integrity();
    info!(
        integrity = %initial,
        expected = %config.expected.fingerprint,
        port = port,
        "Starting siggate server"
    );

    // Create application state
    let state = Arc::new(AppState::new(service));

    // Build router
    let app = create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind to address");

    info!(addr = %addr, "siggate listening");

    axum::serve(listener, app)
        .await
        .expect("Server error");
}
