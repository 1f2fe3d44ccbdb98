//! HTTP server configuration and request routing.
//!
//! Provides the axum router and server setup with the collector's
//! middleware stack and graceful shutdown. Requests flow through
//! middleware in order:
//! 1. CORS handling (headers on every response, including errors)
//! 2. Request ID generation
//! 3. Request/response logging
//! 4. Timeout enforcement
//! 5. Handler execution
//!
//! Handlers receive their collaborators — the sink client, the clock, and
//! the signing key — through [`AppState`] injected at router construction;
//! there is no process-global client state.

use std::{net::SocketAddr, sync::Arc, time::Duration};

use axum::{
    extract::Request,
    http::{header, Method},
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
    Router,
};
use logfunnel_core::Clock;
use logfunnel_sink::EventSink;
use tower_http::{cors::{Any, CorsLayer}, timeout::TimeoutLayer, trace::TraceLayer};
use tracing::info;
use uuid::Uuid;

use crate::handlers;

/// CORS preflight cache lifetime, as advertised by the original collector.
const CORS_MAX_AGE: Duration = Duration::from_secs(3_628_800);

/// Shared per-request collaborators.
#[derive(Clone)]
pub struct AppState {
    /// Outbound client for the aggregation sink.
    pub sink: Arc<dyn EventSink>,
    /// Time source injected into the normalizer.
    pub clock: Arc<dyn Clock>,
    /// Shared secret for signed-request verification.
    pub signing_key: String,
}

impl AppState {
    /// Creates the shared state handed to the router.
    pub fn new(sink: Arc<dyn EventSink>, clock: Arc<dyn Clock>, signing_key: String) -> Self {
        Self { sink, clock, signing_key }
    }
}

/// Creates the axum router with all routes and middleware.
///
/// Non-POST requests on the ingestion route receive an empty 200 without
/// invoking the pipeline; preflight OPTIONS is answered by the CORS layer.
pub fn create_router(state: AppState, request_timeout: Duration) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::ACCEPT, header::AUTHORIZATION, header::CONTENT_TYPE])
        .max_age(CORS_MAX_AGE);

    Router::new()
        .route("/", post(handlers::collect_events).fallback(handlers::empty_ok))
        .route("/health", get(handlers::health_check))
        .route("/live", get(handlers::liveness_check))
        .layer(TimeoutLayer::new(request_timeout))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(inject_request_id))
        .layer(cors)
        .with_state(state)
}

/// Middleware to inject a request ID into all responses.
///
/// Adds an X-Request-Id header for tracing requests across services.
async fn inject_request_id(req: Request, next: Next) -> Response {
    let request_id = Uuid::new_v4().to_string();

    let mut req = req;
    req.extensions_mut().insert(request_id.clone());

    let mut response = next.run(req).await;

    if let Ok(header_value) = request_id.parse() {
        response.headers_mut().insert("X-Request-Id", header_value);
    }

    response
}

/// Starts the HTTP server with graceful shutdown support.
///
/// Binds to the specified address and serves requests until a shutdown
/// signal is received. The connect-info service is required so handlers
/// can fall back to the peer address when no forwarding header is present.
///
/// # Errors
///
/// Returns `std::io::Error` if the port is already in use or the network
/// interface is unavailable.
pub async fn start_server(
    state: AppState,
    addr: SocketAddr,
    request_timeout: Duration,
) -> Result<(), std::io::Error> {
    let app = create_router(state, request_timeout);

    info!("Starting HTTP server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    let actual_addr = listener.local_addr()?;

    info!("HTTP server listening on {}", actual_addr);

    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("HTTP server stopped gracefully");
    Ok(())
}

/// Waits for shutdown signal (CTRL+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            },
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
            },
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received CTRL+C, starting graceful shutdown");
        },
        () = terminate => {
            info!("Received SIGTERM, starting graceful shutdown");
        },
    }
}
