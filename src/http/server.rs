//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the axum Router with all handlers
//! - Wire up middleware (tracing, request ID, metrics, CORS)
//! - Serve on a loopback listener until shutdown

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    body::Body,
    http::Request,
    middleware,
    routing::any,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::trace::TraceLayer;

use crate::config::GatewayConfig;
use crate::http::middleware::cors_middleware;
use crate::http::reboot::reboot;
use crate::http::request::{propagate_request_id_layer, request_id_of, set_request_id_layer};
use crate::http::response::GatewayError;
use crate::http::status::player_count;
use crate::http::websocket::{admit_connection, ADMISSION_PATHS};
use crate::lifecycle::shutdown;
use crate::observability::metrics;
use crate::reboot::RebootCoordinator;
use crate::security::client_identity::ClientIdentityResolver;
use crate::security::origin::OriginPolicy;
use crate::session::SessionGateway;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<dyn SessionGateway>,
    pub origins: Arc<OriginPolicy>,
    pub client_identity: Arc<ClientIdentityResolver>,
    pub reboot: Arc<RebootCoordinator>,
}

impl AppState {
    pub fn new(config: &GatewayConfig, sessions: Arc<dyn SessionGateway>) -> Self {
        Self {
            origins: Arc::new(OriginPolicy::from_config(&config.origins)),
            client_identity: Arc::new(ClientIdentityResolver::from_config(&config.client_identity)),
            reboot: Arc::new(RebootCoordinator::new(Arc::clone(&sessions))),
            sessions,
        }
    }
}

/// HTTP server for the gateway.
pub struct HttpServer {
    router: Router,
    config: GatewayConfig,
}

impl HttpServer {
    pub fn new(config: GatewayConfig, sessions: Arc<dyn SessionGateway>) -> Self {
        let state = AppState::new(&config, sessions);
        let router = build_router(state);
        Self { router, config }
    }

    /// Run the server until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            admission_origin = %self.config.origins.admission,
            "HTTP server starting"
        );

        let app = self.router.into_make_service_with_connect_info::<SocketAddr>();
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown::wait(shutdown))
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Build the router with all middleware layers.
///
/// CORS is the innermost layer so it sees every routed request, including
/// the fallback, before any handler.
pub fn build_router(state: AppState) -> Router {
    let cors = middleware::from_fn_with_state(Arc::clone(&state.origins), cors_middleware);

    let mut router = Router::new();
    for path in ADMISSION_PATHS {
        router = router.route(path, any(admit_connection));
    }

    router
        .route("/playercount", any(player_count))
        .route("/reboot", any(reboot))
        .fallback(not_found)
        .with_state(state)
        .layer(cors)
        .layer(middleware::from_fn(metrics::track_requests))
        .layer(propagate_request_id_layer())
        .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "request",
                method = %request.method(),
                path = %request.uri().path(),
                request_id = %request_id_of(request),
            )
        }))
        .layer(set_request_id_layer())
}

async fn not_found() -> GatewayError {
    GatewayError::NotFound
}
