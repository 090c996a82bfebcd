//! Connection admission.
//!
//! # Data Flow
//! ```text
//! GET / | /ffa1 | /ffa2 (Upgrade: websocket)
//!     → Origin must equal the admission origin, else 403
//!     → resolve client identity
//!     → complete upgrade
//!     → SessionGateway::accept_connection(socket, SessionInfo)
//! ```
//!
//! The gateway keeps nothing once the socket is handed over.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::{
        ws::{rejection::WebSocketUpgradeRejection, WebSocketUpgrade},
        ConnectInfo, State,
    },
    http::{header, HeaderMap, Uri},
    response::{IntoResponse, Response},
};

use crate::http::response::GatewayError;
use crate::http::server::AppState;
use crate::observability::metrics;
use crate::security::origin::origin_for_log;
use crate::session::SessionInfo;

/// Paths that admit game connections.
pub const ADMISSION_PATHS: [&str; 3] = ["/", "/ffa1", "/ffa2"];

pub async fn admit_connection(
    State(state): State<AppState>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    uri: Uri,
    headers: HeaderMap,
    upgrade: Result<WebSocketUpgrade, WebSocketUpgradeRejection>,
) -> Response {
    let origin = headers.get(header::ORIGIN).and_then(|v| v.to_str().ok());
    if !state.origins.admits(origin) {
        tracing::warn!(
            origin = origin_for_log(headers.get(header::ORIGIN)),
            path = %uri.path(),
            peer = %peer,
            "Admission origin forbidden"
        );
        metrics::record_admission("forbidden");
        return GatewayError::ForbiddenOrigin.into_response();
    }

    let client_address = state.client_identity.resolve(&headers, peer);
    tracing::info!(client = %client_address, path = %uri.path(), "Admitting connection");

    let upgrade = match upgrade {
        Ok(upgrade) => upgrade,
        Err(rejection) => {
            tracing::debug!(client = %client_address, reason = %rejection, "Not a WebSocket upgrade");
            metrics::record_admission("not_upgradable");
            return rejection.into_response();
        }
    };

    let info = SessionInfo {
        client_address,
        endpoint: uri.path().to_string(),
        origin: origin.unwrap_or_default().to_string(),
    };
    let sessions = Arc::clone(&state.sessions);
    metrics::record_admission("accepted");

    upgrade
        .on_failed_upgrade(|e| tracing::warn!(error = %e, "WebSocket upgrade failed"))
        .on_upgrade(move |socket| async move {
            sessions.accept_connection(socket, info).await;
        })
}
