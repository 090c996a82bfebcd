//! Live player count.

use axum::{extract::State, http::Method, Json};
use serde::{Deserialize, Serialize};

use crate::http::response::GatewayError;
use crate::http::server::AppState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerCount {
    pub player_count: usize,
}

pub async fn player_count(
    State(state): State<AppState>,
    method: Method,
) -> Result<Json<PlayerCount>, GatewayError> {
    if method != Method::GET {
        return Err(GatewayError::MethodNotAllowed);
    }
    Ok(Json(PlayerCount {
        player_count: state.sessions.player_count(),
    }))
}
