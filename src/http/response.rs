//! Error responses.
//!
//! Client mistakes map to 4xx, session-layer failures to 5xx. Bodies are
//! short plain-text reasons.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::reboot::{CountdownError, RebootError};
use crate::session::SessionError;

#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("Invalid request method")]
    MethodNotAllowed,
    #[error("Forbidden")]
    ForbiddenOrigin,
    #[error("Not found")]
    NotFound,
    #[error(transparent)]
    Countdown(#[from] CountdownError),
    #[error("Failed to broadcast reboot alert")]
    Session(#[from] SessionError),
}

impl GatewayError {
    pub fn status(&self) -> StatusCode {
        match self {
            GatewayError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            GatewayError::ForbiddenOrigin => StatusCode::FORBIDDEN,
            GatewayError::NotFound => StatusCode::NOT_FOUND,
            GatewayError::Countdown(_) => StatusCode::BAD_REQUEST,
            GatewayError::Session(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<RebootError> for GatewayError {
    fn from(err: RebootError) -> Self {
        match err {
            RebootError::Countdown(e) => GatewayError::Countdown(e),
            RebootError::Broadcast(e) => GatewayError::Session(e),
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        (self.status(), self.to_string()).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses() {
        assert_eq!(GatewayError::MethodNotAllowed.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(GatewayError::ForbiddenOrigin.status(), StatusCode::FORBIDDEN);
        assert_eq!(
            GatewayError::from(RebootError::Countdown(CountdownError::OutOfRange)).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            GatewayError::from(RebootError::Broadcast(SessionError::Closed)).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn body_is_plain_reason() {
        assert_eq!(
            GatewayError::Countdown(CountdownError::Missing).to_string(),
            "Missing 'minutesLeft' query parameter"
        );
        assert_eq!(GatewayError::ForbiddenOrigin.to_string(), "Forbidden");
    }
}
