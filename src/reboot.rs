//! Reboot countdown coordination.
//!
//! A valid countdown is broadcast to every session, then the process-wide
//! reboot flag is raised. The flag only moves after a successful broadcast.
//!
//! ```text
//! not-rebooting ──(first successful trigger)──▶ rebooting (terminal)
//! ```

use std::sync::Arc;

use crate::observability::metrics;
use crate::session::{SessionError, SessionGateway};

/// Query parameter carrying the countdown in minutes.
pub const MINUTES_LEFT_PARAM: &str = "minutesLeft";

/// Why a countdown value was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum CountdownError {
    #[error("Missing 'minutesLeft' query parameter")]
    Missing,
    #[error("Invalid 'minutesLeft' query parameter")]
    Invalid,
    #[error("'minutesLeft' must not exceed 255")]
    OutOfRange,
}

#[derive(Debug, thiserror::Error)]
pub enum RebootError {
    #[error(transparent)]
    Countdown(#[from] CountdownError),
    #[error("failed to broadcast reboot alert: {0}")]
    Broadcast(#[source] SessionError),
}

/// Parse a `minutesLeft` value into the one-byte countdown.
///
/// Absent and empty are both "missing". Signs are accepted, so `+10` is 10
/// and `-5` is invalid.
pub fn parse_countdown(raw: Option<&str>) -> Result<u8, CountdownError> {
    let raw = match raw {
        None | Some("") => return Err(CountdownError::Missing),
        Some(raw) => raw,
    };

    let minutes: i64 = raw.parse().map_err(|_| CountdownError::Invalid)?;
    if minutes <= 0 {
        return Err(CountdownError::Invalid);
    }
    u8::try_from(minutes).map_err(|_| CountdownError::OutOfRange)
}

pub struct RebootCoordinator {
    sessions: Arc<dyn SessionGateway>,
}

impl RebootCoordinator {
    pub fn new(sessions: Arc<dyn SessionGateway>) -> Self {
        Self { sessions }
    }

    /// Validate the countdown, broadcast it and raise the reboot flag.
    /// Returns the minutes that were broadcast.
    pub async fn trigger(&self, minutes_left: Option<&str>) -> Result<u8, RebootError> {
        let minutes = parse_countdown(minutes_left).inspect_err(|e| {
            tracing::warn!(value = ?minutes_left, reason = %e, "Rejected reboot countdown");
        })?;

        self.sessions
            .broadcast_reboot_alert(minutes)
            .await
            .map_err(|e| {
                tracing::error!(minutes_left = minutes, error = %e, "Reboot alert broadcast failed");
                RebootError::Broadcast(e)
            })?;
        metrics::record_reboot_alert();

        if self.sessions.reboot_flag().set() {
            tracing::warn!(minutes_left = minutes, "Server is now rebooting");
        } else {
            tracing::info!(minutes_left = minutes, "Reboot countdown updated");
        }
        Ok(minutes)
    }
}
