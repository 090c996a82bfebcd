//! Game session gateway.
//!
//! The gateway layer never owns player state. Everything it needs from the
//! game side goes through [`SessionGateway`]:
//!
//! ```text
//! admission handler ──accept_connection──▶ SessionGateway ──▶ game sessions
//! reboot handler ─────broadcast_reboot_alert──▶ (all sessions)
//! player count ───────player_count
//! reboot handler ─────reboot_flag().set()
//! ```
//!
//! [`hub::SessionHub`] is the in-process implementation used by the binary.

pub mod connection;
pub mod hub;
#[cfg(test)]
pub(crate) mod mock;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum::extract::ws::WebSocket;

pub use connection::{SessionId, SessionRegistry};
pub use hub::SessionHub;

/// Metadata handed to the session layer together with an admitted socket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionInfo {
    /// Best-effort client address (see `security::client_identity`).
    pub client_address: String,
    /// Admission path the client connected through (`/`, `/ffa1`, `/ffa2`).
    pub endpoint: String,
    /// Origin header presented at admission.
    pub origin: String,
}

/// Failures reported by the session layer.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("session gateway is closed")]
    Closed,
    #[error("session gateway unavailable: {0}")]
    Unavailable(String),
}

/// Process-wide "server is rebooting" flag.
///
/// One-way: once set it is never cleared for the lifetime of the process.
#[derive(Debug, Clone, Default)]
pub struct RebootFlag(Arc<AtomicBool>);

impl RebootFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a reboot countdown has started.
    pub fn is_set(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    /// Mark the server as rebooting. Returns true on the first transition.
    pub fn set(&self) -> bool {
        !self.0.swap(true, Ordering::AcqRel)
    }
}

/// The game-side collaborator that owns player connections.
#[async_trait]
pub trait SessionGateway: Send + Sync + 'static {
    /// Take ownership of an admitted connection. May run for the whole
    /// lifetime of the connection.
    async fn accept_connection(&self, socket: WebSocket, info: SessionInfo);

    /// Push a reboot countdown notice to every active connection.
    async fn broadcast_reboot_alert(&self, minutes_left: u8) -> Result<(), SessionError>;

    /// Number of currently active players.
    fn player_count(&self) -> usize;

    /// The process-wide reboot flag owned by this gateway.
    fn reboot_flag(&self) -> &RebootFlag;
}
