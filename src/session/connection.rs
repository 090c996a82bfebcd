//! Session identity and registration tracking.
//!
//! # Responsibilities
//! - Generate unique session IDs for tracing
//! - Register the outbound channel of every live session
//! - Unregister automatically when the session task ends

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use axum::extract::ws::Message;
use dashmap::DashMap;
use tokio::sync::mpsc;

/// Relaxed ordering is enough: IDs only need to be unique.
static SESSION_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Unique identifier for an admitted session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(u64);

impl SessionId {
    /// Generate a new unique session ID.
    pub fn new() -> Self {
        Self(SESSION_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "session-{}", self.0)
    }
}

/// Outbound half of a live session.
#[derive(Debug, Clone)]
pub struct SessionEntry {
    pub client_address: String,
    pub outbound: mpsc::UnboundedSender<Message>,
}

/// Live sessions keyed by ID.
#[derive(Debug, Clone, Default)]
pub struct SessionRegistry {
    sessions: Arc<DashMap<SessionId, SessionEntry>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a session. The returned guard unregisters it on drop.
    pub fn register(&self, entry: SessionEntry) -> SessionGuard {
        let id = SessionId::new();
        self.sessions.insert(id, entry);
        SessionGuard {
            sessions: Arc::clone(&self.sessions),
            id,
        }
    }

    /// Number of live sessions.
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Queue a message on every live session. Returns how many accepted it.
    pub fn send_all(&self, message: &Message) -> usize {
        self.sessions
            .iter()
            .filter(|entry| entry.value().outbound.send(message.clone()).is_ok())
            .count()
    }
}

/// Keeps a session registered for as long as it is alive.
#[derive(Debug)]
pub struct SessionGuard {
    sessions: Arc<DashMap<SessionId, SessionEntry>>,
    id: SessionId,
}

impl SessionGuard {
    pub fn id(&self) -> SessionId {
        self.id
    }
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        self.sessions.remove(&self.id);
        tracing::trace!(session_id = %self.id, "Session unregistered");
    }
}
