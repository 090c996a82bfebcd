//! In-process session hub.
//!
//! Holds the outbound channel of every admitted socket so the gateway can
//! count players and fan out reboot alerts. Game frames from clients are
//! drained and dropped; simulation lives elsewhere.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use axum::extract::ws::{close_code, CloseFrame, Message, WebSocket};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;

use crate::observability::metrics;
use crate::session::connection::{SessionEntry, SessionGuard, SessionRegistry};
use crate::session::{RebootFlag, SessionError, SessionGateway, SessionInfo};

/// First byte of the binary reboot alert frame (`[opcode, minutes_left]`).
pub const REBOOT_ALERT_OPCODE: u8 = 0x52;

/// Encode a reboot alert frame.
pub fn reboot_alert_frame(minutes_left: u8) -> Message {
    Message::Binary(vec![REBOOT_ALERT_OPCODE, minutes_left].into())
}

/// Why the hub turned a session away.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Refusal {
    Rebooting,
    Closed,
}

#[derive(Debug, Default)]
pub struct SessionHub {
    registry: SessionRegistry,
    reboot_flag: RebootFlag,
    closed: AtomicBool,
    /// Last broadcast countdown. Held while registering and while
    /// broadcasting so a session is either alerted or refused.
    last_alert: Mutex<Option<u8>>,
}

impl SessionHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stop accepting sessions and ask every live session to close.
    pub fn close(&self) {
        let _registration = self.lock_alerts();
        if self.closed.swap(true, Ordering::AcqRel) {
            return;
        }
        let notified = self.registry.send_all(&close_message(close_code::AWAY, "server shutting down"));
        tracing::info!(sessions = notified, "Session hub closed");
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    fn lock_alerts(&self) -> MutexGuard<'_, Option<u8>> {
        self.last_alert.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Register a session unless a reboot alert already went out or the hub
    /// is closed.
    pub fn try_register(&self, entry: SessionEntry) -> Result<SessionGuard, Refusal> {
        let last_alert = self.lock_alerts();
        if self.is_closed() {
            return Err(Refusal::Closed);
        }
        if last_alert.is_some() || self.reboot_flag.is_set() {
            return Err(Refusal::Rebooting);
        }
        Ok(self.registry.register(entry))
    }
}

fn close_message(code: u16, reason: &'static str) -> Message {
    Message::Close(Some(CloseFrame {
        code,
        reason: reason.into(),
    }))
}

#[async_trait]
impl SessionGateway for SessionHub {
    async fn accept_connection(&self, socket: WebSocket, info: SessionInfo) {
        let (mut sink, mut stream) = socket.split();
        let (outbound, mut outbound_rx) = mpsc::unbounded_channel();
        let guard = match self.try_register(SessionEntry {
            client_address: info.client_address.clone(),
            outbound,
        }) {
            Ok(guard) => guard,
            Err(refusal) => {
                tracing::info!(client = %info.client_address, ?refusal, "Refusing session");
                let reason = match refusal {
                    Refusal::Rebooting => "server is rebooting",
                    Refusal::Closed => "server shutting down",
                };
                if let Err(e) = sink.send(close_message(close_code::AWAY, reason)).await {
                    tracing::debug!(client = %info.client_address, error = %e, "Failed to send close frame");
                }
                return;
            }
        };
        let session_id = guard.id();
        metrics::set_active_sessions(self.registry.len());

        tracing::info!(
            session_id = %session_id,
            client = %info.client_address,
            endpoint = %info.endpoint,
            "Session started"
        );

        let writer = async {
            while let Some(message) = outbound_rx.recv().await {
                let closing = matches!(message, Message::Close(_));
                if sink.send(message).await.is_err() || closing {
                    break;
                }
            }
        };

        let reader = async {
            while let Some(frame) = stream.next().await {
                match frame {
                    Ok(Message::Close(_)) => break,
                    Ok(_) => {}
                    Err(e) => {
                        tracing::debug!(session_id = %session_id, error = %e, "Session read error");
                        break;
                    }
                }
            }
        };

        tokio::select! {
            _ = writer => {}
            _ = reader => {}
        }

        drop(guard);
        metrics::set_active_sessions(self.registry.len());
        tracing::info!(session_id = %session_id, client = %info.client_address, "Session ended");
    }

    async fn broadcast_reboot_alert(&self, minutes_left: u8) -> Result<(), SessionError> {
        let mut last_alert = self.lock_alerts();
        if self.is_closed() {
            return Err(SessionError::Closed);
        }
        let delivered = self.registry.send_all(&reboot_alert_frame(minutes_left));
        *last_alert = Some(minutes_left);
        drop(last_alert);
        tracing::info!(minutes_left, sessions = delivered, "Reboot alert broadcast");
        Ok(())
    }

    fn player_count(&self) -> usize {
        self.registry.len()
    }

    fn reboot_flag(&self) -> &RebootFlag {
        &self.reboot_flag
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reboot_alert_frame_layout() {
        match reboot_alert_frame(10) {
            Message::Binary(bytes) => assert_eq!(bytes[..], [REBOOT_ALERT_OPCODE, 10]),
            other => panic!("unexpected frame {other:?}"),
        }
    }

    fn entry() -> (SessionEntry, mpsc::UnboundedReceiver<Message>) {
        let (outbound, rx) = mpsc::unbounded_channel();
        (
            SessionEntry {
                client_address: "203.0.113.9".into(),
                outbound,
            },
            rx,
        )
    }

    #[tokio::test]
    async fn registered_session_receives_alert() {
        let hub = SessionHub::new();
        let (e, mut rx) = entry();
        let _guard = hub.try_register(e).unwrap();
        assert_eq!(hub.player_count(), 1);

        hub.broadcast_reboot_alert(7).await.unwrap();
        match rx.try_recv() {
            Ok(Message::Binary(bytes)) => assert_eq!(bytes[..], [REBOOT_ALERT_OPCODE, 7]),
            other => panic!("expected alert, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn refuses_after_alert_before_flag_is_raised() {
        // The coordinator raises the flag only after the broadcast returns;
        // a session arriving in between must not slip in unalerted.
        let hub = SessionHub::new();
        hub.broadcast_reboot_alert(3).await.unwrap();
        assert!(!hub.reboot_flag().is_set());

        let (e, _rx) = entry();
        assert_eq!(hub.try_register(e).unwrap_err(), Refusal::Rebooting);
        assert_eq!(hub.player_count(), 0);
    }

    #[test]
    fn refuses_once_flag_is_set() {
        let hub = SessionHub::new();
        hub.reboot_flag().set();
        let (e, _rx) = entry();
        assert_eq!(hub.try_register(e).unwrap_err(), Refusal::Rebooting);
        assert_eq!(hub.player_count(), 0);
    }

    #[test]
    fn refuses_after_close() {
        let hub = SessionHub::new();
        hub.close();
        let (e, _rx) = entry();
        assert_eq!(hub.try_register(e).unwrap_err(), Refusal::Closed);
    }

    #[tokio::test]
    async fn broadcast_on_empty_hub_succeeds() {
        let hub = SessionHub::new();
        assert_eq!(hub.player_count(), 0);
        assert!(hub.broadcast_reboot_alert(5).await.is_ok());
    }

    #[tokio::test]
    async fn broadcast_after_close_fails() {
        let hub = SessionHub::new();
        hub.close();
        assert!(hub.is_closed());
        assert!(matches!(
            hub.broadcast_reboot_alert(5).await,
            Err(SessionError::Closed)
        ));
    }
}
