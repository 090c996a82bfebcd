//! Recording session gateway for unit tests.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use axum::extract::ws::WebSocket;

use crate::session::{RebootFlag, SessionError, SessionGateway, SessionInfo};

#[derive(Debug, Default)]
pub struct RecordingGateway {
    pub accepted: Mutex<Vec<SessionInfo>>,
    pub broadcasts: Mutex<Vec<u8>>,
    pub players: AtomicUsize,
    pub player_count_calls: AtomicUsize,
    pub fail_broadcast: AtomicBool,
    pub flag: RebootFlag,
}

impl RecordingGateway {
    pub fn with_players(players: usize) -> Self {
        let gateway = Self::default();
        gateway.players.store(players, Ordering::SeqCst);
        gateway
    }

    pub fn failing() -> Self {
        let gateway = Self::default();
        gateway.fail_broadcast.store(true, Ordering::SeqCst);
        gateway
    }

    pub fn broadcasts(&self) -> Vec<u8> {
        self.broadcasts.lock().unwrap().clone()
    }

    pub fn accepted(&self) -> Vec<SessionInfo> {
        self.accepted.lock().unwrap().clone()
    }
}

#[async_trait]
impl SessionGateway for RecordingGateway {
    async fn accept_connection(&self, _socket: WebSocket, info: SessionInfo) {
        self.accepted.lock().unwrap().push(info);
    }

    async fn broadcast_reboot_alert(&self, minutes_left: u8) -> Result<(), SessionError> {
        if self.fail_broadcast.load(Ordering::SeqCst) {
            return Err(SessionError::Unavailable("broadcast disabled".into()));
        }
        self.broadcasts.lock().unwrap().push(minutes_left);
        Ok(())
    }

    fn player_count(&self) -> usize {
        self.player_count_calls.fetch_add(1, Ordering::SeqCst);
        self.players.load(Ordering::SeqCst)
    }

    fn reboot_flag(&self) -> &RebootFlag {
        &self.flag
    }
}
