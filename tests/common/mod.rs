//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::extract::ws::WebSocket;
use game_gateway::config::GatewayConfig;
use game_gateway::lifecycle::Shutdown;
use game_gateway::session::{RebootFlag, SessionError, SessionGateway, SessionInfo};
use game_gateway::HttpServer;
use tokio::net::{TcpListener, TcpStream};
use tokio_tungstenite::tungstenite::{self, client::IntoClientRequest, http::HeaderValue};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};

pub const ADMISSION_ORIGIN: &str = "https://blubber.run.place";

pub type Client = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Session gateway that records admissions and broadcasts.
#[derive(Debug, Default)]
pub struct RecordingGateway {
    accepted: Mutex<Vec<SessionInfo>>,
    broadcasts: Mutex<Vec<u8>>,
    flag: RebootFlag,
}

impl RecordingGateway {
    pub fn accepted(&self) -> Vec<SessionInfo> {
        self.accepted.lock().unwrap().clone()
    }

    pub fn broadcasts(&self) -> Vec<u8> {
        self.broadcasts.lock().unwrap().clone()
    }

    pub fn is_rebooting(&self) -> bool {
        self.flag.is_set()
    }
}

#[async_trait]
impl SessionGateway for RecordingGateway {
    async fn accept_connection(&self, _socket: WebSocket, info: SessionInfo) {
        self.accepted.lock().unwrap().push(info);
    }

    async fn broadcast_reboot_alert(&self, minutes_left: u8) -> Result<(), SessionError> {
        self.broadcasts.lock().unwrap().push(minutes_left);
        Ok(())
    }

    fn player_count(&self) -> usize {
        self.accepted.lock().unwrap().len()
    }

    fn reboot_flag(&self) -> &RebootFlag {
        &self.flag
    }
}

/// Start the gateway on an ephemeral loopback port.
pub async fn start_gateway(
    config: GatewayConfig,
    sessions: Arc<dyn SessionGateway>,
) -> (SocketAddr, Shutdown) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    let server = HttpServer::new(config, sessions);
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    (addr, shutdown)
}

/// Open a WebSocket to the gateway with the given headers.
pub async fn connect(
    addr: SocketAddr,
    path: &str,
    headers: &[(&'static str, &str)],
) -> Result<Client, tungstenite::Error> {
    let mut request = format!("ws://{addr}{path}").into_client_request()?;
    for (name, value) in headers {
        request
            .headers_mut()
            .insert(*name, HeaderValue::from_str(value).unwrap());
    }
    let (client, _) = tokio_tungstenite::connect_async(request).await?;
    Ok(client)
}

/// HTTP client that never goes through a system proxy.
pub fn http_client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}

/// Poll `check` until it returns true or two seconds pass.
pub async fn wait_until<F>(mut check: F) -> bool
where
    F: FnMut() -> bool,
{
    for _ in 0..100 {
        if check() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    false
}
