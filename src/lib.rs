//! Game gateway library.
//!
//! Admission and operational control in front of a real-time game server.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod reboot;
pub mod security;
pub mod session;

pub use config::schema::GatewayConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use session::{RebootFlag, SessionGateway, SessionHub, SessionInfo};
