//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection (loopback)
//!     → server.rs (axum setup, middleware stack)
//!     → request.rs (request ID)
//!     → middleware/cors.rs (origin policy, preflight)
//!     → websocket.rs | status.rs | reboot.rs
//!     → response.rs (error → status + plain text)
//! ```

pub mod middleware;
pub mod reboot;
pub mod request;
pub mod response;
pub mod server;
pub mod status;
pub mod websocket;

pub use request::X_REQUEST_ID;
pub use response::GatewayError;
pub use server::{AppState, HttpServer};
