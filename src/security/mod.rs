//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request:
//!     → origin.rs (CORS grant, admission origin)
//!     → client_identity.rs (best-effort client address)
//! ```
//!
//! # Design Decisions
//! - Origin checks are exact string comparisons, never wildcards
//! - Admission accepts one origin; CORS accepts a list
//! - Proxy headers are trusted unless a trusted proxy list is configured

pub mod client_identity;
pub mod origin;

pub use client_identity::ClientIdentityResolver;
pub use origin::OriginPolicy;
