//! Request interceptors applied by the router.

pub mod cors;

pub use cors::cors_middleware;
