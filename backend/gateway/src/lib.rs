//! linehook HTTP gateway.
//!
//! Mounts channel webhook routes next to a health endpoint and runs the
//! server until a shutdown signal arrives.

pub mod health_api;
pub mod server;

pub use server::{build_app, shutdown_signal, start_server, GatewayState};
