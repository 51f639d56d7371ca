//! # Connector Layer
//!
//! External integrations implementing application interfaces:
//! - Chat completion (OpenRouter, mock for offline use)
//! - Storage (DuckDB and in-memory chat history)
//! - HTTP (axum server, reqwest client for the service)
//! - CLI wiring (container, controllers, command router)

pub mod adapter;
pub mod api;
pub mod server;

pub use adapter::*;
