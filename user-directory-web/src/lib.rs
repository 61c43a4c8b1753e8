//! User directory REST API.
//!
//! Exposes the record store over HTTP: configuration, logging setup, error
//! mapping and routes. The binary in `main.rs` wires them together.

pub mod config;
pub mod error;
pub mod logging;
pub mod middleware;
pub mod routes;
