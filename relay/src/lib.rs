//! Relay endpoint between chat clients and the hosted Gemini model.
//!
//! Each request is handled independently: the persona directive and seed
//! exchange from [`config::RelayConfig`] are prepended to the caller's
//! message, one completion is awaited, and the reply text is returned.

pub mod config;
pub mod http_server;
pub mod prompt;
