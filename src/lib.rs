//! Webhook relay library.
//!
//! Accepts trading-signal webhooks on `POST /`, checks the source against an
//! allow-list, classifies the body and forwards it to one of four fixed
//! downstream targets.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;
pub mod security;
pub mod upstream;

pub use config::RelayConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
