//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware stack)
//!     → request.rs (assign request ID)
//!     → [security: ingress filter, body limit]
//!     → server.rs handler → routing::DispatchRouter
//!     → response.rs (status code, or RelayError → status code)
//!     → Send to client
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use request::{request_span, RequestId, RequestIdExt, RequestIdLayer, X_REQUEST_ID};
pub use response::RelayError;
pub use server::{HttpServer, ServerError};
