//! Upstream (downstream-target) subsystem.
//!
//! # Data Flow
//! ```text
//! Dispatch router picks a ForwardingTarget + Outbound body
//!     → target.rs (kind → configured URL)
//!     → client.rs (single POST, status check, metrics)
//!     → Ok(()) or ForwardError
//! ```

pub mod client;
pub mod target;

pub use client::{Downstream, ForwardError, HttpForwarder, Outbound};
pub use target::{ForwardingTarget, Targets};
