//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request:
//!     → access_control.rs (source address on the allow-list?)
//!     → limits.rs (body size cap, UTF-8 capture)
//!     → Pass to routing
//! ```
//!
//! # Design Decisions
//! - Fail closed: reject on any security check failure
//! - The allow-list is checked before the body is read
//! - IP matching only; there is no other authentication

pub mod access_control;
pub mod limits;

pub use access_control::{ingress_filter, AllowList};
