//! Routing subsystem: the dispatch router.
//!
//! # Data Flow
//! ```text
//! IncomingPayload (source, arrival time, body text)
//!     → intent.rs (classify: trade / exit / reverse / invalid)
//!     → transform.rs (reverse only: derive exit and entry legs)
//!     → router.rs (forwarding protocol per intent)
//!     → Delivered or RelayError
//! ```
//!
//! # Design Decisions
//! - Classification is a pure function of the body text
//! - Prefix check before JSON decoding, so categories never overlap
//! - No retries; one failed call ends the request
//! - The reverse pause is a timer, never a blocking sleep

pub mod intent;
pub mod router;
pub mod transform;

pub use intent::{classify, ClassifiedIntent, IncomingPayload, InvalidReason, TRADE_PREFIX};
pub use router::{Delivered, DispatchRouter, REVERSE_PHASE_DELAY};
pub use transform::{EntryLeg, ExitLeg, ReverseTransform};
