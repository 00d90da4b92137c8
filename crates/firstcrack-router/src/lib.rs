//! # FirstCrack Router
//!
//! Client-side decoding of notification interactions. Whatever platform
//! surface captured the tap, the router validates the raw record against
//! the action registry and emits one canonical navigation event on the
//! application's single channel.

pub mod bridge;
pub mod router;

pub use bridge::NavigationStream;
pub use router::{ActionRouter, RouteOutcome};
