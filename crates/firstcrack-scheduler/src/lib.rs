//! # FirstCrack Scheduler
//!
//! Converts a validated brew request plus the static stage timeline into a
//! sequence of timed, best-effort push sends. One tokio task per brew,
//! absolute deadlines, per-brew cancellation.

pub mod engine;
pub mod transport;

pub use engine::BrewScheduler;
pub use transport::{ConsoleTransport, HttpTransport, PushEnvelope, Transport};
