//! # FirstCrack Core
//!
//! Shared vocabulary for the brew-by-notification engine: the data model,
//! error taxonomy, configuration, the action registry, and the static
//! brew stage timeline. Every other crate in the workspace builds on this
//! one.

pub mod actions;
pub mod config;
pub mod error;
pub mod timeline;
pub mod types;

pub use actions::ActionId;
pub use config::FirstCrackConfig;
pub use error::{FirstCrackError, Result, ValidationReport};
pub use timeline::{StageEntry, StageId, TIMELINE};
pub use types::{
    BrewContext, BrewReceipt, BrewRequest, BrewType, NavigationEvent, RawInteraction,
};
