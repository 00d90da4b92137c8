//! Convenience surface over the FirstCrack workspace crates.

pub use firstcrack_core::{
    actions, config::FirstCrackConfig, timeline, ActionId, BrewContext, BrewReceipt, BrewRequest,
    BrewType, FirstCrackError, NavigationEvent, RawInteraction, Result, StageEntry, StageId,
    TIMELINE,
};
pub use firstcrack_payload::{build_stage_push, category_for, StagePush};
pub use firstcrack_router::{bridge, ActionRouter, NavigationStream, RouteOutcome};
pub use firstcrack_scheduler::{transport, BrewScheduler, Transport};
