//! # FirstCrack Payload
//!
//! Per-stage notification payload construction. One logical record per
//! `(BrewContext, StageEntry)` pair, encoded for three delivery surfaces:
//! Android data messages, APNs, and Web Push. Building is pure; delivery
//! belongs to the scheduler's transport.

pub mod android;
pub mod apns;
pub mod builder;
pub mod category;
pub mod record;
pub mod webpush;

pub use builder::{build_stage_push, StagePush};
pub use category::{category_for, category_for_wire, NO_ACTION_CATEGORY};
pub use record::{ActionSpec, StageRecord};
