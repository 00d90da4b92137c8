//! Stage to notification-category mapping.
//!
//! The category tag selects the platform-registered action set (APNs
//! categories, Android channel grouping, web action templates). The typed
//! mapping is total; unknown wire stage names degrade to the no-action
//! category instead of erroring, so schema drift costs action buttons,
//! not delivery.

use firstcrack_core::StageId;

/// Category for stages (or wire names) with no registered action set.
pub const NO_ACTION_CATEGORY: &str = "BREW_STATUS";

/// Total mapping from stage to category tag.
pub fn category_for(stage: StageId) -> &'static str {
    match stage {
        StageId::Heating => "BREW_PREHEAT",
        StageId::Grinding => "BREW_GRIND",
        StageId::PreInfusion => "BREW_PREINFUSION",
        StageId::Brewing => "BREW_EXTRACTION",
        StageId::Complete => "BREW_COMPLETE",
    }
}

/// Category for a wire stage name, falling back for unknown names.
pub fn category_for_wire(stage: &str) -> &'static str {
    StageId::from_wire(stage)
        .map(category_for)
        .unwrap_or(NO_ACTION_CATEGORY)
}
