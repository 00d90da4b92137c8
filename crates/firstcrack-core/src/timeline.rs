//! The static brew stage timeline.
//!
//! Five stages, each firing at a fixed offset from brew start. Entries are
//! immutable and defined here at compile time; the scheduler walks the
//! table in order and the payload builder renders each entry.

use serde::{Deserialize, Serialize};

use crate::actions::ActionId;

/// A discrete point in the brew lifecycle, ordered by position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageId {
    Heating,
    Grinding,
    PreInfusion,
    Brewing,
    Complete,
}

impl StageId {
    /// Snake-case name used in every wire payload.
    pub fn wire_name(self) -> &'static str {
        match self {
            Self::Heating => "heating",
            Self::Grinding => "grinding",
            Self::PreInfusion => "pre_infusion",
            Self::Brewing => "brewing",
            Self::Complete => "complete",
        }
    }

    /// Decode a wire stage name. Unknown names are representable so the
    /// stringly boundary can degrade instead of erroring.
    pub fn from_wire(name: &str) -> Option<Self> {
        match name {
            "heating" => Some(Self::Heating),
            "grinding" => Some(Self::Grinding),
            "pre_infusion" => Some(Self::PreInfusion),
            "brewing" => Some(Self::Brewing),
            "complete" => Some(Self::Complete),
            _ => None,
        }
    }
}

/// Image and/or video locators, relative to the configured media base URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MediaRef {
    pub image: Option<&'static str>,
    pub video: Option<&'static str>,
}

/// One row of the stage timeline.
#[derive(Debug, Clone, Copy)]
pub struct StageEntry {
    pub stage: StageId,
    /// Seconds after brew start at which this stage's notification fires.
    /// Strictly increasing across the table.
    pub offset_seconds: u64,
    pub title: &'static str,
    pub body: &'static str,
    pub media: Option<MediaRef>,
    /// Action buttons in display order. At most three; the web surface
    /// truncates further to its own cap.
    pub actions: &'static [ActionId],
    /// Hint for surfaces that support persistent notifications.
    pub require_interaction: bool,
    /// Coarse progress (0-100) for surfaces that render it.
    pub progress: u8,
}

/// The brew timeline. Offsets are strictly increasing; the last offset is
/// the estimated total duration.
pub const TIMELINE: &[StageEntry] = &[
    StageEntry {
        stage: StageId::Heating,
        offset_seconds: 0,
        title: "Heating up",
        body: "Bringing the boiler to target temperature.",
        media: Some(MediaRef {
            image: Some("stages/heating.jpg"),
            video: None,
        }),
        actions: &[],
        require_interaction: false,
        progress: 10,
    },
    StageEntry {
        stage: StageId::Grinding,
        offset_seconds: 15,
        title: "Grinding",
        body: "Grinding your dose fresh.",
        media: Some(MediaRef {
            image: Some("stages/grinding.jpg"),
            video: None,
        }),
        actions: &[],
        require_interaction: false,
        progress: 35,
    },
    StageEntry {
        stage: StageId::PreInfusion,
        offset_seconds: 30,
        title: "Pre-infusion",
        body: "Wetting the puck at low pressure.",
        media: None,
        actions: &[ActionId::ViewLive],
        require_interaction: false,
        progress: 55,
    },
    StageEntry {
        stage: StageId::Brewing,
        offset_seconds: 40,
        title: "Extraction running",
        body: "Your shot is pulling now.",
        media: Some(MediaRef {
            image: Some("stages/brewing.jpg"),
            video: Some("stages/brewing.mp4"),
        }),
        actions: &[ActionId::StopShot, ActionId::ViewLive],
        require_interaction: false,
        progress: 75,
    },
    StageEntry {
        stage: StageId::Complete,
        offset_seconds: 75,
        title: "Brew complete",
        body: "Your coffee is ready. Enjoy it while it's hot.",
        media: Some(MediaRef {
            image: Some("stages/complete.jpg"),
            video: None,
        }),
        actions: &[ActionId::ViewRecipe, ActionId::RateBrew],
        require_interaction: true,
        progress: 100,
    },
];

pub fn stage_count() -> usize {
    TIMELINE.len()
}

/// Estimated brew duration: the offset of the final stage.
pub fn estimated_duration_seconds() -> u64 {
    TIMELINE.last().map(|e| e.offset_seconds).unwrap_or(0)
}

/// Look up the timeline row for a stage.
pub fn entry_for(stage: StageId) -> Option<&'static StageEntry> {
    TIMELINE.iter().find(|e| e.stage == stage)
}
