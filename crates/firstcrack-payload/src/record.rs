//! The machine-readable core record embedded in every surface encoding.
//!
//! All three platform payloads are derived from one `StageRecord`, so
//! cross-platform behavior stays consistent. Numeric brew parameters are
//! carried as strings; the transport layer requires string fields, and
//! the values are integers so nothing is lost.

use serde::{Deserialize, Serialize};

use firstcrack_core::error::Result;

/// One action button, as encoded on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionSpec {
    /// Wire action id reported back on interaction.
    pub id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub icon: Option<String>,
    pub requires_foreground: bool,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub deep_link: Option<String>,
}

/// The shared logical payload for one stage of one brew.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageRecord {
    /// Always `brew_stage`; lets clients dispatch on notification kind.
    #[serde(rename = "type")]
    pub kind: String,
    pub stage: String,
    pub brew_id: String,
    pub title: String,
    pub body: String,
    pub brew_type: String,
    pub dose_grams: String,
    pub target_temp_c: String,
    pub target_pressure_bar: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub video_url: Option<String>,
    /// Action buttons in display order; empty when the stage has none.
    pub actions: Vec<ActionSpec>,
    /// Target for a tap on the notification body.
    pub deep_link: String,
    pub category: String,
    pub require_interaction: bool,
    pub progress: u8,
}

pub const RECORD_KIND: &str = "brew_stage";

impl StageRecord {
    /// The actions list as a JSON string, for surfaces whose payload is a
    /// string-to-string map.
    pub fn actions_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.actions)?)
    }
}
