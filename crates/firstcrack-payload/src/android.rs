//! Android surface — FCM-style data message.
//!
//! The data block is a string-to-string map; the client SDK rebuilds the
//! typed record on the far side. `collapse_key` carries the brew id so a
//! re-sent stage updates the existing notification instead of stacking.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use firstcrack_core::error::Result;

use crate::record::StageRecord;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AndroidPayload {
    pub collapse_key: String,
    pub priority: String,
    pub data: BTreeMap<String, String>,
}

pub fn encode(record: &StageRecord) -> Result<AndroidPayload> {
    let mut data = BTreeMap::new();
    data.insert("type".into(), record.kind.clone());
    data.insert("stage".into(), record.stage.clone());
    data.insert("brewId".into(), record.brew_id.clone());
    data.insert("title".into(), record.title.clone());
    data.insert("body".into(), record.body.clone());
    data.insert("brewType".into(), record.brew_type.clone());
    data.insert("doseGrams".into(), record.dose_grams.clone());
    data.insert("targetTempC".into(), record.target_temp_c.clone());
    data.insert("targetPressureBar".into(), record.target_pressure_bar.clone());
    data.insert("category".into(), record.category.clone());
    data.insert("deepLink".into(), record.deep_link.clone());
    data.insert("progress".into(), record.progress.to_string());
    data.insert(
        "requireInteraction".into(),
        record.require_interaction.to_string(),
    );
    if let Some(url) = &record.image_url {
        data.insert("imageUrl".into(), url.clone());
    }
    if let Some(url) = &record.video_url {
        data.insert("videoUrl".into(), url.clone());
    }
    if !record.actions.is_empty() {
        data.insert("actions".into(), record.actions_json()?);
    }

    Ok(AndroidPayload {
        collapse_key: record.brew_id.clone(),
        priority: "high".into(),
        data,
    })
}
