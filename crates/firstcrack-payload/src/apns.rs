//! APNs surface.
//!
//! Standard `aps` dictionary plus the core record flattened alongside it
//! as custom keys. `mutable-content` is set only when media is attached,
//! so the notification service extension runs just for those stages.

use serde::{Deserialize, Serialize};

use crate::record::StageRecord;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApnsPayload {
    pub aps: Aps,
    #[serde(flatten)]
    pub record: StageRecord,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Aps {
    pub alert: ApsAlert,
    pub category: String,
    pub sound: String,
    /// Groups every stage of one brew into a single thread.
    #[serde(rename = "thread-id")]
    pub thread_id: String,
    #[serde(
        rename = "mutable-content",
        skip_serializing_if = "Option::is_none",
        default
    )]
    pub mutable_content: Option<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApsAlert {
    pub title: String,
    pub body: String,
}

pub fn encode(record: &StageRecord) -> ApnsPayload {
    let has_media = record.image_url.is_some() || record.video_url.is_some();
    ApnsPayload {
        aps: Aps {
            alert: ApsAlert {
                title: record.title.clone(),
                body: record.body.clone(),
            },
            category: record.category.clone(),
            sound: "default".into(),
            thread_id: record.brew_id.clone(),
            mutable_content: has_media.then_some(1),
        },
        record: record.clone(),
    }
}
