//! Web Push surface — the Notification API shape the service worker
//! passes straight to `showNotification`.
//!
//! `tag` carries the brew id so a re-sent stage replaces the notification
//! in place. Browsers cap visible actions, so the list is truncated to
//! the configured cap, preserving display order.

use serde::{Deserialize, Serialize};

use crate::record::StageRecord;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebPushPayload {
    pub title: String,
    pub options: WebPushOptions,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebPushOptions {
    pub body: String,
    pub tag: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub icon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub image: Option<String>,
    pub require_interaction: bool,
    /// The full core record rides along for the click handler.
    pub data: StageRecord,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub actions: Vec<WebAction>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebAction {
    pub action: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub icon: Option<String>,
}

pub fn encode(record: &StageRecord, action_cap: usize) -> WebPushPayload {
    let actions = record
        .actions
        .iter()
        .take(action_cap)
        .map(|spec| WebAction {
            action: spec.id.clone(),
            title: spec.title.clone(),
            icon: spec.icon.clone(),
        })
        .collect();

    WebPushPayload {
        title: record.title.clone(),
        options: WebPushOptions {
            body: record.body.clone(),
            tag: record.brew_id.clone(),
            icon: record.image_url.clone(),
            image: record.image_url.clone(),
            require_interaction: record.require_interaction,
            data: record.clone(),
            actions,
        },
    }
}
