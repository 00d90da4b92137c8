//! Payload assembly — one `(BrewContext, StageEntry)` pair in, one payload
//! per surface out.
//!
//! Pure: no clocks, no randomness, no I/O. Identical inputs produce
//! byte-identical serialized payload sets. Malformed input fails the whole
//! stage with `InvalidStageData` and produces no payload for any surface.

use firstcrack_core::actions::{self, ActionId};
use firstcrack_core::error::{FirstCrackError, Result};
use firstcrack_core::{BrewContext, FirstCrackConfig, StageEntry, StageId};

use crate::android::{self, AndroidPayload};
use crate::apns::{self, ApnsPayload};
use crate::category;
use crate::record::{ActionSpec, StageRecord, RECORD_KIND};
use crate::webpush::{self, WebPushPayload};

const MAX_ACTIONS_PER_STAGE: usize = 3;

/// The full per-stage output: the shared record plus every surface encoding.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct StagePush {
    pub stage: StageId,
    pub brew_id: String,
    pub record: StageRecord,
    pub android: AndroidPayload,
    pub apns: ApnsPayload,
    pub webpush: WebPushPayload,
}

/// Build the notification payload set for one stage of one brew.
pub fn build_stage_push(
    ctx: &BrewContext,
    entry: &StageEntry,
    config: &FirstCrackConfig,
) -> Result<StagePush> {
    check_inputs(ctx, entry)?;

    let record = build_record(ctx, entry, config)?;
    let android = android::encode(&record)?;
    let apns = apns::encode(&record);
    let webpush = webpush::encode(&record, config.surfaces.web_action_cap());

    Ok(StagePush {
        stage: entry.stage,
        brew_id: ctx.brew_id.clone(),
        record,
        android,
        apns,
        webpush,
    })
}

/// All-or-nothing input validation. Failures here are programmer errors in
/// the static timeline or a context that escaped brew-start validation.
fn check_inputs(ctx: &BrewContext, entry: &StageEntry) -> Result<()> {
    if entry.title.is_empty() || entry.body.is_empty() {
        return Err(invalid(entry, "empty title or body"));
    }
    if entry.actions.len() > MAX_ACTIONS_PER_STAGE {
        return Err(invalid(
            entry,
            format!("{} actions exceeds cap of {MAX_ACTIONS_PER_STAGE}", entry.actions.len()),
        ));
    }
    if entry.progress > 100 {
        return Err(invalid(entry, format!("progress {} above 100", entry.progress)));
    }
    if !actions::is_safe_brew_id(&ctx.brew_id) {
        return Err(invalid(entry, format!("unsafe brew id {:?}", ctx.brew_id)));
    }
    if ctx.device_address.is_empty() {
        return Err(invalid(entry, "empty device address"));
    }
    Ok(())
}

fn invalid(entry: &StageEntry, reason: impl std::fmt::Display) -> FirstCrackError {
    FirstCrackError::InvalidStageData(format!("stage {}: {reason}", entry.stage.wire_name()))
}

fn build_record(
    ctx: &BrewContext,
    entry: &StageEntry,
    config: &FirstCrackConfig,
) -> Result<StageRecord> {
    let action_specs = entry
        .actions
        .iter()
        .copied()
        .map(|action| action_spec(action, &ctx.brew_id, config))
        .collect::<Result<Vec<_>>>()?;

    Ok(StageRecord {
        kind: RECORD_KIND.into(),
        stage: entry.stage.wire_name().into(),
        brew_id: ctx.brew_id.clone(),
        title: entry.title.into(),
        body: entry.body.into(),
        brew_type: ctx.brew_type.wire_name().into(),
        dose_grams: ctx.dose_grams.to_string(),
        target_temp_c: ctx.target_temp_c.to_string(),
        target_pressure_bar: ctx.target_pressure_bar.to_string(),
        image_url: entry
            .media
            .and_then(|m| m.image)
            .map(|path| config.media_url(path)),
        video_url: entry
            .media
            .and_then(|m| m.video)
            .map(|path| config.media_url(path)),
        actions: action_specs,
        deep_link: actions::deep_link_with_scheme(&config.scheme, ActionId::Default, &ctx.brew_id)?,
        category: category::category_for(entry.stage).into(),
        require_interaction: entry.require_interaction,
        progress: entry.progress,
    })
}

fn action_spec(action: ActionId, brew_id: &str, config: &FirstCrackConfig) -> Result<ActionSpec> {
    Ok(ActionSpec {
        id: action.wire_id().into(),
        title: action.button_title().into(),
        icon: action.icon().map(|path| config.media_url(path)),
        requires_foreground: action.requires_foreground(),
        deep_link: Some(actions::deep_link_with_scheme(
            &config.scheme,
            action,
            brew_id,
        )?),
    })
}
