//! Core data model — brew requests, contexts, and interaction records.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::actions::ActionId;
use crate::error::{Result, ValidationReport};
use crate::timeline;

pub const DOSE_GRAMS_MIN: u32 = 10;
pub const DOSE_GRAMS_MAX: u32 = 30;
pub const TEMP_C_MIN: u32 = 85;
pub const TEMP_C_MAX: u32 = 100;
pub const PRESSURE_BAR_MIN: u32 = 5;
pub const PRESSURE_BAR_MAX: u32 = 15;
const DEVICE_ADDRESS_MAX_LEN: usize = 4096;

/// Supported brew styles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BrewType {
    Espresso,
    Doppio,
    Lungo,
    Ristretto,
}

impl BrewType {
    pub fn wire_name(self) -> &'static str {
        match self {
            Self::Espresso => "espresso",
            Self::Doppio => "doppio",
            Self::Lungo => "lungo",
            Self::Ristretto => "ristretto",
        }
    }

    pub fn from_wire(name: &str) -> Option<Self> {
        match name {
            "espresso" => Some(Self::Espresso),
            "doppio" => Some(Self::Doppio),
            "lungo" => Some(Self::Lungo),
            "ristretto" => Some(Self::Ristretto),
            _ => None,
        }
    }
}

/// Inbound brew-start parameters, as received from the caller.
/// `brew_type` stays a string until validation parses it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrewRequest {
    pub brew_type: String,
    pub dose_grams: u32,
    pub target_temp_c: u32,
    pub target_pressure_bar: u32,
    pub device_address: String,
}

impl BrewRequest {
    /// Validate every field, collecting all failures into one report.
    /// Returns the parsed brew type on success.
    pub fn validate(&self) -> Result<BrewType> {
        let mut report = ValidationReport::default();

        let brew_type = BrewType::from_wire(&self.brew_type);
        if brew_type.is_none() {
            report.push(
                "brew_type",
                format!("unknown brew type {:?}", self.brew_type),
            );
        }
        if !(DOSE_GRAMS_MIN..=DOSE_GRAMS_MAX).contains(&self.dose_grams) {
            report.push(
                "dose_grams",
                format!(
                    "{} outside {DOSE_GRAMS_MIN}-{DOSE_GRAMS_MAX}g",
                    self.dose_grams
                ),
            );
        }
        if !(TEMP_C_MIN..=TEMP_C_MAX).contains(&self.target_temp_c) {
            report.push(
                "target_temp_c",
                format!("{} outside {TEMP_C_MIN}-{TEMP_C_MAX}C", self.target_temp_c),
            );
        }
        if !(PRESSURE_BAR_MIN..=PRESSURE_BAR_MAX).contains(&self.target_pressure_bar) {
            report.push(
                "target_pressure_bar",
                format!(
                    "{} outside {PRESSURE_BAR_MIN}-{PRESSURE_BAR_MAX} bar",
                    self.target_pressure_bar
                ),
            );
        }
        if let Err(reason) = check_device_address(&self.device_address) {
            report.push("device_address", reason);
        }

        report.into_result()?;
        // Report is empty here, so the parse above succeeded.
        Ok(brew_type.unwrap_or(BrewType::Espresso))
    }
}

/// Transport-level address validation: opaque beyond format.
fn check_device_address(address: &str) -> std::result::Result<(), String> {
    if address.is_empty() {
        return Err("must not be empty".into());
    }
    if address.len() > DEVICE_ADDRESS_MAX_LEN {
        return Err(format!("longer than {DEVICE_ADDRESS_MAX_LEN} chars"));
    }
    if !address
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | ':' | '-'))
    {
        return Err("contains characters outside [A-Za-z0-9._:-]".into());
    }
    Ok(())
}

static BREW_SEQ: AtomicU64 = AtomicU64::new(1);

/// Generate a process-unique brew id: `brew_<epoch-secs>_<seq>`.
/// Doubles as the notification dedup tag on every surface.
pub fn next_brew_id() -> String {
    let seq = BREW_SEQ.fetch_add(1, Ordering::Relaxed);
    format!("brew_{}_{seq}", Utc::now().timestamp())
}

/// Per-brew correlation and parameter record, threaded through scheduling
/// and payload construction. Immutable after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrewContext {
    pub brew_id: String,
    pub device_address: String,
    pub brew_type: BrewType,
    pub dose_grams: u32,
    pub target_temp_c: u32,
    pub target_pressure_bar: u32,
    pub start_time: DateTime<Utc>,
}

impl BrewContext {
    /// Validate a request and mint the per-brew context.
    pub fn from_request(request: &BrewRequest) -> Result<Self> {
        let brew_type = request.validate()?;
        Ok(Self {
            brew_id: next_brew_id(),
            device_address: request.device_address.clone(),
            brew_type,
            dose_grams: request.dose_grams,
            target_temp_c: request.target_temp_c,
            target_pressure_bar: request.target_pressure_bar,
            start_time: Utc::now(),
        })
    }
}

/// What `start_brew` hands back to the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrewReceipt {
    pub brew_id: String,
    pub stage_count: usize,
    pub estimated_duration_seconds: u64,
}

impl BrewReceipt {
    pub fn for_brew(brew_id: String) -> Self {
        Self {
            brew_id,
            stage_count: timeline::stage_count(),
            estimated_duration_seconds: timeline::estimated_duration_seconds(),
        }
    }
}

/// Raw interaction record as delivered by a platform surface. Everything
/// is stringly typed here; this is the only place that shape exists.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawInteraction {
    pub wire_action_id: String,
    #[serde(default)]
    pub brew_id: Option<String>,
    #[serde(default)]
    pub deep_link: Option<String>,
    #[serde(default)]
    pub stage: Option<String>,
}

/// The router's output: one canonical navigation event per accepted
/// interaction, consumed by the UI layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationEvent {
    pub action: ActionId,
    pub brew_id: String,
    pub deep_link: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_request() -> BrewRequest {
        BrewRequest {
            brew_type: "espresso".into(),
            dose_grams: 18,
            target_temp_c: 93,
            target_pressure_bar: 9,
            device_address: "dev-123".into(),
        }
    }

    #[test]
    fn test_valid_request_passes() {
        assert_eq!(valid_request().validate().unwrap(), BrewType::Espresso);
    }

    #[test]
    fn test_validation_collects_every_bad_field() {
        let request = BrewRequest {
            brew_type: "cold_brew".into(),
            dose_grams: 9,
            target_temp_c: 101,
            target_pressure_bar: 4,
            device_address: String::new(),
        };
        let err = request.validate().unwrap_err();
        let crate::error::FirstCrackError::Validation(report) = err else {
            panic!("expected validation error");
        };
        let fields: Vec<_> = report.errors.iter().map(|e| e.field).collect();
        assert_eq!(
            fields,
            vec![
                "brew_type",
                "dose_grams",
                "target_temp_c",
                "target_pressure_bar",
                "device_address"
            ]
        );
    }

    #[test]
    fn test_range_edges_accepted() {
        let mut request = valid_request();
        request.dose_grams = 10;
        request.target_temp_c = 100;
        request.target_pressure_bar = 5;
        assert!(request.validate().is_ok());
        request.dose_grams = 30;
        request.target_temp_c = 85;
        request.target_pressure_bar = 15;
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_device_address_format() {
        let mut request = valid_request();
        request.device_address = "fcm:token.ABC-123_xyz".into();
        assert!(request.validate().is_ok());
        request.device_address = "not a token".into();
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_brew_ids_match_pattern_and_are_unique() {
        let a = next_brew_id();
        let b = next_brew_id();
        assert_ne!(a, b);
        for id in [&a, &b] {
            let mut parts = id.splitn(3, '_');
            assert_eq!(parts.next(), Some("brew"));
            assert!(parts.next().unwrap().chars().all(|c| c.is_ascii_digit()));
            assert!(parts.next().unwrap().chars().all(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn test_context_copies_parameters() {
        let request = valid_request();
        let ctx = BrewContext::from_request(&request).unwrap();
        assert_eq!(ctx.dose_grams, 18);
        assert_eq!(ctx.device_address, "dev-123");
        assert!(crate::actions::is_safe_brew_id(&ctx.brew_id));
    }

    #[test]
    fn test_receipt_shape() {
        let receipt = BrewReceipt::for_brew("brew_1_2".into());
        assert_eq!(receipt.stage_count, 5);
        assert_eq!(receipt.estimated_duration_seconds, 75);
    }

    #[test]
    fn test_raw_interaction_optional_fields_default() {
        let raw: RawInteraction =
            serde_json::from_str(r#"{"wire_action_id": "stop_shot"}"#).unwrap();
        assert_eq!(raw.wire_action_id, "stop_shot");
        assert!(raw.brew_id.is_none());
        assert!(raw.deep_link.is_none());
        assert!(raw.stage.is_none());
    }
}
