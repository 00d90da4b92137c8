//! Error taxonomy shared across the FirstCrack crates.
//!
//! Only brew-start validation is ever surfaced to a synchronous caller;
//! everything that goes wrong during an unattended timeline or while
//! decoding an interaction is recovered locally (logged and skipped).

use std::fmt;

use serde::Serialize;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, FirstCrackError>;

/// One field-level failure from brew-request validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub reason: String,
}

/// All field-level failures collected from a single brew request.
/// Validation never stops at the first bad field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub errors: Vec<FieldError>,
}

impl ValidationReport {
    pub fn push(&mut self, field: &'static str, reason: impl Into<String>) {
        self.errors.push(FieldError {
            field,
            reason: reason.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Ok if no field failed, otherwise the full report as an error.
    pub fn into_result(self) -> Result<()> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(FirstCrackError::Validation(self))
        }
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for e in &self.errors {
            if !first {
                write!(f, "; ")?;
            }
            write!(f, "{}: {}", e.field, e.reason)?;
            first = false;
        }
        Ok(())
    }
}

#[derive(Error, Debug)]
pub enum FirstCrackError {
    /// Malformed brew-start parameters. The brew is never created.
    #[error("validation failed: {0}")]
    Validation(ValidationReport),

    /// Malformed stage/context pairing handed to the payload builder.
    /// Fails the single stage; the timeline continues.
    #[error("invalid stage data: {0}")]
    InvalidStageData(String),

    /// The push transport rejected or could not deliver a stage payload.
    /// Logged, never retried.
    #[error("transport send failed: {0}")]
    TransportSend(String),

    /// Interaction carried a wire action id outside the closed set.
    #[error("unknown action id: {0}")]
    UnknownAction(String),

    /// Brew id failed the allow-listed character class.
    #[error("invalid brew id: {0:?}")]
    InvalidBrewId(String),

    /// The navigation bridge has no live channel attached.
    #[error("navigation channel not attached")]
    ChannelDetached,

    #[error("config error: {0}")]
    Config(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
