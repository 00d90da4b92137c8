//! Push transport seam — delivery of one stage's payload set to a device.
//!
//! The transport is an opaque, best-effort external service: the scheduler
//! hands it an address and a payload set and moves on. No retries, no
//! backoff; a stale stage notification is worse than a missing one.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;

use firstcrack_core::config::TransportConfig;
use firstcrack_core::error::{FirstCrackError, Result};
use firstcrack_payload::StagePush;

#[async_trait]
pub trait Transport: Send + Sync {
    fn name(&self) -> &str;

    /// Deliver one stage payload set to a device address.
    async fn send(&self, address: &str, push: &StagePush) -> Result<()>;
}

/// Wire envelope the push gateway receives: the opaque destination plus
/// one payload per surface.
#[derive(Debug, Serialize)]
pub struct PushEnvelope<'a> {
    pub device_address: &'a str,
    pub stage: &'a str,
    pub brew_id: &'a str,
    pub android: &'a firstcrack_payload::android::AndroidPayload,
    pub apns: &'a firstcrack_payload::apns::ApnsPayload,
    pub webpush: &'a firstcrack_payload::webpush::WebPushPayload,
}

impl<'a> PushEnvelope<'a> {
    pub fn new(address: &'a str, push: &'a StagePush) -> Self {
        Self {
            device_address: address,
            stage: &push.record.stage,
            brew_id: &push.brew_id,
            android: &push.android,
            apns: &push.apns,
            webpush: &push.webpush,
        }
    }
}

/// POSTs each stage envelope to a push gateway.
pub struct HttpTransport {
    gateway_url: String,
    timeout: Duration,
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new(gateway_url: &str, timeout_seconds: u64) -> Self {
        Self {
            gateway_url: gateway_url.to_string(),
            timeout: Duration::from_secs(timeout_seconds),
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    fn name(&self) -> &str {
        "http"
    }

    async fn send(&self, address: &str, push: &StagePush) -> Result<()> {
        let resp = self
            .client
            .post(&self.gateway_url)
            .json(&PushEnvelope::new(address, push))
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| FirstCrackError::TransportSend(format!("gateway unreachable: {e}")))?;

        if resp.status().is_success() {
            Ok(())
        } else {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            Err(FirstCrackError::TransportSend(format!(
                "gateway error {status}: {body}"
            )))
        }
    }
}

/// Logs each payload instead of delivering it. Used by the demo CLI and
/// any offline run.
pub struct ConsoleTransport;

#[async_trait]
impl Transport for ConsoleTransport {
    fn name(&self) -> &str {
        "console"
    }

    async fn send(&self, address: &str, push: &StagePush) -> Result<()> {
        tracing::info!(
            "📣 [{}] {} → {}: {} — {}",
            push.record.stage,
            push.brew_id,
            address,
            push.record.title,
            push.record.body
        );
        Ok(())
    }
}

/// Build the configured transport.
pub fn from_config(config: &TransportConfig) -> Arc<dyn Transport> {
    match config.kind.as_str() {
        "http" => Arc::new(HttpTransport::new(
            &config.gateway_url,
            config.timeout_seconds,
        )),
        "console" => Arc::new(ConsoleTransport),
        other => {
            tracing::warn!("Unknown transport kind {other:?}, falling back to console");
            Arc::new(ConsoleTransport)
        }
    }
}
