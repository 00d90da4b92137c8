//! Brew scheduler engine — one timer-driven task per brew.
//!
//! Each brew gets a single long-lived tokio task that walks the static
//! timeline on absolute deadlines: every stage fires at
//! `task start + offset`, never chained off the previous send, so a slow
//! transport cannot drift later stages. Stage sends are independent units
//! of work; a failed build or send is logged and the timeline continues.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{watch, Mutex};
use tokio::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;

use firstcrack_core::error::Result;
use firstcrack_core::{
    timeline, BrewContext, BrewReceipt, BrewRequest, FirstCrackConfig, TIMELINE,
};
use firstcrack_payload::build_stage_push;

use crate::transport::Transport;

struct BrewHandle {
    cancel: CancellationToken,
    done: watch::Receiver<bool>,
}

/// The scheduler — owns the transport and one cancellation handle per
/// in-flight brew.
pub struct BrewScheduler {
    transport: Arc<dyn Transport>,
    config: Arc<FirstCrackConfig>,
    active: Arc<Mutex<HashMap<String, BrewHandle>>>,
}

impl BrewScheduler {
    pub fn new(transport: Arc<dyn Transport>, config: FirstCrackConfig) -> Self {
        Self {
            transport,
            config: Arc::new(config),
            active: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Validate a brew request and launch its notification timeline.
    ///
    /// Validation failure is the only error a caller ever sees; once the
    /// timeline is running, failures are recovered locally. Calling twice
    /// with the same parameters produces two independent timelines —
    /// dedup, if wanted, belongs to the caller.
    pub async fn start_brew(&self, request: &BrewRequest) -> Result<BrewReceipt> {
        let ctx = BrewContext::from_request(request)?;
        let brew_id = ctx.brew_id.clone();

        let cancel = CancellationToken::new();
        let (done_tx, done_rx) = watch::channel(false);
        self.active.lock().await.insert(
            brew_id.clone(),
            BrewHandle {
                cancel: cancel.clone(),
                done: done_rx,
            },
        );

        let transport = Arc::clone(&self.transport);
        let config = Arc::clone(&self.config);
        let active = Arc::clone(&self.active);
        let task_brew_id = brew_id.clone();
        tokio::spawn(async move {
            run_timeline(&ctx, transport.as_ref(), &config, &cancel).await;
            let _ = done_tx.send(true);
            active.lock().await.remove(&task_brew_id);
        });

        tracing::info!(
            "☕ Brew {brew_id} started: {} stages over {}s via {}",
            timeline::stage_count(),
            timeline::estimated_duration_seconds(),
            self.transport.name()
        );
        Ok(BrewReceipt::for_brew(brew_id))
    }

    /// Stop a brew early. Not-yet-fired stages never fire; an in-flight
    /// send is suppressed best-effort. Returns false for unknown or
    /// already-finished brews.
    pub async fn cancel(&self, brew_id: &str) -> bool {
        match self.active.lock().await.remove(brew_id) {
            Some(handle) => {
                handle.cancel.cancel();
                tracing::info!("🛑 Brew {brew_id} cancelled");
                true
            }
            None => false,
        }
    }

    /// Brew ids with a timeline still in flight.
    pub async fn active_brews(&self) -> Vec<String> {
        self.active.lock().await.keys().cloned().collect()
    }

    /// Block until a brew's timeline has finished. Returns immediately for
    /// unknown (or already-finished) brews.
    pub async fn wait(&self, brew_id: &str) {
        let handle_rx = self
            .active
            .lock()
            .await
            .get(brew_id)
            .map(|h| h.done.clone());
        let Some(mut done) = handle_rx else {
            return;
        };
        while !*done.borrow_and_update() {
            if done.changed().await.is_err() {
                break;
            }
        }
    }
}

/// Walk the timeline for one brew, sending each stage at its absolute
/// deadline.
async fn run_timeline(
    ctx: &BrewContext,
    transport: &dyn Transport,
    config: &FirstCrackConfig,
    cancel: &CancellationToken,
) {
    let started = Instant::now();

    for entry in TIMELINE {
        let deadline = started + Duration::from_secs(entry.offset_seconds);
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!(
                    "🛑 Brew {} stopped before stage {}",
                    ctx.brew_id,
                    entry.stage.wire_name()
                );
                return;
            }
            _ = tokio::time::sleep_until(deadline) => {}
        }

        let push = match build_stage_push(ctx, entry, config) {
            Ok(push) => push,
            Err(e) => {
                tracing::error!(
                    "Stage {} of brew {} skipped: {e}",
                    entry.stage.wire_name(),
                    ctx.brew_id
                );
                continue;
            }
        };

        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!(
                    "🛑 Brew {} stopped, suppressing in-flight send for stage {}",
                    ctx.brew_id,
                    entry.stage.wire_name()
                );
                return;
            }
            result = transport.send(&ctx.device_address, &push) => {
                match result {
                    Ok(()) => tracing::debug!(
                        "📣 Stage {} of brew {} sent at +{}s",
                        entry.stage.wire_name(),
                        ctx.brew_id,
                        entry.offset_seconds
                    ),
                    // Best-effort: log and move on to the next stage.
                    Err(e) => tracing::warn!(
                        "⚠️ Stage {} of brew {} not delivered: {e}",
                        entry.stage.wire_name(),
                        ctx.brew_id
                    ),
                }
            }
        }
    }

    tracing::info!("✅ Brew {} timeline complete", ctx.brew_id);
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use firstcrack_core::error::FirstCrackError;
    use firstcrack_core::StageId;
    use firstcrack_payload::StagePush;

    struct RecordingTransport {
        started: Instant,
        sends: std::sync::Mutex<Vec<(String, StageId, u64)>>,
        fail_stage: Option<StageId>,
    }

    impl RecordingTransport {
        fn new() -> Self {
            Self {
                started: Instant::now(),
                sends: std::sync::Mutex::new(Vec::new()),
                fail_stage: None,
            }
        }

        fn failing_on(stage: StageId) -> Self {
            Self {
                fail_stage: Some(stage),
                ..Self::new()
            }
        }

        fn recorded(&self) -> Vec<(String, StageId, u64)> {
            self.sends.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Transport for RecordingTransport {
        fn name(&self) -> &str {
            "recording"
        }

        async fn send(&self, _address: &str, push: &StagePush) -> firstcrack_core::Result<()> {
            self.sends.lock().unwrap().push((
                push.brew_id.clone(),
                push.stage,
                self.started.elapsed().as_secs(),
            ));
            if self.fail_stage == Some(push.stage) {
                return Err(FirstCrackError::TransportSend("gateway error 502".into()));
            }
            Ok(())
        }
    }

    fn valid_request() -> BrewRequest {
        BrewRequest {
            brew_type: "espresso".into(),
            dose_grams: 18,
            target_temp_c: 93,
            target_pressure_bar: 9,
            device_address: "dev-123".into(),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_one_send_per_stage_at_absolute_offsets() {
        let transport = Arc::new(RecordingTransport::new());
        let scheduler = BrewScheduler::new(transport.clone(), FirstCrackConfig::default());

        let receipt = scheduler.start_brew(&valid_request()).await.unwrap();
        assert_eq!(receipt.stage_count, 5);
        assert_eq!(receipt.estimated_duration_seconds, 75);

        scheduler.wait(&receipt.brew_id).await;

        let sends = transport.recorded();
        assert_eq!(sends.len(), 5);
        let stages: Vec<_> = sends.iter().map(|s| s.1).collect();
        assert_eq!(
            stages,
            vec![
                StageId::Heating,
                StageId::Grinding,
                StageId::PreInfusion,
                StageId::Brewing,
                StageId::Complete
            ]
        );
        // Paused clock: elapsed time is exactly the scheduled offset.
        let offsets: Vec<_> = sends.iter().map(|s| s.2).collect();
        assert_eq!(offsets, vec![0, 15, 30, 40, 75]);

        assert!(scheduler.active_brews().await.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_send_failure_does_not_stop_timeline() {
        let transport = Arc::new(RecordingTransport::failing_on(StageId::Grinding));
        let scheduler = BrewScheduler::new(transport.clone(), FirstCrackConfig::default());

        let receipt = scheduler.start_brew(&valid_request()).await.unwrap();
        scheduler.wait(&receipt.brew_id).await;

        // One attempt per stage, no retry of the failed one.
        let sends = transport.recorded();
        assert_eq!(sends.len(), 5);
        assert_eq!(sends.last().unwrap().1, StageId::Complete);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_suppresses_remaining_stages() {
        let transport = Arc::new(RecordingTransport::new());
        let scheduler = BrewScheduler::new(transport.clone(), FirstCrackConfig::default());

        let receipt = scheduler.start_brew(&valid_request()).await.unwrap();

        // Let heating (0s) and grinding (15s) fire, then stop the brew.
        tokio::time::sleep(Duration::from_secs(20)).await;
        assert!(scheduler.cancel(&receipt.brew_id).await);

        // Run the clock well past the end of the timeline.
        tokio::time::sleep(Duration::from_secs(120)).await;

        let stages: Vec<_> = transport.recorded().iter().map(|s| s.1).collect();
        assert_eq!(stages, vec![StageId::Heating, StageId::Grinding]);
        assert!(scheduler.active_brews().await.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_unknown_brew_is_false() {
        let transport = Arc::new(RecordingTransport::new());
        let scheduler = BrewScheduler::new(transport, FirstCrackConfig::default());
        assert!(!scheduler.cancel("brew_0_0").await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_same_request_twice_runs_independent_timelines() {
        let transport = Arc::new(RecordingTransport::new());
        let scheduler = BrewScheduler::new(transport.clone(), FirstCrackConfig::default());

        let first = scheduler.start_brew(&valid_request()).await.unwrap();
        let second = scheduler.start_brew(&valid_request()).await.unwrap();
        assert_ne!(first.brew_id, second.brew_id);

        scheduler.wait(&first.brew_id).await;
        scheduler.wait(&second.brew_id).await;

        let sends = transport.recorded();
        assert_eq!(sends.len(), 10);
        for receipt in [&first, &second] {
            let count = sends.iter().filter(|s| s.0 == receipt.brew_id).count();
            assert_eq!(count, 5);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_invalid_request_never_creates_a_brew() {
        let transport = Arc::new(RecordingTransport::new());
        let scheduler = BrewScheduler::new(transport.clone(), FirstCrackConfig::default());

        let mut request = valid_request();
        request.dose_grams = 50;
        let err = scheduler.start_brew(&request).await.unwrap_err();
        assert!(matches!(err, FirstCrackError::Validation(_)));
        assert!(scheduler.active_brews().await.is_empty());
        assert!(transport.recorded().is_empty());
    }
}
