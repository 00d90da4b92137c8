//! Process-wide navigation bridge.
//!
//! The application owns exactly one navigation event channel. The bridge
//! is the lazily-initialized single-owner handle over its sender with an
//! explicit lifecycle: `attach` hands back the receiving stream, `detach`
//! drops the sender. "Not attached" is a normal, recoverable state — an
//! interaction arriving before the UI layer attaches is dropped with a
//! log line, never a panic.

use std::pin::Pin;
use std::sync::{Mutex, OnceLock};
use std::task::{Context, Poll};

use futures::stream::Stream;
use tokio::sync::mpsc;

use firstcrack_core::error::{FirstCrackError, Result};
use firstcrack_core::NavigationEvent;

static SENDER: OnceLock<Mutex<Option<mpsc::UnboundedSender<NavigationEvent>>>> = OnceLock::new();

fn slot() -> &'static Mutex<Option<mpsc::UnboundedSender<NavigationEvent>>> {
    SENDER.get_or_init(|| Mutex::new(None))
}

/// Stream of navigation events for the UI layer.
pub struct NavigationStream {
    rx: mpsc::UnboundedReceiver<NavigationEvent>,
}

impl Stream for NavigationStream {
    type Item = NavigationEvent;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.rx.poll_recv(cx)
    }
}

impl Unpin for NavigationStream {}

/// Attach a fresh channel and return its receiving half. Replaces any
/// previously attached sender; the old stream ends.
pub fn attach() -> NavigationStream {
    let (tx, rx) = mpsc::unbounded_channel();
    *slot().lock().unwrap_or_else(|e| e.into_inner()) = Some(tx);
    tracing::debug!("Navigation bridge attached");
    NavigationStream { rx }
}

/// Drop the live sender. Later emits fail softly until re-attach.
pub fn detach() {
    *slot().lock().unwrap_or_else(|e| e.into_inner()) = None;
    tracing::debug!("Navigation bridge detached");
}

pub fn is_attached() -> bool {
    slot().lock().unwrap_or_else(|e| e.into_inner()).is_some()
}

/// Emit one event to the attached channel. A missing or closed channel is
/// reported as `ChannelDetached` for the caller to log.
pub fn emit(event: NavigationEvent) -> Result<()> {
    let guard = slot().lock().unwrap_or_else(|e| e.into_inner());
    match guard.as_ref() {
        Some(tx) => tx.send(event).map_err(|_| FirstCrackError::ChannelDetached),
        None => Err(FirstCrackError::ChannelDetached),
    }
}
