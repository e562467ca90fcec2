//! Reload signalling
//!
//! After every successful save the manager fires a payload-less "reload"
//! signal so the renderer re-reads the store. Delivery is best-effort: the
//! sender never waits for an acknowledgement and a missed signal is only
//! recovered by the renderer's own resync.
//!
//! # Transports
//!
//! - [`ChannelNotifier`]: in-process bus, any number of subscribers
//! - [`SocketNotifier`]: cross-process broadcast over Unix datagram sockets
//! - [`NoopNotifier`]: persist without a renderer

#[cfg(unix)]
pub mod socket;

#[cfg(unix)]
pub use socket::{RELOAD_SIGNAL_NAME, ReloadListener, SocketNotifier};

use crate::error::NotifyError;
use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc;
use tracing::debug;

/// The reload signal; it carries no data
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReloadSignal;

/// Fire-and-forget publisher of the reload signal
pub trait ReloadNotifier: Send + Sync {
    /// Broadcast a reload to every listener without waiting for them
    fn notify_reload(&self) -> Result<(), NotifyError>;
}

impl<T: ReloadNotifier + ?Sized> ReloadNotifier for Arc<T> {
    fn notify_reload(&self) -> Result<(), NotifyError> {
        (**self).notify_reload()
    }
}

impl<T: ReloadNotifier + ?Sized> ReloadNotifier for Box<T> {
    fn notify_reload(&self) -> Result<(), NotifyError> {
        (**self).notify_reload()
    }
}

/// Notifier that drops every signal
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopNotifier;

impl ReloadNotifier for NoopNotifier {
    fn notify_reload(&self) -> Result<(), NotifyError> {
        Ok(())
    }
}

/// In-process reload bus
///
/// Each [`subscribe`](ChannelNotifier::subscribe) call returns a receiver
/// that gets one [`ReloadSignal`] per broadcast. Receivers that have been
/// dropped are pruned on the next broadcast.
#[derive(Debug, Default)]
pub struct ChannelNotifier {
    subscribers: Mutex<Vec<mpsc::Sender<ReloadSignal>>>,
    sent: AtomicU64,
}

impl ChannelNotifier {
    /// Bus with no subscribers
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new listener
    pub fn subscribe(&self) -> mpsc::Receiver<ReloadSignal> {
        let (tx, rx) = mpsc::channel();
        self.subscribers.lock().push(tx);
        rx
    }

    /// Number of live subscribers as of the last broadcast
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.lock().len()
    }

    /// Number of broadcasts sent so far
    pub fn sent_count(&self) -> u64 {
        self.sent.load(Ordering::SeqCst)
    }
}

impl ReloadNotifier for ChannelNotifier {
    fn notify_reload(&self) -> Result<(), NotifyError> {
        let mut subscribers = self.subscribers.lock();
        subscribers.retain(|tx| tx.send(ReloadSignal).is_ok());
        let count = self.sent.fetch_add(1, Ordering::SeqCst) + 1;
        debug!(
            "Reload signal #{} delivered to {} in-process subscriber(s)",
            count,
            subscribers.len()
        );
        Ok(())
    }
}
