//! Shared test utilities for unit tests.
//!
//! Only compiled during testing (`#[cfg(test)]`).

use crate::config::{Anchor, HudConfig, WidgetIdentity, WidgetModule, WidgetSet};
use crate::error::NotifyError;
use crate::notify::ReloadNotifier;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tempfile::TempDir;

/// Helper function to create a temporary test directory using tempfile.
/// Returns a `TempDir` that automatically cleans up when dropped.
pub fn create_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp directory")
}

/// Notifier that counts signals and can be told to fail
#[derive(Debug, Default)]
pub struct CountingNotifier {
    count: AtomicUsize,
    fail: AtomicBool,
}

impl CountingNotifier {
    /// Signals received so far
    pub fn count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }

    /// Make subsequent signals fail
    pub fn set_fail(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }
}

impl ReloadNotifier for CountingNotifier {
    fn notify_reload(&self) -> Result<(), NotifyError> {
        self.count.fetch_add(1, Ordering::SeqCst);
        if self.fail.load(Ordering::SeqCst) {
            return Err(NotifyError::Io(std::io::Error::other("listener gone")));
        }
        Ok(())
    }
}

/// Config with one set holding a date and a weather widget
pub fn sample_config() -> HudConfig {
    let mut set = WidgetSet::new("Status", Anchor::Right);
    set.widget_ids.push(WidgetIdentity::new(WidgetModule::Date));
    set.widget_ids.push(WidgetIdentity::new(WidgetModule::Weather));
    let mut config = HudConfig::default();
    config.widget_sets.push(set);
    config
}
