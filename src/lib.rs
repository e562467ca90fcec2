//! `hudconfig` - Widget configuration and persistence for an on-screen HUD
//!
//! A HUD shows one or more widget sets: positioned groups of small live-data
//! widgets such as a clock, battery level, network speed or weather. This
//! crate is the configuration side. [`WidgetManager`] owns the ordered
//! collection of sets, writes it to a [`config::ConfigStore`] after every
//! change and sends a reload signal through a [`notify::ReloadNotifier`] so
//! a separately running renderer re-reads the store.
//!
//! # Example
//!
//! ```
//! use hudconfig::config::{Anchor, MemoryConfigStore, WidgetModule};
//! use hudconfig::notify::ChannelNotifier;
//! use hudconfig::WidgetManager;
//! use std::sync::Arc;
//!
//! let bus = Arc::new(ChannelNotifier::new());
//! let reloads = bus.subscribe();
//! let mut manager = WidgetManager::open(MemoryConfigStore::new(), Arc::clone(&bus))?;
//!
//! let set = manager.create_widget_set("Status", Anchor::Right)?;
//! manager.add_widget(set.id, WidgetModule::Weather)?;
//!
//! assert_eq!(reloads.try_iter().count(), 2);
//! # Ok::<(), hudconfig::HudConfigError>(())
//! ```

pub mod config;
pub mod error;
pub mod manager;
pub mod notify;
pub mod utils;

#[cfg(test)]
pub(crate) mod test_utils;

pub use error::{HudConfigError, Result};
pub use manager::{EditOutcome, ValidationAdvisory, WidgetManager};
