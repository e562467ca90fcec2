//! Widget set orchestration
//!
//! [`WidgetManager`] owns the collection, applies every mutation, persists
//! it and signals the renderer.

pub mod widget_manager;

pub use widget_manager::{EditOutcome, ValidationAdvisory, WidgetManager, move_elements};
