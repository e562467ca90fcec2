//! Widget configuration data model and persistence
//!
//! The whole configuration is one document: an ordered list of widget sets
//! plus global preferences. It is stored as JSON with atomic writes so a
//! crash mid-save never leaves a half-written store behind.

pub mod models;
pub mod preferences;
pub mod schema;
pub mod store;
pub mod widget;

pub use models::{
    Anchor, AnchorY, BlurDetails, CONFIG_VERSION, ColorDetails, HudConfig, Offset,
    OrientationMode, Rgba, TextAlignment, TextStyle, WEATHER_INTERVAL_MIN_SECS, WidgetSet,
    WidgetSetDetails,
};
pub use preferences::{Preferences, WeatherProvider};
pub use store::{ConfigStore, JsonConfigStore, MemoryConfigStore};
pub use widget::{ConfigValue, WidgetConfig, WidgetIdentity, WidgetModule};
