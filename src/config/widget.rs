//! Widget identity and per-widget configuration
//!
//! A widget is an immutable [`WidgetModule`] paired with a mutable
//! [`WidgetConfig`] bag. Widgets are tracked by a stable [`Uuid`] that is
//! assigned once and survives config edits.

use crate::config::schema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// The fixed kind of a single widget
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WidgetModule {
    /// Formatted current date
    Date,
    /// Formatted current time
    Time,
    /// Static user text
    Text,
    /// Upload or download speed
    NetworkSpeed,
    /// Battery temperature
    Temperature,
    /// Battery watts, current, amperage or cycles
    BatteryDetail,
    /// Battery charge level
    CurrentCapacity,
    /// Charging bolt symbol
    ChargeSymbol,
    /// Weather conditions from the configured provider
    Weather,
    /// Now-playing lyrics
    Lyrics,
}

impl WidgetModule {
    /// Every module, in presentation order
    pub const ALL: [WidgetModule; 10] = [
        Self::Date,
        Self::Time,
        Self::Text,
        Self::NetworkSpeed,
        Self::Temperature,
        Self::BatteryDetail,
        Self::CurrentCapacity,
        Self::ChargeSymbol,
        Self::Weather,
        Self::Lyrics,
    ];

    /// Stable identifier used in the persisted store
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Date => "date",
            Self::Time => "time",
            Self::Text => "text",
            Self::NetworkSpeed => "networkSpeed",
            Self::Temperature => "temperature",
            Self::BatteryDetail => "batteryDetail",
            Self::CurrentCapacity => "currentCapacity",
            Self::ChargeSymbol => "chargeSymbol",
            Self::Weather => "weather",
            Self::Lyrics => "lyrics",
        }
    }

    /// Human readable name
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Date => "Date",
            Self::Time => "Time",
            Self::Text => "Text Label",
            Self::NetworkSpeed => "Network Speed",
            Self::Temperature => "Battery Temperature",
            Self::BatteryDetail => "Battery Details",
            Self::CurrentCapacity => "Battery Capacity",
            Self::ChargeSymbol => "Charging Symbol",
            Self::Weather => "Weather",
            Self::Lyrics => "Lyrics",
        }
    }
}

impl fmt::Display for WidgetModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string names no known widget module
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown widget module '{0}'")]
pub struct UnknownModuleError(pub String);

impl FromStr for WidgetModule {
    type Err = UnknownModuleError;

    /// Accepts the store identifier case-insensitively, with or without
    /// `-`/`_` separators (`networkSpeed`, `network-speed`, `network_speed`)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted: String = s
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .map(|c| c.to_ascii_lowercase())
            .collect();
        Self::ALL
            .into_iter()
            .find(|module| module.as_str().to_ascii_lowercase() == wanted)
            .ok_or_else(|| UnknownModuleError(s.to_string()))
    }
}

/// A single configuration value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConfigValue {
    /// Boolean flag
    Boolean(bool),
    /// Integer option or selection index
    Integer(i64),
    /// Free-form text such as a format string
    Text(String),
    /// Any other JSON value, written by a newer configurator
    ///
    /// Never read by this version; saved back unchanged.
    Other(serde_json::Value),
}

impl ConfigValue {
    /// Text payload, if this is a text value
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Integer payload, if this is an integer value
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(n) => Some(*n),
            _ => None,
        }
    }

    /// Boolean payload, if this is a boolean value
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(b) => Some(*b),
            _ => None,
        }
    }
}

impl fmt::Display for ConfigValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Boolean(b) => write!(f, "{b}"),
            Self::Integer(n) => write!(f, "{n}"),
            Self::Text(s) => write!(f, "{s:?}"),
            Self::Other(value) => write!(f, "{value}"),
        }
    }
}

impl From<bool> for ConfigValue {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<i64> for ConfigValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<i32> for ConfigValue {
    fn from(value: i32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<String> for ConfigValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for ConfigValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

/// Heterogeneous key/value settings for one widget
///
/// Absent keys mean "use the module default". Keys the owning module does not
/// recognise are kept untouched so newer configurators can round-trip through
/// older ones.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WidgetConfig {
    values: BTreeMap<String, ConfigValue>,
}

impl WidgetConfig {
    /// Create an empty config
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw value stored under `key`
    pub fn get(&self, key: &str) -> Option<&ConfigValue> {
        self.values.get(key)
    }

    /// Text stored under `key`; `None` when absent or of another type
    pub fn get_text(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(ConfigValue::as_text)
    }

    /// Integer stored under `key`; `None` when absent or of another type
    pub fn get_integer(&self, key: &str) -> Option<i64> {
        self.get(key).and_then(ConfigValue::as_integer)
    }

    /// Boolean stored under `key`; `None` when absent or of another type
    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(ConfigValue::as_bool)
    }

    /// Text under `key`, or `default`
    pub fn text_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.get_text(key).unwrap_or(default)
    }

    /// Integer under `key`, or `default`
    pub fn integer_or(&self, key: &str, default: i64) -> i64 {
        self.get_integer(key).unwrap_or(default)
    }

    /// Boolean under `key`, or `default`
    pub fn bool_or(&self, key: &str, default: bool) -> bool {
        self.get_bool(key).unwrap_or(default)
    }

    /// Store `value` under `key`
    ///
    /// An empty text value removes the key instead, reverting it to the
    /// module default.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<ConfigValue>) {
        let key = key.into();
        match value.into() {
            ConfigValue::Text(text) if text.is_empty() => {
                self.values.remove(&key);
            }
            value => {
                self.values.insert(key, value);
            }
        }
    }

    /// Remove `key`, returning its previous value
    pub fn remove(&mut self, key: &str) -> Option<ConfigValue> {
        self.values.remove(key)
    }

    /// Whether a value is stored under `key`
    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Number of stored keys
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether no key is stored
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate stored entries in key order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ConfigValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// One widget instance inside a widget set
///
/// `PartialEq` compares id, module and config; use [`WidgetIdentity::same_widget`]
/// for membership checks that should ignore content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WidgetIdentity {
    /// Stable identifier, never reused
    pub id: Uuid,
    /// Widget kind, fixed at creation
    pub module: WidgetModule,
    /// Module specific settings
    #[serde(default)]
    pub config: WidgetConfig,
}

impl WidgetIdentity {
    /// Create a widget with a fresh id and empty config
    pub fn new(module: WidgetModule) -> Self {
        Self {
            id: Uuid::new_v4(),
            module,
            config: WidgetConfig::new(),
        }
    }

    /// Copy of this widget carrying `config`, keeping id and module
    #[must_use]
    pub fn with_config(&self, config: WidgetConfig) -> Self {
        Self {
            id: self.id,
            module: self.module,
            config,
        }
    }

    /// Whether `other` refers to the same widget instance
    pub fn same_widget(&self, other: &WidgetIdentity) -> bool {
        self.id == other.id
    }

    /// Value under `key`, falling back to the module schema default
    pub fn get_or_default(&self, key: &str) -> Option<ConfigValue> {
        self.config
            .get(key)
            .cloned()
            .or_else(|| schema::default_for(self.module, key))
    }
}
