//! Recognised configuration keys per widget module
//!
//! The manager and [`WidgetConfig`](crate::config::WidgetConfig) never consult
//! this table. It belongs to the editing side: editors use it to render
//! defaults, and to turn user input into typed [`ConfigValue`]s.

use crate::config::widget::{ConfigValue, WidgetModule};
use std::fmt;

/// Expected value type of a config key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    /// Free-form or enumerated text
    Text,
    /// Integer selection
    Integer,
    /// On/off flag
    Boolean,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Text => "text",
            Self::Integer => "integer",
            Self::Boolean => "boolean",
        })
    }
}

/// Compile-time default for a key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefaultValue {
    /// Text default
    Text(&'static str),
    /// Integer default
    Integer(i64),
    /// Boolean default
    Boolean(bool),
}

impl DefaultValue {
    /// Owned config value for this default
    pub fn to_value(self) -> ConfigValue {
        match self {
            Self::Text(s) => ConfigValue::Text(s.to_string()),
            Self::Integer(n) => ConfigValue::Integer(n),
            Self::Boolean(b) => ConfigValue::Boolean(b),
        }
    }
}

/// One recognised key of a module
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfigKey {
    /// Key name as stored in the widget config
    pub name: &'static str,
    /// Expected value type
    pub kind: ValueKind,
    /// Value used when the key is absent
    pub default: DefaultValue,
    /// Inclusive range for integer selections
    pub range: Option<(i64, i64)>,
    /// Closed set of accepted text values; empty means free-form
    pub choices: &'static [&'static str],
}

impl ConfigKey {
    const fn text(name: &'static str, default: &'static str) -> Self {
        Self {
            name,
            kind: ValueKind::Text,
            default: DefaultValue::Text(default),
            range: None,
            choices: &[],
        }
    }

    const fn integer(name: &'static str, default: i64, min: i64, max: i64) -> Self {
        Self {
            name,
            kind: ValueKind::Integer,
            default: DefaultValue::Integer(default),
            range: Some((min, max)),
            choices: &[],
        }
    }

    const fn boolean(name: &'static str, default: bool) -> Self {
        Self {
            name,
            kind: ValueKind::Boolean,
            default: DefaultValue::Boolean(default),
            range: None,
            choices: &[],
        }
    }
}

/// Time formats offered by the time widget
pub const TIME_FORMATS: [&str; 9] = [
    "hh:mm", "hh:mm a", "hh:mm:ss", "hh", "HH:mm", "HH:mm:ss", "HH", "mm", "ss",
];

/// Default weather format string
pub const DEFAULT_WEATHER_FORMAT: &str = "{i}{n}{lt}°~{ht}°({t}°,{bt}°)💧{h}%";

const DATE_KEYS: &[ConfigKey] = &[ConfigKey::text("dateFormat", "E MMM dd")];

const TIME_KEYS: &[ConfigKey] = &[ConfigKey {
    name: "dateFormat",
    kind: ValueKind::Text,
    default: DefaultValue::Text("hh:mm"),
    range: None,
    choices: &TIME_FORMATS,
}];

const TEXT_KEYS: &[ConfigKey] = &[ConfigKey::text("text", "Example")];

const NETWORK_KEYS: &[ConfigKey] = &[
    ConfigKey::boolean("isUp", false),
    ConfigKey::integer("speedIcon", 0, 0, 1),
    ConfigKey::integer("minUnit", 1, 0, 3),
    ConfigKey::boolean("hideSpeedWhenZero", false),
];

const TEMPERATURE_KEYS: &[ConfigKey] = &[ConfigKey::boolean("useFahrenheit", false)];

const BATTERY_KEYS: &[ConfigKey] = &[ConfigKey::integer("batteryValueType", 0, 0, 3)];

const CAPACITY_KEYS: &[ConfigKey] = &[ConfigKey::boolean("showPercentage", true)];

const CHARGE_KEYS: &[ConfigKey] = &[ConfigKey::boolean("filled", true)];

const WEATHER_KEYS: &[ConfigKey] = &[
    ConfigKey::boolean("useFahrenheit", false),
    ConfigKey::boolean("useMetric", true),
    ConfigKey::text("format", DEFAULT_WEATHER_FORMAT),
    ConfigKey::text("location", "101010100"),
];

const LYRICS_KEYS: &[ConfigKey] = &[
    ConfigKey::boolean("unsupported", false),
    ConfigKey::integer("lyricsType", 0, 0, 3),
    ConfigKey::integer("bluetoothType", 1, 1, 3),
    ConfigKey::integer("wiredType", 1, 1, 3),
];

/// Keys recognised by `module`
pub fn schema_for(module: WidgetModule) -> &'static [ConfigKey] {
    match module {
        WidgetModule::Date => DATE_KEYS,
        WidgetModule::Time => TIME_KEYS,
        WidgetModule::Text => TEXT_KEYS,
        WidgetModule::NetworkSpeed => NETWORK_KEYS,
        WidgetModule::Temperature => TEMPERATURE_KEYS,
        WidgetModule::BatteryDetail => BATTERY_KEYS,
        WidgetModule::CurrentCapacity => CAPACITY_KEYS,
        WidgetModule::ChargeSymbol => CHARGE_KEYS,
        WidgetModule::Weather => WEATHER_KEYS,
        WidgetModule::Lyrics => LYRICS_KEYS,
    }
}

/// Schema entry for `key` of `module`
pub fn lookup(module: WidgetModule, key: &str) -> Option<&'static ConfigKey> {
    schema_for(module).iter().find(|k| k.name == key)
}

/// Default value of `key` for `module`
pub fn default_for(module: WidgetModule, key: &str) -> Option<ConfigValue> {
    lookup(module, key).map(|k| k.default.to_value())
}

/// Reasons user input cannot become a config value
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    /// The module has no such key
    #[error("module '{module}' has no setting '{key}'")]
    UnknownKey {
        /// Module being edited
        module: WidgetModule,
        /// Rejected key
        key: String,
    },

    /// The input does not parse as the key's type
    #[error("setting '{key}' expects a {kind} value, got '{input}'")]
    WrongType {
        /// Key being set
        key: String,
        /// Expected type
        kind: ValueKind,
        /// Raw input
        input: String,
    },

    /// Integer outside the accepted range
    #[error("setting '{key}' must be between {min} and {max}, got {value}")]
    OutOfRange {
        /// Key being set
        key: String,
        /// Inclusive lower bound
        min: i64,
        /// Inclusive upper bound
        max: i64,
        /// Rejected value
        value: i64,
    },

    /// Text outside the closed set of choices
    #[error("setting '{key}' must be one of {choices:?}, got '{input}'")]
    NotAChoice {
        /// Key being set
        key: String,
        /// Accepted values
        choices: &'static [&'static str],
        /// Raw input
        input: String,
    },
}

/// Parse raw editor input for `key` of `module`
///
/// An empty input yields an empty text value for text keys, which
/// [`WidgetConfig::set`](crate::config::WidgetConfig::set) turns into a removal.
pub fn parse_value(module: WidgetModule, key: &str, input: &str) -> Result<ConfigValue, SchemaError> {
    let entry = lookup(module, key).ok_or_else(|| SchemaError::UnknownKey {
        module,
        key: key.to_string(),
    })?;
    let wrong_type = || SchemaError::WrongType {
        key: key.to_string(),
        kind: entry.kind,
        input: input.to_string(),
    };

    match entry.kind {
        ValueKind::Text => {
            if !input.is_empty() && !entry.choices.is_empty() && !entry.choices.contains(&input) {
                return Err(SchemaError::NotAChoice {
                    key: key.to_string(),
                    choices: entry.choices,
                    input: input.to_string(),
                });
            }
            Ok(ConfigValue::Text(input.to_string()))
        }
        ValueKind::Integer => {
            let value: i64 = input.trim().parse().map_err(|_| wrong_type())?;
            if let Some((min, max)) = entry.range
                && !(min..=max).contains(&value)
            {
                return Err(SchemaError::OutOfRange {
                    key: key.to_string(),
                    min,
                    max,
                    value,
                });
            }
            Ok(ConfigValue::Integer(value))
        }
        ValueKind::Boolean => match input.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" | "on" | "1" => Ok(ConfigValue::Boolean(true)),
            "false" | "no" | "off" | "0" => Ok(ConfigValue::Boolean(false)),
            _ => Err(wrong_type()),
        },
    }
}
