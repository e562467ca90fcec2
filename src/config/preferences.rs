//! Global preferences
//!
//! Stored beside the widget sets under their own top-level key so preference
//! writes never touch widget data and vice versa.

use serde::{Deserialize, Serialize};

/// Weather data source used by weather widgets
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WeatherProvider {
    /// Platform weather service
    #[default]
    System,
    /// `QWeather` API, requires an API key
    QWeather,
}

/// User preferences shared by the configurator and the renderer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Preferences {
    /// Locale identifier used for date and weather formatting
    pub date_locale: String,
    /// Save edits on exit without asking
    pub hide_save_confirmation: bool,
    /// Renderer draws a border around every set
    pub debug_border: bool,
    /// Weather data source
    pub weather_provider: WeatherProvider,
    /// API key for providers that need one
    pub weather_api_key: String,
    /// The API key belongs to a free subscription tier
    pub free_subscription: bool,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            date_locale: "en".to_string(),
            hide_save_confirmation: false,
            debug_border: false,
            weather_provider: WeatherProvider::System,
            weather_api_key: String::new(),
            free_subscription: false,
        }
    }
}

impl Preferences {
    /// Whether the selected provider has what it needs to fetch data
    pub fn weather_configured(&self) -> bool {
        match self.weather_provider {
            WeatherProvider::System => true,
            WeatherProvider::QWeather => !self.weather_api_key.trim().is_empty(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_preferences() {
        let prefs = Preferences::default();
        assert_eq!(prefs.date_locale, "en");
        assert_eq!(prefs.weather_provider, WeatherProvider::System);
        assert!(prefs.weather_configured());
    }

    #[test]
    fn test_qweather_needs_key() {
        let mut prefs = Preferences {
            weather_provider: WeatherProvider::QWeather,
            ..Preferences::default()
        };
        assert!(!prefs.weather_configured());
        prefs.weather_api_key = "abc123".to_string();
        assert!(prefs.weather_configured());
    }

    #[test]
    fn test_partial_document_uses_defaults() {
        let prefs: Preferences = serde_json::from_str(r#"{"debugBorder":true}"#).unwrap();
        assert!(prefs.debug_border);
        assert_eq!(prefs.date_locale, "en");
    }
}
