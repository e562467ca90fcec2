//! Configuration data models
//!
//! This module defines the widget set layout/style model and the collection
//! root that is persisted as one unit.

use crate::config::preferences::Preferences;
use crate::config::widget::{WidgetIdentity, WidgetModule};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Current store format version, written on every save
pub const CONFIG_VERSION: u32 = 2;

/// Minimum update interval (seconds) for a set containing a weather widget
pub const WEATHER_INTERVAL_MIN_SECS: f64 = 10.0 * 60.0;

/// Update interval (seconds) given to new sets
pub const DEFAULT_UPDATE_INTERVAL_SECS: f64 = 1.0;

/// Title given to sets created without one
pub const DEFAULT_TITLE: &str = "Untitled";

/// Font name meaning "use the system font"
pub const SYSTEM_FONT: &str = "System Font";

/// Which device orientations show the set
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OrientationMode {
    /// Portrait and landscape
    #[default]
    Both,
    /// Portrait only
    Portrait,
    /// Landscape only
    Landscape,
}

/// Horizontal screen edge the set is anchored to
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Anchor {
    /// Left edge
    #[default]
    Left,
    /// Horizontal center
    Center,
    /// Right edge
    Right,
}

/// Vertical screen edge the set is anchored to
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AnchorY {
    /// Top edge
    #[default]
    Top,
    /// Vertical center
    Center,
    /// Bottom edge
    Bottom,
}

/// Text alignment inside the set
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TextAlignment {
    /// Left aligned
    Left,
    /// Centered
    #[default]
    Center,
    /// Right aligned
    Right,
}

/// Offset from the anchor, in points
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Offset {
    /// Horizontal offset
    pub x: f64,
    /// Vertical offset
    pub y: f64,
}

/// Background blur
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BlurDetails {
    /// Whether the blur background is drawn
    pub has_blur: bool,
    /// Corner radius of the blur
    pub corner_radius: f64,
    /// Dark instead of light material
    pub style_dark: bool,
    /// Blur opacity (0-1)
    pub alpha: f64,
}

impl Default for BlurDetails {
    fn default() -> Self {
        Self {
            has_blur: false,
            corner_radius: 4.0,
            style_dark: true,
            alpha: 1.0,
        }
    }
}

/// RGBA color, components in 0-1
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    /// Red
    pub red: f64,
    /// Green
    pub green: f64,
    /// Blue
    pub blue: f64,
    /// Alpha
    pub alpha: f64,
}

impl Rgba {
    /// Opaque white
    pub const WHITE: Rgba = Rgba {
        red: 1.0,
        green: 1.0,
        blue: 1.0,
        alpha: 1.0,
    };
}

impl Default for Rgba {
    fn default() -> Self {
        Self::WHITE
    }
}

/// Fixed text color, used only when dynamic color is off
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ColorDetails {
    /// Use `color` instead of the renderer's fallback color
    pub uses_custom_color: bool,
    /// Custom text color
    pub color: Rgba,
}

/// Font attributes shared by all widgets in a set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TextStyle {
    /// Font family, or [`SYSTEM_FONT`]
    pub font_name: String,
    /// Bold text
    pub bold: bool,
    /// Italic text
    pub italic: bool,
    /// Text alignment
    pub alignment: TextAlignment,
    /// Point size
    pub size: f64,
    /// Text opacity (0-1)
    pub alpha: f64,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font_name: SYSTEM_FONT.to_string(),
            bold: false,
            italic: false,
            alignment: TextAlignment::Center,
            size: 10.0,
            alpha: 1.0,
        }
    }
}

/// Every field of a widget set an edit may replace
///
/// Widget membership is deliberately absent: it only changes through the
/// widget-level manager operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WidgetSetDetails {
    /// Display title
    pub title: String,
    /// Whether the renderer shows the set
    pub is_enabled: bool,
    /// Orientations the set is shown in
    #[serde(default)]
    pub orientation_mode: OrientationMode,
    /// Refresh cadence in seconds
    pub update_interval: f64,
    /// Horizontal anchor
    pub anchor: Anchor,
    /// Vertical anchor
    #[serde(default)]
    pub anchor_y: AnchorY,
    /// Offset used in portrait
    #[serde(default)]
    pub portrait_offset: Offset,
    /// Offset used in landscape
    #[serde(default)]
    pub landscape_offset: Offset,
    /// Size to fit content; `width`/`height` are ignored when set
    pub auto_resizes: bool,
    /// Explicit width
    pub width: f64,
    /// Explicit height
    pub height: f64,
    /// Background blur
    #[serde(default)]
    pub blur_details: BlurDetails,
    /// Adapt text color to the wallpaper
    pub dynamic_color: bool,
    /// Fixed color, used when `dynamic_color` is false
    #[serde(default)]
    pub color_details: ColorDetails,
    /// Font attributes
    #[serde(default)]
    pub text_style: TextStyle,
}

impl WidgetSetDetails {
    /// Defaults for a freshly created set
    pub fn new(title: impl Into<String>, anchor: Anchor) -> Self {
        Self {
            title: title.into(),
            is_enabled: true,
            orientation_mode: OrientationMode::Both,
            update_interval: DEFAULT_UPDATE_INTERVAL_SECS,
            anchor,
            anchor_y: AnchorY::Top,
            portrait_offset: Offset::default(),
            landscape_offset: Offset::default(),
            auto_resizes: true,
            width: 100.0,
            height: 12.0,
            blur_details: BlurDetails::default(),
            dynamic_color: true,
            color_details: ColorDetails::default(),
            text_style: TextStyle::default(),
        }
    }

    /// Apply the structural rules every stored set obeys
    ///
    /// Blank titles become [`DEFAULT_TITLE`], a non-positive or non-finite
    /// interval becomes [`DEFAULT_UPDATE_INTERVAL_SECS`] and opacities are
    /// clamped to 0-1. The weather minimum is not applied here.
    #[must_use]
    pub fn normalized(mut self) -> Self {
        if self.title.trim().is_empty() {
            self.title = DEFAULT_TITLE.to_string();
        }
        if !self.update_interval.is_finite() || self.update_interval <= 0.0 {
            self.update_interval = DEFAULT_UPDATE_INTERVAL_SECS;
        }
        if !self.text_style.size.is_finite() || self.text_style.size <= 0.0 {
            self.text_style.size = TextStyle::default().size;
        }
        let defaults = Self::new(String::new(), self.anchor);
        if !self.width.is_finite() {
            self.width = defaults.width;
        }
        if !self.height.is_finite() {
            self.height = defaults.height;
        }
        if !self.blur_details.corner_radius.is_finite() {
            self.blur_details.corner_radius = defaults.blur_details.corner_radius;
        }
        for offset in [&mut self.portrait_offset, &mut self.landscape_offset] {
            offset.x = finite_or_zero(offset.x);
            offset.y = finite_or_zero(offset.y);
        }
        self.blur_details.alpha = clamp_unit(self.blur_details.alpha);
        self.text_style.alpha = clamp_unit(self.text_style.alpha);
        let color = &mut self.color_details.color;
        color.red = clamp_unit(color.red);
        color.green = clamp_unit(color.green);
        color.blue = clamp_unit(color.blue);
        color.alpha = clamp_unit(color.alpha);
        self
    }
}

// Non-finite floats cannot be stored as JSON numbers.
fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() { value } else { 0.0 }
}

fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() { 1.0 } else { value.clamp(0.0, 1.0) }
}

/// A positioned group of widgets sharing anchor, style and update cadence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WidgetSet {
    /// Stable identifier
    pub id: Uuid,
    /// Layout and style
    #[serde(flatten)]
    pub details: WidgetSetDetails,
    /// Member widgets in rendering order
    #[serde(default)]
    pub widget_ids: Vec<WidgetIdentity>,
}

impl WidgetSet {
    /// Create an empty set with default layout
    pub fn new(title: impl Into<String>, anchor: Anchor) -> Self {
        Self {
            id: Uuid::new_v4(),
            details: WidgetSetDetails::new(title, anchor).normalized(),
            widget_ids: Vec::new(),
        }
    }

    /// Display title
    pub fn title(&self) -> &str {
        &self.details.title
    }

    /// Whether any member widget shows weather
    pub fn has_weather_widget(&self) -> bool {
        contains_weather(&self.widget_ids)
    }

    /// Whether the stored interval is below the weather minimum
    pub fn needs_weather_interval_warning(&self) -> bool {
        needs_weather_interval_warning(&self.widget_ids, self.details.update_interval)
    }

    /// Position of the widget with `id`
    pub fn position_of(&self, id: Uuid) -> Option<usize> {
        self.widget_ids.iter().position(|w| w.id == id)
    }

    /// Widget with `id`
    pub fn widget(&self, id: Uuid) -> Option<&WidgetIdentity> {
        self.widget_ids.iter().find(|w| w.id == id)
    }
}

fn contains_weather(widgets: &[WidgetIdentity]) -> bool {
    widgets.iter().any(|w| w.module == WidgetModule::Weather)
}

/// Whether `update_interval` is too short for a set holding `widgets`
///
/// Weather providers rate-limit requests, so a set with a weather widget
/// should refresh no faster than [`WEATHER_INTERVAL_MIN_SECS`].
pub fn needs_weather_interval_warning(widgets: &[WidgetIdentity], update_interval: f64) -> bool {
    contains_weather(widgets) && update_interval < WEATHER_INTERVAL_MIN_SECS
}

/// Top-level persisted document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HudConfig {
    /// Format version the store was written with
    #[serde(default)]
    pub config_version: u32,
    /// Widget sets in display order
    #[serde(default)]
    pub widget_sets: Vec<WidgetSet>,
    /// Global preferences
    #[serde(default)]
    pub preferences: Preferences,
}

impl Default for HudConfig {
    fn default() -> Self {
        Self {
            config_version: CONFIG_VERSION,
            widget_sets: Vec::new(),
            preferences: Preferences::default(),
        }
    }
}

impl HudConfig {
    /// Set with `id`
    pub fn widget_set(&self, id: Uuid) -> Option<&WidgetSet> {
        self.widget_sets.iter().find(|s| s.id == id)
    }

    /// Mutable set with `id`
    pub fn widget_set_mut(&mut self, id: Uuid) -> Option<&mut WidgetSet> {
        self.widget_sets.iter_mut().find(|s| s.id == id)
    }
}
