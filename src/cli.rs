//! Command-line arguments

use clap::{Args, Parser, Subcommand, ValueEnum};
use hudconfig::config::{
    Anchor, AnchorY, OrientationMode, Rgba, TextAlignment, WeatherProvider, WidgetModule,
};
use std::path::PathBuf;

/// Configure the widget sets shown by the HUD
#[derive(Debug, Parser)]
#[command(name = "hudconfig", version, about)]
pub struct Cli {
    /// Path of the configuration store (defaults to the per-user location)
    #[arg(long, global = true, value_name = "PATH")]
    pub store: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List widget sets
    List,
    /// Show one widget set with its widgets
    Show {
        /// Set position (1-based), id, id prefix or title
        set: String,
    },
    /// Create a widget set
    CreateSet {
        /// Title; empty becomes "Untitled"
        #[arg(default_value = "")]
        title: String,
        /// Horizontal screen anchor
        #[arg(long, value_enum, default_value_t = AnchorArg::Left)]
        anchor: AnchorArg,
    },
    /// Delete a widget set
    RemoveSet {
        /// Set position (1-based), id, id prefix or title
        set: String,
    },
    /// Change layout and style of a widget set
    EditSet(EditSetArgs),
    /// Append a widget to a set
    AddWidget {
        /// Set position (1-based), id, id prefix or title
        set: String,
        /// date, time, text, network-speed, temperature, battery-detail,
        /// current-capacity, charge-symbol, weather or lyrics
        module: WidgetModule,
    },
    /// Set widget config values (`key=value`, `key=` reverts to the default)
    SetConfig {
        /// Set position (1-based), id, id prefix or title
        set: String,
        /// Widget position in the set (1-based), id or id prefix
        widget: String,
        /// Values to set; an empty value reverts the key to its default
        #[arg(required = true, value_name = "KEY=VALUE")]
        assignments: Vec<String>,
    },
    /// Remove a widget from a set
    RemoveWidget {
        /// Set position (1-based), id, id prefix or title
        set: String,
        /// Widget position in the set (1-based), id or id prefix
        widget: String,
    },
    /// Reorder widgets: move the widgets at `--from` to just before `--to`
    MoveWidget {
        /// Set position (1-based), id, id prefix or title
        set: String,
        /// 1-based positions, comma separated
        #[arg(long, value_delimiter = ',', required = true)]
        from: Vec<usize>,
        /// 1-based position; one past the end appends
        #[arg(long)]
        to: usize,
    },
    /// Show or change global preferences
    Prefs(PrefsArgs),
    /// Replace the store with an empty configuration
    Reset,
    /// Ask running renderers to reload
    Notify,
    /// Print a line for every reload signal received (Unix only)
    Listen {
        /// Exit after this many signals
        #[arg(long)]
        count: Option<usize>,
    },
}

#[derive(Debug, Args)]
pub struct EditSetArgs {
    /// Set position (1-based), id, id prefix or title
    pub set: String,
    /// New title; empty becomes "Untitled"
    #[arg(long)]
    pub title: Option<String>,
    /// Show or hide the set
    #[arg(long, value_name = "BOOL")]
    pub enabled: Option<bool>,
    /// Screen orientations the set appears in
    #[arg(long, value_enum)]
    pub orientation: Option<OrientationArg>,
    /// Refresh cadence in seconds
    #[arg(long, value_name = "SECONDS")]
    pub interval: Option<f64>,
    /// Horizontal screen anchor
    #[arg(long, value_enum)]
    pub anchor: Option<AnchorArg>,
    /// Vertical screen anchor
    #[arg(long, value_enum)]
    pub anchor_y: Option<AnchorYArg>,
    /// Horizontal offset in portrait, in points
    #[arg(long, allow_negative_numbers = true)]
    pub portrait_x: Option<f64>,
    /// Vertical offset in portrait, in points
    #[arg(long, allow_negative_numbers = true)]
    pub portrait_y: Option<f64>,
    /// Horizontal offset in landscape, in points
    #[arg(long, allow_negative_numbers = true)]
    pub landscape_x: Option<f64>,
    /// Vertical offset in landscape, in points
    #[arg(long, allow_negative_numbers = true)]
    pub landscape_y: Option<f64>,
    /// Size the set to fit its widgets
    #[arg(long, value_name = "BOOL")]
    pub auto_resize: Option<bool>,
    /// Fixed width in points, used without auto resize
    #[arg(long)]
    pub width: Option<f64>,
    /// Fixed height in points, used without auto resize
    #[arg(long)]
    pub height: Option<f64>,
    /// Draw a blurred background
    #[arg(long, value_name = "BOOL")]
    pub blur: Option<bool>,
    /// Background corner radius in points
    #[arg(long)]
    pub corner_radius: Option<f64>,
    /// Use the dark blur style
    #[arg(long, value_name = "BOOL")]
    pub blur_dark: Option<bool>,
    /// Background opacity from 0 to 1
    #[arg(long)]
    pub blur_alpha: Option<f64>,
    /// Pick the text color from the wallpaper
    #[arg(long, value_name = "BOOL")]
    pub dynamic_color: Option<bool>,
    /// Fixed text color as `#RRGGBB` or `#RRGGBBAA`; turns off dynamic color
    #[arg(long, value_parser = parse_color)]
    pub color: Option<Rgba>,
    /// Font family name
    #[arg(long)]
    pub font: Option<String>,
    /// Bold text
    #[arg(long, value_name = "BOOL")]
    pub bold: Option<bool>,
    /// Italic text
    #[arg(long, value_name = "BOOL")]
    pub italic: Option<bool>,
    /// Text alignment
    #[arg(long, value_enum)]
    pub align: Option<AlignmentArg>,
    /// Font size in points
    #[arg(long)]
    pub font_size: Option<f64>,
    /// Text opacity from 0 to 1
    #[arg(long)]
    pub text_alpha: Option<f64>,
    /// Keep an interval below the weather minimum
    #[arg(long, conflicts_with = "use_minimum_interval")]
    pub force: bool,
    /// Raise an interval below the weather minimum to the minimum
    #[arg(long)]
    pub use_minimum_interval: bool,
}

#[derive(Debug, Args)]
pub struct PrefsArgs {
    /// Locale used for date and weather formatting, such as `en_US`
    #[arg(long)]
    pub locale: Option<String>,
    /// Save edits on exit without asking
    #[arg(long, value_name = "BOOL")]
    pub hide_save_confirmation: Option<bool>,
    /// Outline every set for layout debugging
    #[arg(long, value_name = "BOOL")]
    pub debug_border: Option<bool>,
    /// Source of weather data
    #[arg(long, value_enum)]
    pub weather_provider: Option<ProviderArg>,
    /// API key for providers that need one
    #[arg(long)]
    pub weather_api_key: Option<String>,
    /// The QWeather key is on the free plan
    #[arg(long, value_name = "BOOL")]
    pub free_subscription: Option<bool>,
}

impl PrefsArgs {
    pub fn is_empty(&self) -> bool {
        self.locale.is_none()
            && self.hide_save_confirmation.is_none()
            && self.debug_border.is_none()
            && self.weather_provider.is_none()
            && self.weather_api_key.is_none()
            && self.free_subscription.is_none()
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum AnchorArg {
    Left,
    Center,
    Right,
}

impl From<AnchorArg> for Anchor {
    fn from(arg: AnchorArg) -> Self {
        match arg {
            AnchorArg::Left => Anchor::Left,
            AnchorArg::Center => Anchor::Center,
            AnchorArg::Right => Anchor::Right,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum AnchorYArg {
    Top,
    Center,
    Bottom,
}

impl From<AnchorYArg> for AnchorY {
    fn from(arg: AnchorYArg) -> Self {
        match arg {
            AnchorYArg::Top => AnchorY::Top,
            AnchorYArg::Center => AnchorY::Center,
            AnchorYArg::Bottom => AnchorY::Bottom,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OrientationArg {
    Both,
    Portrait,
    Landscape,
}

impl From<OrientationArg> for OrientationMode {
    fn from(arg: OrientationArg) -> Self {
        match arg {
            OrientationArg::Both => OrientationMode::Both,
            OrientationArg::Portrait => OrientationMode::Portrait,
            OrientationArg::Landscape => OrientationMode::Landscape,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum AlignmentArg {
    Left,
    Center,
    Right,
}

impl From<AlignmentArg> for TextAlignment {
    fn from(arg: AlignmentArg) -> Self {
        match arg {
            AlignmentArg::Left => TextAlignment::Left,
            AlignmentArg::Center => TextAlignment::Center,
            AlignmentArg::Right => TextAlignment::Right,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ProviderArg {
    System,
    Qweather,
}

impl From<ProviderArg> for WeatherProvider {
    fn from(arg: ProviderArg) -> Self {
        match arg {
            ProviderArg::System => WeatherProvider::System,
            ProviderArg::Qweather => WeatherProvider::QWeather,
        }
    }
}

fn parse_color(input: &str) -> Result<Rgba, String> {
    let hex = input.trim().trim_start_matches('#');
    if !matches!(hex.len(), 6 | 8) || !hex.is_ascii() {
        return Err(format!("expected #RRGGBB or #RRGGBBAA, got '{input}'"));
    }
    let channel = |i: usize| {
        u8::from_str_radix(&hex[i..i + 2], 16)
            .map(|v| f64::from(v) / 255.0)
            .map_err(|_| format!("invalid hex color '{input}'"))
    };
    Ok(Rgba {
        red: channel(0)?,
        green: channel(2)?,
        blue: channel(4)?,
        alpha: if hex.len() == 8 { channel(6)? } else { 1.0 },
    })
}
