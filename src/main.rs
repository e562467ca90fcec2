//! `hudconfig` - command-line configurator for the HUD widget sets
//!
//! Every command opens the store, applies one change through the
//! [`WidgetManager`] and exits. Running renderers are told to reload after
//! each successful save.

mod cli;

use anyhow::{Context, Result, anyhow, bail};
use clap::Parser;
use cli::{Cli, Command, EditSetArgs, PrefsArgs};
use hudconfig::config::schema::{self, parse_value};
use hudconfig::config::{ConfigStore, JsonConfigStore, WidgetSet, WidgetSetDetails};
use hudconfig::error::get_user_friendly_error;
use hudconfig::notify::ReloadNotifier;
use hudconfig::utils::{self, paths};
use hudconfig::{EditOutcome, HudConfigError, WidgetManager};
use tracing::{error, info};
use uuid::Uuid;

fn main() -> Result<()> {
    let cli = Cli::parse();

    utils::init_logging(&paths::log_dir(), cli.verbose)
        .context("Failed to initialize logging system")?;

    let store = match &cli.store {
        Some(path) => JsonConfigStore::new(path),
        None => JsonConfigStore::at_default_location(),
    };
    info!("Using configuration store {}", store.describe());

    match cli.command {
        Command::Reset => {
            WidgetManager::reset_to_defaults(store, default_notifier())
                .context("Failed to reset configuration")?;
            println!("Configuration reset to defaults");
            Ok(())
        }
        Command::Notify => {
            send_reload().context("Failed to send reload signal")?;
            println!("Reload signal sent");
            Ok(())
        }
        Command::Listen { count } => listen(count),
        command => {
            let mut manager = open_manager(store)?;
            if manager.config_outdated() {
                println!(
                    "note: the configuration was written by an older version and will be \
                     upgraded on the next save"
                );
            }
            run(&mut manager, command)
        }
    }
}

#[cfg(unix)]
fn default_notifier() -> impl ReloadNotifier {
    hudconfig::notify::SocketNotifier::at_default_location()
}

#[cfg(not(unix))]
fn default_notifier() -> impl ReloadNotifier {
    hudconfig::notify::NoopNotifier
}

#[cfg(unix)]
fn send_reload() -> hudconfig::Result<()> {
    Ok(default_notifier().notify_reload()?)
}

#[cfg(not(unix))]
fn send_reload() -> hudconfig::Result<()> {
    Err(hudconfig::error::NotifyError::Unsupported.into())
}

fn open_manager(store: JsonConfigStore) -> Result<WidgetManager> {
    match WidgetManager::open(store, default_notifier()) {
        Ok(manager) => Ok(manager),
        Err(e) => {
            error!("Failed to open configuration: {}", e);
            eprintln!("{}", get_user_friendly_error(&e));
            if e.is_corrupt_store() {
                eprintln!("Run `hudconfig reset` to start over with an empty configuration.");
            }
            Err(e.into())
        }
    }
}

fn run(manager: &mut WidgetManager, command: Command) -> Result<()> {
    match command {
        Command::List => {
            if manager.widget_sets().is_empty() {
                println!("No widget sets");
            }
            for (index, set) in manager.widget_sets().iter().enumerate() {
                println!(
                    "{:>2}. {} [{}] {} widget(s){}",
                    index + 1,
                    set.title(),
                    short_id(set.id),
                    set.widget_ids.len(),
                    if set.details.is_enabled { "" } else { " (disabled)" }
                );
            }
        }
        Command::Show { set } => {
            let id = resolve_set(manager, &set)?;
            let set = manager
                .get_updated_widget_set(id)
                .ok_or_else(|| anyhow!("Widget set disappeared"))?;
            print_set(&set);
        }
        Command::CreateSet { title, anchor } => {
            let set = persist(manager.create_widget_set(&title, anchor.into()))?;
            println!("Created '{}' [{}]", set.title(), short_id(set.id));
        }
        Command::RemoveSet { set } => {
            let id = resolve_set(manager, &set)?;
            if persist(manager.remove_widget_set(id))? {
                println!("Removed widget set");
            }
        }
        Command::EditSet(args) => edit_set(manager, args)?,
        Command::AddWidget { set, module } => {
            let id = resolve_set(manager, &set)?;
            if let Some(widget) = persist(manager.add_widget(id, module))? {
                println!("Added {} widget [{}]", module.display_name(), short_id(widget.id));
            }
        }
        Command::SetConfig {
            set,
            widget,
            assignments,
        } => {
            let set_id = resolve_set(manager, &set)?;
            let current = manager
                .get_updated_widget_set(set_id)
                .ok_or_else(|| anyhow!("Widget set disappeared"))?;
            let old = current.widget_ids[resolve_widget(&current, &widget)?].clone();

            let mut config = old.config.clone();
            for assignment in &assignments {
                let (key, value) = assignment
                    .split_once('=')
                    .ok_or_else(|| anyhow!("Expected KEY=VALUE, got '{assignment}'"))?;
                let value = parse_value(old.module, key.trim(), value)?;
                config.set(key.trim(), value);
            }

            if config == old.config {
                println!("Nothing changed");
                return Ok(());
            }
            let draft = old.with_config(config);
            if persist(manager.update_widget_config(set_id, &old, draft))? {
                println!("Updated widget config");
            }
        }
        Command::RemoveWidget { set, widget } => {
            let set_id = resolve_set(manager, &set)?;
            let current = manager
                .get_updated_widget_set(set_id)
                .ok_or_else(|| anyhow!("Widget set disappeared"))?;
            let widget_id = current.widget_ids[resolve_widget(&current, &widget)?].id;
            if persist(manager.remove_widget(set_id, widget_id, true))? {
                println!("Removed widget");
            }
        }
        Command::MoveWidget { set, from, to } => {
            let set_id = resolve_set(manager, &set)?;
            if from.contains(&0) || to == 0 {
                bail!("Positions are 1-based");
            }
            let sources: Vec<usize> = from.iter().map(|p| p - 1).collect();
            if persist(manager.move_widget(set_id, &sources, to - 1))? {
                println!("Moved widgets");
            } else {
                println!("Order unchanged");
            }
        }
        Command::Prefs(args) => prefs(manager, args)?,
        Command::Reset | Command::Notify | Command::Listen { .. } => {
            unreachable!("handled before opening the store")
        }
    }
    Ok(())
}

/// Attach the user-facing explanation to persistence failures
fn persist<T>(result: hudconfig::Result<T>) -> Result<T> {
    result.map_err(|e: HudConfigError| {
        let message = get_user_friendly_error(&e);
        anyhow::Error::new(e).context(message)
    })
}

fn edit_set(manager: &mut WidgetManager, args: EditSetArgs) -> Result<()> {
    let id = resolve_set(manager, &args.set)?;
    let current = manager
        .get_updated_widget_set(id)
        .ok_or_else(|| anyhow!("Widget set disappeared"))?;
    let mut details = apply_edits(current.details, &args);

    if let Some(advisory) = manager.check_widget_set(id, &details) {
        if args.use_minimum_interval {
            details.update_interval = advisory.suggested_interval();
        } else if !args.force {
            bail!(
                "{advisory}. Pass --use-minimum-interval to use {}s or --force to keep it",
                advisory.suggested_interval()
            );
        }
    }

    match persist(manager.edit_widget_set(id, details, true))? {
        EditOutcome::Applied => println!("Widget set updated"),
        EditOutcome::AppliedWithAdvisory(advisory) => {
            println!("Widget set updated (warning: {advisory})");
        }
        EditOutcome::NotFound => println!("Widget set no longer exists"),
    }
    Ok(())
}

fn apply_edits(mut details: WidgetSetDetails, args: &EditSetArgs) -> WidgetSetDetails {
    if let Some(title) = &args.title {
        details.title.clone_from(title);
    }
    if let Some(enabled) = args.enabled {
        details.is_enabled = enabled;
    }
    if let Some(orientation) = args.orientation {
        details.orientation_mode = orientation.into();
    }
    if let Some(interval) = args.interval {
        details.update_interval = interval;
    }
    if let Some(anchor) = args.anchor {
        details.anchor = anchor.into();
    }
    if let Some(anchor_y) = args.anchor_y {
        details.anchor_y = anchor_y.into();
    }
    set_if(&mut details.portrait_offset.x, args.portrait_x);
    set_if(&mut details.portrait_offset.y, args.portrait_y);
    set_if(&mut details.landscape_offset.x, args.landscape_x);
    set_if(&mut details.landscape_offset.y, args.landscape_y);
    set_if(&mut details.auto_resizes, args.auto_resize);
    set_if(&mut details.width, args.width);
    set_if(&mut details.height, args.height);
    set_if(&mut details.blur_details.has_blur, args.blur);
    set_if(&mut details.blur_details.corner_radius, args.corner_radius);
    set_if(&mut details.blur_details.style_dark, args.blur_dark);
    set_if(&mut details.blur_details.alpha, args.blur_alpha);
    set_if(&mut details.dynamic_color, args.dynamic_color);
    if let Some(color) = args.color {
        details.color_details.color = color;
        details.color_details.uses_custom_color = true;
        details.dynamic_color = false;
    }
    if let Some(font) = &args.font {
        details.text_style.font_name.clone_from(font);
    }
    set_if(&mut details.text_style.bold, args.bold);
    set_if(&mut details.text_style.italic, args.italic);
    if let Some(align) = args.align {
        details.text_style.alignment = align.into();
    }
    set_if(&mut details.text_style.size, args.font_size);
    set_if(&mut details.text_style.alpha, args.text_alpha);
    details
}

fn set_if<T: Copy>(field: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *field = value;
    }
}

fn prefs(manager: &mut WidgetManager, args: PrefsArgs) -> Result<()> {
    if args.is_empty() {
        let prefs = manager.preferences();
        println!("dateLocale:           {}", prefs.date_locale);
        println!("hideSaveConfirmation: {}", prefs.hide_save_confirmation);
        println!("debugBorder:          {}", prefs.debug_border);
        println!("weatherProvider:      {:?}", prefs.weather_provider);
        println!("freeSubscription:     {}", prefs.free_subscription);
        if !prefs.weather_configured() {
            println!("note: the selected weather provider needs an API key");
        }
        return Ok(());
    }

    let mut prefs = manager.preferences().clone();
    if let Some(locale) = args.locale {
        prefs.date_locale = locale;
    }
    set_if(&mut prefs.hide_save_confirmation, args.hide_save_confirmation);
    set_if(&mut prefs.debug_border, args.debug_border);
    if let Some(provider) = args.weather_provider {
        prefs.weather_provider = provider.into();
    }
    if let Some(key) = args.weather_api_key {
        prefs.weather_api_key = key;
    }
    set_if(&mut prefs.free_subscription, args.free_subscription);

    persist(manager.update_preferences(prefs))?;
    println!("Preferences updated");
    Ok(())
}

#[cfg(unix)]
fn listen(count: Option<usize>) -> Result<()> {
    use std::time::Duration;

    let listener = hudconfig::notify::ReloadListener::bind()
        .context("Failed to bind reload listener")?;
    println!("Listening for reload signals on {}", listener.path().display());

    let mut received = 0usize;
    while count.is_none_or(|limit| received < limit) {
        if listener
            .wait(Duration::from_secs(1))
            .context("Failed to receive reload signal")?
        {
            received += 1;
            println!("reload #{received}");
        }
    }
    Ok(())
}

#[cfg(not(unix))]
fn listen(_count: Option<usize>) -> Result<()> {
    Err(hudconfig::error::NotifyError::Unsupported.into())
}

fn short_id(id: Uuid) -> String {
    id.simple().to_string()[..8].to_string()
}

/// Find a set by 1-based position, id, id prefix or title
fn resolve_set(manager: &WidgetManager, selector: &str) -> Result<Uuid> {
    let sets = manager.widget_sets();
    if let Ok(position) = selector.parse::<usize>()
        && (1..=sets.len()).contains(&position)
    {
        return Ok(sets[position - 1].id);
    }

    let needle = selector.to_ascii_lowercase().replace('-', "");
    let by_id: Vec<&WidgetSet> = sets
        .iter()
        .filter(|s| !needle.is_empty() && s.id.simple().to_string().starts_with(&needle))
        .collect();
    if let [set] = by_id.as_slice() {
        return Ok(set.id);
    }

    let by_title: Vec<&WidgetSet> = sets
        .iter()
        .filter(|s| s.title().eq_ignore_ascii_case(selector))
        .collect();
    match by_title.as_slice() {
        [set] => Ok(set.id),
        [] if by_id.is_empty() => bail!("No widget set matches '{selector}'"),
        _ => bail!("'{selector}' matches more than one widget set"),
    }
}

/// Find a widget by 1-based position, id or id prefix
fn resolve_widget(set: &WidgetSet, selector: &str) -> Result<usize> {
    if let Ok(position) = selector.parse::<usize>()
        && (1..=set.widget_ids.len()).contains(&position)
    {
        return Ok(position - 1);
    }

    let needle = selector.to_ascii_lowercase().replace('-', "");
    let matches: Vec<usize> = set
        .widget_ids
        .iter()
        .enumerate()
        .filter(|(_, w)| !needle.is_empty() && w.id.simple().to_string().starts_with(&needle))
        .map(|(i, _)| i)
        .collect();
    match matches.as_slice() {
        [index] => Ok(*index),
        [] => bail!("No widget in '{}' matches '{selector}'", set.title()),
        _ => bail!("'{selector}' matches more than one widget"),
    }
}

fn print_set(set: &WidgetSet) {
    let d = &set.details;
    println!("{} [{}]", set.title(), set.id);
    println!("  enabled:      {}", d.is_enabled);
    println!("  orientation:  {:?}", d.orientation_mode);
    println!("  interval:     {}s", d.update_interval);
    println!("  anchor:       {:?} / {:?}", d.anchor, d.anchor_y);
    println!(
        "  offsets:      portrait ({}, {}) landscape ({}, {})",
        d.portrait_offset.x, d.portrait_offset.y, d.landscape_offset.x, d.landscape_offset.y
    );
    if d.auto_resizes {
        println!("  size:         auto");
    } else {
        println!("  size:         {} x {}", d.width, d.height);
    }
    println!(
        "  blur:         {} (radius {}, dark {}, alpha {})",
        d.blur_details.has_blur,
        d.blur_details.corner_radius,
        d.blur_details.style_dark,
        d.blur_details.alpha
    );
    if d.dynamic_color {
        println!("  color:        dynamic");
    } else {
        let c = &d.color_details.color;
        println!(
            "  color:        rgba({:.3}, {:.3}, {:.3}, {:.3})",
            c.red, c.green, c.blue, c.alpha
        );
    }
    println!(
        "  font:         {} {}pt{}{} {:?}",
        d.text_style.font_name,
        d.text_style.size,
        if d.text_style.bold { " bold" } else { "" },
        if d.text_style.italic { " italic" } else { "" },
        d.text_style.alignment
    );
    if set.needs_weather_interval_warning() {
        println!("  warning:      interval is below the weather minimum");
    }

    for (index, widget) in set.widget_ids.iter().enumerate() {
        println!(
            "  {:>2}. {} [{}]",
            index + 1,
            widget.module.display_name(),
            short_id(widget.id)
        );
        for key in schema::schema_for(widget.module) {
            let marker = if widget.config.contains_key(key.name) { "" } else { " (default)" };
            if let Some(value) = widget.get_or_default(key.name) {
                println!("        {} = {}{}", key.name, value, marker);
            }
        }
        for (key, value) in widget.config.iter() {
            if schema::lookup(widget.module, key).is_none() {
                println!("        {key} = {value} (unrecognized)");
            }
        }
    }
}
