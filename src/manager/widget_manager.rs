//! Widget manager implementation
//!
//! The manager owns the in-memory collection of widget sets and is the only
//! component that mutates it. Every mutating operation writes the whole
//! collection through the [`ConfigStore`] and, once the write succeeded,
//! fires the reload signal so the renderer picks up the change.
//!
//! If a write fails, the in-memory collection is rolled back to the last
//! snapshot that made it to the store, so memory and disk never stay
//! diverged.

use crate::config::models::{
    CONFIG_VERSION, HudConfig, WEATHER_INTERVAL_MIN_SECS, WidgetSet, WidgetSetDetails,
    needs_weather_interval_warning,
};
use crate::config::{Anchor, ConfigStore, Preferences, WidgetIdentity, WidgetModule};
use crate::error::{HudConfigError, Result};
use crate::notify::ReloadNotifier;
use std::fmt;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// Rule the manager reports but does not enforce
///
/// The calling collaborator decides whether to keep the requested value or
/// apply the suggestion; the manager accepts the write either way.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ValidationAdvisory {
    /// A set containing a weather widget refreshes faster than providers allow
    WeatherIntervalTooLow {
        /// Interval the caller asked for, in seconds
        requested: f64,
        /// Lowest interval weather sets should use, in seconds
        minimum: f64,
    },
}

impl ValidationAdvisory {
    /// Value the collaborator can offer as a fix
    pub fn suggested_interval(&self) -> f64 {
        match self {
            Self::WeatherIntervalTooLow { minimum, .. } => *minimum,
        }
    }
}

impl fmt::Display for ValidationAdvisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WeatherIntervalTooLow { requested, minimum } => write!(
                f,
                "Update interval of {requested}s is below the {minimum}s minimum for weather widgets"
            ),
        }
    }
}

/// Result of [`WidgetManager::edit_widget_set`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EditOutcome {
    /// The new details were applied
    Applied,
    /// The new details were applied although they trip an advisory rule
    AppliedWithAdvisory(ValidationAdvisory),
    /// No set with that id exists; nothing changed
    NotFound,
}

impl EditOutcome {
    /// Whether the edit reached the collection
    pub fn applied(&self) -> bool {
        !matches!(self, Self::NotFound)
    }

    /// Advisory raised by the edit, if any
    pub fn advisory(&self) -> Option<ValidationAdvisory> {
        match self {
            Self::AppliedWithAdvisory(advisory) => Some(*advisory),
            _ => None,
        }
    }
}

/// Owner of the widget set collection
pub struct WidgetManager {
    /// Durable store
    store: Box<dyn ConfigStore>,
    /// Reload signal publisher
    notifier: Box<dyn ReloadNotifier>,
    /// Current collection, the single source of truth in this process
    config: HudConfig,
    /// Collection as last written to the store
    last_persisted: HudConfig,
    /// Version found in the store at load time
    loaded_version: u32,
}

impl fmt::Debug for WidgetManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WidgetManager")
            .field("store", &self.store.describe())
            .field("widget_sets", &self.config.widget_sets.len())
            .field("loaded_version", &self.loaded_version)
            .finish_non_exhaustive()
    }
}

impl WidgetManager {
    /// Load the collection from `store`
    ///
    /// A store that does not exist yet yields an empty collection. A store
    /// that cannot be read or parsed fails with
    /// [`HudConfigError::LoadFailed`]; see [`WidgetManager::reset_to_defaults`]
    /// for recovery. Set details that break the current rules are normalized
    /// in memory and written back on the next save.
    pub fn open(
        store: impl ConfigStore + 'static,
        notifier: impl ReloadNotifier + 'static,
    ) -> Result<Self> {
        let loaded = store.load().map_err(|e| {
            error!("Failed to load configuration from {}: {}", store.describe(), e);
            HudConfigError::LoadFailed(e)
        })?;

        info!(
            "Widget manager opened {} ({} widget sets, version {})",
            store.describe(),
            loaded.widget_sets.len(),
            loaded.config_version
        );

        // Stored details may predate the current rules; fixed copies stay
        // unsaved until the next write
        let mut config = loaded.clone();
        for set in &mut config.widget_sets {
            set.details = set.details.clone().normalized();
        }
        if config != loaded {
            warn!("Normalized widget set details loaded from {}", store.describe());
        }

        Ok(Self {
            store: Box::new(store),
            notifier: Box::new(notifier),
            loaded_version: config.config_version,
            last_persisted: loaded,
            config,
        })
    }

    /// Replace whatever `store` holds with an empty default collection
    pub fn reset_to_defaults(
        store: impl ConfigStore + 'static,
        notifier: impl ReloadNotifier + 'static,
    ) -> Result<Self> {
        warn!("Resetting configuration in {} to defaults", store.describe());
        let config = HudConfig::default();
        let mut manager = Self {
            store: Box::new(store),
            notifier: Box::new(notifier),
            loaded_version: CONFIG_VERSION,
            last_persisted: config.clone(),
            config,
        };
        manager.persist()?;
        Ok(manager)
    }

    /// The whole in-memory collection
    pub fn config(&self) -> &HudConfig {
        &self.config
    }

    /// Widget sets in display order
    pub fn widget_sets(&self) -> &[WidgetSet] {
        &self.config.widget_sets
    }

    /// Set with `id`
    pub fn widget_set(&self, id: Uuid) -> Option<&WidgetSet> {
        self.config.widget_set(id)
    }

    /// Fresh copy of the set with `id`, or `None` if it has been deleted
    ///
    /// Editors call this to replace a stale local copy after a save.
    pub fn get_updated_widget_set(&self, id: Uuid) -> Option<WidgetSet> {
        self.config.widget_set(id).cloned()
    }

    /// Global preferences
    pub fn preferences(&self) -> &Preferences {
        &self.config.preferences
    }

    /// Whether the store was written by an older version and holds data
    /// that predates the current format
    pub fn config_outdated(&self) -> bool {
        self.loaded_version < CONFIG_VERSION && !self.last_persisted.widget_sets.is_empty()
    }

    /// Whether in-memory edits are waiting for [`WidgetManager::save`]
    pub fn has_unsaved_changes(&self) -> bool {
        self.config != self.last_persisted
    }

    /// Human readable store location
    pub fn store_description(&self) -> String {
        self.store.describe()
    }

    /// Append a new set with default layout
    ///
    /// An empty or blank `title` becomes "Untitled".
    pub fn create_widget_set(&mut self, title: &str, anchor: Anchor) -> Result<WidgetSet> {
        let set = WidgetSet::new(title, anchor);
        info!("Creating widget set '{}' ({})", set.title(), set.id);

        self.config.widget_sets.push(set.clone());
        self.persist()?;
        Ok(set)
    }

    /// Remove the set with `id`
    ///
    /// Returns `false` without writing if no such set exists.
    pub fn remove_widget_set(&mut self, id: Uuid) -> Result<bool> {
        let Some(index) = self.config.widget_sets.iter().position(|s| s.id == id) else {
            debug!("Widget set {} not found, nothing to remove", id);
            return Ok(false);
        };

        let removed = self.config.widget_sets.remove(index);
        info!("Removing widget set '{}' ({})", removed.title(), id);
        self.persist()?;
        Ok(true)
    }

    /// Advisory the given details would raise for the set with `id`
    pub fn check_widget_set(&self, id: Uuid, details: &WidgetSetDetails) -> Option<ValidationAdvisory> {
        let set = self.config.widget_set(id)?;
        weather_advisory(&set.widget_ids, details.update_interval)
    }

    /// Whether `update_interval` is too short for the members of set `id`
    pub fn needs_weather_interval_warning(&self, id: Uuid, update_interval: f64) -> bool {
        self.config
            .widget_set(id)
            .is_some_and(|set| needs_weather_interval_warning(&set.widget_ids, update_interval))
    }

    /// Replace every layout and style field of the set with `id`
    ///
    /// Widget membership is left untouched. The details are normalized
    /// first. An interval below the weather minimum is reported as an
    /// advisory but still applied. With `save == false` the change stays in
    /// memory until the next persisting operation or [`WidgetManager::save`].
    pub fn edit_widget_set(
        &mut self,
        id: Uuid,
        details: WidgetSetDetails,
        save: bool,
    ) -> Result<EditOutcome> {
        let Some(set) = self.config.widget_set_mut(id) else {
            debug!("Widget set {} not found, edit ignored", id);
            return Ok(EditOutcome::NotFound);
        };

        let details = details.normalized();
        let advisory = weather_advisory(&set.widget_ids, details.update_interval);
        if let Some(advisory) = advisory {
            warn!("Widget set {}: {}", id, advisory);
        }

        set.details = details;
        info!("Edited widget set '{}' ({})", set.title(), id);

        if save {
            self.persist()?;
        }

        Ok(match advisory {
            Some(advisory) => EditOutcome::AppliedWithAdvisory(advisory),
            None => EditOutcome::Applied,
        })
    }

    /// Append a new widget of `module` with empty config to set `set_id`
    ///
    /// Returns the created widget, or `None` if the set does not exist.
    pub fn add_widget(
        &mut self,
        set_id: Uuid,
        module: WidgetModule,
    ) -> Result<Option<WidgetIdentity>> {
        let Some(set) = self.config.widget_set_mut(set_id) else {
            debug!("Widget set {} not found, widget not added", set_id);
            return Ok(None);
        };

        let widget = WidgetIdentity::new(module);
        set.widget_ids.push(widget.clone());
        info!("Added {} widget {} to set {}", module, widget.id, set_id);

        self.persist()?;
        Ok(Some(widget))
    }

    /// Replace the config of the widget identified by `old`
    ///
    /// The stored id and module are kept; only the config of `new` is taken.
    /// A matched entry is always persisted and signalled, even when the
    /// replacement is identical. Returns `false` without writing if the set
    /// or widget is gone.
    pub fn update_widget_config(
        &mut self,
        set_id: Uuid,
        old: &WidgetIdentity,
        new: WidgetIdentity,
    ) -> Result<bool> {
        let Some(slot) = self
            .config
            .widget_set_mut(set_id)
            .and_then(|set| set.widget_ids.iter_mut().find(|w| w.same_widget(old)))
        else {
            debug!("Widget {} in set {} not found, update ignored", old.id, set_id);
            return Ok(false);
        };

        if new.module != slot.module {
            warn!(
                "Widget {} is a {} widget, ignoring module {} in update",
                slot.id, slot.module, new.module
            );
        }

        *slot = slot.with_config(new.config);
        info!("Updated config of widget {} in set {}", old.id, set_id);
        self.persist()?;
        Ok(true)
    }

    /// Remove widget `widget_id` from set `set_id`
    ///
    /// With `save == false` the removal stays in memory until the next
    /// persisting operation or [`WidgetManager::save`].
    pub fn remove_widget(&mut self, set_id: Uuid, widget_id: Uuid, save: bool) -> Result<bool> {
        let Some(set) = self.config.widget_set_mut(set_id) else {
            debug!("Widget set {} not found, widget not removed", set_id);
            return Ok(false);
        };
        let Some(index) = set.position_of(widget_id) else {
            debug!("Widget {} not in set {}, nothing to remove", widget_id, set_id);
            return Ok(false);
        };

        let removed = set.widget_ids.remove(index);
        info!("Removed {} widget {} from set {}", removed.module, widget_id, set_id);

        if save {
            self.persist()?;
        }
        Ok(true)
    }

    /// Move the widgets at `sources` to just before `destination`
    ///
    /// See [`move_elements`] for the exact semantics. Returns `false`
    /// without writing if the set is gone or the order did not change.
    pub fn move_widget(&mut self, set_id: Uuid, sources: &[usize], destination: usize) -> Result<bool> {
        let Some(set) = self.config.widget_set_mut(set_id) else {
            debug!("Widget set {} not found, move ignored", set_id);
            return Ok(false);
        };

        let before: Vec<Uuid> = set.widget_ids.iter().map(|w| w.id).collect();
        move_elements(&mut set.widget_ids, sources, destination);
        if set.widget_ids.iter().map(|w| w.id).eq(before.iter().copied()) {
            debug!("Move in set {} left order unchanged", set_id);
            return Ok(false);
        }

        info!(
            "Moved widgets {:?} to position {} in set {}",
            sources, destination, set_id
        );
        self.persist()?;
        Ok(true)
    }

    /// Replace the global preferences
    pub fn update_preferences(&mut self, preferences: Preferences) -> Result<()> {
        info!("Updating preferences");
        self.config.preferences = preferences;
        self.persist()
    }

    /// Write the current collection and signal the renderer
    pub fn save(&mut self) -> Result<()> {
        self.persist()
    }

    /// Write the whole collection, rolling back on failure, then signal
    fn persist(&mut self) -> Result<()> {
        self.config.config_version = CONFIG_VERSION;

        if let Err(e) = self.store.save(&self.config) {
            error!(
                "Failed to persist configuration to {}: {}",
                self.store.describe(),
                e
            );
            self.config = self.last_persisted.clone();
            return Err(HudConfigError::PersistFailed(e));
        }

        self.last_persisted = self.config.clone();
        self.loaded_version = CONFIG_VERSION;
        self.signal_reload();
        Ok(())
    }

    fn signal_reload(&self) {
        if let Err(e) = self.notifier.notify_reload() {
            // Persisting is what counts; the renderer resyncs on its own
            warn!("Failed to send reload signal: {}", e);
        }
    }
}

fn weather_advisory(widgets: &[WidgetIdentity], update_interval: f64) -> Option<ValidationAdvisory> {
    needs_weather_interval_warning(widgets, update_interval).then_some(
        ValidationAdvisory::WeatherIntervalTooLow {
            requested: update_interval,
            minimum: WEATHER_INTERVAL_MIN_SECS,
        },
    )
}

/// Stable list move
///
/// Removes the elements at `sources` and reinserts them, in their original
/// relative order, just before the element that was at `destination`.
/// Duplicate and out-of-range sources are ignored and `destination` is
/// clamped to the list length. Returns `false` if there was nothing to move.
pub fn move_elements<T>(items: &mut Vec<T>, sources: &[usize], destination: usize) -> bool {
    let len = items.len();
    let mut picked: Vec<usize> = sources.iter().copied().filter(|&i| i < len).collect();
    picked.sort_unstable();
    picked.dedup();
    if picked.is_empty() {
        return false;
    }

    let destination = destination.min(len);
    let below = picked.iter().filter(|&&i| i < destination).count();

    let mut moved = Vec::with_capacity(picked.len());
    let mut kept = Vec::with_capacity(len - picked.len());
    for (index, item) in items.drain(..).enumerate() {
        if picked.binary_search(&index).is_ok() {
            moved.push(item);
        } else {
            kept.push(item);
        }
    }

    let insert_at = destination - below;
    kept.splice(insert_at..insert_at, moved);
    *items = kept;
    true
}
