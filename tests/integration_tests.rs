//! Integration tests for `hudconfig`
//!
//! Drives the widget manager against real stores and notifiers and checks
//! that what lands on disk always matches what the manager holds.

use hudconfig::config::{
    Anchor, ConfigStore, HudConfig, JsonConfigStore, MemoryConfigStore, WidgetModule,
    WidgetSetDetails,
};
use hudconfig::error::{HudConfigError, get_user_friendly_error};
use hudconfig::notify::{ChannelNotifier, NoopNotifier};
use hudconfig::{EditOutcome, WidgetManager};
use proptest::prelude::*;
use std::sync::Arc;
use tempfile::TempDir;
use uuid::Uuid;

fn file_store(dir: &TempDir) -> JsonConfigStore {
    JsonConfigStore::new(dir.path().join("widgets.json"))
}

/// Every save is visible to a fresh manager opened on the same file
#[test]
fn test_file_store_reload_matches_memory() {
    let dir = tempfile::tempdir().unwrap();
    let mut manager = WidgetManager::open(file_store(&dir), NoopNotifier).unwrap();

    let clock = manager.create_widget_set("Clock", Anchor::Center).unwrap();
    let weather = manager.create_widget_set("Weather", Anchor::Right).unwrap();
    let date = manager.add_widget(clock.id, WidgetModule::Date).unwrap().unwrap();
    manager.add_widget(clock.id, WidgetModule::Time).unwrap();
    manager.add_widget(weather.id, WidgetModule::Weather).unwrap();

    let mut draft = date.clone();
    draft.config.set("dateFormat", "yyyy-MM-dd");
    manager.update_widget_config(clock.id, &date, draft).unwrap();
    manager.move_widget(clock.id, &[1], 0).unwrap();

    let reopened = WidgetManager::open(file_store(&dir), NoopNotifier).unwrap();
    assert_eq!(reopened.config(), manager.config());

    let order: Vec<WidgetModule> = reopened.widget_sets()[0]
        .widget_ids
        .iter()
        .map(|w| w.module)
        .collect();
    assert_eq!(order, vec![WidgetModule::Time, WidgetModule::Date]);
}

/// Store file layout: version, sets and preferences as separate keys
#[test]
fn test_store_document_shape() {
    let dir = tempfile::tempdir().unwrap();
    let mut manager = WidgetManager::open(file_store(&dir), NoopNotifier).unwrap();
    let set = manager.create_widget_set("Shape", Anchor::Left).unwrap();
    let widget = manager.add_widget(set.id, WidgetModule::NetworkSpeed).unwrap().unwrap();
    let mut draft = widget.clone();
    draft.config.set("isUp", true);
    draft.config.set("minUnit", 2);
    manager.update_widget_config(set.id, &widget, draft).unwrap();

    let text = std::fs::read_to_string(dir.path().join("widgets.json")).unwrap();
    let json: serde_json::Value = serde_json::from_str(&text).unwrap();

    assert_eq!(json["configVersion"], 2);
    assert!(json["preferences"].is_object());
    let stored_set = &json["widgetSets"][0];
    assert_eq!(stored_set["title"], "Shape");
    assert_eq!(stored_set["anchor"], "left");
    assert_eq!(stored_set["updateInterval"], 1.0);
    let stored_widget = &stored_set["widgetIds"][0];
    assert_eq!(stored_widget["module"], "networkSpeed");
    assert_eq!(stored_widget["config"]["isUp"], true);
    assert_eq!(stored_widget["config"]["minUnit"], 2);
}

/// An editor holding a copy of a deleted set cannot resurrect it
#[test]
fn test_stale_editor_after_delete() {
    let bus = Arc::new(ChannelNotifier::new());
    let reloads = bus.subscribe();
    let mut manager = WidgetManager::open(MemoryConfigStore::new(), Arc::clone(&bus)).unwrap();

    let set = manager.create_widget_set("Doomed", Anchor::Left).unwrap();
    let widget = manager.add_widget(set.id, WidgetModule::Lyrics).unwrap().unwrap();
    let stale = manager.get_updated_widget_set(set.id).unwrap();
    manager.remove_widget_set(set.id).unwrap();
    let signals = reloads.try_iter().count();
    assert_eq!(signals, 3);

    let mut details = stale.details.clone();
    details.title = "Resurrected".to_string();
    assert_eq!(
        manager.edit_widget_set(set.id, details, true).unwrap(),
        EditOutcome::NotFound
    );
    assert!(!manager.remove_widget(set.id, widget.id, true).unwrap());
    assert!(!manager.remove_widget_set(set.id).unwrap());
    assert!(manager.get_updated_widget_set(set.id).is_none());
    assert!(manager.widget_sets().is_empty());
    assert_eq!(reloads.try_iter().count(), 0);
}

/// A failed save during an edit leaves the store exactly as it was
#[test]
fn test_failed_edit_leaves_store_unchanged() {
    let store = Arc::new(MemoryConfigStore::new());
    let mut manager = WidgetManager::open(Arc::clone(&store), NoopNotifier).unwrap();
    let set = manager.create_widget_set("Before", Anchor::Left).unwrap();
    manager.add_widget(set.id, WidgetModule::Temperature).unwrap();
    let persisted = store.load().unwrap();

    store.set_fail_writes(true);
    let mut details = set.details.clone();
    details.title = "After".to_string();
    let error = manager.edit_widget_set(set.id, details, true).unwrap_err();

    assert!(matches!(error, HudConfigError::PersistFailed(_)));
    assert!(get_user_friendly_error(&error).contains("retry or discard"));
    assert_eq!(store.load().unwrap(), persisted);
    assert_eq!(manager.config(), &persisted);
}

/// A corrupt store fails to open and can be recovered by a reset
#[test]
fn test_corrupt_store_recovery() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("widgets.json"), "{ not json").unwrap();

    let error = WidgetManager::open(file_store(&dir), NoopNotifier).unwrap_err();
    assert!(error.is_corrupt_store());
    assert!(get_user_friendly_error(&error).contains("Reset to defaults"));

    WidgetManager::reset_to_defaults(file_store(&dir), NoopNotifier).unwrap();
    let manager = WidgetManager::open(file_store(&dir), NoopNotifier).unwrap();
    assert!(manager.widget_sets().is_empty());
}

/// Weather interval advice is reported but the edit still lands
#[test]
fn test_weather_interval_advisory_accepts_write() {
    let dir = tempfile::tempdir().unwrap();
    let mut manager = WidgetManager::open(file_store(&dir), NoopNotifier).unwrap();
    let set = manager.create_widget_set("Forecast", Anchor::Right).unwrap();
    manager.add_widget(set.id, WidgetModule::Weather).unwrap();

    let details = WidgetSetDetails {
        update_interval: 30.0,
        ..set.details.clone()
    };
    let outcome = manager.edit_widget_set(set.id, details, true).unwrap();
    assert!(outcome.advisory().is_some());

    let reopened = WidgetManager::open(file_store(&dir), NoopNotifier).unwrap();
    let stored = reopened.get_updated_widget_set(set.id).unwrap();
    assert!((stored.details.update_interval - 30.0).abs() < f64::EPSILON);
    assert!(stored.needs_weather_interval_warning());
}

/// Stores written before versioning load and are upgraded on save
#[test]
fn test_unversioned_store_is_upgraded() {
    let dir = tempfile::tempdir().unwrap();
    let legacy = serde_json::json!({
        "widgetSets": [{
            "id": Uuid::new_v4(),
            "title": "Legacy",
            "isEnabled": true,
            "updateInterval": 2.0,
            "anchor": "center",
            "autoResizes": true,
            "width": 100.0,
            "height": 12.0,
            "dynamicColor": true,
            "widgetIds": [{ "id": Uuid::new_v4(), "module": "chargeSymbol", "config": { "filled": false, "futureKey": "kept" } }]
        }]
    });
    std::fs::write(dir.path().join("widgets.json"), legacy.to_string()).unwrap();

    let mut manager = WidgetManager::open(file_store(&dir), NoopNotifier).unwrap();
    assert!(manager.config_outdated());
    let widget = &manager.widget_sets()[0].widget_ids[0];
    assert_eq!(widget.config.get_bool("filled"), Some(false));
    assert_eq!(widget.config.get_text("futureKey"), Some("kept"));

    manager.save().unwrap();
    let stored: HudConfig = file_store(&dir).load().unwrap();
    assert_eq!(stored.config_version, hudconfig::config::CONFIG_VERSION);
    assert_eq!(
        stored.widget_sets[0].widget_ids[0].config.get_text("futureKey"),
        Some("kept")
    );
}

#[cfg(unix)]
#[test]
fn test_socket_listener_sees_manager_saves() {
    use hudconfig::notify::{ReloadListener, SocketNotifier};
    use std::time::Duration;

    let dir = tempfile::tempdir().unwrap();
    let sockets = dir.path().join("reload");
    let listener = ReloadListener::bind_in(&sockets).unwrap();
    let mut manager = WidgetManager::open(
        MemoryConfigStore::new(),
        SocketNotifier::new(&sockets),
    )
    .unwrap();

    manager.create_widget_set("Signalled", Anchor::Left).unwrap();
    assert!(listener.wait(Duration::from_secs(2)).unwrap());
    assert!(!listener.try_recv().unwrap());
}

#[derive(Debug, Clone)]
enum Op {
    CreateSet(String),
    RemoveSet(usize),
    EditSet(usize, String, f64, bool),
    AddWidget(usize, usize),
    SetText(usize, usize, String),
    RemoveWidget(usize, usize, bool),
    MoveWidget(usize, Vec<usize>, usize),
    Save,
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        "[a-z ]{0,8}".prop_map(Op::CreateSet),
        (0usize..4).prop_map(Op::RemoveSet),
        (0usize..4, "[a-z ]{0,8}", -5.0f64..1200.0, any::<bool>())
            .prop_map(|(s, t, i, save)| Op::EditSet(s, t, i, save)),
        (0usize..4, 0usize..10).prop_map(|(s, m)| Op::AddWidget(s, m)),
        (0usize..4, 0usize..6, "[a-z]{0,4}").prop_map(|(s, w, t)| Op::SetText(s, w, t)),
        (0usize..4, 0usize..6, any::<bool>()).prop_map(|(s, w, save)| Op::RemoveWidget(s, w, save)),
        (0usize..4, proptest::collection::vec(0usize..6, 0..3), 0usize..7)
            .prop_map(|(s, from, to)| Op::MoveWidget(s, from, to)),
        Just(Op::Save),
    ]
}

fn set_id(manager: &WidgetManager, index: usize) -> Uuid {
    // Out-of-range indices stand for an id that no longer exists
    manager
        .widget_sets()
        .get(index)
        .map_or_else(Uuid::new_v4, |s| s.id)
}

fn apply(manager: &mut WidgetManager, op: Op) {
    match op {
        Op::CreateSet(title) => {
            manager.create_widget_set(&title, Anchor::Left).unwrap();
        }
        Op::RemoveSet(s) => {
            manager.remove_widget_set(set_id(manager, s)).unwrap();
        }
        Op::EditSet(s, title, interval, save) => {
            let id = set_id(manager, s);
            let mut details = manager
                .get_updated_widget_set(id)
                .map_or_else(|| WidgetSetDetails::new("", Anchor::Left), |set| set.details);
            details.title = title;
            details.update_interval = interval;
            manager.edit_widget_set(id, details, save).unwrap();
        }
        Op::AddWidget(s, m) => {
            manager
                .add_widget(set_id(manager, s), WidgetModule::ALL[m])
                .unwrap();
        }
        Op::SetText(s, w, text) => {
            let id = set_id(manager, s);
            let Some(old) = manager
                .get_updated_widget_set(id)
                .and_then(|set| set.widget_ids.get(w).cloned())
            else {
                return;
            };
            let mut draft = old.clone();
            draft.config.set("text", text);
            manager.update_widget_config(id, &old, draft).unwrap();
        }
        Op::RemoveWidget(s, w, save) => {
            let id = set_id(manager, s);
            let widget_id = manager
                .get_updated_widget_set(id)
                .and_then(|set| set.widget_ids.get(w).map(|x| x.id))
                .unwrap_or_else(Uuid::new_v4);
            manager.remove_widget(id, widget_id, save).unwrap();
        }
        Op::MoveWidget(s, from, to) => {
            manager.move_widget(set_id(manager, s), &from, to).unwrap();
        }
        Op::Save => manager.save().unwrap(),
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// After any operation without pending edits, the store reproduces memory
    #[test]
    fn prop_store_round_trips_collection(ops in proptest::collection::vec(op_strategy(), 1..25)) {
        let store = Arc::new(MemoryConfigStore::new());
        let mut manager = WidgetManager::open(Arc::clone(&store), NoopNotifier).unwrap();

        for op in ops {
            apply(&mut manager, op);
            if !manager.has_unsaved_changes() {
                prop_assert_eq!(&store.load().unwrap(), manager.config());
            }
            for set in manager.widget_sets() {
                prop_assert!(!set.title().trim().is_empty());
                prop_assert!(set.details.update_interval > 0.0);
            }
        }

        manager.save().unwrap();
        prop_assert_eq!(&store.load().unwrap(), manager.config());
    }
}
