#![allow(clippy::unwrap_used)]
//! Benchmarks for configuration serialization and whole-collection saves

#![allow(missing_docs)]

use criterion::{Criterion, criterion_group, criterion_main};
use hudconfig::WidgetManager;
use hudconfig::config::{Anchor, HudConfig, MemoryConfigStore, WidgetIdentity, WidgetModule, WidgetSet};
use hudconfig::notify::NoopNotifier;
use std::hint::black_box;

fn create_large_config() -> HudConfig {
    let mut config = HudConfig::default();

    // 20 sets of 10 widgets, well beyond what fits on a screen
    for i in 0..20 {
        let mut set = WidgetSet::new(format!("Widget Set {i}"), Anchor::Left);
        set.details.update_interval = 600.0;
        for module in WidgetModule::ALL {
            let mut widget = WidgetIdentity::new(module);
            widget.config.set("text", format!("value {i}"));
            widget.config.set("useFahrenheit", i % 2 == 0);
            widget.config.set("minUnit", 2);
            set.widget_ids.push(widget);
        }
        config.widget_sets.push(set);
    }

    config
}

fn bench_config_serialization(c: &mut Criterion) {
    let config = create_large_config();

    c.bench_function("config_serialize", |b| {
        b.iter(|| {
            let json = serde_json::to_string(black_box(&config)).unwrap();
            black_box(json);
        });
    });
}

fn bench_config_deserialization(c: &mut Criterion) {
    let config = create_large_config();
    let json = serde_json::to_string(&config).unwrap();

    c.bench_function("config_deserialize", |b| {
        b.iter(|| {
            let deserialized: HudConfig = serde_json::from_str(black_box(&json)).unwrap();
            black_box(deserialized);
        });
    });
}

fn bench_manager_move_widget(c: &mut Criterion) {
    let json = serde_json::to_string(&create_large_config()).unwrap();
    let mut manager =
        WidgetManager::open(MemoryConfigStore::with_document(json), NoopNotifier).unwrap();
    let set_id = manager.widget_sets()[0].id;

    // Each iteration persists the whole collection
    c.bench_function("manager_move_widget", |b| {
        b.iter(|| {
            manager
                .move_widget(set_id, black_box(&[0, 3, 5]), black_box(9))
                .unwrap();
        });
    });
}

criterion_group!(
    benches,
    bench_config_serialization,
    bench_config_deserialization,
    bench_manager_move_widget
);
criterion_main!(benches);
