#![no_main]

use hudconfig::config::schema::{ValueKind, parse_value, schema_for};
use hudconfig::config::{ConfigValue, WidgetModule};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let [module, key, rest @ ..] = data else {
        return;
    };
    let Ok(input) = std::str::from_utf8(rest) else {
        return;
    };
    let module = WidgetModule::ALL[usize::from(*module) % WidgetModule::ALL.len()];
    let keys = schema_for(module);
    let entry = &keys[usize::from(*key) % keys.len()];

    // Accepted input always has the declared type and respects the range
    if let Ok(value) = parse_value(module, entry.name, input) {
        match (entry.kind, &value) {
            (ValueKind::Text, ConfigValue::Text(_)) | (ValueKind::Boolean, ConfigValue::Boolean(_)) => {}
            (ValueKind::Integer, ConfigValue::Integer(n)) => {
                if let Some((min, max)) = entry.range {
                    assert!((min..=max).contains(n));
                }
            }
            _ => panic!("{module}.{} parsed to {value:?}", entry.name),
        }
    }
});
