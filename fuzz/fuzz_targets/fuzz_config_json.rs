#![no_main]

use hudconfig::config::HudConfig;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Arbitrary store contents must either fail to parse or survive a save
    if let Ok(s) = std::str::from_utf8(data)
        && let Ok(config) = serde_json::from_str::<HudConfig>(s)
    {
        let json = serde_json::to_string(&config).unwrap();
        let reparsed: HudConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(reparsed, config);
    }
});
