#![no_main]

use libfuzzer_sys::fuzz_target;

use custody_types::Location;

// Parsing a location and reading its prefixes must never panic; a parsed
// location lies within each of its own prefixes.
fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(location) = text.parse::<Location>() else {
        return;
    };
    for level in 0..=location.level() + 1 {
        if let Some(prefix) = location.prefix(level) {
            assert!(location.is_within(&prefix));
        }
    }
    let _ = location.to_string();
});
