#![no_main]

use libfuzzer_sys::fuzz_target;
use std::io::Cursor;

use tims_targeted::aggregate::SpotCoordinate;
use tims_targeted::feature::parse_feature_list;

fuzz_target!(|data: &[u8]| {
    // Spot names come straight from the acquisition database
    if let Ok(name) = std::str::from_utf8(data) {
        if let Ok(spot) = SpotCoordinate::parse(name) {
            assert!(!spot.row.is_empty() && !spot.column.is_empty());
            assert!(name.ends_with(&spot.to_string()));
        }
    }

    // Feature lists either parse into valid windows or fail cleanly
    for delimiter in [b',', b'\t'] {
        if let Ok(windows) = parse_feature_list(Cursor::new(data), delimiter) {
            assert!(!windows.is_empty());
            for window in windows {
                assert!(window.mz_tol() >= 0.0 && window.ook0_tol() >= 0.0);
            }
        }
    }
});
