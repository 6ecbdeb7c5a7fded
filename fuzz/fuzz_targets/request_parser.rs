#![no_main]

use ab_significance::request::{ComputationRequest, ResultKind};
use ab_significance::variant::parse_count;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        // None of the boundary parsers may panic on arbitrary text
        let _ = parse_count(input, "fuzz");
        let _ = input.parse::<ResultKind>();
        let _ = ComputationRequest::from_toml_str(input);
    }
});
