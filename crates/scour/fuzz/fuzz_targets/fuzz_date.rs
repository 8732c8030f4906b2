//! Fuzz target for datetime detection and type inference.
//!
//! Regex-based layout matching must not crash on pathological input, and
//! inference over a column of fuzzed cells must not either.

#![no_main]

use libfuzzer_sys::fuzz_target;
use scour::table::parse_datetime;
use scour::Parser;

fuzz_target!(|data: &[u8]| {
    if data.len() > 10_000 {
        return;
    }

    if let Ok(content) = std::str::from_utf8(data) {
        let _ = parse_datetime(content);

        let line = content.replace(['\n', '\r', ','], " ");
        let csv = format!("a,b\n{},1\n{},2\n", line, line);
        let _ = Parser::new().parse_str(&csv);
    }
});
