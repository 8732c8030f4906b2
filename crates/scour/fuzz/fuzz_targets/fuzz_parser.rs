//! Fuzz target for the delimited-text parser.
//!
//! Parsing must never panic, whatever the bytes, delimiter or row widths.

#![no_main]

use libfuzzer_sys::fuzz_target;
use scour::Parser;
use std::io::Write;

fuzz_target!(|data: &[u8]| {
    if data.len() > 100_000 {
        return;
    }

    if let Ok(text) = std::str::from_utf8(data) {
        let _ = Parser::new().parse_str(text);
    }

    // The file path also hashes the bytes and sniffs the delimiter.
    if let Ok(mut temp_file) = tempfile::NamedTempFile::new() {
        if temp_file.write_all(data).is_ok() {
            let _ = Parser::new().parse_file(temp_file.path());
        }
    }
});
