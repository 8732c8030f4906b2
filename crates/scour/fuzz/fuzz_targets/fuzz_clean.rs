//! Fuzz target for the cleaning pipeline.
//!
//! Any table the parser accepts must survive every cleaning step without a
//! panic, and the original table must stay untouched.

#![no_main]

use libfuzzer_sys::fuzz_target;
use scour::{Augmentor, FillMethod, Keep, MissingStrategy, Parser};

fuzz_target!(|data: &[u8]| {
    if data.len() > 20_000 {
        return;
    }

    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(table) = Parser::new().parse_str(text) else {
        return;
    };
    let snapshot = table.clone();

    let mut engine = Augmentor::new(&table);
    let _ = engine.detect_outliers(None, 0.1);
    let _ = engine.smart_impute(None);
    let _ = engine.suggest_cleaning();
    let cleaner = engine.cleaner_mut();
    let _ = cleaner.handle_missing(&MissingStrategy::Fill(FillMethod::Auto), None);
    let _ = cleaner.remove_duplicates(None, Keep::First);

    assert_eq!(table, snapshot);
});
