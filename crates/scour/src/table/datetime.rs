//! Datetime parsing with format inference.

use chrono::{NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;

/// A recognizable layout and the chrono formats that can read it.
struct DateLayout {
    pattern: Regex,
    formats: &'static [&'static str],
    date_only: bool,
}

// Patterns are checked in order; the first layout whose regex matches decides
// which formats are tried.
static LAYOUTS: Lazy<Vec<DateLayout>> = Lazy::new(|| {
    let layout = |pattern: &str, formats: &'static [&'static str], date_only: bool| DateLayout {
        pattern: Regex::new(pattern).unwrap(),
        formats,
        date_only,
    };

    vec![
        // ISO datetime
        layout(
            r"^\d{4}-\d{2}-\d{2}[T ]\d{2}:\d{2}(:\d{2}(\.\d+)?)?$",
            &[
                "%Y-%m-%dT%H:%M:%S%.f",
                "%Y-%m-%d %H:%M:%S%.f",
                "%Y-%m-%dT%H:%M",
                "%Y-%m-%d %H:%M",
            ],
            false,
        ),
        // ISO date
        layout(r"^\d{4}-\d{1,2}-\d{1,2}$", &["%Y-%m-%d"], true),
        // Alt ISO
        layout(r"^\d{4}/\d{1,2}/\d{1,2}$", &["%Y/%m/%d"], true),
        // US date, month first
        layout(
            r"^\d{1,2}/\d{1,2}/\d{4}( \d{1,2}:\d{2}(:\d{2})?)?$",
            &["%m/%d/%Y %H:%M:%S", "%m/%d/%Y %H:%M", "%m/%d/%Y"],
            false,
        ),
        // European date
        layout(r"^\d{1,2}[-.]\d{1,2}[-.]\d{4}$", &["%d-%m-%Y", "%d.%m.%Y"], true),
        // Named months: "Jan 5, 2023", "5 Jan 2023", "January 5, 2023"
        layout(
            r"^[A-Za-z]{3,9}\.? \d{1,2},? \d{4}$",
            &["%b %d, %Y", "%b %d %Y", "%B %d, %Y", "%B %d %Y"],
            true,
        ),
        layout(r"^\d{1,2} [A-Za-z]{3,9},? \d{4}$", &["%d %b %Y", "%d %B %Y"], true),
    ]
});

/// Parse a datetime, inferring its layout from the text.
///
/// Date-only values are placed at midnight.
pub fn parse_datetime(text: &str) -> Option<NaiveDateTime> {
    let trimmed = text.trim();
    let layout = LAYOUTS.iter().find(|l| l.pattern.is_match(trimmed))?;

    layout.formats.iter().find_map(|fmt| {
        if layout.date_only {
            NaiveDate::parse_from_str(trimmed, fmt)
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        } else if fmt.contains("%H") {
            NaiveDateTime::parse_from_str(trimmed, fmt).ok()
        } else {
            NaiveDate::parse_from_str(trimmed, fmt)
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        }
    })
}

/// Render a datetime the way the table prints it.
pub fn format_datetime(value: &NaiveDateTime) -> String {
    value.format("%Y-%m-%d %H:%M:%S").to_string()
}
