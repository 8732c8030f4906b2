//! Property-based tests for the cleaning engines.
//!
//! These tests use proptest to generate random tables and verify that
//! cleaning operations keep their invariants under all inputs.
//!
//! # Running Property Tests
//!
//! ```bash
//! cargo test -p scour --test property_tests
//!
//! # More cases (slower but more thorough)
//! PROPTEST_CASES=10000 cargo test -p scour --test property_tests
//! ```

use proptest::prelude::*;

use scour::{Augmentor, Cleaner, FillMethod, Keep, MissingStrategy, Table, Value};

// =============================================================================
// Test Strategies
// =============================================================================

/// Small integers so that duplicates actually occur.
fn int_cell() -> impl Strategy<Value = Value> {
    prop_oneof![
        4 => (0i64..4).prop_map(Value::Integer),
        1 => Just(Value::Missing),
    ]
}

fn float_cell() -> impl Strategy<Value = Value> {
    prop_oneof![
        4 => (-100.0f64..100.0).prop_map(Value::Float),
        1 => Just(Value::Missing),
    ]
}

fn label_cell() -> impl Strategy<Value = Value> {
    prop_oneof![
        4 => prop::sample::select(vec!["red", "green", "blue"]).prop_map(Value::from),
        1 => Just(Value::Missing),
    ]
}

/// Tables with an integer, a float and a label column.
fn mixed_table() -> impl Strategy<Value = Table> {
    prop::collection::vec((int_cell(), float_cell(), label_cell()), 1..40).prop_map(|rows| {
        let rows = rows.into_iter().map(|(a, b, c)| vec![a, b, c]).collect();
        Table::from_rows(&["count", "score", "color"], rows).unwrap()
    })
}

/// Numeric-only tables with at least a few rows.
fn numeric_table() -> impl Strategy<Value = Table> {
    prop::collection::vec((-50.0f64..50.0, -50.0f64..50.0), 3..60).prop_map(|rows| {
        let rows = rows
            .into_iter()
            .map(|(a, b)| vec![Value::Float(a), Value::Float(b)])
            .collect();
        Table::from_rows(&["x", "y"], rows).unwrap()
    })
}

// =============================================================================
// Table Transformer Properties
// =============================================================================

proptest! {
    #[test]
    fn drop_columns_removes_only_named(table in mixed_table(), pick in 0usize..3) {
        let name = table.column_names()[pick].to_string();
        let mut cleaner = Cleaner::new(&table);
        cleaner.drop_columns(&[name.as_str()]);

        let data = cleaner.cleaned_data();
        prop_assert_eq!(data.column_count(), 2);
        prop_assert_eq!(data.row_count(), table.row_count());
        prop_assert!(data.column(&name).is_none());
        for column in data.columns() {
            prop_assert_eq!(Some(column), table.column(column.name()));
        }
    }

    #[test]
    fn drop_unknown_column_is_noop(table in mixed_table()) {
        let mut cleaner = Cleaner::new(&table);
        cleaner.drop_columns(&["not_a_column"]);
        prop_assert_eq!(cleaner.cleaned_data(), &table);
        prop_assert!(cleaner.changes_log().is_empty());
    }

    #[test]
    fn remove_duplicates_is_idempotent(table in mixed_table()) {
        let mut cleaner = Cleaner::new(&table);
        cleaner.remove_duplicates(None, Keep::First).unwrap();
        let second = cleaner.remove_duplicates(None, Keep::First).unwrap();
        prop_assert_eq!(second, 0);
        prop_assert_eq!(cleaner.cleaned_data().duplicate_count(), 0);
    }

    #[test]
    fn auto_fill_leaves_no_missing(table in mixed_table()) {
        let mut cleaner = Cleaner::new(&table);
        cleaner
            .handle_missing(&MissingStrategy::Fill(FillMethod::Auto), None)
            .unwrap();

        for (before, after) in table.columns().iter().zip(cleaner.cleaned_data().columns()) {
            if before.missing_count() < before.len() {
                prop_assert_eq!(after.missing_count(), 0);
            }
        }
    }

    #[test]
    fn original_table_never_changes(table in mixed_table()) {
        let snapshot = table.clone();
        let mut engine = Augmentor::new(&table);
        engine.cleaner_mut().drop_columns(&["score"]);
        engine.cleaner_mut().handle_missing(&MissingStrategy::Drop, None).unwrap();
        prop_assert_eq!(&table, &snapshot);
    }
}

// =============================================================================
// Statistical Augmentor Properties
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn outlier_detection_is_deterministic(table in numeric_table()) {
        let a = Augmentor::new(&table).detect_outliers(None, 0.1).unwrap();
        let b = Augmentor::new(&table).detect_outliers(None, 0.1).unwrap();
        prop_assert_eq!(a.flags, b.flags);
    }

    #[test]
    fn outlier_flags_stay_near_contamination(table in numeric_table()) {
        let n = table.row_count();
        let mask = Augmentor::new(&table).detect_outliers(None, 0.1).unwrap();
        prop_assert_eq!(mask.flags.len(), n);
        // Strictly above the 90th percentile.
        prop_assert!(mask.count() <= (n as f64 * 0.1).ceil() as usize);
    }

    #[test]
    fn imputation_keeps_present_values_and_label_domain(table in mixed_table()) {
        let mut engine = Augmentor::new(&table);
        engine.smart_impute(None).unwrap();
        let data = engine.cleaned_data();

        for (before, after) in table.columns().iter().zip(data.columns()) {
            for (b, a) in before.values().iter().zip(after.values()) {
                if !b.is_missing() {
                    prop_assert_eq!(b.as_f64(), a.as_f64());
                    prop_assert_eq!(b.as_label(), a.as_label());
                }
            }
        }

        let domain: Vec<&str> = table
            .column("color")
            .unwrap()
            .values()
            .iter()
            .filter_map(Value::as_label)
            .collect();
        for value in data.column("color").unwrap().values() {
            if let Some(label) = value.as_label() {
                prop_assert!(domain.contains(&label));
            }
        }
    }
}
