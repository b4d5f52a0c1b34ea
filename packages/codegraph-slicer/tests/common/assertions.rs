//! Custom assertions for slice verification

use codegraph_slicer::{SliceRecord, SliceStore};

/// Assert that some line of `record` reads exactly `unit_string`
pub fn assert_has_line(record: &SliceRecord, unit_string: &str) {
    assert!(
        record.unit_strings().contains(&unit_string),
        "Expected line {unit_string:?}, got: {:#?}",
        record.unit_strings()
    );
}

/// Assert that no line of `record` mentions `fragment`
pub fn assert_no_line_containing(record: &SliceRecord, fragment: &str) {
    let offending: Vec<&str> = record
        .unit_strings()
        .into_iter()
        .filter(|line| line.contains(fragment))
        .collect();
    assert!(
        offending.is_empty(),
        "Expected no line containing {fragment:?}, got: {offending:#?}"
    );
}

/// Assert that line numbers strictly ascend
pub fn assert_ascending_lines(record: &SliceRecord) {
    let numbers: Vec<usize> = record.content.iter().map(|l| l.line_number).collect();
    assert!(
        numbers.windows(2).all(|w| w[0] < w[1]),
        "Line numbers not ascending: {numbers:?}"
    );
}

/// Assert the store holds exactly `expected` records
pub fn assert_record_count(store: &dyn SliceStore, expected: usize) {
    assert_eq!(
        store.len(),
        expected,
        "Expected {expected} records, got {}",
        store.len()
    );
}
