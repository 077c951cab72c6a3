//! Delta window filtering and patch scope tests

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

use serde_json::json;
use test_case::test_case;
use xlviewport::filter::{filter_by_window, require_closed, validate_delta_scope, validate_patch_scope};
use xlviewport::{ColumnRef, Delta, OpenRange, RowRef, Selection, SelectionKind, Window};

/// Cells B1:C3 with a width for B and C and a height for rows 1-3.
fn block_delta() -> Delta {
    serde_json::from_value(json!({
        "cells": {
            "B1": {"value": 1}, "B2": {"value": 2}, "B3": {"value": 3},
            "C1": {"value": 4}, "C2": {"value": 5}, "C3": {"value": 6}
        },
        "columnWidths": {"B": 80.0, "C": 90.0},
        "rowHeights": {"1": 20.0, "2": 25.0, "3": 30.0}
    }))
    .unwrap()
}

fn window(text: &str) -> Window {
    text.parse().unwrap()
}

fn keys<K: ToString, V>(map: &std::collections::BTreeMap<K, V>) -> Vec<String> {
    map.keys().map(ToString::to_string).collect()
}

#[test]
fn test_window_covering_delta_keeps_everything() {
    let delta = block_delta();
    assert_eq!(filter_by_window(&delta, &window("B1:C3")), delta);
}

#[test]
fn test_narrow_window_prunes_cells_and_sizes() {
    let filtered = filter_by_window(&block_delta(), &window("B1:B3"));
    assert_eq!(keys(&filtered.cells), ["B1", "B2", "B3"]);
    assert_eq!(keys(&filtered.column_widths), ["B"]);
    assert_eq!(keys(&filtered.row_heights), ["1", "2", "3"]);
}

#[test]
fn test_union_of_ranges_not_bounding_box() {
    // A frozen column plus a scrolled region; B2 sits between them.
    let filtered = filter_by_window(&block_delta(), &window("A1:A3,C1:C3"));
    assert_eq!(keys(&filtered.cells), ["C1", "C2", "C3"]);
    assert_eq!(keys(&filtered.column_widths), ["C"]);
}

#[test]
fn test_columns_rows_and_deletions() {
    let delta: Delta = serde_json::from_value(json!({
        "columns": {"A": {"hidden": false}, "K": {"hidden": true}},
        "rows": {"2": {}, "90": {}},
        "deletedCells": ["A1", "Z50"],
        "deletedColumns": ["B", "Q"],
        "deletedRows": ["3", "400"],
        "columnWidths": {"K": 10.0, "Q": 12.0},
        "rowHeights": {"90": 10.0},
        "columnCount": 26,
        "rowCount": 500
    }))
    .unwrap();

    let filtered = filter_by_window(&delta, &window("A1:D10"));
    assert_eq!(keys(&filtered.columns), ["A"]);
    assert_eq!(keys(&filtered.rows), ["2"]);
    assert_eq!(filtered.deleted_cells.iter().map(ToString::to_string).collect::<Vec<_>>(), ["A1"]);
    assert!(filtered.deleted_columns.contains(&ColumnRef::new(1)));
    assert!(!filtered.deleted_columns.contains(&ColumnRef::new(16)));
    assert_eq!(filtered.deleted_rows.len(), 1);
    assert!(filtered.deleted_rows.contains(&RowRef::new(2)));
    assert!(filtered.column_widths.is_empty());
    assert!(filtered.row_heights.is_empty());
    assert_eq!(filtered.column_count, Some(26));
    assert_eq!(filtered.row_count, Some(500));
}

#[test]
fn test_labels_kept_when_target_overlaps() {
    let delta: Delta = serde_json::from_value(json!({
        "labels": [
            {"label": "Near", "target": {"type": "cell-range", "value": "C3:Z99"}},
            {"label": "Far", "target": {"type": "cell", "value": "Z99"}},
            {"label": "Col", "target": {"type": "column", "value": "B"}}
        ],
        "deletedLabels": [
            {"label": "Gone", "target": {"type": "row", "value": "500"}}
        ]
    }))
    .unwrap();

    let filtered = filter_by_window(&delta, &window("A1:D5"));
    let names: Vec<&str> = filtered.labels.iter().map(|m| m.label.as_str()).collect();
    assert_eq!(names, ["Col", "Near"]);
    assert!(filtered.deleted_labels.is_empty());
}

#[test_case("B1:C3" ; "covering")]
#[test_case("B1:B3" ; "one column")]
#[test_case("C2" ; "one cell")]
#[test_case("A1:A1,C1:C3" ; "two pieces")]
#[test_case("X1:Z9" ; "nothing visible")]
fn test_filter_is_idempotent(text: &str) {
    let window = window(text);
    let once = filter_by_window(&block_delta(), &window);
    assert_eq!(filter_by_window(&once, &window), once);
}

#[test]
fn test_filter_keeps_viewport_and_window_fields() {
    let mut delta = block_delta();
    delta.window = window("A1:Z9");
    let filtered = filter_by_window(&delta, &window("B1"));
    assert_eq!(filtered.window, delta.window);
}

// ---------------------------------------------------------------------------
// Patch scope
// ---------------------------------------------------------------------------

#[test]
fn test_patch_outside_addressed_range() {
    let addressed = SelectionKind::CellRange.parse("A1:B2").unwrap();
    let patch = [Selection::Cell("Z99".parse().unwrap())];
    let err = validate_patch_scope(patch, &addressed).unwrap_err();
    assert_eq!(err.to_string(), "Patch includes cells Z99 outside A1:B2");
}

#[test]
fn test_patch_delta_scope() {
    let addressed = SelectionKind::Column.parse("B").unwrap();
    let mut delta = block_delta();
    delta.column_widths.clear();
    delta.row_heights.clear();
    let err = validate_delta_scope(&delta, &addressed).unwrap_err();
    assert_eq!(err.to_string(), "Patch includes cells C1, C2, C3 outside B");

    let inside = filter_by_window(&delta, &window("B1:B3"));
    assert!(validate_delta_scope(&inside, &addressed).is_ok());
}

#[test]
fn test_patch_rows_outside_row_range() {
    let addressed = SelectionKind::RowRange.parse("2:4").unwrap();
    let patch = [
        Selection::Row("3".parse().unwrap()),
        Selection::Row("9".parse().unwrap()),
        Selection::Row("1".parse().unwrap()),
    ];
    let err = validate_patch_scope(patch, &addressed).unwrap_err();
    assert_eq!(err.to_string(), "Patch includes rows 1, 9 outside 2:4");
}

#[test]
fn test_open_ranges_rejected() {
    let open: OpenRange<RowRef> = ":7".parse().unwrap();
    assert_eq!(
        require_closed(&open).unwrap_err().to_string(),
        "Range :7 must have both begin and end"
    );
    let open: OpenRange<ColumnRef> = "C:".parse().unwrap();
    assert_eq!(
        require_closed(&open).unwrap_err().to_string(),
        "Range C: must have both begin and end"
    );
}
