//! Window filtering and patch scope checks for engine deltas.

use std::collections::BTreeSet;

use crate::error::{Result, ViewportError};
use crate::types::{
    ColumnRef, Delta, GridRange, LabelMapping, OpenRange, RangeCoordinate, RowRef, Selection,
    SelectionKind, Window,
};

/// Drop every entry of `delta` that is not visible in `window`.
///
/// Cells must lie inside one of the window's ranges; columns and rows must be
/// spanned by one; labels are kept when their target overlaps the window.
/// Column widths and row heights survive only for columns/rows still named by
/// a remaining cell, column, row or deletion. Viewport, window and counts are
/// carried over untouched.
pub fn filter_by_window(delta: &Delta, window: &Window) -> Delta {
    let visible_label = |mapping: &&LabelMapping| window.overlaps(&mapping.target.extent());

    let cells = delta
        .cells
        .iter()
        .filter(|(cell, _)| window.contains_cell(**cell))
        .map(|(cell, value)| (*cell, value.clone()))
        .collect();
    let columns = delta
        .columns
        .iter()
        .filter(|(column, _)| window.contains_column(**column))
        .map(|(column, value)| (*column, value.clone()))
        .collect();
    let rows = delta
        .rows
        .iter()
        .filter(|(row, _)| window.contains_row(**row))
        .map(|(row, value)| (*row, value.clone()))
        .collect();

    let mut filtered = Delta {
        viewport: delta.viewport.clone(),
        cells,
        columns,
        rows,
        labels: delta.labels.iter().filter(visible_label).cloned().collect(),
        deleted_cells: delta
            .deleted_cells
            .iter()
            .copied()
            .filter(|cell| window.contains_cell(*cell))
            .collect(),
        deleted_columns: delta
            .deleted_columns
            .iter()
            .copied()
            .filter(|column| window.contains_column(*column))
            .collect(),
        deleted_rows: delta
            .deleted_rows
            .iter()
            .copied()
            .filter(|row| window.contains_row(*row))
            .collect(),
        deleted_labels: delta.deleted_labels.iter().filter(visible_label).cloned().collect(),
        column_widths: Default::default(),
        row_heights: Default::default(),
        column_count: delta.column_count,
        row_count: delta.row_count,
        window: delta.window.clone(),
    };

    let (referenced_columns, referenced_rows) = referenced_lines(&filtered);
    filtered.column_widths = delta
        .column_widths
        .iter()
        .filter(|(column, _)| referenced_columns.contains(*column))
        .map(|(column, width)| (*column, *width))
        .collect();
    filtered.row_heights = delta
        .row_heights
        .iter()
        .filter(|(row, _)| referenced_rows.contains(*row))
        .map(|(row, height)| (*row, *height))
        .collect();
    filtered
}

/// Columns and rows named by the content of `delta`, size maps excluded.
fn referenced_lines(delta: &Delta) -> (BTreeSet<ColumnRef>, BTreeSet<RowRef>) {
    let cells = delta.cells.keys().chain(&delta.deleted_cells);
    let columns = cells
        .clone()
        .map(|cell| cell.column())
        .chain(delta.columns.keys().copied())
        .chain(delta.deleted_columns.iter().copied())
        .collect();
    let rows = cells
        .map(|cell| cell.row())
        .chain(delta.rows.keys().copied())
        .chain(delta.deleted_rows.iter().copied())
        .collect();
    (columns, rows)
}

/// Check that every reference in a patch body lies inside the selection the
/// patch was addressed to.
///
/// The error names the offending references of the first offending kind,
/// sorted: `Patch includes cells Z99 outside A1:B2`.
pub fn validate_patch_scope(
    patch: impl IntoIterator<Item = Selection>,
    addressed: &Selection,
) -> Result<()> {
    let outside: Vec<Selection> = patch
        .into_iter()
        .filter(|reference| !addressed.covers(reference))
        .collect();
    let Some(first) = outside.first() else {
        return Ok(());
    };

    let noun = plural(first.kind());
    let offenders: BTreeSet<Selection> = outside
        .iter()
        .copied()
        .filter(|reference| plural(reference.kind()) == noun)
        .collect();
    let names: Vec<String> = offenders.iter().map(ToString::to_string).collect();
    Err(ViewportError::Scope(format!(
        "Patch includes {noun} {} outside {addressed}",
        names.join(", ")
    )))
}

/// [`validate_patch_scope`] over everything a patch delta names.
pub fn validate_delta_scope(patch: &Delta, addressed: &Selection) -> Result<()> {
    validate_patch_scope(patch.references(), addressed)
}

fn plural(kind: SelectionKind) -> &'static str {
    match kind {
        SelectionKind::Cell | SelectionKind::CellRange => "cells",
        SelectionKind::Column | SelectionKind::ColumnRange => "columns",
        SelectionKind::Row | SelectionKind::RowRange => "rows",
    }
}

/// The closed form of `range`, for mutations that need both ends.
pub fn require_closed<T: RangeCoordinate>(range: &OpenRange<T>) -> Result<GridRange<T>> {
    range
        .to_closed()
        .ok_or_else(|| ViewportError::Scope(format!("Range {range} must have both begin and end")))
}
