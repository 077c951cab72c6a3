use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use super::{CellRef, ColumnRef, LabelMapping, RowRef, Selection, Viewport, Window};

/// Grid mutations returned by the engine, plus the viewport/window they were
/// shaped for.
///
/// Cell, column and row payloads are opaque here; this crate only filters and
/// augments a delta, it never produces content.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Delta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub viewport: Option<Viewport>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub cells: BTreeMap<CellRef, serde_json::Value>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub columns: BTreeMap<ColumnRef, serde_json::Value>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub rows: BTreeMap<RowRef, serde_json::Value>,
    #[serde(skip_serializing_if = "BTreeSet::is_empty")]
    pub labels: BTreeSet<LabelMapping>,
    #[serde(skip_serializing_if = "BTreeSet::is_empty")]
    pub deleted_cells: BTreeSet<CellRef>,
    #[serde(skip_serializing_if = "BTreeSet::is_empty")]
    pub deleted_columns: BTreeSet<ColumnRef>,
    #[serde(skip_serializing_if = "BTreeSet::is_empty")]
    pub deleted_rows: BTreeSet<RowRef>,
    /// Removed mappings, keyed by where they pointed.
    #[serde(skip_serializing_if = "BTreeSet::is_empty")]
    pub deleted_labels: BTreeSet<LabelMapping>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub column_widths: BTreeMap<ColumnRef, f64>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub row_heights: BTreeMap<RowRef, f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column_count: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub row_count: Option<u32>,
    #[serde(skip_serializing_if = "Window::is_empty")]
    pub window: Window,
}

impl Delta {
    /// Every cell, column and row the delta names, including deletions and
    /// size entries. Labels are names, not locations, and are not included.
    pub fn references(&self) -> impl Iterator<Item = Selection> + '_ {
        let cells = self
            .cells
            .keys()
            .chain(&self.deleted_cells)
            .copied()
            .map(Selection::Cell);
        let columns = self
            .columns
            .keys()
            .chain(&self.deleted_columns)
            .chain(self.column_widths.keys())
            .copied()
            .map(Selection::Column);
        let rows = self
            .rows
            .keys()
            .chain(&self.deleted_rows)
            .chain(self.row_heights.keys())
            .copied()
            .map(Selection::Row);
        cells.chain(columns).chain(rows)
    }

    /// True when nothing but metadata is present.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
            && self.columns.is_empty()
            && self.rows.is_empty()
            && self.labels.is_empty()
            && self.deleted_cells.is_empty()
            && self.deleted_columns.is_empty()
            && self.deleted_rows.is_empty()
            && self.deleted_labels.is_empty()
            && self.column_widths.is_empty()
            && self.row_heights.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_json_shape() {
        let delta: Delta = serde_json::from_str(
            r#"{
                "cells": {"B2": {"formula": "=1+2"}},
                "columnWidths": {"B": 80.0},
                "deletedRows": ["7"],
                "labels": [{"label": "Total", "target": {"type": "cell", "value": "B2"}}],
                "window": "A1:C3"
            }"#,
        )
        .unwrap();
        assert_eq!(delta.cells.len(), 1);
        assert_eq!(delta.window.to_string(), "A1:C3");
        assert_eq!(delta.references().count(), 3);

        let json = serde_json::to_value(&delta).unwrap();
        assert_eq!(json["columnWidths"]["B"], 80.0);
        assert!(json.get("rows").is_none());
    }

    #[test]
    fn test_default_is_empty() {
        assert!(Delta::default().is_empty());
    }
}
