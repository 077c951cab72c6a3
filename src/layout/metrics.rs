//! Column width / row height lookup.
//!
//! The authoritative sizes live with the engine; [`GridMetrics`] is the seam
//! it plugs into. [`SheetLayout`] is a map-backed implementation used by the
//! CLI, the wasm surface and tests.

use std::collections::{HashMap, HashSet};

use crate::config::GridConfig;
use crate::error::{Result, ViewportError};
use crate::types::{Axis, ColumnRef, RowRef};

/// Default column width in pixels (Excel default ~64px at 100% zoom)
pub const DEFAULT_COL_WIDTH: f64 = 64.0;

/// Default row height in pixels (Excel default ~20px at 100% zoom)
pub const DEFAULT_ROW_HEIGHT: f64 = 20.0;

/// Pixel sizes and frozen pane counts for one sheet.
///
/// Implementations must be total and side-effect free for the duration of a
/// request.
pub trait GridMetrics {
    fn column_width(&self, column: ColumnRef) -> f64;

    fn row_height(&self, row: RowRef) -> f64;

    /// Number of leading columns frozen in place (0 = none).
    fn frozen_column_count(&self) -> u32;

    /// Number of leading rows frozen in place (0 = none).
    fn frozen_row_count(&self) -> u32;

    /// Total width of the frozen columns (0 if none are frozen).
    fn frozen_columns_width(&self) -> f64 {
        (0..self.frozen_column_count().min(ColumnRef::COUNT))
            .map(|i| self.column_width(ColumnRef::from_index(i)))
            .sum()
    }

    /// Total height of the frozen rows (0 if none are frozen).
    fn frozen_rows_height(&self) -> f64 {
        (0..self.frozen_row_count().min(RowRef::COUNT))
            .map(|i| self.row_height(RowRef::from_index(i)))
            .sum()
    }
}

impl<M: GridMetrics + ?Sized> GridMetrics for &M {
    fn column_width(&self, column: ColumnRef) -> f64 {
        (**self).column_width(column)
    }

    fn row_height(&self, row: RowRef) -> f64 {
        (**self).row_height(row)
    }

    fn frozen_column_count(&self) -> u32 {
        (**self).frozen_column_count()
    }

    fn frozen_row_count(&self) -> u32 {
        (**self).frozen_row_count()
    }
}

/// Sparse sheet layout: defaults plus per-column/row overrides.
#[derive(Debug, Clone)]
pub struct SheetLayout {
    pub default_column_width: f64,
    pub default_row_height: f64,
    /// Column widths that differ from the default
    pub column_widths: HashMap<ColumnRef, f64>,
    /// Row heights that differ from the default
    pub row_heights: HashMap<RowRef, f64>,
    /// Hidden columns render 0 wide
    pub hidden_columns: HashSet<ColumnRef>,
    /// Hidden rows render 0 high
    pub hidden_rows: HashSet<RowRef>,
    /// Number of frozen columns (0 = no frozen columns)
    pub frozen_columns: u32,
    /// Number of frozen rows (0 = no frozen rows)
    pub frozen_rows: u32,
}

impl Default for SheetLayout {
    fn default() -> Self {
        Self::new()
    }
}

impl SheetLayout {
    /// Layout with Excel default sizes and no frozen panes.
    pub fn new() -> Self {
        Self {
            default_column_width: DEFAULT_COL_WIDTH,
            default_row_height: DEFAULT_ROW_HEIGHT,
            column_widths: HashMap::new(),
            row_heights: HashMap::new(),
            hidden_columns: HashSet::new(),
            hidden_rows: HashSet::new(),
            frozen_columns: 0,
            frozen_rows: 0,
        }
    }

    /// Build a layout from configuration, rejecting negative or non-finite sizes.
    pub fn from_config(config: &GridConfig) -> Result<Self> {
        check_size("defaultColumnWidth", config.default_column_width)?;
        check_size("defaultRowHeight", config.default_row_height)?;
        for (column, width) in &config.column_widths {
            check_size(&format!("width of column {column}"), *width)?;
        }
        for (row, height) in &config.row_heights {
            check_size(&format!("height of row {row}"), *height)?;
        }

        Ok(Self {
            default_column_width: config.default_column_width,
            default_row_height: config.default_row_height,
            column_widths: config.column_widths.iter().map(|(k, v)| (*k, *v)).collect(),
            row_heights: config.row_heights.iter().map(|(k, v)| (*k, *v)).collect(),
            hidden_columns: config.hidden_columns.iter().copied().collect(),
            hidden_rows: config.hidden_rows.iter().copied().collect(),
            frozen_columns: config.frozen_columns.min(ColumnRef::COUNT),
            frozen_rows: config.frozen_rows.min(RowRef::COUNT),
        })
    }

    /// Layout with every column and row the same size.
    pub fn uniform(column_width: f64, row_height: f64) -> Self {
        Self {
            default_column_width: column_width,
            default_row_height: row_height,
            ..Self::new()
        }
    }

    #[must_use]
    pub fn with_frozen(mut self, frozen_columns: u32, frozen_rows: u32) -> Self {
        self.frozen_columns = frozen_columns.min(ColumnRef::COUNT);
        self.frozen_rows = frozen_rows.min(RowRef::COUNT);
        self
    }

    #[must_use]
    pub fn with_column_width(mut self, column: ColumnRef, width: f64) -> Self {
        self.column_widths.insert(column, width);
        self
    }

    #[must_use]
    pub fn with_row_height(mut self, row: RowRef, height: f64) -> Self {
        self.row_heights.insert(row, height);
        self
    }
}

impl GridMetrics for SheetLayout {
    fn column_width(&self, column: ColumnRef) -> f64 {
        if self.hidden_columns.contains(&column) {
            return 0.0;
        }
        self.column_widths
            .get(&column)
            .copied()
            .unwrap_or(self.default_column_width)
    }

    fn row_height(&self, row: RowRef) -> f64 {
        if self.hidden_rows.contains(&row) {
            return 0.0;
        }
        self.row_heights
            .get(&row)
            .copied()
            .unwrap_or(self.default_row_height)
    }

    fn frozen_column_count(&self) -> u32 {
        self.frozen_columns
    }

    fn frozen_row_count(&self) -> u32 {
        self.frozen_rows
    }
}

fn check_size(what: &str, value: f64) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ViewportError::Config(format!("{what} must be >= 0, got {value}")))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let layout = SheetLayout::new();
        assert_eq!(layout.column_width(ColumnRef::new(3)), DEFAULT_COL_WIDTH);
        assert_eq!(layout.row_height(RowRef::new(3)), DEFAULT_ROW_HEIGHT);
        assert_eq!(layout.frozen_columns_width(), 0.0);
    }

    #[test]
    fn test_overrides_and_hidden() {
        let mut layout = SheetLayout::new()
            .with_column_width(ColumnRef::new(1), 100.0)
            .with_row_height(RowRef::new(0), 30.0)
            .with_frozen(2, 1);
        layout.hidden_columns.insert(ColumnRef::new(0));

        assert_eq!(layout.column_width(ColumnRef::new(0)), 0.0);
        assert_eq!(layout.column_width(ColumnRef::new(1)), 100.0);
        assert_eq!(layout.frozen_columns_width(), 100.0);
        assert_eq!(layout.frozen_rows_height(), 30.0);
    }

    #[test]
    fn test_from_config_rejects_negative_sizes() {
        let mut config = GridConfig::default();
        config.column_widths.insert(ColumnRef::new(2), -5.0);
        let err = SheetLayout::from_config(&config).unwrap_err();
        assert_eq!(err.to_string(), "Invalid config: width of column C must be >= 0, got -5");
    }
}
