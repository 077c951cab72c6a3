//! Grid configuration loaded from JSON.
//!
//! ```json
//! {
//!   "defaultColumnWidth": 64,
//!   "defaultRowHeight": 20,
//!   "frozenColumns": 1,
//!   "frozenRows": 1,
//!   "columnWidths": { "B": 120 },
//!   "rowHeights": { "3": 40 },
//!   "hiddenColumns": ["D"]
//! }
//! ```

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::layout::{DEFAULT_COL_WIDTH, DEFAULT_ROW_HEIGHT};
use crate::types::{ColumnRef, RowRef};

/// Sheet sizing used to answer width/height lookups.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GridConfig {
    pub default_column_width: f64,
    pub default_row_height: f64,
    pub frozen_columns: u32,
    pub frozen_rows: u32,
    pub column_widths: BTreeMap<ColumnRef, f64>,
    pub row_heights: BTreeMap<RowRef, f64>,
    pub hidden_columns: BTreeSet<ColumnRef>,
    pub hidden_rows: BTreeSet<RowRef>,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            default_column_width: DEFAULT_COL_WIDTH,
            default_row_height: DEFAULT_ROW_HEIGHT,
            frozen_columns: 0,
            frozen_rows: 0,
            column_widths: BTreeMap::new(),
            row_heights: BTreeMap::new(),
            hidden_columns: BTreeSet::new(),
            hidden_rows: BTreeSet::new(),
        }
    }
}

impl GridConfig {
    /// Parse a JSON config; missing keys take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_json_is_default() {
        assert_eq!(GridConfig::from_json("{}").unwrap(), GridConfig::default());
    }

    #[test]
    fn test_parse_overrides() {
        let config = GridConfig::from_json(
            r#"{"frozenColumns": 2, "columnWidths": {"B": 120}, "hiddenRows": ["4"]}"#,
        )
        .unwrap();
        assert_eq!(config.frozen_columns, 2);
        assert_eq!(config.column_widths.get(&ColumnRef::new(1)), Some(&120.0));
        assert!(config.hidden_rows.contains(&RowRef::new(3)));
        assert_eq!(config.default_row_height, DEFAULT_ROW_HEIGHT);
    }

    #[test]
    fn test_bad_json_is_an_error() {
        let err = GridConfig::from_json(r#"{"columnWidths": {"1A": 3}}"#).unwrap_err();
        assert!(err.to_string().starts_with("JSON: "));
    }
}
