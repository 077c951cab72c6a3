use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{CellRef, ColumnRef, GridRange, RowRef};
use crate::error::ViewportError;

/// The cell ranges visible to the client.
///
/// With frozen panes the ranges are disjoint pieces of the screen, ordered
/// frozen columns, frozen rows, frozen corner, scroll region. Membership is
/// tested against every range, never a bounding box.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Window(Vec<GridRange<CellRef>>);

impl Window {
    pub fn new(ranges: Vec<GridRange<CellRef>>) -> Self {
        Self(ranges)
    }

    pub fn ranges(&self) -> &[GridRange<CellRef>] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains_cell(&self, cell: CellRef) -> bool {
        self.0.iter().any(|range| range.contains(cell))
    }

    /// True when any range spans the column.
    pub fn contains_column(&self, column: ColumnRef) -> bool {
        self.0.iter().any(|range| range.columns().contains(column))
    }

    /// True when any range spans the row.
    pub fn contains_row(&self, row: RowRef) -> bool {
        self.0.iter().any(|range| range.rows().contains(row))
    }

    pub fn overlaps(&self, other: &GridRange<CellRef>) -> bool {
        self.0.iter().any(|range| range.overlaps(other))
    }

    /// Number of cells covered, counting overlaps twice.
    pub fn cell_count(&self) -> u64 {
        self.0
            .iter()
            .map(|range| u64::from(range.columns().count()) * u64::from(range.rows().count()))
            .sum()
    }
}

impl fmt::Display for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, range) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{range}")?;
        }
        Ok(())
    }
}

impl FromStr for Window {
    type Err = ViewportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(|part| part.parse().map_err(|_| ViewportError::invalid("window", s)))
            .collect::<Result<Vec<_>, _>>()
            .map(Self)
    }
}

impl From<Window> for String {
    fn from(value: Window) -> Self {
        value.to_string()
    }
}

impl TryFrom<String> for Window {
    type Error = ViewportError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::Axis;

    #[test]
    fn test_parse_and_display() {
        let window: Window = "A1:B2, C3:D4".parse().unwrap();
        assert_eq!(window.ranges().len(), 2);
        assert_eq!(window.to_string(), "A1:B2,C3:D4");
        assert!("".parse::<Window>().unwrap().is_empty());
        assert!("A1:B".parse::<Window>().is_err());
    }

    #[test]
    fn test_membership_checks_every_range() {
        let window: Window = "A1:B2,D4:E5".parse().unwrap();
        assert!(window.contains_cell("E5".parse().unwrap()));
        assert!(!window.contains_cell("C3".parse().unwrap()));
        assert!(window.contains_column(ColumnRef::new(4)));
        assert!(!window.contains_column(ColumnRef::new(2)));
        assert!(window.contains_row(RowRef::first()));
        assert_eq!(window.cell_count(), 8);
    }
}
