use std::cmp::Ordering;
use std::fmt;
use std::hash::Hash;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::cell_ref::{column_name, parse_cell_ref, parse_column_name, parse_row_number};
use crate::error::ViewportError;

/// Number of columns in a sheet (`A`..`XFD`).
pub const MAX_COLUMNS: u32 = 16_384;

/// Number of rows in a sheet (`1`..`1048576`).
pub const MAX_ROWS: u32 = 1_048_576;

/// A single grid axis: columns or rows.
///
/// Arithmetic saturates at `0` and `COUNT - 1`; moving left from column `A`
/// stays on column `A`.
pub trait Axis: Copy + Ord + Hash + fmt::Display + fmt::Debug {
    /// Number of positions on this axis.
    const COUNT: u32;

    /// 0-based index.
    fn index(self) -> u32;

    /// Build from a 0-based index, clamping to the grid edge.
    fn from_index(index: u32) -> Self;

    /// First position on the axis.
    fn first() -> Self {
        Self::from_index(0)
    }

    /// Last position on the axis.
    fn last() -> Self {
        Self::from_index(Self::COUNT - 1)
    }

    /// Move by `delta`, saturating at both grid edges.
    fn add_saturating(self, delta: i64) -> Self {
        let max = i64::from(Self::COUNT - 1);
        let target = i64::from(self.index()).saturating_add(delta).clamp(0, max);
        Self::from_index(u32::try_from(target).unwrap_or(Self::COUNT - 1))
    }

    /// True when the two positions are neighbours.
    fn is_adjacent(self, other: Self) -> bool {
        self.index().abs_diff(other.index()) == 1
    }
}

/// A 0-based column reference, rendered as letters.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct ColumnRef(u32);

impl ColumnRef {
    /// Column at `index`, clamped to `XFD`.
    pub const fn new(index: u32) -> Self {
        if index >= MAX_COLUMNS {
            Self(MAX_COLUMNS - 1)
        } else {
            Self(index)
        }
    }
}

impl Axis for ColumnRef {
    const COUNT: u32 = MAX_COLUMNS;

    fn index(self) -> u32 {
        self.0
    }

    fn from_index(index: u32) -> Self {
        Self::new(index)
    }
}

impl fmt::Display for ColumnRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&column_name(self.0))
    }
}

impl FromStr for ColumnRef {
    type Err = ViewportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_column_name(s.trim())
            .map(Self)
            .ok_or_else(|| ViewportError::invalid("column", s))
    }
}

/// A 0-based row reference, rendered 1-based.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct RowRef(u32);

impl RowRef {
    /// Row at `index`, clamped to the last row.
    pub const fn new(index: u32) -> Self {
        if index >= MAX_ROWS {
            Self(MAX_ROWS - 1)
        } else {
            Self(index)
        }
    }
}

impl Axis for RowRef {
    const COUNT: u32 = MAX_ROWS;

    fn index(self) -> u32 {
        self.0
    }

    fn from_index(index: u32) -> Self {
        Self::new(index)
    }
}

impl fmt::Display for RowRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", u64::from(self.0) + 1)
    }
}

impl FromStr for RowRef {
    type Err = ViewportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_row_number(s.trim())
            .map(Self)
            .ok_or_else(|| ViewportError::invalid("row", s))
    }
}

/// A single cell.
///
/// Ordering is row-major: `B1 < A2`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct CellRef {
    column: ColumnRef,
    row: RowRef,
}

impl CellRef {
    pub const fn new(column: ColumnRef, row: RowRef) -> Self {
        Self { column, row }
    }

    /// Cell from 0-based `(col, row)` indices, clamped to the grid.
    pub const fn at(col: u32, row: u32) -> Self {
        Self::new(ColumnRef::new(col), RowRef::new(row))
    }

    pub const fn column(self) -> ColumnRef {
        self.column
    }

    pub const fn row(self) -> RowRef {
        self.row
    }

    pub const fn with_column(self, column: ColumnRef) -> Self {
        Self::new(column, self.row)
    }

    pub const fn with_row(self, row: RowRef) -> Self {
        Self::new(self.column, row)
    }

    /// Move by `(columns, rows)`, saturating each axis at the grid edge.
    pub fn add_saturating(self, columns: i64, rows: i64) -> Self {
        Self::new(
            self.column.add_saturating(columns),
            self.row.add_saturating(rows),
        )
    }

    /// True when the cells share an edge.
    pub fn is_adjacent(self, other: Self) -> bool {
        (self.column == other.column && self.row.is_adjacent(other.row))
            || (self.row == other.row && self.column.is_adjacent(other.column))
    }
}

impl Ord for CellRef {
    fn cmp(&self, other: &Self) -> Ordering {
        self.row
            .cmp(&other.row)
            .then_with(|| self.column.cmp(&other.column))
    }
}

impl PartialOrd for CellRef {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for CellRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.column, self.row)
    }
}

impl FromStr for CellRef {
    type Err = ViewportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_cell_ref(s)
            .map(|(col, row)| Self::at(col, row))
            .ok_or_else(|| ViewportError::invalid("cell", s))
    }
}

macro_rules! string_serde {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for String {
                fn from(value: $ty) -> Self {
                    value.to_string()
                }
            }

            impl TryFrom<String> for $ty {
                type Error = ViewportError;

                fn try_from(value: String) -> Result<Self, Self::Error> {
                    value.parse()
                }
            }
        )*
    };
}

string_serde!(ColumnRef, RowRef, CellRef);

impl<T: RangeCoordinate> From<GridRange<T>> for String {
    fn from(value: GridRange<T>) -> Self {
        value.to_string()
    }
}

impl<T: RangeCoordinate> TryFrom<String> for GridRange<T> {
    type Error = ViewportError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// A coordinate that can bound a [`GridRange`].
///
/// `lower`/`upper` are component-wise, so a cell range built from any two
/// corners is normalized to its top-left and bottom-right cells.
pub trait RangeCoordinate: Copy + Eq + Hash + fmt::Display + FromStr<Err = ViewportError> {
    fn lower(self, other: Self) -> Self;

    fn upper(self, other: Self) -> Self;

    /// Component-wise `<=`.
    fn precedes(self, other: Self) -> bool;
}

impl RangeCoordinate for ColumnRef {
    fn lower(self, other: Self) -> Self {
        self.min(other)
    }

    fn upper(self, other: Self) -> Self {
        self.max(other)
    }

    fn precedes(self, other: Self) -> bool {
        self <= other
    }
}

impl RangeCoordinate for RowRef {
    fn lower(self, other: Self) -> Self {
        self.min(other)
    }

    fn upper(self, other: Self) -> Self {
        self.max(other)
    }

    fn precedes(self, other: Self) -> bool {
        self <= other
    }
}

impl RangeCoordinate for CellRef {
    fn lower(self, other: Self) -> Self {
        Self::new(self.column.min(other.column), self.row.min(other.row))
    }

    fn upper(self, other: Self) -> Self {
        Self::new(self.column.max(other.column), self.row.max(other.row))
    }

    fn precedes(self, other: Self) -> bool {
        self.column <= other.column && self.row <= other.row
    }
}

/// An inclusive range over columns, rows or cells. Always normalized so
/// `begin` precedes `end`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(
    into = "String",
    try_from = "String",
    bound = "T: RangeCoordinate"
)]
pub struct GridRange<T> {
    begin: T,
    end: T,
}

impl<T: RangeCoordinate> GridRange<T> {
    /// Range spanning both coordinates, in any order.
    pub fn new(a: T, b: T) -> Self {
        Self {
            begin: a.lower(b),
            end: a.upper(b),
        }
    }

    pub fn single(value: T) -> Self {
        Self {
            begin: value,
            end: value,
        }
    }

    pub fn begin(&self) -> T {
        self.begin
    }

    pub fn end(&self) -> T {
        self.end
    }

    /// A range whose bounds are equal.
    pub fn is_single(&self) -> bool {
        self.begin == self.end
    }

    pub fn contains(&self, value: T) -> bool {
        self.begin.precedes(value) && value.precedes(self.end)
    }

    /// True when `other` lies entirely inside this range.
    pub fn contains_range(&self, other: &Self) -> bool {
        self.contains(other.begin) && self.contains(other.end)
    }

    /// Overlap of the two ranges, if any.
    pub fn intersect(&self, other: &Self) -> Option<Self> {
        let begin = self.begin.upper(other.begin);
        let end = self.end.lower(other.end);
        begin.precedes(end).then_some(Self { begin, end })
    }

    pub fn overlaps(&self, other: &Self) -> bool {
        self.intersect(other).is_some()
    }
}

impl<T: Axis + RangeCoordinate> GridRange<T> {
    /// Number of columns or rows covered.
    pub fn count(&self) -> u32 {
        self.end.index() - self.begin.index() + 1
    }

    pub fn iter(&self) -> impl Iterator<Item = T> {
        (self.begin.index()..=self.end.index()).map(T::from_index)
    }
}

impl GridRange<CellRef> {
    pub fn columns(&self) -> GridRange<ColumnRef> {
        GridRange::new(self.begin.column(), self.end.column())
    }

    pub fn rows(&self) -> GridRange<RowRef> {
        GridRange::new(self.begin.row(), self.end.row())
    }

    /// Cell range covering the column and row spans.
    pub fn from_spans(columns: GridRange<ColumnRef>, rows: GridRange<RowRef>) -> Self {
        Self {
            begin: CellRef::new(columns.begin(), rows.begin()),
            end: CellRef::new(columns.end(), rows.end()),
        }
    }
}

impl<T: RangeCoordinate> fmt::Display for GridRange<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_single() {
            write!(f, "{}", self.begin)
        } else {
            write!(f, "{}:{}", self.begin, self.end)
        }
    }
}

impl<T: RangeCoordinate> FromStr for GridRange<T> {
    type Err = ViewportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().split_once(':') {
            Some((begin, end)) => Ok(Self::new(begin.parse()?, end.parse()?)),
            None => Ok(Self::single(s.parse()?)),
        }
    }
}

/// A column or row range whose bounds may be missing, e.g. `C:` or `:5`.
///
/// Range-based mutations (insert/delete) need both ends; see
/// [`crate::filter::require_closed`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct OpenRange<T> {
    pub begin: Option<T>,
    pub end: Option<T>,
}

impl<T: RangeCoordinate> OpenRange<T> {
    /// The closed range, when both bounds are present.
    pub fn to_closed(&self) -> Option<GridRange<T>> {
        Some(GridRange::new(self.begin?, self.end?))
    }
}

impl<T: RangeCoordinate> fmt::Display for OpenRange<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.begin, self.end) {
            (Some(begin), Some(end)) => write!(f, "{}", GridRange::new(begin, end)),
            (Some(begin), None) => write!(f, "{begin}:"),
            (None, Some(end)) => write!(f, ":{end}"),
            (None, None) => f.write_str(":"),
        }
    }
}

impl<T: RangeCoordinate> FromStr for OpenRange<T> {
    type Err = ViewportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bound = |text: &str| -> Result<Option<T>, ViewportError> {
            let text = text.trim();
            if text.is_empty() {
                Ok(None)
            } else {
                text.parse().map(Some)
            }
        };
        match s.trim().split_once(':') {
            Some((begin, end)) => Ok(Self {
                begin: bound(begin)?,
                end: bound(end)?,
            }),
            None => {
                let single = s.parse()?;
                Ok(Self {
                    begin: Some(single),
                    end: Some(single),
                })
            }
        }
    }
}
