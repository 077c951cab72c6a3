use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{Axis, CellRef, ColumnRef, GridRange, RowRef};
use crate::error::{Result, ViewportError};

/// The variant of a [`Selection`], as named by the `selectionType` query key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SelectionKind {
    /// Standard single cell selection (default)
    #[default]
    Cell,
    CellRange,
    Column,
    ColumnRange,
    Row,
    RowRange,
}

impl SelectionKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Cell => "cell",
            Self::CellRange => "cell-range",
            Self::Column => "column",
            Self::ColumnRange => "column-range",
            Self::Row => "row",
            Self::RowRange => "row-range",
        }
    }

    /// Anchors that may be paired with this kind.
    pub const fn legal_anchors(self) -> &'static [Anchor] {
        match self {
            Self::Cell | Self::Column | Self::Row => &[Anchor::None],
            Self::CellRange => &[
                Anchor::TopLeft,
                Anchor::TopRight,
                Anchor::BottomLeft,
                Anchor::BottomRight,
            ],
            Self::ColumnRange => &[Anchor::Left, Anchor::Right],
            Self::RowRange => &[Anchor::Top, Anchor::Bottom],
        }
    }

    /// Canonical initial anchor.
    pub const fn default_anchor(self) -> Anchor {
        match self {
            Self::Cell | Self::Column | Self::Row => Anchor::None,
            Self::CellRange => Anchor::TopLeft,
            Self::ColumnRange => Anchor::Left,
            Self::RowRange => Anchor::Top,
        }
    }

    pub fn is_legal(self, anchor: Anchor) -> bool {
        self.legal_anchors().contains(&anchor)
    }

    /// Parse `text` as a selection of this kind.
    pub fn parse(self, text: &str) -> Result<Selection> {
        let invalid = || ViewportError::invalid(self, text);
        Ok(match self {
            Self::Cell => Selection::Cell(text.parse().map_err(|_| invalid())?),
            Self::CellRange => Selection::CellRange(text.parse().map_err(|_| invalid())?),
            Self::Column => Selection::Column(text.parse().map_err(|_| invalid())?),
            Self::ColumnRange => Selection::ColumnRange(text.parse().map_err(|_| invalid())?),
            Self::Row => Selection::Row(text.parse().map_err(|_| invalid())?),
            Self::RowRange => Selection::RowRange(text.parse().map_err(|_| invalid())?),
        })
    }
}

impl fmt::Display for SelectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SelectionKind {
    type Err = ViewportError;

    fn from_str(s: &str) -> Result<Self> {
        Ok(match s.trim() {
            "cell" => Self::Cell,
            "cell-range" => Self::CellRange,
            "column" => Self::Column,
            "column-range" => Self::ColumnRange,
            "row" => Self::Row,
            "row-range" => Self::RowRange,
            _ => return Err(ViewportError::invalid("selectionType", s)),
        })
    }
}

/// A cell, column or row selection, or a range of one of those.
///
/// A range whose bounds are equal is kept as a range; collapsing to the
/// single-element variant is decided by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "kebab-case")]
pub enum Selection {
    Cell(CellRef),
    CellRange(GridRange<CellRef>),
    Column(ColumnRef),
    ColumnRange(GridRange<ColumnRef>),
    Row(RowRef),
    RowRange(GridRange<RowRef>),
}

impl Selection {
    pub const fn kind(&self) -> SelectionKind {
        match self {
            Self::Cell(_) => SelectionKind::Cell,
            Self::CellRange(_) => SelectionKind::CellRange,
            Self::Column(_) => SelectionKind::Column,
            Self::ColumnRange(_) => SelectionKind::ColumnRange,
            Self::Row(_) => SelectionKind::Row,
            Self::RowRange(_) => SelectionKind::RowRange,
        }
    }

    /// Cells covered by the selection; columns and rows span the whole grid
    /// on their other axis.
    pub fn extent(&self) -> GridRange<CellRef> {
        let all_rows = GridRange::new(RowRef::first(), RowRef::last());
        let all_columns = GridRange::new(ColumnRef::first(), ColumnRef::last());
        match *self {
            Self::Cell(cell) => GridRange::single(cell),
            Self::CellRange(range) => range,
            Self::Column(column) => GridRange::from_spans(GridRange::single(column), all_rows),
            Self::ColumnRange(columns) => GridRange::from_spans(columns, all_rows),
            Self::Row(row) => GridRange::from_spans(all_columns, GridRange::single(row)),
            Self::RowRange(rows) => GridRange::from_spans(all_columns, rows),
        }
    }

    /// True when every cell of `other` is covered by this selection.
    pub fn covers(&self, other: &Self) -> bool {
        self.extent().contains_range(&other.extent())
    }

    pub fn overlaps(&self, range: &GridRange<CellRef>) -> bool {
        self.extent().overlaps(range)
    }

    /// Reduce a range with equal bounds to its single-element variant.
    pub fn collapsed(self) -> Self {
        match self {
            Self::CellRange(range) if range.is_single() => Self::Cell(range.begin()),
            Self::ColumnRange(range) if range.is_single() => Self::Column(range.begin()),
            Self::RowRange(range) if range.is_single() => Self::Row(range.begin()),
            other => other,
        }
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cell(cell) => write!(f, "{cell}"),
            Self::CellRange(range) => write!(f, "{range}"),
            Self::Column(column) => write!(f, "{column}"),
            Self::ColumnRange(range) => write!(f, "{range}"),
            Self::Row(row) => write!(f, "{row}"),
            Self::RowRange(range) => write!(f, "{range}"),
        }
    }
}

/// Fixed corner or edge of a range selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Anchor {
    /// No anchor; used by single-element selections.
    #[default]
    None,
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
    Left,
    Right,
    Top,
    Bottom,
}

/// Which end of an axis an anchor sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    /// Left or top.
    Low,
    /// Right or bottom.
    High,
}

impl Anchor {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::TopLeft => "top-left",
            Self::TopRight => "top-right",
            Self::BottomLeft => "bottom-left",
            Self::BottomRight => "bottom-right",
            Self::Left => "left",
            Self::Right => "right",
            Self::Top => "top",
            Self::Bottom => "bottom",
        }
    }

    /// Edge on the column axis, if the anchor constrains it.
    pub const fn horizontal(self) -> Option<Edge> {
        match self {
            Self::TopLeft | Self::BottomLeft | Self::Left => Some(Edge::Low),
            Self::TopRight | Self::BottomRight | Self::Right => Some(Edge::High),
            Self::None | Self::Top | Self::Bottom => None,
        }
    }

    /// Edge on the row axis, if the anchor constrains it.
    pub const fn vertical(self) -> Option<Edge> {
        match self {
            Self::TopLeft | Self::TopRight | Self::Top => Some(Edge::Low),
            Self::BottomLeft | Self::BottomRight | Self::Bottom => Some(Edge::High),
            Self::None | Self::Left | Self::Right => None,
        }
    }

    /// Anchor constraining the given edges.
    pub const fn from_edges(horizontal: Option<Edge>, vertical: Option<Edge>) -> Self {
        match (horizontal, vertical) {
            (Some(Edge::Low), Some(Edge::Low)) => Self::TopLeft,
            (Some(Edge::High), Some(Edge::Low)) => Self::TopRight,
            (Some(Edge::Low), Some(Edge::High)) => Self::BottomLeft,
            (Some(Edge::High), Some(Edge::High)) => Self::BottomRight,
            (Some(Edge::Low), None) => Self::Left,
            (Some(Edge::High), None) => Self::Right,
            (None, Some(Edge::Low)) => Self::Top,
            (None, Some(Edge::High)) => Self::Bottom,
            (None, None) => Self::None,
        }
    }
}

impl fmt::Display for Anchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Anchor {
    type Err = ViewportError;

    fn from_str(s: &str) -> Result<Self> {
        Ok(match s.trim() {
            "" | "none" => Self::None,
            "top-left" => Self::TopLeft,
            "top-right" => Self::TopRight,
            "bottom-left" => Self::BottomLeft,
            "bottom-right" => Self::BottomRight,
            "left" => Self::Left,
            "right" => Self::Right,
            "top" => Self::Top,
            "bottom" => Self::Bottom,
            _ => return Err(ViewportError::invalid("selectionAnchor", s)),
        })
    }
}

/// A selection paired with an anchor legal for its kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawAnchoredSelection")]
pub struct AnchoredSelection {
    selection: Selection,
    anchor: Anchor,
}

#[derive(Deserialize)]
struct RawAnchoredSelection {
    selection: Selection,
    #[serde(default)]
    anchor: Anchor,
}

impl TryFrom<RawAnchoredSelection> for AnchoredSelection {
    type Error = ViewportError;

    fn try_from(raw: RawAnchoredSelection) -> Result<Self> {
        Self::with_anchor_or_default(raw.selection, raw.anchor)
    }
}

impl AnchoredSelection {
    /// Pair `selection` with `anchor`, rejecting anchors illegal for its kind.
    pub fn new(selection: Selection, anchor: Anchor) -> Result<Self> {
        let kind = selection.kind();
        if !kind.is_legal(anchor) {
            return Err(ViewportError::InvalidAnchor { anchor, kind });
        }
        Ok(Self { selection, anchor })
    }

    /// Like [`Self::new`], but [`Anchor::None`] stands for the kind's
    /// default anchor.
    pub fn with_anchor_or_default(selection: Selection, anchor: Anchor) -> Result<Self> {
        match anchor {
            Anchor::None => Ok(Self::with_default_anchor(selection)),
            anchor => Self::new(selection, anchor),
        }
    }

    pub fn with_default_anchor(selection: Selection) -> Self {
        Self {
            anchor: selection.kind().default_anchor(),
            selection,
        }
    }

    /// Pair without validation, for callers that derive the anchor from the
    /// selection's own shape.
    pub(crate) fn from_parts(selection: Selection, anchor: Anchor) -> Self {
        debug_assert!(selection.kind().is_legal(anchor));
        Self { selection, anchor }
    }

    pub const fn selection(&self) -> Selection {
        self.selection
    }

    pub const fn anchor(&self) -> Anchor {
        self.anchor
    }
}

impl From<Selection> for AnchoredSelection {
    fn from(selection: Selection) -> Self {
        Self::with_default_anchor(selection)
    }
}

impl fmt::Display for AnchoredSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.anchor {
            Anchor::None => write!(f, "{}", self.selection),
            anchor => write!(f, "{} {anchor}", self.selection),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_each_kind() {
        assert_eq!(
            SelectionKind::Cell.parse("B2").unwrap(),
            Selection::Cell("B2".parse().unwrap())
        );
        assert_eq!(SelectionKind::CellRange.parse("C3:A1").unwrap().to_string(), "A1:C3");
        assert_eq!(SelectionKind::ColumnRange.parse("B:C").unwrap().to_string(), "B:C");
        assert_eq!(SelectionKind::RowRange.parse("4:2").unwrap().to_string(), "2:4");
        assert_eq!(SelectionKind::Row.parse("7").unwrap().to_string(), "7");
    }

    #[test]
    fn test_parse_error_names_kind() {
        let err = SelectionKind::Column.parse("12").unwrap_err();
        assert_eq!(err.to_string(), "Invalid column \"12\"");
        let err = SelectionKind::CellRange.parse("A1:").unwrap_err();
        assert_eq!(err.to_string(), "Invalid cell-range \"A1:\"");
    }

    #[test]
    fn test_anchor_legality() {
        let columns = SelectionKind::ColumnRange.parse("B:C").unwrap();
        assert!(AnchoredSelection::new(columns, Anchor::Right).is_ok());
        let err = AnchoredSelection::new(columns, Anchor::Top).unwrap_err();
        assert_eq!(err.to_string(), "Invalid anchor top for column-range");

        let cell = SelectionKind::Cell.parse("A1").unwrap();
        assert!(AnchoredSelection::new(cell, Anchor::TopLeft).is_err());
        assert!(AnchoredSelection::new(cell, Anchor::None).is_ok());
    }

    #[test]
    fn test_default_anchor() {
        let range = SelectionKind::CellRange.parse("A1:B2").unwrap();
        assert_eq!(AnchoredSelection::from(range).anchor(), Anchor::TopLeft);
        let rows = SelectionKind::RowRange.parse("1:2").unwrap();
        assert_eq!(AnchoredSelection::from(rows).anchor(), Anchor::Top);
    }

    #[test]
    fn test_anchor_edges_round_trip() {
        for anchor in [
            Anchor::None,
            Anchor::TopLeft,
            Anchor::TopRight,
            Anchor::BottomLeft,
            Anchor::BottomRight,
            Anchor::Left,
            Anchor::Right,
            Anchor::Top,
            Anchor::Bottom,
        ] {
            assert_eq!(Anchor::from_edges(anchor.horizontal(), anchor.vertical()), anchor);
            assert_eq!(anchor.as_str().parse::<Anchor>().unwrap(), anchor);
        }
    }

    #[test]
    fn test_range_is_not_collapsed_implicitly() {
        let range = SelectionKind::CellRange.parse("B2:B2").unwrap();
        assert_eq!(range.kind(), SelectionKind::CellRange);
        assert_eq!(range.collapsed().kind(), SelectionKind::Cell);
    }

    #[test]
    fn test_covers() {
        let target = SelectionKind::CellRange.parse("A1:B2").unwrap();
        assert!(target.covers(&SelectionKind::Cell.parse("B2").unwrap()));
        assert!(!target.covers(&SelectionKind::Cell.parse("Z99").unwrap()));
        let column = SelectionKind::Column.parse("B").unwrap();
        assert!(column.covers(&SelectionKind::Cell.parse("B77").unwrap()));
        assert!(!target.covers(&column));
    }

    #[test]
    fn test_deserialize_validates_anchor() {
        let ok: AnchoredSelection = serde_json::from_str(
            r#"{"selection":{"type":"cell-range","value":"B2:C2"},"anchor":"top-right"}"#,
        )
        .unwrap();
        assert_eq!(ok.anchor(), Anchor::TopRight);

        let bad = serde_json::from_str::<AnchoredSelection>(
            r#"{"selection":{"type":"row","value":"3"},"anchor":"left"}"#,
        );
        assert!(bad.is_err());
    }

    #[test]
    fn test_deserialize_none_anchor_takes_default() {
        let columns: AnchoredSelection = serde_json::from_str(
            r#"{"selection":{"type":"column-range","value":"B:C"},"anchor":"none"}"#,
        )
        .unwrap();
        assert_eq!(columns.anchor(), Anchor::Left);

        let missing: AnchoredSelection =
            serde_json::from_str(r#"{"selection":{"type":"row-range","value":"2:4"}}"#).unwrap();
        assert_eq!(missing.anchor(), Anchor::Top);

        let cell: AnchoredSelection =
            serde_json::from_str(r#"{"selection":{"type":"cell","value":"B2"},"anchor":"none"}"#).unwrap();
        assert_eq!(cell.anchor(), Anchor::None);
    }
}
