//! Visible window computation.
//!
//! Columns are walked from `home` accumulating widths until the running total
//! reaches the viewport width; rows likewise. A column whose right edge lands
//! exactly on the viewport edge is included. Frozen columns/rows occupy the
//! leading pixels and are emitted as their own ranges.

use log::trace;

use super::GridMetrics;
use crate::types::{Axis, CellRef, ColumnRef, GridRange, RangeCoordinate, RowRef, ViewportRectangle, Window};

/// Column and row spans making up a window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowSpans {
    /// Leading frozen columns, when frozen panes are included.
    pub frozen_columns: Option<GridRange<ColumnRef>>,
    /// Leading frozen rows, when frozen panes are included.
    pub frozen_rows: Option<GridRange<RowRef>>,
    /// Scrollable columns; `None` when frozen columns fill the width.
    pub columns: Option<GridRange<ColumnRef>>,
    /// Scrollable rows; `None` when frozen rows fill the height.
    pub rows: Option<GridRange<RowRef>>,
}

impl WindowSpans {
    /// Compute the spans visible in `rect`.
    pub fn compute(rect: &ViewportRectangle, include_frozen: bool, metrics: &impl GridMetrics) -> Self {
        let home = rect.home();
        if rect.is_degenerate() {
            return Self {
                frozen_columns: None,
                frozen_rows: None,
                columns: Some(GridRange::single(home.column())),
                rows: Some(GridRange::single(home.row())),
            };
        }

        let (column_band, row_band) = if include_frozen {
            (
                (metrics.frozen_column_count(), metrics.frozen_columns_width()),
                (metrics.frozen_row_count(), metrics.frozen_rows_height()),
            )
        } else {
            ((0, 0.0), (0, 0.0))
        };

        let (frozen_columns, columns) = axis_spans(home.column(), column_band, rect.width(), |column| {
            metrics.column_width(column)
        });
        let (frozen_rows, rows) = axis_spans(home.row(), row_band, rect.height(), |row| metrics.row_height(row));

        Self {
            frozen_columns,
            frozen_rows,
            columns,
            rows,
        }
    }

    /// True when the column is on screen, frozen or scrolled.
    pub fn shows_column(&self, column: ColumnRef) -> bool {
        contains(self.frozen_columns, column) || contains(self.columns, column)
    }

    /// True when the row is on screen, frozen or scrolled.
    pub fn shows_row(&self, row: RowRef) -> bool {
        contains(self.frozen_rows, row) || contains(self.rows, row)
    }

    /// Ranges in emission order: frozen columns, frozen rows, frozen corner,
    /// scroll region. Pieces with an empty side are skipped.
    pub fn to_window(&self) -> Window {
        let pieces = [
            (self.frozen_columns, self.rows),
            (self.columns, self.frozen_rows),
            (self.frozen_columns, self.frozen_rows),
            (self.columns, self.rows),
        ];
        Window::new(
            pieces
                .into_iter()
                .filter_map(|(columns, rows)| Some(GridRange::from_spans(columns?, rows?)))
                .collect(),
        )
    }
}

/// Compute the window for `rect`.
///
/// A degenerate rectangle (zero width or height) shows exactly the home cell.
/// When `include_frozen` is set and the sheet has frozen columns/rows, the
/// scroll region starts after them even if `home` lies inside the frozen band.
pub fn compute_window(rect: &ViewportRectangle, include_frozen: bool, metrics: &impl GridMetrics) -> Window {
    let window = WindowSpans::compute(rect, include_frozen, metrics).to_window();
    trace!(
        target: "xlviewport::window",
        "window {} for home={} {}x{} frozen={}",
        window,
        rect.home(),
        rect.width(),
        rect.height(),
        include_frozen
    );
    window
}

fn contains<T: RangeCoordinate>(span: Option<GridRange<T>>, value: T) -> bool {
    span.is_some_and(|span| span.contains(value))
}

/// Frozen and scrollable spans along one axis.
///
/// `frozen` is the frozen band's `(count, total size)`. A band that fills the
/// viewport is cut where it reaches the edge and leaves no scroll span.
fn axis_spans<A>(
    home: A,
    frozen: (u32, f64),
    available: f64,
    size_of: impl Fn(A) -> f64,
) -> (Option<GridRange<A>>, Option<GridRange<A>>)
where
    A: Axis + RangeCoordinate,
{
    let (frozen_count, frozen_size) = frozen;
    if frozen_count == 0 {
        return (None, Some(walk(home, available, &size_of)));
    }
    if frozen_size >= available {
        return (Some(walk(A::first(), available, &size_of)), None);
    }

    let band = GridRange::new(A::first(), A::from_index(frozen_count - 1));
    if frozen_count >= A::COUNT {
        return (Some(band), None);
    }
    let start = home.max(A::from_index(frozen_count));
    (Some(band), Some(walk(start, available - frozen_size, &size_of)))
}

/// Walk from `start` until at least `available` pixels are covered or the
/// grid edge is reached. Always includes `start`.
fn walk<A>(start: A, available: f64, size_of: &impl Fn(A) -> f64) -> GridRange<A>
where
    A: Axis + RangeCoordinate,
{
    let last = A::last();
    let mut end = start;
    let mut used = size_of(start);
    while used < available && end < last {
        end = end.add_saturating(1);
        used += size_of(end);
    }
    GridRange::new(start, end)
}

/// The cell at `home` clamped out of the frozen band, i.e. the first cell of
/// the scroll region.
pub fn scroll_origin(home: CellRef, include_frozen: bool, metrics: &impl GridMetrics) -> CellRef {
    if !include_frozen {
        return home;
    }
    CellRef::new(
        home.column().max(ColumnRef::new(metrics.frozen_column_count())),
        home.row().max(RowRef::new(metrics.frozen_row_count())),
    )
}
