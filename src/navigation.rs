//! Navigation interpreter.
//!
//! Applies `navigation` commands to a selection and home cell. Everything here
//! is a pure function of its inputs; [`extend`] is the anchor-relative
//! extension rule on its own so it can be exercised without a viewport.
//!
//! A range has a fixed corner (its anchor) and a moving corner opposite it.
//! Extending moves the moving corner; when it passes the fixed corner the
//! anchor flips to the other side, and when the range shrinks to one element
//! it collapses to a cell/column/row with no anchor.

use log::debug;

use crate::layout::{scroll_origin, GridMetrics};
use crate::types::{
    Anchor, AnchoredSelection, Axis, CellRef, ColumnRef, Direction, Edge, GridRange,
    NavigationCommand, RangeCoordinate, RowRef, Selection, Viewport, ViewportRectangle,
};

/// Home cell and selection after a run of commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavigationState {
    pub home: CellRef,
    pub selection: Option<AnchoredSelection>,
}

/// Apply `viewport.navigations` and return the viewport with its home and
/// selection updated and the navigation list consumed.
pub fn navigate(viewport: Viewport, metrics: &impl GridMetrics) -> Viewport {
    let Viewport {
        rectangle,
        include_frozen_columns_rows,
        selection,
        mut navigations,
    } = viewport;
    let state = apply_navigations(
        &navigations,
        NavigationState {
            home: rectangle.home(),
            selection,
        },
        &rectangle,
        include_frozen_columns_rows,
        metrics,
    );
    navigations.clear();
    Viewport {
        rectangle: rectangle.with_home(state.home),
        include_frozen_columns_rows,
        selection: state.selection,
        navigations,
    }
}

/// Fold `commands` left to right over `state`.
///
/// `rect` supplies the viewport size; its home is ignored in favour of
/// `state.home`.
pub fn apply_navigations(
    commands: &[NavigationCommand],
    state: NavigationState,
    rect: &ViewportRectangle,
    include_frozen: bool,
    metrics: &impl GridMetrics,
) -> NavigationState {
    let navigator = Navigator {
        rect,
        include_frozen,
        metrics,
    };
    commands.iter().fold(state, |state, command| {
        let next = navigator.apply(*command, state);
        debug!(
            target: "xlviewport::navigation",
            "{command}: home {} -> {}, selection {} -> {}",
            state.home,
            next.home,
            describe(state.selection),
            describe(next.selection)
        );
        next
    })
}

fn describe(selection: Option<AnchoredSelection>) -> String {
    selection.map_or_else(|| "none".to_string(), |s| s.to_string())
}

/// Extend the selection one column/row in `direction`, keeping its anchor.
///
/// Vertical extension of a column selection, and horizontal extension of a
/// row selection, leave it unchanged. At the grid edge nothing moves.
pub fn extend(anchored: AnchoredSelection, direction: Direction) -> AnchoredSelection {
    let anchor = anchored.anchor();
    let delta = direction.delta();
    match anchored.selection() {
        Selection::Cell(_) | Selection::CellRange(_) => {
            let (fixed, moving) = cell_corners(anchored);
            let moved = if direction.is_horizontal() {
                moving.with_column(moving.column().add_saturating(delta))
            } else {
                moving.with_row(moving.row().add_saturating(delta))
            };
            cells_between(fixed, moved, anchor)
        }
        Selection::Column(_) | Selection::ColumnRange(_) if direction.is_horizontal() => {
            let (fixed, moving) = or_first(column_ends(anchored));
            columns_between(fixed, moving.add_saturating(delta), anchor.horizontal())
        }
        Selection::Row(_) | Selection::RowRange(_) if !direction.is_horizontal() => {
            let (fixed, moving) = or_first(row_ends(anchored));
            rows_between(fixed, moving.add_saturating(delta), anchor.vertical())
        }
        _ => anchored,
    }
}

/// Fixed and moving corner of a cell or cell-range selection.
///
/// Other kinds are not cell-shaped; callers check the kind first.
fn cell_corners(anchored: AnchoredSelection) -> (CellRef, CellRef) {
    let range = anchored.selection().extent();
    let anchor = anchored.anchor();
    let (fixed_column, moving_column) =
        line_ends(range.columns(), anchor.horizontal().unwrap_or(Edge::Low));
    let (fixed_row, moving_row) = line_ends(range.rows(), anchor.vertical().unwrap_or(Edge::Low));
    (
        CellRef::new(fixed_column, fixed_row),
        CellRef::new(moving_column, moving_row),
    )
}

fn column_ends(anchored: AnchoredSelection) -> Option<(ColumnRef, ColumnRef)> {
    let edge = anchored.anchor().horizontal().unwrap_or(Edge::Low);
    match anchored.selection() {
        Selection::Column(column) => Some((column, column)),
        Selection::ColumnRange(range) => Some(line_ends(range, edge)),
        _ => None,
    }
}

fn row_ends(anchored: AnchoredSelection) -> Option<(RowRef, RowRef)> {
    let edge = anchored.anchor().vertical().unwrap_or(Edge::Low);
    match anchored.selection() {
        Selection::Row(row) => Some((row, row)),
        Selection::RowRange(range) => Some(line_ends(range, edge)),
        _ => None,
    }
}

fn or_first<A: Axis>(ends: Option<(A, A)>) -> (A, A) {
    ends.unwrap_or((A::first(), A::first()))
}

/// `(fixed, moving)` ends of a line, fixed on the `anchor` edge.
fn line_ends<A: RangeCoordinate>(range: GridRange<A>, anchor: Edge) -> (A, A) {
    match anchor {
        Edge::Low => (range.begin(), range.end()),
        Edge::High => (range.end(), range.begin()),
    }
}

/// Which edge `fixed` sits on once the moving end is at `moving`; when they
/// coincide the previous edge is kept.
fn fixed_edge<A: Ord>(fixed: A, moving: A, previous: Option<Edge>) -> Edge {
    match moving.cmp(&fixed) {
        std::cmp::Ordering::Greater => Edge::Low,
        std::cmp::Ordering::Less => Edge::High,
        std::cmp::Ordering::Equal => previous.unwrap_or(Edge::Low),
    }
}

/// Range from `fixed` to `moving`, anchored at `fixed`; a single-element
/// range collapses to a point with no anchor.
fn cells_between(fixed: CellRef, moving: CellRef, previous: Anchor) -> AnchoredSelection {
    match Selection::CellRange(GridRange::new(fixed, moving)).collapsed() {
        range @ Selection::CellRange(_) => {
            let horizontal = fixed_edge(fixed.column(), moving.column(), previous.horizontal());
            let vertical = fixed_edge(fixed.row(), moving.row(), previous.vertical());
            AnchoredSelection::from_parts(range, Anchor::from_edges(Some(horizontal), Some(vertical)))
        }
        point => point.into(),
    }
}

fn columns_between(fixed: ColumnRef, moving: ColumnRef, previous: Option<Edge>) -> AnchoredSelection {
    match Selection::ColumnRange(GridRange::new(fixed, moving)).collapsed() {
        range @ Selection::ColumnRange(_) => {
            let edge = fixed_edge(fixed, moving, previous);
            AnchoredSelection::from_parts(range, Anchor::from_edges(Some(edge), None))
        }
        point => point.into(),
    }
}

fn rows_between(fixed: RowRef, moving: RowRef, previous: Option<Edge>) -> AnchoredSelection {
    match Selection::RowRange(GridRange::new(fixed, moving)).collapsed() {
        range @ Selection::RowRange(_) => {
            let edge = fixed_edge(fixed, moving, previous);
            AnchoredSelection::from_parts(range, Anchor::from_edges(None, Some(edge)))
        }
        point => point.into(),
    }
}

/// The cell a selection starts from when a command needs one: the fixed
/// corner, or `home` on the axis a column/row selection does not constrain.
fn fixed_cell(selection: Option<AnchoredSelection>, home: CellRef) -> CellRef {
    let Some(anchored) = selection else {
        return home;
    };
    match anchored.selection() {
        Selection::Cell(_) | Selection::CellRange(_) => cell_corners(anchored).0,
        Selection::Column(_) | Selection::ColumnRange(_) => {
            home.with_column(or_first(column_ends(anchored)).0)
        }
        Selection::Row(_) | Selection::RowRange(_) => {
            home.with_row(or_first(row_ends(anchored)).0)
        }
    }
}

/// The cell the user is "at": the moving corner of a range, the selected
/// cell, or `home` when nothing is selected.
fn focus_cell(selection: Option<AnchoredSelection>, home: CellRef) -> CellRef {
    let Some(anchored) = selection else {
        return home;
    };
    match anchored.selection() {
        Selection::Cell(_) | Selection::CellRange(_) => cell_corners(anchored).1,
        Selection::Column(_) | Selection::ColumnRange(_) => {
            home.with_column(or_first(column_ends(anchored)).1)
        }
        Selection::Row(_) | Selection::RowRange(_) => {
            home.with_row(or_first(row_ends(anchored)).1)
        }
    }
}

/// Which axes a selection's focus should be kept visible on.
#[derive(Clone, Copy)]
enum Focus {
    Cell(CellRef),
    Column(ColumnRef),
    Row(RowRef),
}

impl Focus {
    fn of(selection: Option<AnchoredSelection>, home: CellRef) -> Option<Self> {
        let anchored = selection?;
        let cell = focus_cell(selection, home);
        Some(match anchored.selection() {
            Selection::Cell(_) | Selection::CellRange(_) => Self::Cell(cell),
            Selection::Column(_) | Selection::ColumnRange(_) => Self::Column(cell.column()),
            Selection::Row(_) | Selection::RowRange(_) => Self::Row(cell.row()),
        })
    }
}

struct Navigator<'a, M> {
    rect: &'a ViewportRectangle,
    include_frozen: bool,
    metrics: &'a M,
}

impl<M: GridMetrics> Navigator<'_, M> {
    fn apply(&self, command: NavigationCommand, state: NavigationState) -> NavigationState {
        let NavigationState { home, selection } = state;
        match command {
            NavigationCommand::Move(direction) => self.move_by(state, direction, 1),
            NavigationCommand::MovePixels(_, 0) => state,
            NavigationCommand::MovePixels(direction, amount) => {
                let from = focus_cell(selection, home);
                let steps = self.pixel_steps(from, direction, amount);
                self.move_by(state, direction, steps)
            }
            NavigationCommand::Extend(direction) => match selection {
                Some(anchored) if crosses_kind(anchored, direction) => {
                    self.scroll_home(state, direction, 1)
                }
                _ => {
                    let anchored = selection.unwrap_or_else(|| Selection::Cell(home).into());
                    self.settle(home, extend(anchored, direction))
                }
            },
            NavigationCommand::ExtendPixels(direction, amount) => match selection {
                Some(anchored) if crosses_kind(anchored, direction) => {
                    let steps = self.pixel_steps(home, direction, amount);
                    self.scroll_home(state, direction, steps)
                }
                _ => {
                    let anchored = selection.unwrap_or_else(|| Selection::Cell(home).into());
                    self.settle(home, self.extend_pixels(anchored, direction, amount))
                }
            },
            NavigationCommand::SelectCell(cell) => self.settle(home, Selection::Cell(cell).into()),
            NavigationCommand::SelectColumn(column) => {
                self.settle(home, Selection::Column(column).into())
            }
            NavigationCommand::SelectRow(row) => self.settle(home, Selection::Row(row).into()),
            NavigationCommand::ExtendCell(target) => {
                let previous = match selection {
                    Some(anchored) if matches!(anchored.selection(), Selection::CellRange(_)) => {
                        anchored.anchor()
                    }
                    _ => Anchor::None,
                };
                let fixed = fixed_cell(selection, home);
                self.settle(home, cells_between(fixed, target, previous))
            }
            NavigationCommand::ExtendColumn(target) => {
                let (fixed, previous) = match selection.and_then(column_ends_with_edge) {
                    Some((fixed, edge)) => (fixed, edge),
                    None => (fixed_cell(selection, home).column(), None),
                };
                self.settle(home, columns_between(fixed, target, previous))
            }
            NavigationCommand::ExtendRow(target) => {
                let (fixed, previous) = match selection.and_then(row_ends_with_edge) {
                    Some((fixed, edge)) => (fixed, edge),
                    None => (fixed_cell(selection, home).row(), None),
                };
                self.settle(home, rows_between(fixed, target, previous))
            }
        }
    }

    /// Move `steps` columns/rows from the focus, collapsing to one element.
    fn move_by(&self, state: NavigationState, direction: Direction, steps: i64) -> NavigationState {
        let NavigationState { home, selection } = state;
        let delta = direction.delta() * steps;
        let from = focus_cell(selection, home);
        let moved = match selection.map(|s| s.selection()) {
            Some(Selection::Column(_) | Selection::ColumnRange(_)) => {
                if !direction.is_horizontal() {
                    return self.scroll_home(state, direction, steps);
                }
                Selection::Column(from.column().add_saturating(delta))
            }
            Some(Selection::Row(_) | Selection::RowRange(_)) => {
                if direction.is_horizontal() {
                    return self.scroll_home(state, direction, steps);
                }
                Selection::Row(from.row().add_saturating(delta))
            }
            _ => {
                if direction.is_horizontal() {
                    Selection::Cell(from.with_column(from.column().add_saturating(delta)))
                } else {
                    Selection::Cell(from.with_row(from.row().add_saturating(delta)))
                }
            }
        };
        self.settle(home, moved.into())
    }

    /// Scroll `home` without touching the selection.
    fn scroll_home(&self, state: NavigationState, direction: Direction, steps: i64) -> NavigationState {
        let delta = direction.delta() * steps;
        let home = state.home;
        let home = if direction.is_horizontal() {
            home.with_column(home.column().add_saturating(delta))
        } else {
            home.with_row(home.row().add_saturating(delta))
        };
        NavigationState {
            home,
            selection: state.selection,
        }
    }

    /// Extend step by step until `amount` pixels have been crossed.
    fn extend_pixels(&self, mut anchored: AnchoredSelection, direction: Direction, amount: u32) -> AnchoredSelection {
        let amount = f64::from(amount);
        let mut crossed = 0.0;
        while crossed < amount {
            let from = focus_cell(Some(anchored), CellRef::at(0, 0));
            let next = extend(anchored, direction);
            if focus_cell(Some(next), CellRef::at(0, 0)) == from {
                break;
            }
            crossed += self.step_cost(from, direction);
            anchored = next;
        }
        anchored
    }

    /// Number of whole steps from `from` covering `amount` pixels; a step
    /// landing exactly on the amount counts. Stops at the grid edge.
    fn pixel_steps(&self, from: CellRef, direction: Direction, amount: u32) -> i64 {
        let amount = f64::from(amount);
        let mut at = from;
        let mut steps = 0;
        let mut crossed = 0.0;
        while crossed < amount {
            let next = step(at, direction);
            if next == at {
                break;
            }
            crossed += self.step_cost(at, direction);
            at = next;
            steps += 1;
        }
        steps
    }

    /// Pixels between the leading edges of `from` and its neighbour.
    fn step_cost(&self, from: CellRef, direction: Direction) -> f64 {
        let target = step(from, direction);
        match direction {
            Direction::Right => self.metrics.column_width(from.column()),
            Direction::Left => self.metrics.column_width(target.column()),
            Direction::Down => self.metrics.row_height(from.row()),
            Direction::Up => self.metrics.row_height(target.row()),
        }
    }

    /// Install `selection` and scroll `home` so its focus is on screen.
    fn settle(&self, home: CellRef, selection: AnchoredSelection) -> NavigationState {
        let home = match Focus::of(Some(selection), home) {
            Some(Focus::Cell(cell)) => self.scroll_to(home, Some(cell.column()), Some(cell.row())),
            Some(Focus::Column(column)) => self.scroll_to(home, Some(column), None),
            Some(Focus::Row(row)) => self.scroll_to(home, None, Some(row)),
            None => home,
        };
        NavigationState {
            home,
            selection: Some(selection),
        }
    }

    /// Smallest scroll of `home` that shows the given column/row.
    fn scroll_to(&self, home: CellRef, column: Option<ColumnRef>, row: Option<RowRef>) -> CellRef {
        if self.rect.is_degenerate() {
            return CellRef::new(column.unwrap_or(home.column()), row.unwrap_or(home.row()));
        }
        let origin = scroll_origin(home, self.include_frozen, self.metrics);
        let ((frozen_columns, frozen_width), (frozen_rows, frozen_height)) = if self.include_frozen {
            (
                (self.metrics.frozen_column_count(), self.metrics.frozen_columns_width()),
                (self.metrics.frozen_row_count(), self.metrics.frozen_rows_height()),
            )
        } else {
            ((0, 0.0), (0, 0.0))
        };

        let column_width = |c: ColumnRef| self.metrics.column_width(c);
        let row_height = |r: RowRef| self.metrics.row_height(r);

        let home_column = column.map_or(home.column(), |focus| {
            let available = self.rect.width() - frozen_width;
            scroll_axis(home.column(), origin.column(), focus, frozen_columns, available, column_width)
        });
        let home_row = row.map_or(home.row(), |focus| {
            let available = self.rect.height() - frozen_height;
            scroll_axis(home.row(), origin.row(), focus, frozen_rows, available, row_height)
        });
        CellRef::new(home_column, home_row)
    }
}

fn column_ends_with_edge(anchored: AnchoredSelection) -> Option<(ColumnRef, Option<Edge>)> {
    column_ends(anchored).map(|(fixed, _)| (fixed, anchored.anchor().horizontal()))
}

fn row_ends_with_edge(anchored: AnchoredSelection) -> Option<(RowRef, Option<Edge>)> {
    row_ends(anchored).map(|(fixed, _)| (fixed, anchored.anchor().vertical()))
}

/// A column selection moved vertically, or a row selection horizontally.
fn crosses_kind(anchored: AnchoredSelection, direction: Direction) -> bool {
    match anchored.selection() {
        Selection::Column(_) | Selection::ColumnRange(_) => !direction.is_horizontal(),
        Selection::Row(_) | Selection::RowRange(_) => direction.is_horizontal(),
        Selection::Cell(_) | Selection::CellRange(_) => false,
    }
}

fn step(cell: CellRef, direction: Direction) -> CellRef {
    if direction.is_horizontal() {
        cell.with_column(cell.column().add_saturating(direction.delta()))
    } else {
        cell.with_row(cell.row().add_saturating(direction.delta()))
    }
}

/// New home position on one axis so that `focus` is inside the scroll span.
///
/// The span starting at `start` shows `focus` when the pixels before it are
/// fewer than `available`, mirroring the forward walk of the window computer.
fn scroll_axis<A: Axis>(home: A, origin: A, focus: A, frozen: u32, available: f64, size_of: impl Fn(A) -> f64) -> A {
    if focus.index() < frozen {
        return home;
    }
    let start = origin;
    if focus < start {
        return focus;
    }

    let mut used = 0.0;
    let mut at = start;
    while at < focus {
        used += size_of(at);
        if used >= available {
            break;
        }
        at = at.add_saturating(1);
    }
    if at == focus {
        return home;
    }

    let mut candidate = focus;
    let mut used = 0.0;
    while candidate > origin {
        let previous = candidate.add_saturating(-1);
        let next_used = used + size_of(previous);
        if next_used >= available {
            break;
        }
        used = next_used;
        candidate = previous;
    }
    candidate
}
