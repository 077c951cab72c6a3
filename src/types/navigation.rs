use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{CellRef, ColumnRef, RowRef};
use crate::error::{Result, ViewportError};

/// Arrow direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Down => "down",
            Self::Left => "left",
            Self::Right => "right",
        }
    }

    /// True for left/right.
    pub const fn is_horizontal(self) -> bool {
        matches!(self, Self::Left | Self::Right)
    }

    /// `-1` towards the top/left, `+1` towards the bottom/right.
    pub const fn delta(self) -> i64 {
        match self {
            Self::Up | Self::Left => -1,
            Self::Down | Self::Right => 1,
        }
    }

    /// Unit of a single step: `column` or `row`.
    const fn unit(self) -> &'static str {
        if self.is_horizontal() {
            "column"
        } else {
            "row"
        }
    }

    fn from_unit_token(token: &str) -> Option<Self> {
        Some(match token {
            "left-column" => Self::Left,
            "right-column" => Self::Right,
            "up-row" => Self::Up,
            "down-row" => Self::Down,
            _ => return None,
        })
    }

    fn from_pixels_token(token: &str) -> Option<Self> {
        Some(match token {
            "left-pixels" => Self::Left,
            "right-pixels" => Self::Right,
            "up-pixels" => Self::Up,
            "down-pixels" => Self::Down,
            _ => return None,
        })
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One step of a `navigation` list.
///
/// Commands apply left to right, each to the previous command's result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NavigationCommand {
    /// `right-column`: move one column/row, collapsing the selection.
    Move(Direction),
    /// `extend-right-column`: move the selection's free edge one column/row.
    Extend(Direction),
    /// `right-pixels 120`: move by whole columns/rows covering the pixels.
    MovePixels(Direction, u32),
    /// `extend-right-pixels 120`.
    ExtendPixels(Direction, u32),
    /// `select-cell B2`
    SelectCell(CellRef),
    /// `select-column C`
    SelectColumn(ColumnRef),
    /// `select-row 4`
    SelectRow(RowRef),
    /// `extend-cell D5`: extend from the anchor to the cell.
    ExtendCell(CellRef),
    /// `extend-column E`
    ExtendColumn(ColumnRef),
    /// `extend-row 7`
    ExtendRow(RowRef),
}

impl NavigationCommand {
    /// Parse a comma-separated list. Any bad token fails the whole list.
    pub fn parse_list(text: &str) -> Result<Vec<Self>> {
        text.split(',')
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .map(str::parse)
            .collect()
    }

    /// Render a list back to its query form.
    pub fn format_list(commands: &[Self]) -> String {
        commands
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(",")
    }
}

impl FromStr for NavigationCommand {
    type Err = ViewportError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || ViewportError::invalid("navigation", s);
        let text = s.trim();
        let (verb, argument) = match text.split_once(' ') {
            Some((verb, argument)) => (verb, Some(argument.trim())),
            None => (text, None),
        };

        let pixels = |argument: Option<&str>| -> Result<u32> {
            let amount = argument.ok_or_else(invalid)?;
            let amount = amount.strip_suffix("px").unwrap_or(amount);
            amount.parse().map_err(|_| invalid())
        };

        let (extend, verb) = match verb.strip_prefix("extend-") {
            Some(rest) => (true, rest),
            None => (false, verb),
        };

        if let Some(direction) = Direction::from_unit_token(verb) {
            if argument.is_some() {
                return Err(invalid());
            }
            return Ok(if extend {
                Self::Extend(direction)
            } else {
                Self::Move(direction)
            });
        }
        if let Some(direction) = Direction::from_pixels_token(verb) {
            let amount = pixels(argument)?;
            return Ok(if extend {
                Self::ExtendPixels(direction, amount)
            } else {
                Self::MovePixels(direction, amount)
            });
        }

        let target = argument.ok_or_else(invalid)?;
        Ok(match (extend, verb) {
            (false, "select-cell") => Self::SelectCell(target.parse().map_err(|_| invalid())?),
            (false, "select-column") => Self::SelectColumn(target.parse().map_err(|_| invalid())?),
            (false, "select-row") => Self::SelectRow(target.parse().map_err(|_| invalid())?),
            (true, "cell") => Self::ExtendCell(target.parse().map_err(|_| invalid())?),
            (true, "column") => Self::ExtendColumn(target.parse().map_err(|_| invalid())?),
            (true, "row") => Self::ExtendRow(target.parse().map_err(|_| invalid())?),
            _ => return Err(invalid()),
        })
    }
}

impl fmt::Display for NavigationCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Move(d) => write!(f, "{d}-{}", d.unit()),
            Self::Extend(d) => write!(f, "extend-{d}-{}", d.unit()),
            Self::MovePixels(d, amount) => write!(f, "{d}-pixels {amount}"),
            Self::ExtendPixels(d, amount) => write!(f, "extend-{d}-pixels {amount}"),
            Self::SelectCell(cell) => write!(f, "select-cell {cell}"),
            Self::SelectColumn(column) => write!(f, "select-column {column}"),
            Self::SelectRow(row) => write!(f, "select-row {row}"),
            Self::ExtendCell(cell) => write!(f, "extend-cell {cell}"),
            Self::ExtendColumn(column) => write!(f, "extend-column {column}"),
            Self::ExtendRow(row) => write!(f, "extend-row {row}"),
        }
    }
}
