use serde::{Deserialize, Serialize};

use super::{AnchoredSelection, CellRef, NavigationCommand};
use crate::error::{Result, ViewportError};

/// Pixel rectangle whose top-left cell is `home`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawRectangle")]
pub struct ViewportRectangle {
    home: CellRef,
    width: f64,
    height: f64,
}

#[derive(Deserialize)]
struct RawRectangle {
    home: CellRef,
    width: f64,
    height: f64,
}

impl TryFrom<RawRectangle> for ViewportRectangle {
    type Error = ViewportError;

    fn try_from(raw: RawRectangle) -> Result<Self> {
        Self::new(raw.home, raw.width, raw.height)
    }
}

impl ViewportRectangle {
    /// Rectangle anchored at `home`; sizes must be finite and not negative.
    pub fn new(home: CellRef, width: f64, height: f64) -> Result<Self> {
        check_size("width", width)?;
        check_size("height", height)?;
        Ok(Self {
            home,
            width,
            height,
        })
    }

    pub const fn home(&self) -> CellRef {
        self.home
    }

    pub const fn width(&self) -> f64 {
        self.width
    }

    pub const fn height(&self) -> f64 {
        self.height
    }

    /// Same size, different home.
    pub const fn with_home(self, home: CellRef) -> Self {
        Self { home, ..self }
    }

    /// True when either side has no area.
    pub fn is_degenerate(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

fn check_size(name: &str, value: f64) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ViewportError::Validation(format!(
            "Invalid {name} {:?}",
            value.to_string()
        )))
    }
}

/// Everything a request says about what the client is looking at.
///
/// Built fresh per request; `navigations` are consumed by
/// [`crate::navigation::navigate`] and never serialized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Viewport {
    pub rectangle: ViewportRectangle,
    pub include_frozen_columns_rows: bool,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub selection: Option<AnchoredSelection>,
    #[serde(skip)]
    pub navigations: Vec<NavigationCommand>,
}

impl Viewport {
    pub fn new(rectangle: ViewportRectangle, include_frozen_columns_rows: bool) -> Self {
        Self {
            rectangle,
            include_frozen_columns_rows,
            selection: None,
            navigations: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_selection(mut self, selection: Option<AnchoredSelection>) -> Self {
        self.selection = selection;
        self
    }

    #[must_use]
    pub fn with_navigations(mut self, navigations: Vec<NavigationCommand>) -> Self {
        self.navigations = navigations;
        self
    }

    pub const fn home(&self) -> CellRef {
        self.rectangle.home()
    }
}
