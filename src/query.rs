//! Query-string parameters to [`Viewport`] and back.
//!
//! Keys: `home`, `width`, `height`, `includeFrozenColumnsRows`,
//! `selectionType`, `selection`, `selectionAnchor`, `navigation`, `window`.
//! An explicit `window` overrides everything else.

use std::collections::HashMap;

use url::form_urlencoded;

use crate::error::{Result, ViewportError};
use crate::labels::{resolve_if_label, LabelResolver};
use crate::types::{
    Anchor, AnchoredSelection, CellRef, NavigationCommand, Selection, SelectionKind, Viewport,
    ViewportRectangle, Window,
};

pub const HOME: &str = "home";
pub const WIDTH: &str = "width";
pub const HEIGHT: &str = "height";
pub const INCLUDE_FROZEN: &str = "includeFrozenColumnsRows";
pub const SELECTION_TYPE: &str = "selectionType";
pub const SELECTION: &str = "selection";
pub const SELECTION_ANCHOR: &str = "selectionAnchor";
pub const NAVIGATION: &str = "navigation";
pub const WINDOW: &str = "window";

/// `selectionType` value that names a label instead of a reference.
const LABEL_SELECTION_TYPE: &str = "label";

/// Which keys a request must carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RequiredKeys {
    /// Window requests: `home, width, height, includeFrozenColumnsRows`.
    #[default]
    Window,
    /// Cell-selection requests: `home, width, height`; frozen panes default
    /// to excluded.
    Cell,
}

impl RequiredKeys {
    pub const fn keys(self) -> &'static [&'static str] {
        match self {
            Self::Window => &[HOME, WIDTH, HEIGHT, INCLUDE_FROZEN],
            Self::Cell => &[HOME, WIDTH, HEIGHT],
        }
    }
}

/// A parsed request: either an explicit window or a viewport to resolve.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewportQuery {
    Window(Window),
    Viewport(Viewport),
}

impl ViewportQuery {
    /// Parse a raw query string such as `home=A1&width=800&height=600`.
    pub fn parse_str(query: &str, required: RequiredKeys, labels: &impl LabelResolver) -> Result<Self> {
        let pairs: Vec<(String, String)> = form_urlencoded::parse(query.trim_start_matches('?').as_bytes())
            .into_owned()
            .collect();
        Self::parse(
            pairs.iter().map(|(key, value)| (key.as_str(), value.as_str())),
            required,
            labels,
        )
    }

    /// Parse decoded key/value pairs. A repeated key keeps its last value.
    pub fn parse<'a>(
        pairs: impl IntoIterator<Item = (&'a str, &'a str)>,
        required: RequiredKeys,
        labels: &impl LabelResolver,
    ) -> Result<Self> {
        let params: HashMap<&str, &str> = pairs.into_iter().collect();

        if let Some(text) = params.get(WINDOW) {
            let window: Window = text.parse()?;
            if window.is_empty() {
                return Err(ViewportError::invalid(WINDOW, text));
            }
            return Ok(Self::Window(window));
        }

        let missing: Vec<&str> = required
            .keys()
            .iter()
            .copied()
            .filter(|key| !params.contains_key(key))
            .collect();
        if !missing.is_empty() {
            return Err(missing_keys(&missing));
        }

        let home = parse_param::<CellRef>(&params, HOME)?.ok_or_else(|| missing_keys(&[HOME]))?;
        let width = parse_param::<f64>(&params, WIDTH)?.ok_or_else(|| missing_keys(&[WIDTH]))?;
        let height = parse_param::<f64>(&params, HEIGHT)?.ok_or_else(|| missing_keys(&[HEIGHT]))?;
        let include_frozen = parse_param::<bool>(&params, INCLUDE_FROZEN)?.unwrap_or(false);
        let rectangle = ViewportRectangle::new(home, width, height)?;

        let selection = parse_selection(&params, labels)?;
        let navigations = match params.get(NAVIGATION) {
            Some(text) => NavigationCommand::parse_list(text)?,
            None => Vec::new(),
        };

        Ok(Self::Viewport(
            Viewport::new(rectangle, include_frozen)
                .with_selection(selection)
                .with_navigations(navigations),
        ))
    }
}

fn missing_keys(keys: &[&str]) -> ViewportError {
    ViewportError::Validation(format!("Missing: {}", keys.join(", ")))
}

/// Parse an optional parameter; a value that does not parse is reported with
/// its key and text.
fn parse_param<T: std::str::FromStr>(params: &HashMap<&str, &str>, key: &str) -> Result<Option<T>> {
    params
        .get(key)
        .map(|text| {
            text.trim()
                .parse()
                .map_err(|_| ViewportError::Validation(format!("Invalid {key} {text:?}")))
        })
        .transpose()
}

fn parse_selection(
    params: &HashMap<&str, &str>,
    labels: &impl LabelResolver,
) -> Result<Option<AnchoredSelection>> {
    let (kind, text) = match (params.get(SELECTION_TYPE), params.get(SELECTION)) {
        (None, None) => return Ok(None),
        (Some(_), None) => return Err(missing_keys(&[SELECTION])),
        (None, Some(_)) => return Err(missing_keys(&[SELECTION_TYPE])),
        (Some(kind), Some(text)) => (kind.trim(), *text),
    };

    let selection: Selection = if kind == LABEL_SELECTION_TYPE {
        resolve_if_label(text, labels)?
    } else {
        kind.parse::<SelectionKind>()?.parse(text)?
    };

    let anchor = match params.get(SELECTION_ANCHOR) {
        Some(text) => text.parse::<Anchor>()?,
        None => Anchor::None,
    };
    AnchoredSelection::with_anchor_or_default(selection, anchor).map(Some)
}

impl Viewport {
    /// Query keys that [`ViewportQuery::parse`] turns back into this viewport.
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            (HOME, self.home().to_string()),
            (WIDTH, self.rectangle.width().to_string()),
            (HEIGHT, self.rectangle.height().to_string()),
            (INCLUDE_FROZEN, self.include_frozen_columns_rows.to_string()),
        ];
        if let Some(anchored) = self.selection {
            let selection = anchored.selection();
            pairs.push((SELECTION_TYPE, selection.kind().to_string()));
            pairs.push((SELECTION, selection.to_string()));
            if anchored.anchor() != Anchor::None {
                pairs.push((SELECTION_ANCHOR, anchored.anchor().to_string()));
            }
        }
        if !self.navigations.is_empty() {
            pairs.push((NAVIGATION, NavigationCommand::format_list(&self.navigations)));
        }
        pairs
    }

    /// [`Self::to_query_pairs`] encoded as a query string.
    pub fn to_query_string(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.to_query_pairs())
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::labels::NoLabels;

    fn parse(pairs: &[(&str, &str)], required: RequiredKeys) -> Result<ViewportQuery> {
        ViewportQuery::parse(pairs.iter().copied(), required, &NoLabels)
    }

    #[test]
    fn test_missing_keys_listed_in_order() {
        let err = parse(&[("home", "A1")], RequiredKeys::Window).unwrap_err();
        assert_eq!(err.to_string(), "Missing: width, height, includeFrozenColumnsRows");
        let err = parse(&[("home", "A1")], RequiredKeys::Cell).unwrap_err();
        assert_eq!(err.to_string(), "Missing: width, height");
        let err = parse(&[], RequiredKeys::Cell).unwrap_err();
        assert_eq!(err.to_string(), "Missing: home, width, height");
    }

    #[test]
    fn test_window_overrides_everything() {
        let query = parse(&[("window", "A1:B2,D4"), ("home", "Z1")], RequiredKeys::Window).unwrap();
        let ViewportQuery::Window(window) = query else {
            panic!("expected window");
        };
        assert_eq!(window.to_string(), "A1:B2,D4");
    }

    #[test]
    fn test_invalid_values() {
        let err = parse(&[("home", "A1"), ("height", "10"), ("width", "abc")], RequiredKeys::Cell).unwrap_err();
        assert_eq!(err.to_string(), "Invalid width \"abc\"");

        let err = parse(&[("home", "1A"), ("width", "1"), ("height", "1")], RequiredKeys::Cell).unwrap_err();
        assert_eq!(err.to_string(), "Invalid home \"1A\"");
    }

    #[test]
    fn test_selection_needs_type() {
        let err = parse(
            &[("home", "A1"), ("width", "1"), ("height", "1"), ("selection", "B2")],
            RequiredKeys::Cell,
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "Missing: selectionType");
    }

    #[test]
    fn test_query_string_round_trip() {
        let query = "home=B3&width=800.5&height=600&includeFrozenColumnsRows=true\
                     &selectionType=cell-range&selection=B3%3AC4&selectionAnchor=bottom-right";
        let ViewportQuery::Viewport(viewport) =
            ViewportQuery::parse_str(query, RequiredKeys::Window, &NoLabels).unwrap()
        else {
            panic!("expected viewport");
        };
        assert_eq!(viewport.home().to_string(), "B3");
        assert_eq!(viewport.selection.unwrap().to_string(), "B3:C4 bottom-right");

        let again = ViewportQuery::parse_str(&viewport.to_query_string(), RequiredKeys::Window, &NoLabels).unwrap();
        assert_eq!(again, ViewportQuery::Viewport(viewport));
    }
}
