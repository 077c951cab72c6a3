//! Label resolution.
//!
//! Labels are stored by the engine; [`LabelResolver`] is the seam this crate
//! reads them through. [`LabelStore`] keeps mappings in memory for the CLI,
//! the wasm surface and tests.

use std::collections::BTreeMap;

use crate::error::{Result, ViewportError};
use crate::types::{LabelMapping, LabelName, Selection};

/// Looks up the selection a label names.
pub trait LabelResolver {
    fn resolve(&self, label: &LabelName) -> Option<Selection>;
}

impl<R: LabelResolver + ?Sized> LabelResolver for &R {
    fn resolve(&self, label: &LabelName) -> Option<Selection> {
        (**self).resolve(label)
    }
}

/// Resolver for requests that carry no labels.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoLabels;

impl LabelResolver for NoLabels {
    fn resolve(&self, _label: &LabelName) -> Option<Selection> {
        None
    }
}

/// In-memory label mappings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LabelStore {
    mappings: BTreeMap<LabelName, Selection>,
}

impl LabelStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a mapping, returning the previous target.
    pub fn insert(&mut self, mapping: LabelMapping) -> Option<Selection> {
        self.mappings.insert(mapping.label, mapping.target)
    }

    pub fn remove(&mut self, label: &LabelName) -> Option<Selection> {
        self.mappings.remove(label)
    }

    pub fn len(&self) -> usize {
        self.mappings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }

    pub fn mappings(&self) -> impl Iterator<Item = LabelMapping> + '_ {
        self.mappings
            .iter()
            .map(|(label, target)| LabelMapping::new(label.clone(), *target))
    }
}

impl FromIterator<LabelMapping> for LabelStore {
    fn from_iter<I: IntoIterator<Item = LabelMapping>>(iter: I) -> Self {
        Self {
            mappings: iter
                .into_iter()
                .map(|mapping| (mapping.label, mapping.target))
                .collect(),
        }
    }
}

impl LabelResolver for LabelStore {
    fn resolve(&self, label: &LabelName) -> Option<Selection> {
        self.mappings.get(label).copied()
    }
}

/// Resolve `text` as a label name to the selection it names.
///
/// Text that is not a valid label name is a parse error; a valid name with no
/// mapping is [`ViewportError::UnknownLabel`].
pub fn resolve_if_label(text: &str, resolver: &impl LabelResolver) -> Result<Selection> {
    let label: LabelName = text.parse()?;
    resolver
        .resolve(&label)
        .ok_or_else(|| ViewportError::UnknownLabel(label.to_string()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::SelectionKind;

    fn store() -> LabelStore {
        [LabelMapping::new(
            "Total".parse().unwrap(),
            SelectionKind::CellRange.parse("B2:B9").unwrap(),
        )]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_resolve_known_label() {
        let selection = resolve_if_label("Total", &store()).unwrap();
        assert_eq!(selection.to_string(), "B2:B9");
    }

    #[test]
    fn test_unknown_label() {
        let err = resolve_if_label("Tax", &store()).unwrap_err();
        assert_eq!(err.to_string(), "Unknown label Tax");
        let err = resolve_if_label("Total", &NoLabels).unwrap_err();
        assert_eq!(err.to_string(), "Unknown label Total");
    }

    #[test]
    fn test_cell_text_is_not_a_label() {
        let err = resolve_if_label("B2", &store()).unwrap_err();
        assert_eq!(err.to_string(), "Invalid label \"B2\"");
    }

    #[test]
    fn test_insert_and_remove() {
        let mut store = store();
        let name: LabelName = "Total".parse().unwrap();
        let previous = store.insert(LabelMapping::new(name.clone(), Selection::Row("3".parse().unwrap())));
        assert_eq!(previous.map(|s| s.to_string()).as_deref(), Some("B2:B9"));
        assert_eq!(store.len(), 1);
        assert!(store.remove(&name).is_some());
        assert!(store.is_empty());
        assert_eq!(store.mappings().count(), 0);
    }
}
