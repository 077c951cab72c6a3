use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::Selection;
use crate::cell_ref::parse_cell_ref;
use crate::error::ViewportError;

/// Longest accepted label name.
pub const MAX_LABEL_LENGTH: usize = 255;

/// A named reference such as `Total` or `tax_rate`.
///
/// Names start with a letter or underscore, continue with letters, digits,
/// `_` or `.`, and never look like a cell reference.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct LabelName(String);

impl LabelName {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when `text` would be accepted as a label name.
    pub fn is_valid(text: &str) -> bool {
        let mut chars = text.chars();
        let Some(first) = chars.next() else {
            return false;
        };
        (first.is_ascii_alphabetic() || first == '_')
            && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.')
            && text.len() <= MAX_LABEL_LENGTH
            && parse_cell_ref(text).is_none()
    }
}

impl fmt::Display for LabelName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for LabelName {
    type Err = ViewportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim();
        if Self::is_valid(text) {
            Ok(Self(text.to_string()))
        } else {
            Err(ViewportError::invalid("label", s))
        }
    }
}

impl From<LabelName> for String {
    fn from(value: LabelName) -> Self {
        value.0
    }
}

impl TryFrom<String> for LabelName {
    type Error = ViewportError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// A label and the cells it names.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct LabelMapping {
    pub label: LabelName,
    pub target: Selection,
}

impl LabelMapping {
    pub fn new(label: LabelName, target: Selection) -> Self {
        Self { label, target }
    }
}
