//! Typed base-item keys.

use serde::{Deserialize, Serialize};

use crate::domain::item::UNSPECIFIED_LABEL;

/// Reserved delimiter separating a display label from its opaque suffix.
pub const BASE_KEY_DELIMITER: &str = "_ID_";

/// Two-part key identifying a base item independent of transaction type.
///
/// The suffix, when present, is an opaque identifier carried through every
/// rename untouched; only the label half is human-editable.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct BaseKey {
    label: String,
    suffix: Option<String>,
}

impl BaseKey {
    /// Splits a display description on the reserved delimiter.
    ///
    /// A blank label falls back to [`UNSPECIFIED_LABEL`] so blank
    /// descriptions still land in a real bucket.
    pub fn parse(description: &str) -> Self {
        match description.split_once(BASE_KEY_DELIMITER) {
            Some((label, suffix)) => Self {
                label: normalize(label),
                suffix: Some(suffix.to_owned()),
            },
            None => Self {
                label: normalize(description),
                suffix: None,
            },
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn suffix(&self) -> Option<&str> {
        self.suffix.as_deref()
    }

    /// Re-encodes the key as a display description, suffix verbatim.
    pub fn encode(&self) -> String {
        match &self.suffix {
            Some(suffix) => format!("{}{}{}", self.label, BASE_KEY_DELIMITER, suffix),
            None => self.label.clone(),
        }
    }

    /// Returns the same key with a new label, suffix untouched.
    pub fn with_label(&self, label: &str) -> Self {
        Self {
            label: normalize(label),
            suffix: self.suffix.clone(),
        }
    }
}

fn normalize(label: &str) -> String {
    let trimmed = label.trim();
    if trimmed.is_empty() {
        UNSPECIFIED_LABEL.to_owned()
    } else {
        trimmed.to_owned()
    }
}
