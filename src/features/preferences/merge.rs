//! Schema-checked merging of partial preferences.
//!
//! Anything the backend or an import file hands us goes through
//! [`PreferencesPatch`]: every field optional, unknown fields and wrong
//! types rejected. Nothing is merged from an invalid document.

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use super::model::Preferences;
use crate::error::StudyError;
use crate::features::blocking::normalize_websites;

/// A partial [`Preferences`]. `None` (or `null`) keeps the base value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PreferencesPatch {
    pub default_study_duration: Option<u32>,
    pub default_break_duration: Option<u32>,
    pub preferred_study_times: Option<Vec<String>>,
    pub distracting_websites: Option<Vec<String>>,
    pub focus_techniques: Option<Vec<String>>,
    pub notifications_enabled: Option<bool>,
    pub auto_block_websites: Option<bool>,
}

impl PreferencesPatch {
    /// Read a patch from a preferences document.
    ///
    /// Accepts an object, `null`, or the legacy shape: an array whose first
    /// element is the object. An empty array is an empty patch.
    ///
    /// # Errors
    ///
    /// Returns [`StudyError::Preferences`] for unknown fields, wrong field
    /// types, or a document that is neither shape.
    pub fn from_value(value: Value) -> Result<Self, StudyError> {
        let object = match value {
            Value::Null => return Ok(Self::default()),
            Value::Object(_) => value,
            Value::Array(items) => match items.into_iter().next() {
                None => return Ok(Self::default()),
                Some(first @ Value::Object(_)) => {
                    debug!("reading legacy array-shaped preferences");
                    first
                }
                Some(_) => {
                    return Err(StudyError::Preferences(
                        "expected an array of preference objects".to_string(),
                    ))
                }
            },
            _ => {
                return Err(StudyError::Preferences(
                    "expected a preferences object".to_string(),
                ))
            }
        };

        serde_json::from_value(object).map_err(|e| StudyError::Preferences(e.to_string()))
    }

    /// Parse a patch from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`StudyError::Preferences`] if the text is not JSON or fails
    /// [`from_value`](Self::from_value).
    pub fn from_json(text: &str) -> Result<Self, StudyError> {
        let value: Value =
            serde_json::from_str(text).map_err(|e| StudyError::Preferences(e.to_string()))?;
        Self::from_value(value)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl Preferences {
    /// Apply `patch` on top of `self` and validate the result.
    ///
    /// Website entries are normalized to bare domains.
    ///
    /// # Errors
    ///
    /// Returns [`StudyError::Preferences`] if the merged record is invalid;
    /// `self` is left untouched.
    pub fn merged(&self, patch: PreferencesPatch) -> Result<Self, StudyError> {
        let mut next = self.clone();

        if let Some(v) = patch.default_study_duration {
            next.default_study_duration = v;
        }
        if let Some(v) = patch.default_break_duration {
            next.default_break_duration = v;
        }
        if let Some(v) = patch.preferred_study_times {
            next.preferred_study_times = v.into_iter().map(|t| t.trim().to_string()).collect();
        }
        if let Some(v) = patch.distracting_websites {
            next.distracting_websites = normalize_websites(v);
        }
        if let Some(v) = patch.focus_techniques {
            next.focus_techniques = v
                .into_iter()
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty())
                .collect();
        }
        if let Some(v) = patch.notifications_enabled {
            next.notifications_enabled = v;
        }
        if let Some(v) = patch.auto_block_websites {
            next.auto_block_websites = v;
        }

        next.validate()?;
        Ok(next)
    }
}
