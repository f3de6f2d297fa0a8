//! List editing on preferences: blocked websites and focus techniques.

use serde::Serialize;

use super::model::{owned, Preferences, DEFAULT_TECHNIQUES, DEFAULT_WEBSITES};
use crate::error::StudyError;
use crate::features::blocking::normalize_domain;

/// What an edit did to a list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "change", content = "value", rename_all = "snake_case")]
pub enum ListChange {
    Added(String),
    AlreadyPresent(String),
    Removed(String),
    Missing(String),
    /// Number of defaults that were not yet present.
    AddedDefaults(usize),
    /// Number of entries removed.
    Cleared(usize),
}

impl ListChange {
    /// Whether the list was modified.
    #[must_use]
    pub const fn changed(&self) -> bool {
        match self {
            Self::Added(_) | Self::Removed(_) => true,
            Self::AddedDefaults(n) | Self::Cleared(n) => *n > 0,
            Self::AlreadyPresent(_) | Self::Missing(_) => false,
        }
    }
}

impl Preferences {
    /// Add a site to the block list, normalized to its bare domain.
    ///
    /// # Errors
    ///
    /// Returns [`StudyError::Validation`] for blank or malformed input.
    pub fn add_website(&mut self, input: &str) -> Result<ListChange, StudyError> {
        if input.trim().is_empty() {
            return Err(StudyError::Validation("Please enter a website URL".to_string()));
        }
        let domain = normalize_domain(input)
            .ok_or_else(|| StudyError::Validation(format!("\"{}\" is not a valid website", input.trim())))?;

        Ok(push_unique(&mut self.distracting_websites, domain))
    }

    /// Remove a site; the input is normalized the same way as on add.
    pub fn remove_website(&mut self, input: &str) -> ListChange {
        let domain = normalize_domain(input).unwrap_or_else(|| input.trim().to_string());
        remove(&mut self.distracting_websites, domain)
    }

    pub fn add_default_websites(&mut self) -> ListChange {
        ListChange::AddedDefaults(extend_unique(&mut self.distracting_websites, DEFAULT_WEBSITES))
    }

    pub fn clear_websites(&mut self) -> ListChange {
        let count = self.distracting_websites.len();
        self.distracting_websites.clear();
        ListChange::Cleared(count)
    }

    /// Add a focus technique. Matching is exact after trimming.
    ///
    /// # Errors
    ///
    /// Returns [`StudyError::Validation`] for blank input.
    pub fn add_technique(&mut self, input: &str) -> Result<ListChange, StudyError> {
        let technique = input.trim();
        if technique.is_empty() {
            return Err(StudyError::Validation("Please enter a focus technique".to_string()));
        }
        Ok(push_unique(&mut self.focus_techniques, technique.to_string()))
    }

    pub fn remove_technique(&mut self, input: &str) -> ListChange {
        remove(&mut self.focus_techniques, input.trim().to_string())
    }

    pub fn add_default_techniques(&mut self) -> ListChange {
        ListChange::AddedDefaults(extend_unique(&mut self.focus_techniques, DEFAULT_TECHNIQUES))
    }

    /// Replace everything with [`Preferences::recommended`].
    pub fn reset(&mut self) {
        *self = Self::recommended();
    }
}

fn push_unique(list: &mut Vec<String>, item: String) -> ListChange {
    if list.contains(&item) {
        ListChange::AlreadyPresent(item)
    } else {
        list.push(item.clone());
        ListChange::Added(item)
    }
}

fn remove(list: &mut Vec<String>, item: String) -> ListChange {
    match list.iter().position(|existing| *existing == item) {
        Some(index) => ListChange::Removed(list.remove(index)),
        None => ListChange::Missing(item),
    }
}

fn extend_unique(list: &mut Vec<String>, defaults: &[&str]) -> usize {
    let before = list.len();
    for item in owned(defaults) {
        if !list.contains(&item) {
            list.push(item);
        }
    }
    list.len() - before
}
