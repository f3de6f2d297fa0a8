//! Loading and saving preferences: backend and files.

use std::path::Path;

use tracing::{info, warn};

use super::merge::PreferencesPatch;
use super::model::Preferences;
use crate::api::ApiClient;
use crate::error::StudyError;

/// Where loaded preferences came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Backend,
    /// The backend could not be read; defaults are in use.
    Defaults,
}

/// Fetch preferences from the backend and merge them into the defaults.
///
/// # Errors
///
/// Returns transport/API errors, or [`StudyError::Preferences`] when the
/// document fails validation.
pub async fn fetch(client: &ApiClient) -> Result<Preferences, StudyError> {
    let value = client.preferences().await?;
    Preferences::default().merged(PreferencesPatch::from_value(value)?)
}

/// Like [`fetch`], but falls back to defaults on any failure.
pub async fn fetch_or_default(client: &ApiClient) -> (Preferences, Source) {
    match fetch(client).await {
        Ok(prefs) => (prefs, Source::Backend),
        Err(e) => {
            warn!(error = %e, "using default preferences");
            (Preferences::default(), Source::Defaults)
        }
    }
}

/// Validate and store the full record.
///
/// # Errors
///
/// Returns [`StudyError::Preferences`] without contacting the backend when
/// the record is invalid, otherwise transport/API errors.
pub async fn save(client: &ApiClient, preferences: &Preferences) -> Result<(), StudyError> {
    preferences.validate()?;
    client.save_preferences(preferences).await?;
    info!("preferences saved");
    Ok(())
}

/// Write preferences as pretty JSON, creating parent directories.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn export_to(path: &Path, preferences: &Preferences) -> Result<(), StudyError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let contents = serde_json::to_string_pretty(preferences)?;
    std::fs::write(path, contents)?;
    info!(path = %path.display(), "preferences exported");
    Ok(())
}

/// Read a preferences file and merge it onto `base`.
///
/// # Errors
///
/// Returns an I/O error if the file cannot be read, or
/// [`StudyError::Preferences`] if its contents fail the merge.
pub fn import_from(path: &Path, base: &Preferences) -> Result<Preferences, StudyError> {
    let text = std::fs::read_to_string(path)?;
    let patch = PreferencesPatch::from_json(&text)
        .map_err(|e| StudyError::Preferences(format!("{}: {e}", path.display())))?;
    base.merged(patch)
}
