//! Preferences command implementation.

use colored::Colorize;
use serde_json::json;

use crate::api::ApiClient;
use crate::cli::args::{OutputFormat, PrefsCommands};
use crate::config::Paths;
use crate::error::StudyError;
use crate::features::preferences::{
    self, ListChange, Preferences, PreferencesPatch, Source,
};
use crate::output::{format_list_change, format_preferences, to_json};

/// Execute preferences subcommands.
///
/// Edits load the backend record (or defaults when it is unreachable),
/// apply the change and save only if something changed.
///
/// # Errors
///
/// Returns validation errors without saving, otherwise backend or file errors.
pub async fn prefs(client: &ApiClient, cmd: PrefsCommands, format: OutputFormat) -> Result<String, StudyError> {
    match cmd {
        PrefsCommands::Show => {
            let prefs = load(client).await;
            format_preferences(&prefs, format)
        }

        PrefsCommands::Set {
            study_duration,
            break_duration,
            times,
            notifications,
            auto_block,
        } => {
            let patch = PreferencesPatch {
                default_study_duration: study_duration,
                default_break_duration: break_duration,
                preferred_study_times: times,
                notifications_enabled: notifications,
                auto_block_websites: auto_block,
                ..PreferencesPatch::default()
            };
            if patch.is_empty() {
                return Err(StudyError::Validation(
                    "Nothing to change. See 'studyctl prefs set --help'".to_string(),
                ));
            }
            let prefs = load(client).await.merged(patch)?;
            preferences::save(client, &prefs).await?;
            saved(&prefs, format)
        }

        PrefsCommands::AddWebsite { website } => {
            edit_list(client, format, "website", |p| p.add_website(&website)).await
        }
        PrefsCommands::RemoveWebsite { website } => {
            edit_list(client, format, "website", |p| Ok(p.remove_website(&website))).await
        }
        PrefsCommands::AddDefaultWebsites => {
            edit_list(client, format, "website", |p| Ok(p.add_default_websites())).await
        }
        PrefsCommands::ClearWebsites => {
            edit_list(client, format, "website", |p| Ok(p.clear_websites())).await
        }
        PrefsCommands::AddTechnique { technique } => {
            edit_list(client, format, "focus technique", |p| p.add_technique(&technique)).await
        }
        PrefsCommands::RemoveTechnique { technique } => {
            edit_list(client, format, "focus technique", |p| Ok(p.remove_technique(&technique))).await
        }
        PrefsCommands::AddDefaultTechniques => {
            edit_list(client, format, "focus technique", |p| Ok(p.add_default_techniques())).await
        }

        PrefsCommands::Reset => {
            let mut prefs = Preferences::default();
            prefs.reset();
            preferences::save(client, &prefs).await?;
            saved(&prefs, format)
        }

        PrefsCommands::Export { path } => {
            let path = match path {
                Some(path) => path,
                None => {
                    let paths = Paths::new()?;
                    paths.ensure_dirs()?;
                    paths.preferences_export()
                }
            };
            let prefs = load(client).await;
            preferences::export_to(&path, &prefs)?;
            match format {
                OutputFormat::Pretty => Ok(format!(
                    "{} Preferences exported to {}",
                    "✓".green(),
                    path.display()
                )),
                OutputFormat::Json => to_json(&json!({ "exported": path })),
            }
        }

        PrefsCommands::Import { path } => {
            let base = load(client).await;
            let prefs = preferences::import_from(&path, &base)?;
            preferences::save(client, &prefs).await?;
            saved(&prefs, format)
        }
    }
}

async fn load(client: &ApiClient) -> Preferences {
    let (prefs, source) = preferences::fetch_or_default(client).await;
    if source == Source::Defaults {
        eprintln!(
            "{} Could not load preferences from the backend; using defaults",
            "⚠".yellow()
        );
    }
    prefs
}

async fn edit_list<F>(
    client: &ApiClient,
    format: OutputFormat,
    noun: &str,
    edit: F,
) -> Result<String, StudyError>
where
    F: FnOnce(&mut Preferences) -> Result<ListChange, StudyError>,
{
    let mut prefs = load(client).await;
    let change = edit(&mut prefs)?;
    if change.changed() {
        preferences::save(client, &prefs).await?;
    }

    let list = if noun == "website" {
        &prefs.distracting_websites
    } else {
        &prefs.focus_techniques
    };
    format_list_change(&change, noun, list, format)
}

fn saved(prefs: &Preferences, format: OutputFormat) -> Result<String, StudyError> {
    match format {
        OutputFormat::Pretty => Ok(format!(
            "{} Preferences saved\n\n{}",
            "✓".green(),
            format_preferences(prefs, format)?
        )),
        OutputFormat::Json => format_preferences(prefs, format),
    }
}
