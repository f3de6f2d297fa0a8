//! Command implementations for studyctl.
//!
//! Each command returns its rendered output; `main` prints it.

mod calendar;
mod prefs;
mod run;
mod session;

pub use calendar::calendar;
pub use prefs::prefs;
pub use run::{drive, RunCommand, RunExit};
pub use session::session;

use colored::Colorize;
use serde_json::json;
use tracing::warn;

use crate::api::ApiClient;
use crate::cli::args::{BlockArgs, OutputFormat, PlanArgs};
use crate::cli::completions::{completion_install_instructions, generate_completions};
use crate::config::Config;
use crate::error::StudyError;
use crate::features::analytics::SessionSummary;
use crate::features::blocking::BlockingCoordinator;
use crate::features::diagnostics::{probe_status, run_health_check};
use crate::features::plan::PlanView;
use crate::features::session::validate;
use crate::output::{
    format_analytics, format_block_result, format_health_report, format_plan, format_system_health, to_json,
};

/// Execute plan command
///
/// # Errors
///
/// Returns a validation error before any request, otherwise backend errors.
pub async fn plan(
    client: &ApiClient,
    config: &Config,
    args: PlanArgs,
    format: OutputFormat,
) -> Result<String, StudyError> {
    let duration = args.duration.unwrap_or(config.session.default_duration_minutes);
    let request = validate::plan_request(&args.subject, duration, &args.goals)?;
    let plan = client.generate_plan(&request).await?;
    format_plan(&PlanView::from_plan(&plan), format)
}

/// Execute block command
///
/// # Errors
///
/// Returns a validation error for an empty list or zero duration, or
/// `StudyError::BlockingUnavailable` when the backend call fails.
pub async fn block(
    client: &ApiClient,
    config: &Config,
    args: BlockArgs,
    format: OutputFormat,
) -> Result<String, StudyError> {
    let websites = if args.websites.is_empty() {
        config.blocking.websites.clone()
    } else {
        args.websites
    };
    let mut coordinator = BlockingCoordinator::new(client.clone());
    let result = coordinator.block(websites.as_slice(), args.duration).await?;
    format_block_result(&result, args.duration, format)
}

/// Execute unblock command
///
/// # Errors
///
/// Returns `StudyError::BlockingUnavailable` when the backend call fails.
pub async fn unblock(client: &ApiClient, format: OutputFormat) -> Result<String, StudyError> {
    let mut coordinator = BlockingCoordinator::new(client.clone());
    let success = coordinator.unblock_all().await?;
    match format {
        OutputFormat::Pretty if success => Ok(format!("{} Websites unblocked", "✓".green())),
        OutputFormat::Pretty => Ok(format!("{} The backend could not unblock websites", "⚠".yellow())),
        OutputFormat::Json => to_json(&json!({ "success": success })),
    }
}

/// Execute status command. Never fails on an unreachable backend.
///
/// # Errors
///
/// Returns an error only if output formatting fails.
pub async fn status(client: &ApiClient, config: &Config, format: OutputFormat) -> Result<String, StudyError> {
    let health = probe_status(client, &config.api).await;
    format_system_health(&health, client.base_url(), format)
}

/// Execute diagnose command. Failed checks are part of the report.
///
/// # Errors
///
/// Returns an error only if output formatting fails.
pub async fn diagnose(client: &ApiClient, config: &Config, format: OutputFormat) -> Result<String, StudyError> {
    let report = run_health_check(client, config.api.health_timeout()).await;
    format_health_report(&report, format)
}

/// Execute analytics command
///
/// The session list is required; the backend's analytics are shown when
/// available.
///
/// # Errors
///
/// Returns backend errors from listing sessions.
pub async fn analytics(client: &ApiClient, format: OutputFormat) -> Result<String, StudyError> {
    let sessions = client.list_sessions().await?;
    let analytics = match client.analytics().await {
        Ok(analytics) => Some(analytics),
        Err(e) => {
            warn!(error = %e, "backend analytics unavailable");
            None
        }
    };
    let summary = SessionSummary::from_sessions(&sessions);
    format_analytics(analytics.as_ref(), &summary, format)
}

/// Execute completions command
///
/// # Errors
///
/// Returns an error if the script cannot be generated.
pub fn completions(shell: clap_complete::Shell, install: bool) -> Result<String, StudyError> {
    if install {
        Ok(completion_install_instructions(shell))
    } else {
        generate_completions(shell)
    }
}
