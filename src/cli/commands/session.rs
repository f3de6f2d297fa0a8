//! Session command implementations.

use std::io::IsTerminal;

use colored::Colorize;
use tokio::io::BufReader;
use tracing::warn;

use super::run::{drive, RunExit, HELP};
use crate::api::{ApiClient, SessionOutcome, SessionStatus, StudySession};
use crate::cli::args::{OutputFormat, SessionCommands};
use crate::config::Config;
use crate::error::StudyError;
use crate::features::plan::PlanView;
use crate::features::session::{validate, ControllerOptions, EndReason, EndReport, SessionController};
use crate::notify::ConsoleNotifier;
use crate::output::{format_created, format_end_report, format_run_exit, format_session, format_sessions};

/// Execute session subcommands.
///
/// # Errors
///
/// Returns validation errors before any request, otherwise backend errors.
pub async fn session(
    client: &ApiClient,
    config: &Config,
    cmd: SessionCommands,
    format: OutputFormat,
) -> Result<String, StudyError> {
    match cmd {
        SessionCommands::List => {
            let sessions = client.list_sessions().await?;
            format_sessions(&sessions, format)
        }
        SessionCommands::Show { id } => {
            let session = client.get_session(&id).await?;
            format_session(&session, format)
        }
        SessionCommands::Create {
            subject,
            duration,
            goals,
            no_plan,
            run,
        } => {
            let duration = duration.unwrap_or(config.session.default_duration_minutes);
            create(client, config, &subject, duration, &goals, !no_plan, run, format).await
        }
        SessionCommands::Run { id, no_block } => {
            let session = client.get_session(&id).await?;
            run_session(client, config, session, !no_block, format).await
        }
        SessionCommands::End {
            id,
            score,
            completed,
            notes,
            distractions,
            breaks,
        } => {
            let outcome = SessionOutcome {
                focus_score: score.unwrap_or_else(|| config.session.default_focus_score.min(validate::MAX_FOCUS_SCORE)),
                completed_goals: completed,
                notes,
                distractions,
                breaks_taken: breaks,
            };
            end(client, &id, outcome, format).await
        }
    }
}

#[allow(clippy::too_many_arguments)]
async fn create(
    client: &ApiClient,
    config: &Config,
    subject: &str,
    duration: u32,
    goals: &[String],
    with_plan: bool,
    run: bool,
    format: OutputFormat,
) -> Result<String, StudyError> {
    let request = validate::new_session(subject, duration, goals)?;
    let session = client.create_session(&request).await?;

    // The session exists either way; a missing plan is only a warning.
    let plan = if with_plan {
        let plan_request = validate::plan_request(&request.subject, request.duration, &request.goals)?;
        match client.generate_plan(&plan_request).await {
            Ok(plan) => Some(PlanView::from_plan(&plan)),
            Err(e) => {
                warn!(error = %e, "plan generation failed");
                eprintln!("{} Could not generate a study plan: {e}", "⚠".yellow());
                None
            }
        }
    } else {
        None
    };

    let created = format_created(&session, plan.as_ref(), format)?;
    if !run {
        return Ok(created);
    }

    println!("{created}");
    run_session(client, config, session, config.session.block_websites, format).await
}

async fn run_session(
    client: &ApiClient,
    config: &Config,
    session: StudySession,
    block: bool,
    format: OutputFormat,
) -> Result<String, StudyError> {
    if session.status() == SessionStatus::Completed {
        return Err(StudyError::InvalidState(format!(
            "Session {} has already ended",
            session.id
        )));
    }

    let options = ControllerOptions::from_config(config).with_blocking(block && config.session.block_websites);
    let mut controller = SessionController::new(client.clone(), client.clone(), ConsoleNotifier::new(), options);
    controller.start(session).await?;

    let live = format == OutputFormat::Pretty && std::io::stderr().is_terminal();
    if live {
        eprintln!("{}", HELP.dimmed());
    }

    let exit = drive(&mut controller, BufReader::new(tokio::io::stdin()), live).await?;
    match exit {
        RunExit::Ended(report) => format_end_report(&report, format),
        RunExit::Discarded(session) => format_run_exit(&session, true, format),
        RunExit::Detached(session) => format_run_exit(&session, false, format),
    }
}

async fn end(
    client: &ApiClient,
    id: &str,
    outcome: SessionOutcome,
    format: OutputFormat,
) -> Result<String, StudyError> {
    let mut session = client.get_session(id).await?;
    validate::outcome(&outcome, &session.goals)?;

    client
        .end_session(id, &outcome)
        .await
        .map_err(StudyError::into_end_rejected)?;

    session.end_time = Some(chrono::Local::now().naive_local());
    session.completed_goals.clone_from(&outcome.completed_goals);
    session.focus_score = Some(outcome.focus_score);
    session.notes.clone_from(&outcome.notes);
    session.distractions = outcome.distractions;
    session.breaks_taken = outcome.breaks_taken;

    let report = EndReport {
        session,
        outcome,
        reason: EndReason::Manual,
        error: None,
    };
    format_end_report(&report, format)
}
