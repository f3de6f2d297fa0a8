//! Output formatting for studyctl.
//!
//! Each result type has a pretty (colored terminal) and a JSON rendering;
//! the dispatchers here pick one from the `--output` flag.

mod json;
mod pretty;

use crate::api::{Analytics, CalendarAck, CalendarEvent, CreatedEvent, NewEvent, StudySession};
use crate::cli::args::OutputFormat;
use crate::error::StudyError;
use crate::features::analytics::SessionSummary;
use crate::features::blocking::BlockingResult;
use crate::features::calendar::Agenda;
use crate::features::diagnostics::{HealthReport, SystemHealth};
use crate::features::plan::PlanView;
use crate::features::preferences::{ListChange, Preferences};
use crate::features::session::EndReport;

pub use json::*;
pub use pretty::*;

/// Format sessions based on output format
///
/// # Errors
///
/// Returns `StudyError::Parse` if JSON serialization fails.
pub fn format_sessions(sessions: &[StudySession], format: OutputFormat) -> Result<String, StudyError> {
    match format {
        OutputFormat::Pretty => Ok(format_sessions_pretty(sessions)),
        OutputFormat::Json => format_sessions_json(sessions),
    }
}

/// Format a single session based on output format
///
/// # Errors
///
/// Returns `StudyError::Parse` if JSON serialization fails.
pub fn format_session(session: &StudySession, format: OutputFormat) -> Result<String, StudyError> {
    match format {
        OutputFormat::Pretty => Ok(format_session_pretty(session)),
        OutputFormat::Json => format_session_json(session),
    }
}

/// Format a newly created session, followed by its plan when one was generated.
///
/// # Errors
///
/// Returns `StudyError::Parse` if JSON serialization fails.
pub fn format_created(
    session: &StudySession,
    plan: Option<&PlanView>,
    format: OutputFormat,
) -> Result<String, StudyError> {
    match format {
        OutputFormat::Pretty => {
            let mut output = format!("Created session\n{}", format_session_pretty(session));
            if let Some(plan) = plan {
                output.push('\n');
                output.push_str(&format_plan_pretty(plan));
            }
            Ok(output)
        }
        OutputFormat::Json => format_created_json(session, plan),
    }
}

/// Format a plan based on output format
///
/// # Errors
///
/// Returns `StudyError::Parse` if JSON serialization fails.
pub fn format_plan(plan: &PlanView, format: OutputFormat) -> Result<String, StudyError> {
    match format {
        OutputFormat::Pretty => Ok(format_plan_pretty(plan)),
        OutputFormat::Json => format_plan_json(plan),
    }
}

/// Format a block result based on output format
///
/// # Errors
///
/// Returns `StudyError::Parse` if JSON serialization fails.
pub fn format_block_result(
    result: &BlockingResult,
    duration_minutes: u32,
    format: OutputFormat,
) -> Result<String, StudyError> {
    match format {
        OutputFormat::Pretty => Ok(format_block_result_pretty(result, duration_minutes)),
        OutputFormat::Json => format_block_result_json(result, duration_minutes),
    }
}

/// Format an end report based on output format
///
/// # Errors
///
/// Returns `StudyError::Parse` if JSON serialization fails.
pub fn format_end_report(report: &EndReport, format: OutputFormat) -> Result<String, StudyError> {
    match format {
        OutputFormat::Pretty => Ok(format_end_report_pretty(report)),
        OutputFormat::Json => format_end_report_json(report),
    }
}

/// Format a run loop that ended without an outcome based on output format
///
/// # Errors
///
/// Returns `StudyError::Parse` if JSON serialization fails.
pub fn format_run_exit(session: &StudySession, discarded: bool, format: OutputFormat) -> Result<String, StudyError> {
    match format {
        OutputFormat::Pretty => Ok(format_run_exit_pretty(session, discarded)),
        OutputFormat::Json => format_run_exit_json(session, discarded),
    }
}

/// Format the status probe based on output format
///
/// # Errors
///
/// Returns `StudyError::Parse` if JSON serialization fails.
pub fn format_system_health(
    health: &SystemHealth,
    base_url: &str,
    format: OutputFormat,
) -> Result<String, StudyError> {
    match format {
        OutputFormat::Pretty => Ok(format_system_health_pretty(health, base_url)),
        OutputFormat::Json => format_system_health_json(health, base_url),
    }
}

/// Format a health report based on output format
///
/// # Errors
///
/// Returns `StudyError::Parse` if JSON serialization fails.
pub fn format_health_report(report: &HealthReport, format: OutputFormat) -> Result<String, StudyError> {
    match format {
        OutputFormat::Pretty => Ok(format_health_report_pretty(report)),
        OutputFormat::Json => format_health_report_json(report),
    }
}

/// Format preferences based on output format
///
/// # Errors
///
/// Returns `StudyError::Parse` if JSON serialization fails.
pub fn format_preferences(prefs: &Preferences, format: OutputFormat) -> Result<String, StudyError> {
    match format {
        OutputFormat::Pretty => Ok(format_preferences_pretty(prefs)),
        OutputFormat::Json => format_preferences_json(prefs),
    }
}

/// Format a list edit based on output format
///
/// # Errors
///
/// Returns `StudyError::Parse` if JSON serialization fails.
pub fn format_list_change(
    change: &ListChange,
    noun: &str,
    list: &[String],
    format: OutputFormat,
) -> Result<String, StudyError> {
    match format {
        OutputFormat::Pretty => Ok(format_list_change_pretty(change, noun)),
        OutputFormat::Json => format_list_change_json(change, list),
    }
}

/// Format analytics based on output format
///
/// # Errors
///
/// Returns `StudyError::Parse` if JSON serialization fails.
pub fn format_analytics(
    analytics: Option<&Analytics>,
    summary: &SessionSummary,
    format: OutputFormat,
) -> Result<String, StudyError> {
    match format {
        OutputFormat::Pretty => Ok(format_analytics_pretty(analytics, summary)),
        OutputFormat::Json => format_analytics_json(analytics, summary),
    }
}

/// Format the calendar agenda based on output format
///
/// # Errors
///
/// Returns `StudyError::Parse` if JSON serialization fails.
pub fn format_agenda(agenda: &Agenda, format: OutputFormat) -> Result<String, StudyError> {
    match format {
        OutputFormat::Pretty => Ok(format_agenda_pretty(agenda)),
        OutputFormat::Json => format_agenda_json(agenda),
    }
}

/// Format one calendar event based on output format
///
/// # Errors
///
/// Returns `StudyError::Parse` if JSON serialization fails.
pub fn format_event(event: &CalendarEvent, format: OutputFormat) -> Result<String, StudyError> {
    match format {
        OutputFormat::Pretty => Ok(format_event_pretty(event)),
        OutputFormat::Json => format_event_json(event),
    }
}

/// Format a newly created event
///
/// # Errors
///
/// Returns `StudyError::Parse` if JSON serialization fails.
pub fn format_event_created(
    created: &CreatedEvent,
    event: &NewEvent,
    format: OutputFormat,
) -> Result<String, StudyError> {
    match format {
        OutputFormat::Pretty => Ok(format_event_created_pretty(created, event)),
        OutputFormat::Json => format_event_created_json(created, event),
    }
}

/// Format a calendar acknowledgement (update, delete, break, sync)
///
/// # Errors
///
/// Returns `StudyError::Parse` if JSON serialization fails.
pub fn format_calendar_ack(ack: &CalendarAck, done: &str, format: OutputFormat) -> Result<String, StudyError> {
    match format {
        OutputFormat::Pretty => Ok(format_calendar_ack_pretty(ack, done)),
        OutputFormat::Json => to_json(ack),
    }
}
