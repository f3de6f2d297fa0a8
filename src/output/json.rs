//! JSON output formatting for studyctl.
//!
//! Every command's result can be emitted as JSON for scripting.

use serde::Serialize;
use serde_json::{json, Value};

use crate::api::{Analytics, CalendarEvent, CreatedEvent, NewEvent, StudySession};
use crate::error::StudyError;
use crate::features::analytics::SessionSummary;
use crate::features::blocking::BlockingResult;
use crate::features::calendar::Agenda;
use crate::features::diagnostics::{HealthReport, SystemHealth};
use crate::features::plan::PlanView;
use crate::features::preferences::{ListChange, Preferences};
use crate::features::session::EndReport;

/// Format sessions as JSON
///
/// # Errors
///
/// Returns `StudyError::Parse` if JSON serialization fails.
pub fn format_sessions_json(sessions: &[StudySession]) -> Result<String, StudyError> {
    let output = json!({
        "count": sessions.len(),
        "items": sessions
            .iter()
            .map(session_value)
            .collect::<Result<Vec<_>, _>>()?
    });
    Ok(serde_json::to_string_pretty(&output)?)
}

/// Format a single session as JSON
///
/// # Errors
///
/// Returns `StudyError::Parse` if JSON serialization fails.
pub fn format_session_json(session: &StudySession) -> Result<String, StudyError> {
    Ok(serde_json::to_string_pretty(&session_value(session)?)?)
}

/// A session with its derived status alongside the stored fields.
fn session_value(session: &StudySession) -> Result<Value, StudyError> {
    let mut value = serde_json::to_value(session)?;
    if let Value::Object(map) = &mut value {
        map.insert("status".to_string(), json!(session.status()));
    }
    Ok(value)
}

/// Format a plan as JSON, including its summary.
///
/// # Errors
///
/// Returns `StudyError::Parse` if JSON serialization fails.
pub fn format_plan_json(plan: &PlanView) -> Result<String, StudyError> {
    let output = json!({
        "plan": plan,
        "summary": plan.summary(),
    });
    Ok(serde_json::to_string_pretty(&output)?)
}

/// Format a created session and its optional plan.
///
/// # Errors
///
/// Returns `StudyError::Parse` if JSON serialization fails.
pub fn format_created_json(session: &StudySession, plan: Option<&PlanView>) -> Result<String, StudyError> {
    let output = json!({
        "session": session_value(session)?,
        "plan": plan,
    });
    Ok(serde_json::to_string_pretty(&output)?)
}

/// Format a block result.
///
/// # Errors
///
/// Returns `StudyError::Parse` if JSON serialization fails.
pub fn format_block_result_json(result: &BlockingResult, duration_minutes: u32) -> Result<String, StudyError> {
    let output = json!({
        "success": result.success,
        "blocked_count": result.blocked_count,
        "mock_mode": result.mock_mode,
        "duration": duration_minutes,
    });
    Ok(serde_json::to_string_pretty(&output)?)
}

/// Format an end report. The error, if any, is rendered as its message.
///
/// # Errors
///
/// Returns `StudyError::Parse` if JSON serialization fails.
pub fn format_end_report_json(report: &EndReport) -> Result<String, StudyError> {
    let output = json!({
        "session": session_value(&report.session)?,
        "outcome": report.outcome,
        "reason": report.reason,
        "recorded": report.is_recorded(),
        "error": report.error.as_ref().map(ToString::to_string),
        "retryable": report.error.as_ref().is_some_and(StudyError::is_transport),
    });
    Ok(serde_json::to_string_pretty(&output)?)
}

/// Format a run loop left without recording an outcome.
///
/// # Errors
///
/// Returns `StudyError::Parse` if JSON serialization fails.
pub fn format_run_exit_json(session: &StudySession, discarded: bool) -> Result<String, StudyError> {
    let output = json!({
        "session": session_value(session)?,
        "result": if discarded { "discarded" } else { "detached" },
        "recorded": false,
    });
    Ok(serde_json::to_string_pretty(&output)?)
}

/// Format the status probe.
///
/// # Errors
///
/// Returns `StudyError::Parse` if JSON serialization fails.
pub fn format_system_health_json(health: &SystemHealth, base_url: &str) -> Result<String, StudyError> {
    let output = json!({
        "base_url": base_url,
        "backend": health.backend,
        "ai": health.ai,
        "integrations": health.integrations,
        "mock_mode": health.mock_mode,
    });
    Ok(serde_json::to_string_pretty(&output)?)
}

/// Format a health check run.
///
/// # Errors
///
/// Returns `StudyError::Parse` if JSON serialization fails.
pub fn format_health_report_json(report: &HealthReport) -> Result<String, StudyError> {
    let checks: Vec<Value> = report
        .checks
        .iter()
        .map(|check| {
            json!({
                "name": check.name,
                "status": check.status,
                "message": check.message,
                "response_time_ms": check.response_time_ms,
                "rating": check.rating().to_string(),
            })
        })
        .collect();
    let output = json!({
        "passed": report.passed(),
        "total": report.total(),
        "summary": report.summary(),
        "checks": checks,
    });
    Ok(serde_json::to_string_pretty(&output)?)
}

/// Format preferences as JSON
///
/// # Errors
///
/// Returns `StudyError::Parse` if JSON serialization fails.
pub fn format_preferences_json(prefs: &Preferences) -> Result<String, StudyError> {
    Ok(serde_json::to_string_pretty(prefs)?)
}

/// Format a list edit along with the resulting list.
///
/// # Errors
///
/// Returns `StudyError::Parse` if JSON serialization fails.
pub fn format_list_change_json(change: &ListChange, list: &[String]) -> Result<String, StudyError> {
    let output = json!({
        "result": change,
        "changed": change.changed(),
        "items": list,
    });
    Ok(serde_json::to_string_pretty(&output)?)
}

/// Format analytics plus the local session summary.
///
/// # Errors
///
/// Returns `StudyError::Parse` if JSON serialization fails.
pub fn format_analytics_json(analytics: Option<&Analytics>, summary: &SessionSummary) -> Result<String, StudyError> {
    let output = json!({
        "backend": analytics,
        "summary": summary,
    });
    Ok(serde_json::to_string_pretty(&output)?)
}

/// Format the calendar agenda as JSON
///
/// # Errors
///
/// Returns `StudyError::Parse` if JSON serialization fails.
pub fn format_agenda_json(agenda: &Agenda) -> Result<String, StudyError> {
    let output = json!({
        "count": agenda.len(),
        "days": agenda.days,
        "unscheduled": agenda.unscheduled,
    });
    Ok(serde_json::to_string_pretty(&output)?)
}

/// Format one event as JSON, with its computed end time.
///
/// # Errors
///
/// Returns `StudyError::Parse` if JSON serialization fails.
pub fn format_event_json(event: &CalendarEvent) -> Result<String, StudyError> {
    let mut value = serde_json::to_value(event)?;
    if let (Value::Object(map), None, Some(end)) = (&mut value, event.end_time, event.end()) {
        map.insert("end_time".to_string(), json!(end.format("%Y-%m-%dT%H:%M:%S").to_string()));
    }
    Ok(serde_json::to_string_pretty(&value)?)
}

/// Format a created event as JSON: the backend reply plus what was sent.
///
/// # Errors
///
/// Returns `StudyError::Parse` if JSON serialization fails.
pub fn format_event_created_json(created: &CreatedEvent, event: &NewEvent) -> Result<String, StudyError> {
    let output = json!({
        "event_id": created.event_id,
        "message": created.message,
        "event": event,
    });
    Ok(serde_json::to_string_pretty(&output)?)
}

/// Generic JSON formatter for any serializable type
///
/// # Errors
///
/// Returns `StudyError::Parse` if JSON serialization fails.
pub fn to_json<T: Serialize>(value: &T) -> Result<String, StudyError> {
    Ok(serde_json::to_string_pretty(value)?)
}
