use colored::{ColoredString, Colorize};
use serde_json::Value;

use crate::api::{Analytics, CalendarAck, CalendarEvent, CreatedEvent, EventType, NewEvent, SessionStatus, StudySession};
use crate::features::analytics::{render_bar_chart, SessionSummary};
use crate::features::blocking::BlockingResult;
use crate::features::calendar::Agenda;
use crate::features::diagnostics::{HealthReport, SystemHealth};
use crate::features::plan::{AiMode, BlockKind, PlanView};
use crate::features::preferences::{ListChange, Preferences};
use crate::features::session::{
    format_minutes, format_mmss, render_progress_bar, EndReason, EndReport, LifecycleState,
    ProgressBand, TimerSnapshot,
};

const RULE_WIDTH: usize = 60;

fn status_icon(status: SessionStatus) -> ColoredString {
    match status {
        SessionStatus::Scheduled => "○".white(),
        SessionStatus::Active => "◐".yellow(),
        SessionStatus::Completed => "●".green(),
    }
}

fn event_icon(kind: EventType) -> ColoredString {
    match kind {
        EventType::StudySession => "●".blue(),
        EventType::Break => "◌".green(),
        EventType::Assignment => "■".yellow(),
        EventType::Exam => "▲".red(),
        EventType::Meeting => "◆".magenta(),
        EventType::Other => "·".white(),
    }
}

fn on_off(value: bool) -> ColoredString {
    if value {
        "✓".green()
    } else {
        "✗".red()
    }
}

/// Format a list of sessions, one per line.
pub fn format_sessions_pretty(sessions: &[StudySession]) -> String {
    if sessions.is_empty() {
        return "Study Sessions (0)\n  No sessions yet. Create one with 'studyctl session create'".to_string();
    }

    let mut output = format!("Study Sessions ({})\n", sessions.len());
    output.push_str(&"─".repeat(RULE_WIDTH));
    output.push('\n');

    for session in sessions {
        let status = session.status();
        let mut line = format!(
            "{} {}  {}",
            status_icon(status),
            session.subject.bold(),
            format!("{} min", session.duration_minutes).dimmed()
        );

        if let Some(start) = session.start_time {
            line.push_str(&format!("  {}", start.format("%Y-%m-%d %H:%M").to_string().yellow()));
        }
        if let Some(score) = session.focus_score {
            line.push_str(&format!("  focus {}", score.to_string().cyan()));
        }
        line.push_str(&format!("  {}", session.id.dimmed()));

        output.push_str(&line);
        output.push('\n');
    }

    output
}

/// Format one session with all its fields.
pub fn format_session_pretty(session: &StudySession) -> String {
    let status = session.status();
    let mut output = format!("{} {}\n", status_icon(status), session.subject.bold());
    output.push_str(&format!("  {}: {}\n", "ID".dimmed(), session.id));
    output.push_str(&format!("  {}: {}\n", "Status".dimmed(), status));
    output.push_str(&format!(
        "  {}: {}\n",
        "Duration".dimmed(),
        format_minutes(session.duration_minutes)
    ));

    if let Some(start) = session.start_time {
        output.push_str(&format!("  {}: {}\n", "Started".dimmed(), start.format("%Y-%m-%d %H:%M")));
    }
    if let Some(end) = session.end_time {
        output.push_str(&format!("  {}: {}\n", "Ended".dimmed(), end.format("%Y-%m-%d %H:%M")));
    }

    if !session.goals.is_empty() {
        output.push_str(&format!("  {}:\n", "Goals".dimmed()));
        for goal in &session.goals {
            let icon = if session.completed_goals.contains(goal) { "[x]" } else { "[ ]" };
            output.push_str(&format!("    {icon} {goal}\n"));
        }
    }

    if let Some(score) = session.focus_score {
        output.push_str(&format!("  {}: {score}/100\n", "Focus".dimmed()));
    }
    if session.distractions > 0 || session.breaks_taken > 0 {
        output.push_str(&format!(
            "  {}: {} distractions, {} breaks\n",
            "Interruptions".dimmed(),
            session.distractions,
            session.breaks_taken
        ));
    }
    if !session.notes.is_empty() {
        output.push_str(&format!("  {}: {}\n", "Notes".dimmed(), session.notes));
    }

    output
}

/// Format the calendar as a per-day agenda.
pub fn format_agenda_pretty(agenda: &Agenda) -> String {
    if agenda.is_empty() {
        return "Calendar (0)\n  No events. Add one with 'studyctl calendar create'".to_string();
    }

    let mut output = format!("Calendar ({})\n", agenda.len());
    output.push_str(&"─".repeat(RULE_WIDTH));
    output.push('\n');

    for day in &agenda.days {
        output.push_str(&format!("{}\n", day.date.format("%A, %B %-d, %Y").to_string().bold()));
        for event in &day.events {
            output.push_str(&event_line(event));
        }
    }
    if !agenda.unscheduled.is_empty() {
        output.push_str(&format!("{}\n", "Unscheduled".bold()));
        for event in &agenda.unscheduled {
            output.push_str(&event_line(event));
        }
    }

    output
}

fn event_line(event: &CalendarEvent) -> String {
    let time = match (event.start_time, event.end()) {
        (Some(start), Some(end)) => format!("{}-{}", start.format("%H:%M"), end.format("%H:%M")),
        _ => "--:--".to_string(),
    };
    format!(
        "  {} {}  {}  {}\n",
        event_icon(event.event_type),
        time.yellow(),
        event.title,
        event.id.dimmed()
    )
}

/// Format one calendar event with all its fields.
pub fn format_event_pretty(event: &CalendarEvent) -> String {
    let mut output = format!("{} {}\n", event_icon(event.event_type), event.title.bold());
    output.push_str(&format!("  {}: {}\n", "ID".dimmed(), event.id));
    output.push_str(&format!("  {}: {}\n", "Type".dimmed(), event.event_type.label()));
    if let Some(start) = event.start_time {
        output.push_str(&format!("  {}: {}\n", "Starts".dimmed(), start.format("%Y-%m-%d %H:%M")));
    }
    if let Some(end) = event.end() {
        output.push_str(&format!("  {}: {}\n", "Ends".dimmed(), end.format("%Y-%m-%d %H:%M")));
    }
    if let Some(minutes) = event.duration_minutes {
        output.push_str(&format!("  {}: {}\n", "Duration".dimmed(), format_minutes(minutes)));
    }
    if let Some(status) = &event.status {
        output.push_str(&format!("  {}: {status}\n", "Status".dimmed()));
    }
    if !event.description.is_empty() {
        output.push_str(&format!("  {}: {}\n", "Description".dimmed(), event.description));
    }
    output
}

/// Format the reply to a created event.
pub fn format_event_created_pretty(created: &CreatedEvent, event: &NewEvent) -> String {
    let mut output = format!(
        "{} Added {} '{}' at {}\n",
        "✓".green(),
        event.event_type.label(),
        event.title.bold(),
        event.start_time.format("%Y-%m-%d %H:%M").to_string().yellow()
    );
    if let Some(id) = &created.event_id {
        output.push_str(&format!("  {}: {id}\n", "ID".dimmed()));
    }
    output
}

/// Format a plain calendar acknowledgement. `done` is shown when the
/// backend sends no message.
pub fn format_calendar_ack_pretty(ack: &CalendarAck, done: &str) -> String {
    let message = ack.message.as_deref().unwrap_or(done);
    let mut output = if ack.success == Some(false) {
        format!("{} {message}", "⚠".yellow())
    } else {
        format!("{} {message}", "✓".green())
    };
    if let Some(count) = ack.synced_events {
        output.push_str(&format!("\n  {}: {count}", "Synced events".dimmed()));
    }
    output
}

/// Format a generated plan.
pub fn format_plan_pretty(plan: &PlanView) -> String {
    let mut output = format!("{}\n", "AI Study Plan".bold());
    output.push_str(&"─".repeat(RULE_WIDTH));
    output.push('\n');

    match plan.ai_mode() {
        AiMode::Real => output.push_str(&format!("{}\n", "Generated by the AI model".green())),
        AiMode::Mock => output.push_str(&format!("{}\n", "Generated by the fallback planner (mock mode)".yellow())),
    }

    if !plan.study_blocks.is_empty() {
        output.push_str(&format!("\n{}\n", "Schedule:".cyan()));
        for (i, block) in plan.study_blocks.iter().enumerate() {
            let icon = match block.kind {
                BlockKind::Break => "☕",
                BlockKind::Study | BlockKind::Other => "📚",
            };
            output.push_str(&format!(
                "  {}. {icon} {} ({} min)\n",
                i + 1,
                block.activity,
                block.duration
            ));
            if !block.description.is_empty() {
                output.push_str(&format!("     {}\n", block.description.dimmed()));
            }
        }
    }

    for (title, items) in [
        ("Focus techniques:", &plan.focus_techniques),
        ("Resources:", &plan.resource_recommendations),
        ("Distraction management:", &plan.distraction_management),
    ] {
        if items.is_empty() {
            continue;
        }
        output.push_str(&format!("\n{}\n", title.cyan()));
        for item in items {
            output.push_str(&format!("  • {item}\n"));
        }
    }

    let summary = plan.summary();
    output.push_str(&format!(
        "\n{}\n",
        format!(
            "{} blocks, {} techniques, AI mode: {}",
            summary.study_blocks, summary.focus_techniques, summary.ai_mode
        )
        .dimmed()
    ));
    output
}

/// Format the reply to a block request.
pub fn format_block_result_pretty(result: &BlockingResult, duration_minutes: u32) -> String {
    if !result.success {
        return format!("{} Website blocking failed - check permissions", "⚠".yellow());
    }
    let mut line = format!(
        "{} Blocked {} website{} for {}",
        "✓".green(),
        result.blocked_count,
        if result.blocked_count == 1 { "" } else { "s" },
        format_minutes(duration_minutes)
    );
    if result.mock_mode {
        line.push_str(&format!(" {}", "(mock mode)".yellow()));
    }
    line
}

/// Format what happened when a session ended.
pub fn format_end_report_pretty(report: &EndReport) -> String {
    let headline = match (report.reason, report.is_recorded()) {
        (EndReason::Completed, true) => "Session completed".green().bold(),
        (EndReason::Manual, true) => "Session ended".green().bold(),
        (_, false) => "Session ended locally (not recorded by the backend)".yellow().bold(),
    };

    let mut output = format!("{headline}\n");
    output.push_str(&format!("  {}: {}\n", "Subject".dimmed(), report.session.subject));
    output.push_str(&format!("  {}: {}/100\n", "Focus".dimmed(), report.outcome.focus_score));
    output.push_str(&format!(
        "  {}: {}/{}\n",
        "Goals".dimmed(),
        report.outcome.completed_goals.len(),
        report.session.goals.len()
    ));
    if let Some(err) = &report.error {
        output.push_str(&format!("  {}: {err}\n", "Error".red()));
        let hint = if err.is_transport() {
            "The backend could not be reached. Retry with"
        } else {
            "The backend refused the outcome. Check the session, then retry with"
        };
        output.push_str(&format!(
            "  {}\n",
            format!("{hint} 'studyctl session end {}'", report.session.id).dimmed()
        ));
    }
    output
}

/// Message for a run loop left without recording an outcome.
pub fn format_run_exit_pretty(session: &StudySession, discarded: bool) -> String {
    let headline = if discarded {
        format!("{} Session discarded: {}", "⚠".yellow(), session.subject)
    } else {
        format!("{} Stopped watching: {}", "ℹ".blue(), session.subject)
    };
    format!(
        "{headline}\n  {}",
        format!(
            "The backend still lists it as started. Record it with 'studyctl session end {}'",
            session.id
        )
        .dimmed()
    )
}

/// One-line live timer for the run loop.
pub fn format_snapshot_pretty(snapshot: &TimerSnapshot) -> String {
    let bar = render_progress_bar(snapshot.progress_percent, 30);
    let bar = match ProgressBand::from_percent(snapshot.progress_percent) {
        ProgressBand::Green => bar.green(),
        ProgressBand::Yellow => bar.yellow(),
        ProgressBand::Red => bar.red(),
    };
    let state = match snapshot.state {
        LifecycleState::Paused => " (paused)".yellow().to_string(),
        LifecycleState::Idle => " (idle)".dimmed().to_string(),
        LifecycleState::Active | LifecycleState::Completed => String::new(),
    };
    format!(
        "{bar} {} remaining{state}",
        format_mmss(snapshot.remaining_seconds).bold()
    )
}

/// Format the status probe.
pub fn format_system_health_pretty(health: &SystemHealth, base_url: &str) -> String {
    let mut output = format!("{} {}\n", "Backend".bold(), base_url.dimmed());
    output.push_str(&format!("  {} Backend\n", on_off(health.backend)));
    output.push_str(&format!("  {} AI planner\n", on_off(health.ai)));
    output.push_str(&format!("  {} Integrations\n", on_off(health.integrations)));
    if health.mock_mode {
        output.push_str(&format!("  {}\n", "Running in mock mode".yellow()));
    }
    output
}

/// Format a health check run.
pub fn format_health_report_pretty(report: &HealthReport) -> String {
    let mut output = format!("{}\n", "Health Check".bold());
    output.push_str(&"─".repeat(RULE_WIDTH));
    output.push('\n');

    for check in &report.checks {
        let icon = if check.passed() { "✓".green() } else { "✗".red() };
        output.push_str(&format!(
            "{icon} {}  {}\n",
            check.message,
            format!("{}ms ({})", check.response_time_ms, check.rating()).dimmed()
        ));
    }

    let summary = if report.all_passed() {
        report.summary().green()
    } else {
        report.summary().yellow()
    };
    output.push_str(&format!("\n{summary}"));
    output
}

/// Format the full preferences record.
pub fn format_preferences_pretty(prefs: &Preferences) -> String {
    let mut output = format!("{}\n", "Preferences".bold());
    output.push_str(&"─".repeat(RULE_WIDTH));
    output.push('\n');
    output.push_str(&format!(
        "  {}: {}\n",
        "Study duration".dimmed(),
        format_minutes(prefs.default_study_duration)
    ));
    output.push_str(&format!(
        "  {}: {}\n",
        "Break duration".dimmed(),
        format_minutes(prefs.default_break_duration)
    ));
    output.push_str(&format!(
        "  {}: {}\n",
        "Study times".dimmed(),
        prefs.preferred_study_times.join(", ")
    ));
    output.push_str(&format!(
        "  {} Notifications  {} Auto-block websites\n",
        on_off(prefs.notifications_enabled),
        on_off(prefs.auto_block_websites)
    ));

    output.push_str(&format!("\n{} ({})\n", "Blocked websites".cyan(), prefs.distracting_websites.len()));
    for site in &prefs.distracting_websites {
        output.push_str(&format!("  • {site}\n"));
    }
    output.push_str(&format!("\n{} ({})\n", "Focus techniques".cyan(), prefs.focus_techniques.len()));
    for technique in &prefs.focus_techniques {
        output.push_str(&format!("  • {technique}\n"));
    }
    output
}

/// Describe a list edit. `noun` is e.g. "website" or "focus technique".
pub fn format_list_change_pretty(change: &ListChange, noun: &str) -> String {
    match change {
        ListChange::Added(item) => format!("{} Added {noun}: {item}", "✓".green()),
        ListChange::AlreadyPresent(item) => format!("{} {item} is already in the list", "⚠".yellow()),
        ListChange::Removed(item) => format!("{} Removed {noun}: {item}", "✓".green()),
        ListChange::Missing(item) => format!("{} {item} is not in the list", "⚠".yellow()),
        ListChange::AddedDefaults(0) => format!("{} All default {noun}s are already in the list", "ℹ".blue()),
        ListChange::AddedDefaults(n) => format!("{} Added {n} default {noun}s", "✓".green()),
        ListChange::Cleared(n) => format!("{} Cleared {n} {noun}s", "✓".green()),
    }
}

/// Format backend analytics plus the local session summary.
pub fn format_analytics_pretty(analytics: Option<&Analytics>, summary: &SessionSummary) -> String {
    let mut output = format!("{}\n", "Study Analytics".bold());
    output.push_str(&"─".repeat(RULE_WIDTH));
    output.push('\n');

    output.push_str(&format!(
        "  {}: {} ({} completed, {} active)\n",
        "Sessions".dimmed(),
        summary.total_sessions,
        summary.completed_sessions,
        summary.active_sessions
    ));
    output.push_str(&format!(
        "  {}: {}\n",
        "Study time".dimmed(),
        format_minutes(summary.total_study_minutes)
    ));
    output.push_str(&format!("  {}: {}\n", "Last 7 days".dimmed(), summary.completed_7d));
    if let Some(score) = summary.average_focus_score {
        output.push_str(&format!("  {}: {score:.1}\n", "Average focus".dimmed()));
    }
    if let Some(rate) = summary.goal_completion_rate {
        output.push_str(&format!("  {}: {:.0}%\n", "Goals completed".dimmed(), rate * 100.0));
    }

    if !summary.minutes_by_subject.is_empty() {
        output.push_str(&format!("\n{}\n", "Minutes by subject:".cyan()));
        output.push_str(&render_bar_chart(&summary.minutes_by_subject, 16, 30));
        output.push('\n');
    }

    if let Some(analytics) = analytics {
        for (title, value) in [
            ("Weekly stats", &analytics.weekly_stats),
            ("Productivity trends", &analytics.productivity_trends),
            ("Recommendations", &analytics.recommendations),
            ("Focus insights", &analytics.focus_insights),
        ] {
            if value.is_null() {
                continue;
            }
            output.push_str(&format!("\n{}\n", title.cyan()));
            push_value(&mut output, value, 1);
        }
    }
    output
}

/// Render an arbitrary JSON value as an indented key listing.
fn push_value(output: &mut String, value: &Value, depth: usize) {
    let indent = "  ".repeat(depth);
    match value {
        Value::Object(map) => {
            for (key, inner) in map {
                if inner.is_object() || inner.is_array() {
                    output.push_str(&format!("{indent}{}:\n", key.replace('_', " ")));
                    push_value(output, inner, depth + 1);
                } else {
                    output.push_str(&format!("{indent}{}: {}\n", key.replace('_', " "), scalar(inner)));
                }
            }
        }
        Value::Array(items) => {
            for item in items {
                if item.is_object() || item.is_array() {
                    push_value(output, item, depth);
                } else {
                    output.push_str(&format!("{indent}• {}\n", scalar(item)));
                }
            }
        }
        other => output.push_str(&format!("{indent}{}\n", scalar(other))),
    }
}

fn scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "-".to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::SessionOutcome;
    use chrono::NaiveDate;
    use serde_json::json;

    fn make_session(subject: &str) -> StudySession {
        StudySession {
            id: "abc-123".to_string(),
            subject: subject.to_string(),
            duration_minutes: 25,
            start_time: None,
            end_time: None,
            goals: vec!["Review algebra".to_string(), "Practice".to_string()],
            completed_goals: vec!["Review algebra".to_string()],
            focus_score: None,
            notes: String::new(),
            distractions: 0,
            breaks_taken: 0,
        }
    }

    fn make_event(id: &str, title: &str, day: u32, hour: u32) -> CalendarEvent {
        CalendarEvent {
            id: id.to_string(),
            title: title.to_string(),
            description: String::new(),
            start_time: NaiveDate::from_ymd_opt(2024, 3, day).and_then(|d| d.and_hms_opt(hour, 0, 0)),
            end_time: None,
            duration_minutes: Some(45),
            event_type: EventType::Exam,
            status: Some("scheduled".to_string()),
        }
    }

    #[test]
    fn test_agenda_groups_by_day() {
        let agenda = Agenda::build(
            vec![make_event("e2", "Mock exam", 2, 14), make_event("e1", "Revise", 1, 9)],
            None,
        );
        let out = format_agenda_pretty(&agenda);
        assert!(out.starts_with("Calendar (2)"));
        assert!(out.contains("Friday, March 1, 2024"));
        assert!(out.contains("09:00-09:45  Revise  e1"));
        assert!(out.find("Revise").unwrap() < out.find("Mock exam").unwrap());
    }

    #[test]
    fn test_agenda_empty() {
        let out = format_agenda_pretty(&Agenda::default());
        assert!(out.contains("No events"));
    }

    #[test]
    fn test_event_detail() {
        let out = format_event_pretty(&make_event("e1", "Final", 1, 9));
        assert!(out.contains("Type: Exam"));
        assert!(out.contains("Ends: 2024-03-01 09:45"));
        assert!(out.contains("Duration: 45 min"));
        assert!(!out.contains("Description"));
    }

    #[test]
    fn test_calendar_ack_fallback_and_sync_count() {
        let ack = CalendarAck { success: Some(true), message: None, synced_events: Some(3) };
        let out = format_calendar_ack_pretty(&ack, "Calendar synced");
        assert!(out.contains("Calendar synced"));
        assert!(out.contains("Synced events: 3"));

        let failed = CalendarAck { success: Some(false), message: Some("Sync failed".to_string()), synced_events: None };
        assert!(format_calendar_ack_pretty(&failed, "ok").contains("⚠ Sync failed"));
    }

    #[test]
    fn test_sessions_empty() {
        let out = format_sessions_pretty(&[]);
        assert!(out.contains("Study Sessions (0)"));
        assert!(out.contains("No sessions yet"));
    }

    #[test]
    fn test_sessions_list() {
        let mut done = make_session("Chemistry");
        done.start_time = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap().and_hms_opt(9, 0, 0);
        done.focus_score = Some(80);
        let out = format_sessions_pretty(&[make_session("Math"), done]);

        assert!(out.contains("Study Sessions (2)"));
        assert!(out.contains("Math"));
        assert!(out.contains("2024-03-01 09:00"));
        assert!(out.contains("focus"));
    }

    #[test]
    fn test_session_detail_marks_goals() {
        let out = format_session_pretty(&make_session("Math"));
        assert!(out.contains("[x] Review algebra"));
        assert!(out.contains("[ ] Practice"));
        assert!(out.contains("25 minutes"));
    }

    #[test]
    fn test_end_report_with_error_suggests_retry() {
        let session = make_session("Math");
        let report = EndReport {
            outcome: SessionOutcome::completed(&session.goals, 75),
            session,
            reason: EndReason::Manual,
            error: Some(crate::error::StudyError::EndRejected("gone".to_string())),
        };
        let out = format_end_report_pretty(&report);
        assert!(out.contains("not recorded"));
        assert!(out.contains("refused the outcome"));
        assert!(out.contains("studyctl session end abc-123"));
        assert!(out.contains("2/2"));
    }

    #[test]
    fn test_end_report_transport_error_hint() {
        let session = make_session("Math");
        let report = EndReport {
            outcome: SessionOutcome::completed(&session.goals, 75),
            session,
            reason: EndReason::Completed,
            error: Some(crate::error::StudyError::Timeout("http://localhost:5000".to_string())),
        };
        let out = format_end_report_pretty(&report);
        assert!(out.contains("could not be reached"));
        assert!(!out.contains("refused the outcome"));
    }

    #[test]
    fn test_list_change_messages() {
        assert!(format_list_change_pretty(&ListChange::Added("x.com".to_string()), "website")
            .contains("Added website: x.com"));
        assert!(format_list_change_pretty(&ListChange::AddedDefaults(0), "website")
            .contains("already in the list"));
        assert!(format_list_change_pretty(&ListChange::Cleared(3), "website").contains("Cleared 3 websites"));
    }

    #[test]
    fn test_analytics_listing() {
        let analytics = Analytics {
            weekly_stats: json!({"total_sessions": 4, "total_hours": 2.5}),
            recommendations: json!(["Study earlier"]),
            ..Analytics::default()
        };
        let summary = SessionSummary::from_sessions(&[]);
        let out = format_analytics_pretty(Some(&analytics), &summary);

        assert!(out.contains("total sessions: 4"));
        assert!(out.contains("• Study earlier"));
        assert!(!out.contains("Focus insights"));
    }

    #[test]
    fn test_snapshot_line() {
        let snapshot = TimerSnapshot {
            state: LifecycleState::Paused,
            session_id: Some("s1".to_string()),
            subject: Some("Math".to_string()),
            remaining_seconds: 754,
            total_seconds: 1500,
            elapsed_seconds: 746,
            progress_percent: 49.7,
            is_active: true,
            is_paused: true,
        };
        let out = format_snapshot_pretty(&snapshot);
        assert!(out.contains("12:34"));
        assert!(out.contains("paused"));
    }
}
