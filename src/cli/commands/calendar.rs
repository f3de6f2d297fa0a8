//! Calendar command implementations.

use chrono::{Local, NaiveDateTime, Timelike};
use colored::Colorize;
use tracing::warn;

use crate::api::ApiClient;
use crate::cli::args::{CalendarCommands, OutputFormat};
use crate::error::StudyError;
use crate::features::calendar::{self, Agenda, CALENDAR_NOT_CONFIGURED};
use crate::output::{format_agenda, format_calendar_ack, format_event, format_event_created};

/// Execute calendar subcommands.
///
/// # Errors
///
/// Returns validation errors before any request, otherwise backend errors.
pub async fn calendar(client: &ApiClient, cmd: CalendarCommands, format: OutputFormat) -> Result<String, StudyError> {
    match cmd {
        CalendarCommands::List { date } => {
            let events = client.calendar_events(date).await?;
            format_agenda(&Agenda::build(events, date), format)
        }
        CalendarCommands::Show { id } => {
            let event = client.get_event(&id).await?;
            format_event(&event, format)
        }
        CalendarCommands::Create {
            title,
            at,
            duration,
            event_type,
            description,
        } => {
            let start = start_time(at.as_deref())?;
            let event = calendar::new_event(&title, start, duration, &description, event_type)?;
            match client.create_event(&event).await {
                Ok(created) => format_event_created(&created, &event, format),
                Err(e) if e.to_string().contains(CALENDAR_NOT_CONFIGURED) => {
                    warn!(error = %e, "external calendar not configured");
                    eprintln!(
                        "{} Event saved locally. Google Calendar integration not configured.",
                        "⚠".yellow()
                    );
                    Ok(String::new())
                }
                Err(e) => Err(e),
            }
        }
        CalendarCommands::Update {
            id,
            title,
            description,
            event_type,
        } => {
            let update = calendar::event_update(title.as_deref(), description.as_deref(), event_type)?;
            let ack = client.update_event(&id, &update).await?;
            format_calendar_ack(&ack, "Event updated", format)
        }
        CalendarCommands::Delete { id } => {
            let ack = client.delete_event(&id).await?;
            format_calendar_ack(&ack, "Event deleted", format)
        }
        CalendarCommands::ScheduleBreak {
            study,
            break_minutes,
            at,
        } => {
            let schedule = calendar::break_schedule(study, break_minutes, start_time(at.as_deref())?)?;
            let ack = client.schedule_break(&schedule).await?;
            format_calendar_ack(&ack, "Break scheduled", format)
        }
        CalendarCommands::Sync => {
            let ack = client.sync_calendar().await?;
            format_calendar_ack(&ack, "Calendar synced", format)
        }
    }
}

/// Parse `--at`, defaulting to the current minute.
fn start_time(at: Option<&str>) -> Result<NaiveDateTime, StudyError> {
    let now = Local::now().naive_local();
    match at {
        Some(raw) => calendar::parse_start(raw, now),
        None => Ok(now.with_second(0).and_then(|t| t.with_nanosecond(0)).unwrap_or(now)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_start_is_whole_minute() {
        let start = start_time(None).unwrap();
        assert_eq!(start.second(), 0);
        assert_eq!(start.nanosecond(), 0);
    }

    #[test]
    fn test_bad_start_is_validation() {
        assert!(matches!(start_time(Some("someday")), Err(StudyError::Validation(_))));
    }
}
