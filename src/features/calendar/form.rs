//! Calendar input checks and start-time parsing.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};

use crate::api::{BreakSchedule, EventType, EventUpdate, NewEvent};
use crate::error::StudyError;

/// Length of a new event when none is given.
pub const DEFAULT_EVENT_MINUTES: u32 = 30;

/// Time used when only a day is given.
const DAY_START: (u32, u32) = (9, 0);

/// Parse a start time relative to `now`.
///
/// Accepts:
/// - `2024-03-01T09:00`, `2024-03-01 09:00` (seconds optional)
/// - `2024-03-01` (09:00 that day)
/// - `14:30` (today)
/// - `today`, `tomorrow`, optionally followed by a time
///
/// # Errors
///
/// Returns [`StudyError::Validation`] for anything else.
pub fn parse_start(raw: &str, now: NaiveDateTime) -> Result<NaiveDateTime, StudyError> {
    let input = raw.trim();
    let today = now.date();

    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"] {
        if let Ok(start) = NaiveDateTime::parse_from_str(input, format) {
            return Ok(start);
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        return Ok(at_day_start(date));
    }
    if let Some(time) = parse_time(input) {
        return Ok(today.and_time(time));
    }

    let lowered = input.to_lowercase();
    let mut parts = lowered.split_whitespace();
    let day = match parts.next() {
        Some("today") => Some(today),
        Some("tomorrow") => Some(today + Duration::days(1)),
        _ => None,
    };
    if let Some(day) = day {
        match (parts.next(), parts.next()) {
            (None, _) => return Ok(at_day_start(day)),
            (Some(time), None) => {
                if let Some(time) = parse_time(time) {
                    return Ok(day.and_time(time));
                }
            }
            _ => {}
        }
    }

    Err(StudyError::Validation(format!(
        "Invalid start time '{input}' (expected YYYY-MM-DDTHH:MM, YYYY-MM-DD, HH:MM, today or tomorrow)"
    )))
}

fn parse_time(input: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(input, "%H:%M").ok()
}

fn at_day_start(date: NaiveDate) -> NaiveDateTime {
    let (hour, minute) = DAY_START;
    date.and_hms_opt(hour, minute, 0)
        .unwrap_or_else(|| date.and_time(NaiveTime::MIN))
}

/// Build an event request from raw form input.
///
/// # Errors
///
/// Returns [`StudyError::Validation`] for a blank title or a zero duration.
pub fn new_event(
    title: &str,
    start_time: NaiveDateTime,
    duration_minutes: u32,
    description: &str,
    event_type: EventType,
) -> Result<NewEvent, StudyError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(StudyError::Validation("Please enter an event title".to_string()));
    }
    if duration_minutes == 0 {
        return Err(StudyError::Validation(
            "Event duration must be at least one minute".to_string(),
        ));
    }

    Ok(NewEvent {
        title: title.to_string(),
        start_time,
        duration: duration_minutes,
        description: description.trim().to_string(),
        event_type,
    })
}

/// Build an event update from the fields the user gave.
///
/// # Errors
///
/// Returns [`StudyError::Validation`] when nothing would change or the new
/// title is blank.
pub fn event_update(
    title: Option<&str>,
    description: Option<&str>,
    event_type: Option<EventType>,
) -> Result<EventUpdate, StudyError> {
    let title = title.map(str::trim);
    if title.is_some_and(str::is_empty) {
        return Err(StudyError::Validation("Event title cannot be empty".to_string()));
    }

    let update = EventUpdate {
        title: title.map(ToString::to_string),
        description: description.map(|d| d.trim().to_string()),
        event_type,
    };
    if update == EventUpdate::default() {
        return Err(StudyError::Validation(
            "Nothing to change. See 'studyctl calendar update --help'".to_string(),
        ));
    }
    Ok(update)
}

/// Build a study/break schedule request.
///
/// # Errors
///
/// Returns [`StudyError::Validation`] if either length is zero.
pub fn break_schedule(
    study_minutes: u32,
    break_minutes: u32,
    start_time: NaiveDateTime,
) -> Result<BreakSchedule, StudyError> {
    if study_minutes == 0 || break_minutes == 0 {
        return Err(StudyError::Validation(
            "Study and break lengths must be at least one minute".to_string(),
        ));
    }
    Ok(BreakSchedule {
        study_duration: study_minutes,
        break_duration: break_minutes,
        start_time,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(8, 15, 42)
            .unwrap()
    }

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    #[test]
    fn test_parse_start_formats() {
        assert_eq!(parse_start("2024-03-05T14:30", now()).unwrap(), at(2024, 3, 5, 14, 30));
        assert_eq!(parse_start("2024-03-05 14:30", now()).unwrap(), at(2024, 3, 5, 14, 30));
        assert_eq!(parse_start("2024-03-05T14:30:00", now()).unwrap(), at(2024, 3, 5, 14, 30));
        assert_eq!(parse_start("2024-03-05", now()).unwrap(), at(2024, 3, 5, 9, 0));
        assert_eq!(parse_start("16:00", now()).unwrap(), at(2024, 3, 1, 16, 0));
        assert_eq!(parse_start("today", now()).unwrap(), at(2024, 3, 1, 9, 0));
        assert_eq!(parse_start(" Tomorrow 10:15 ", now()).unwrap(), at(2024, 3, 2, 10, 15));
    }

    #[test]
    fn test_parse_start_rejects_garbage() {
        for raw in ["", "next week", "2024-13-01", "tomorrow at 10", "25:00"] {
            assert!(
                matches!(parse_start(raw, now()), Err(StudyError::Validation(_))),
                "{raw:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_new_event_trims_and_checks() {
        let event = new_event("  Exam prep ", at(2024, 3, 1, 9, 0), 45, " chapter 3 ", EventType::Exam).unwrap();
        assert_eq!(event.title, "Exam prep");
        assert_eq!(event.description, "chapter 3");
        assert_eq!(event.duration, 45);

        assert!(matches!(
            new_event("   ", at(2024, 3, 1, 9, 0), 30, "", EventType::Break),
            Err(StudyError::Validation(m)) if m == "Please enter an event title"
        ));
        assert!(new_event("Exam", at(2024, 3, 1, 9, 0), 0, "", EventType::Exam).is_err());
    }

    #[test]
    fn test_event_update_requires_a_change() {
        assert!(matches!(
            event_update(None, None, None),
            Err(StudyError::Validation(m)) if m.starts_with("Nothing to change")
        ));
        assert!(event_update(Some("  "), None, None).is_err());

        let update = event_update(Some(" Renamed "), None, Some(EventType::Meeting)).unwrap();
        assert_eq!(update.title.as_deref(), Some("Renamed"));
        assert_eq!(update.description, None);
        assert_eq!(update.event_type, Some(EventType::Meeting));
    }

    #[test]
    fn test_break_schedule_rejects_zero() {
        assert!(break_schedule(25, 0, now()).is_err());
        assert!(break_schedule(0, 5, now()).is_err());
        let schedule = break_schedule(50, 10, now()).unwrap();
        assert_eq!(schedule.study_duration, 50);
        assert_eq!(schedule.break_duration, 10);
    }
}
