//! Input checks run before any request leaves the client.

use crate::api::{NewSession, PlanRequest, SessionOutcome};
use crate::error::StudyError;

/// Highest allowed focus score.
pub const MAX_FOCUS_SCORE: u8 = 100;

/// Build a session request from raw form input.
///
/// Trims the subject and goals and drops blank goals.
///
/// # Errors
///
/// Returns [`StudyError::Validation`] for an empty subject or a zero duration.
pub fn new_session<S: AsRef<str>>(
    subject: &str,
    duration_minutes: u32,
    goals: &[S],
) -> Result<NewSession, StudyError> {
    let subject = subject.trim();
    if subject.is_empty() {
        return Err(StudyError::Validation("Please enter a subject".to_string()));
    }
    if duration_minutes == 0 {
        return Err(StudyError::Validation(
            "Duration must be at least one minute".to_string(),
        ));
    }

    Ok(NewSession {
        subject: subject.to_string(),
        duration: duration_minutes,
        goals: clean_goals(goals),
    })
}

/// Build a study plan request; same rules as [`new_session`].
///
/// # Errors
///
/// Returns [`StudyError::Validation`] for an empty subject or a zero duration.
pub fn plan_request<S: AsRef<str>>(
    subject: &str,
    duration_minutes: u32,
    goals: &[S],
) -> Result<PlanRequest, StudyError> {
    let NewSession {
        subject,
        duration,
        goals,
    } = new_session(subject, duration_minutes, goals)?;
    Ok(PlanRequest {
        subject,
        duration,
        goals,
    })
}

/// Check an outcome against the session it ends.
///
/// # Errors
///
/// Returns [`StudyError::Validation`] if the focus score is above 100 or a
/// completed goal is not one of the session's goals.
pub fn outcome(outcome: &SessionOutcome, goals: &[String]) -> Result<(), StudyError> {
    if outcome.focus_score > MAX_FOCUS_SCORE {
        return Err(StudyError::Validation(format!(
            "Focus score must be between 0 and {MAX_FOCUS_SCORE}"
        )));
    }
    if let Some(unknown) = outcome.completed_goals.iter().find(|g| !goals.contains(g)) {
        return Err(StudyError::Validation(format!(
            "\"{unknown}\" is not one of this session's goals"
        )));
    }
    Ok(())
}

fn clean_goals<S: AsRef<str>>(goals: &[S]) -> Vec<String> {
    goals
        .iter()
        .map(|g| g.as_ref().trim())
        .filter(|g| !g.is_empty())
        .map(ToString::to_string)
        .collect()
}
