//! Local statistics over the session list.
//!
//! Computed client-side from `GET /study/sessions`, alongside whatever the
//! backend's analytics endpoint reports.

use std::collections::HashMap;

use chrono::{Duration, Local, NaiveDateTime};
use serde::Serialize;

use crate::api::{SessionStatus, StudySession};

/// Aggregate numbers for a set of sessions.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSummary {
    /// Every session, whatever its status
    pub total_sessions: usize,
    /// Sessions with an end time
    pub completed_sessions: usize,
    /// Started but not ended
    pub active_sessions: usize,
    /// Planned minutes of completed sessions
    pub total_study_minutes: u32,
    /// Completed in the last 7 days
    pub completed_7d: usize,
    /// Mean focus score of sessions that have one
    pub average_focus_score: Option<f64>,
    /// Completed goals over planned goals of completed sessions
    pub goal_completion_rate: Option<f64>,
    /// Completed minutes per subject, largest first
    pub minutes_by_subject: Vec<(String, u32)>,
}

impl SessionSummary {
    #[must_use]
    pub fn from_sessions(sessions: &[StudySession]) -> Self {
        Self::from_sessions_at(sessions, Local::now().naive_local())
    }

    /// Like [`from_sessions`](Self::from_sessions) with an explicit "now".
    #[must_use]
    pub fn from_sessions_at(sessions: &[StudySession], now: NaiveDateTime) -> Self {
        let week_ago = now - Duration::days(7);

        let completed: Vec<&StudySession> = sessions
            .iter()
            .filter(|s| s.status() == SessionStatus::Completed)
            .collect();

        let active_sessions = sessions
            .iter()
            .filter(|s| s.status() == SessionStatus::Active)
            .count();

        let completed_7d = completed
            .iter()
            .filter(|s| s.end_time.is_some_and(|end| end >= week_ago))
            .count();

        let scores: Vec<f64> = sessions
            .iter()
            .filter_map(|s| s.focus_score)
            .map(f64::from)
            .collect();
        let average_focus_score = if scores.is_empty() {
            None
        } else {
            Some(scores.iter().sum::<f64>() / scores.len() as f64)
        };

        let planned_goals: usize = completed.iter().map(|s| s.goals.len()).sum();
        let done_goals: usize = completed
            .iter()
            .map(|s| s.completed_goals.len().min(s.goals.len()))
            .sum();
        let goal_completion_rate = if planned_goals > 0 {
            Some(done_goals as f64 / planned_goals as f64)
        } else {
            None
        };

        let mut by_subject: HashMap<&str, u32> = HashMap::new();
        for session in &completed {
            *by_subject.entry(session.subject.as_str()).or_default() += session.duration_minutes;
        }
        let mut minutes_by_subject: Vec<(String, u32)> = by_subject
            .into_iter()
            .map(|(subject, minutes)| (subject.to_string(), minutes))
            .collect();
        minutes_by_subject.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

        Self {
            total_sessions: sessions.len(),
            completed_sessions: completed.len(),
            active_sessions,
            total_study_minutes: completed.iter().map(|s| s.duration_minutes).sum(),
            completed_7d,
            average_focus_score,
            goal_completion_rate,
            minutes_by_subject,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, day)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    fn session(subject: &str, minutes: u32, ended: Option<u32>, score: Option<u8>) -> StudySession {
        StudySession {
            id: format!("{subject}-{minutes}"),
            subject: subject.to_string(),
            duration_minutes: minutes,
            start_time: ended.map(|d| at(d, 9)),
            end_time: ended.map(|d| at(d, 10)),
            goals: vec!["a".to_string(), "b".to_string()],
            completed_goals: if ended.is_some() { vec!["a".to_string()] } else { Vec::new() },
            focus_score: score,
            notes: String::new(),
            distractions: 0,
            breaks_taken: 0,
        }
    }

    #[test]
    fn test_empty() {
        let summary = SessionSummary::from_sessions(&[]);
        assert_eq!(summary.total_sessions, 0);
        assert_eq!(summary.total_study_minutes, 0);
        assert!(summary.average_focus_score.is_none());
        assert!(summary.goal_completion_rate.is_none());
        assert!(summary.minutes_by_subject.is_empty());
    }

    #[test]
    fn test_counts_and_minutes() {
        let mut active = session("Physics", 45, None, None);
        active.start_time = Some(at(20, 8));

        let sessions = vec![
            session("Math", 25, Some(19), Some(80)),
            session("Math", 50, Some(2), Some(60)),
            session("Chemistry", 30, Some(18), None),
            session("History", 60, None, None),
            active,
        ];
        let summary = SessionSummary::from_sessions_at(&sessions, at(20, 12));

        assert_eq!(summary.total_sessions, 5);
        assert_eq!(summary.completed_sessions, 3);
        assert_eq!(summary.active_sessions, 1);
        assert_eq!(summary.total_study_minutes, 105);
        assert_eq!(summary.completed_7d, 2);
        assert!((summary.average_focus_score.unwrap() - 70.0).abs() < f64::EPSILON);
        assert!((summary.goal_completion_rate.unwrap() - 0.5).abs() < f64::EPSILON);
        assert_eq!(
            summary.minutes_by_subject,
            vec![("Math".to_string(), 75), ("Chemistry".to_string(), 30)]
        );
    }
}
