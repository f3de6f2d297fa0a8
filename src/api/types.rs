use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A study session as stored by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudySession {
    pub id: String,
    pub subject: String,
    pub duration_minutes: u32,
    #[serde(default, with = "timestamp")]
    pub start_time: Option<NaiveDateTime>,
    #[serde(default, with = "timestamp")]
    pub end_time: Option<NaiveDateTime>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub goals: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub completed_goals: Vec<String>,
    #[serde(default)]
    pub focus_score: Option<u8>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub notes: String,
    #[serde(default)]
    pub distractions: u32,
    #[serde(default)]
    pub breaks_taken: u32,
}

/// Where a session is in its lifecycle, derived from its timestamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Scheduled,
    Active,
    Completed,
}

impl std::fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Scheduled => write!(f, "scheduled"),
            Self::Active => write!(f, "active"),
            Self::Completed => write!(f, "completed"),
        }
    }
}

impl StudySession {
    #[must_use]
    pub const fn status(&self) -> SessionStatus {
        match (self.start_time, self.end_time) {
            (None, _) => SessionStatus::Scheduled,
            (Some(_), None) => SessionStatus::Active,
            (Some(_), Some(_)) => SessionStatus::Completed,
        }
    }
}

/// Body of `POST /study/session`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewSession {
    pub subject: String,
    pub duration: u32,
    pub goals: Vec<String>,
}

/// Body of `POST /study/session/{id}/end`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionOutcome {
    pub focus_score: u8,
    pub completed_goals: Vec<String>,
    pub notes: String,
    pub distractions: u32,
    pub breaks_taken: u32,
}

impl SessionOutcome {
    /// Outcome recorded when the countdown runs out: every goal completed.
    #[must_use]
    pub fn completed(goals: &[String], focus_score: u8) -> Self {
        Self {
            focus_score,
            completed_goals: goals.to_vec(),
            notes: String::new(),
            distractions: 0,
            breaks_taken: 0,
        }
    }
}

/// Body of `POST /study/block-websites`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockRequest {
    pub websites: Vec<String>,
    pub duration: u32,
}

/// Reply from `POST /study/block-websites`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub blocked_count: Option<u32>,
    #[serde(default)]
    pub mock_mode: Option<bool>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Reply from `POST /study/unblock-websites`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnblockResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
}

/// Body of `POST /study/plan`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanRequest {
    pub subject: String,
    pub duration: u32,
    pub goals: Vec<String>,
}

/// AI-generated study plan. The backend owns its shape, so it is kept as raw JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StudyPlan {
    pub raw: Value,
}

/// Reply from `GET /api/status`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemStatus {
    pub status: String,
    pub mcp_connected: bool,
    pub mock_mode: bool,
    pub groq_available: bool,
    pub timestamp: Option<String>,
}

/// Reply from `GET /health`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HealthStatus {
    pub status: String,
    pub timestamp: Option<String>,
}

/// Reply from `GET /study/analytics`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Analytics {
    pub weekly_stats: Value,
    pub productivity_trends: Value,
    pub recommendations: Value,
    pub focus_insights: Value,
}

/// Kind of calendar event. Unknown kinds from the backend read as `Other`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    #[default]
    StudySession,
    Break,
    Assignment,
    Exam,
    Meeting,
    #[serde(other)]
    Other,
}

impl EventType {
    /// Kinds a user can pick when creating or updating an event.
    pub const CHOICES: [Self; 5] = [
        Self::StudySession,
        Self::Break,
        Self::Assignment,
        Self::Exam,
        Self::Meeting,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::StudySession => "study_session",
            Self::Break => "break",
            Self::Assignment => "assignment",
            Self::Exam => "exam",
            Self::Meeting => "meeting",
            Self::Other => "other",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::StudySession => "Study Session",
            Self::Break => "Break",
            Self::Assignment => "Assignment",
            Self::Exam => "Exam",
            Self::Meeting => "Meeting",
            Self::Other => "Event",
        }
    }
}

impl std::fmt::Display for EventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for EventType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase().replace('-', "_");
        Self::CHOICES
            .into_iter()
            .find(|t| t.as_str() == wanted)
            .ok_or_else(|| {
                let names: Vec<&str> = Self::CHOICES.iter().map(|t| t.as_str()).collect();
                format!("unknown event type '{s}' (expected one of: {})", names.join(", "))
            })
    }
}

/// A calendar event as stored by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub id: String,
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, with = "timestamp")]
    pub start_time: Option<NaiveDateTime>,
    #[serde(default, with = "timestamp")]
    pub end_time: Option<NaiveDateTime>,
    #[serde(default)]
    pub duration_minutes: Option<u32>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub event_type: EventType,
    #[serde(default)]
    pub status: Option<String>,
}

impl CalendarEvent {
    /// End of the event: the stored end time, else start plus duration, else the start.
    #[must_use]
    pub fn end(&self) -> Option<NaiveDateTime> {
        self.end_time.or_else(|| {
            let start = self.start_time?;
            Some(start + chrono::Duration::minutes(i64::from(self.duration_minutes.unwrap_or(0))))
        })
    }
}

/// Body of `POST /calendar/event`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewEvent {
    pub title: String,
    #[serde(with = "required_timestamp")]
    pub start_time: NaiveDateTime,
    pub duration: u32,
    pub description: String,
    pub event_type: EventType,
}

/// Reply from `POST /calendar/event`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CreatedEvent {
    pub message: Option<String>,
    pub event_id: Option<String>,
}

/// Body of `PUT /calendar/event/{id}`. Only the fields that are set are sent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_type: Option<EventType>,
}

/// Body of `POST /calendar/schedule-break`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreakSchedule {
    pub study_duration: u32,
    pub break_duration: u32,
    #[serde(with = "required_timestamp")]
    pub start_time: NaiveDateTime,
}

/// Acknowledgement from the calendar update, delete, schedule-break and sync calls.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalendarAck {
    pub success: Option<bool>,
    pub message: Option<String>,
    pub synced_events: Option<u32>,
}

/// Error body the backend sends alongside a failure status.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ErrorBody {
    pub error: String,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Backend timestamps are ISO-8601 without an offset (server local time).
/// RFC 3339 values are accepted too and kept at their wall-clock time.
mod timestamp {
    use chrono::{DateTime, NaiveDateTime};
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

    pub fn serialize<S>(value: &Option<NaiveDateTime>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(t) => serializer.serialize_str(&t.format(FORMAT).to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let Some(raw) = Option::<String>::deserialize(deserializer)? else {
            return Ok(None);
        };
        if raw.is_empty() {
            return Ok(None);
        }
        parse(&raw)
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {raw}")))
    }

    pub fn parse(raw: &str) -> Option<NaiveDateTime> {
        if let Ok(t) = DateTime::parse_from_rfc3339(raw) {
            return Some(t.naive_local());
        }
        NaiveDateTime::parse_from_str(raw, FORMAT).ok()
    }
}

/// Same wire format as [`timestamp`], for fields that are always present.
mod required_timestamp {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        super::timestamp::serialize(&Some(*value), serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        super::timestamp::parse(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {raw}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_session_from_backend_dict() {
        let session: StudySession = serde_json::from_value(json!({
            "id": "abc",
            "subject": "Math",
            "duration_minutes": 25,
            "start_time": "2024-03-01T10:00:00.123456",
            "end_time": null,
            "goals": ["Review algebra"],
            "completed_goals": [],
            "focus_score": null,
            "notes": "",
            "distractions": 0,
            "breaks_taken": 0
        }))
        .unwrap();

        assert_eq!(session.id, "abc");
        assert_eq!(session.goals, vec!["Review algebra".to_string()]);
        assert!(session.start_time.is_some());
        assert_eq!(session.status(), SessionStatus::Active);
    }

    #[test]
    fn test_session_minimal_fields() {
        let session: StudySession = serde_json::from_value(json!({
            "id": "1",
            "subject": "History",
            "duration_minutes": 45,
            "goals": null,
            "notes": null
        }))
        .unwrap();

        assert!(session.goals.is_empty());
        assert!(session.notes.is_empty());
        assert_eq!(session.status(), SessionStatus::Scheduled);
    }

    #[test]
    fn test_rfc3339_timestamp_accepted() {
        let parsed = timestamp::parse("2024-03-01T10:00:00+02:00").unwrap();
        assert_eq!(parsed.format("%H:%M").to_string(), "10:00");
        assert!(timestamp::parse("yesterday").is_none());
    }

    #[test]
    fn test_completed_status() {
        let session: StudySession = serde_json::from_value(json!({
            "id": "1",
            "subject": "Physics",
            "duration_minutes": 30,
            "start_time": "2024-03-01T10:00:00",
            "end_time": "2024-03-01T10:30:00"
        }))
        .unwrap();
        assert_eq!(session.status(), SessionStatus::Completed);
    }

    #[test]
    fn test_completed_outcome_marks_all_goals() {
        let goals = vec!["a".to_string(), "b".to_string()];
        let outcome = SessionOutcome::completed(&goals, 75);
        assert_eq!(outcome.completed_goals, goals);
        assert_eq!(outcome.focus_score, 75);
        assert_eq!(outcome.distractions, 0);

        let body = serde_json::to_value(&outcome).unwrap();
        assert_eq!(body["focus_score"], 75);
        assert_eq!(body["breaks_taken"], 0);
    }

    #[test]
    fn test_calendar_event_from_backend_dict() {
        let event: CalendarEvent = serde_json::from_value(json!({
            "id": "e1",
            "title": "Exam prep",
            "description": null,
            "start_time": "2024-03-01T09:00:00",
            "duration_minutes": 30,
            "created_at": "2024-02-28T12:00:00",
            "event_type": "office_hours",
            "status": "scheduled"
        }))
        .unwrap();

        assert_eq!(event.event_type, EventType::Other);
        assert!(event.description.is_empty());
        let end = event.end().unwrap();
        assert_eq!(end.format("%H:%M").to_string(), "09:30");
    }

    #[test]
    fn test_event_type_from_str() {
        assert_eq!("exam".parse::<EventType>().unwrap(), EventType::Exam);
        assert_eq!("Study-Session".parse::<EventType>().unwrap(), EventType::StudySession);
        let err = "party".parse::<EventType>().unwrap_err();
        assert!(err.contains("study_session, break, assignment, exam, meeting"));
    }

    #[test]
    fn test_new_event_wire_format() {
        let start = chrono::NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();
        let body = serde_json::to_value(NewEvent {
            title: "Exam prep".to_string(),
            start_time: start,
            duration: 30,
            description: String::new(),
            event_type: EventType::StudySession,
        })
        .unwrap();
        assert_eq!(body["start_time"], "2024-03-01T09:00:00");
        assert_eq!(body["event_type"], "study_session");

        let update = serde_json::to_value(EventUpdate {
            title: Some("Renamed".to_string()),
            ..EventUpdate::default()
        })
        .unwrap();
        assert_eq!(update, json!({"title": "Renamed"}));
    }
}
