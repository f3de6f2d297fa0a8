//! Day-by-day listing of calendar events.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::api::CalendarEvent;

/// Events on one day, ordered by start time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AgendaDay {
    pub date: NaiveDate,
    pub events: Vec<CalendarEvent>,
}

/// Events grouped by the day they start on.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Agenda {
    pub days: Vec<AgendaDay>,
    /// Events without a usable start time.
    pub unscheduled: Vec<CalendarEvent>,
}

impl Agenda {
    /// Group `events` by day. With `only`, keep that day and drop
    /// unscheduled events.
    #[must_use]
    pub fn build(events: Vec<CalendarEvent>, only: Option<NaiveDate>) -> Self {
        let mut by_day: BTreeMap<NaiveDate, Vec<CalendarEvent>> = BTreeMap::new();
        let mut unscheduled = Vec::new();

        for event in events {
            match event.start_time {
                Some(start) if only.map_or(true, |day| day == start.date()) => {
                    by_day.entry(start.date()).or_default().push(event);
                }
                Some(_) => {}
                None if only.is_none() => unscheduled.push(event),
                None => {}
            }
        }

        let days = by_day
            .into_iter()
            .map(|(date, mut events)| {
                events.sort_by(|a, b| a.start_time.cmp(&b.start_time).then_with(|| a.title.cmp(&b.title)));
                AgendaDay { date, events }
            })
            .collect();

        Self { days, unscheduled }
    }

    /// Total number of events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.days.iter().map(|d| d.events.len()).sum::<usize>() + self.unscheduled.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::EventType;

    fn event(id: &str, title: &str, start: Option<(u32, u32, u32)>) -> CalendarEvent {
        CalendarEvent {
            id: id.to_string(),
            title: title.to_string(),
            description: String::new(),
            start_time: start.map(|(d, h, m)| {
                NaiveDate::from_ymd_opt(2024, 3, d)
                    .unwrap()
                    .and_hms_opt(h, m, 0)
                    .unwrap()
            }),
            end_time: None,
            duration_minutes: Some(30),
            event_type: EventType::StudySession,
            status: None,
        }
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    #[test]
    fn test_groups_and_sorts_by_day() {
        let agenda = Agenda::build(
            vec![
                event("3", "Late", Some((2, 18, 0))),
                event("1", "Morning", Some((1, 9, 0))),
                event("4", "Someday", None),
                event("2", "Early", Some((2, 7, 30))),
            ],
            None,
        );

        assert_eq!(agenda.len(), 4);
        assert_eq!(agenda.days.len(), 2);
        assert_eq!(agenda.days[0].date, day(1));
        let titles: Vec<&str> = agenda.days[1].events.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["Early", "Late"]);
        assert_eq!(agenda.unscheduled.len(), 1);
    }

    #[test]
    fn test_filter_to_one_day() {
        let agenda = Agenda::build(
            vec![
                event("1", "Morning", Some((1, 9, 0))),
                event("2", "Other day", Some((2, 9, 0))),
                event("3", "Someday", None),
            ],
            Some(day(1)),
        );

        assert_eq!(agenda.len(), 1);
        assert_eq!(agenda.days[0].events[0].id, "1");
        assert!(agenda.unscheduled.is_empty());
    }

    #[test]
    fn test_empty() {
        let agenda = Agenda::build(Vec::new(), None);
        assert!(agenda.is_empty());
    }
}
