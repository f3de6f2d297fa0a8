//! Calendar events kept by the backend.
//!
//! Events are listed as a per-day agenda; creating, updating, deleting,
//! scheduling breaks and syncing go straight to the backend after local
//! input checks.

pub mod agenda;
pub mod form;

pub use agenda::{Agenda, AgendaDay};
pub use form::{break_schedule, event_update, new_event, parse_start, DEFAULT_EVENT_MINUTES};

/// Backend error text when no external calendar is configured. The event is
/// still kept locally by the backend.
pub const CALENDAR_NOT_CONFIGURED: &str = "Google Calendar service not available";
