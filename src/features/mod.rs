//! Feature implementations for studyctl.
//!
//! - Study session lifecycle and countdown
//! - Website blocking
//! - AI study plans
//! - Preferences
//! - Diagnostics
//! - Analytics
//! - Calendar events

pub mod analytics;
pub mod blocking;
pub mod calendar;
pub mod diagnostics;
pub mod plan;
pub mod preferences;
pub mod session;
