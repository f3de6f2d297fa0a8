//! Study analytics.
//!
//! The backend's `/study/analytics` payload is passed through as-is; this
//! module adds a local summary over the session list and a bar chart.

pub mod chart;
pub mod summary;

pub use chart::render_bar_chart;
pub use summary::SessionSummary;
