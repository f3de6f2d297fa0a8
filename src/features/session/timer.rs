//! Countdown state for a running study session.
//!
//! Holds the integer seconds left and the paused flag. It does not own a
//! clock: every call to [`SessionTimer::tick`] is one elapsed second.

use serde::Serialize;

/// Remaining/total seconds of one session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SessionTimer {
    total_seconds: u32,
    remaining_seconds: u32,
    paused: bool,
}

impl SessionTimer {
    /// Create a running timer for `minutes` minutes.
    #[must_use]
    pub const fn from_minutes(minutes: u32) -> Self {
        let seconds = minutes.saturating_mul(60);
        Self {
            total_seconds: seconds,
            remaining_seconds: seconds,
            paused: false,
        }
    }

    /// Suppress decrements until [`resume`](Self::resume).
    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    /// Apply one elapsed second.
    ///
    /// Returns true exactly once: on the tick that brings the timer to zero.
    pub fn tick(&mut self) -> bool {
        if self.paused || self.remaining_seconds == 0 {
            return false;
        }
        self.remaining_seconds -= 1;
        self.remaining_seconds == 0
    }

    #[must_use]
    pub const fn total_seconds(&self) -> u32 {
        self.total_seconds
    }

    #[must_use]
    pub const fn remaining_seconds(&self) -> u32 {
        self.remaining_seconds
    }

    #[must_use]
    pub const fn elapsed_seconds(&self) -> u32 {
        self.total_seconds - self.remaining_seconds
    }

    #[must_use]
    pub const fn is_paused(&self) -> bool {
        self.paused
    }

    #[must_use]
    pub const fn is_finished(&self) -> bool {
        self.remaining_seconds == 0
    }

    /// Elapsed share of the total, 0.0 – 100.0.
    #[must_use]
    pub fn progress_percent(&self) -> f64 {
        progress_percent(self.total_seconds, self.remaining_seconds)
    }

    /// Remaining time as MM:SS.
    #[must_use]
    pub fn format_remaining(&self) -> String {
        format_mmss(self.remaining_seconds)
    }
}

/// `(total - remaining) / total * 100`, clamped to [0, 100]. A zero total counts as done.
#[must_use]
pub fn progress_percent(total_seconds: u32, remaining_seconds: u32) -> f64 {
    if total_seconds == 0 {
        return 100.0;
    }
    let elapsed = f64::from(total_seconds.saturating_sub(remaining_seconds));
    (elapsed / f64::from(total_seconds) * 100.0).clamp(0.0, 100.0)
}

/// Color band for a progress value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProgressBand {
    /// Under half way.
    Green,
    /// Under 80%.
    Yellow,
    /// Nearly done.
    Red,
}

impl ProgressBand {
    #[must_use]
    pub fn from_percent(percent: f64) -> Self {
        if percent < 50.0 {
            Self::Green
        } else if percent < 80.0 {
            Self::Yellow
        } else {
            Self::Red
        }
    }
}

/// Format seconds as MM:SS. Minutes are not wrapped into hours.
#[must_use]
pub fn format_mmss(seconds: u32) -> String {
    let minutes = seconds / 60;
    let seconds = seconds % 60;
    format!("{minutes:02}:{seconds:02}")
}

/// Format a minute count as a human-readable string.
#[must_use]
pub fn format_minutes(total_minutes: u32) -> String {
    let hours = total_minutes / 60;
    let minutes = total_minutes % 60;
    let plural = |n: u32| if n == 1 { "" } else { "s" };

    if hours > 0 {
        if minutes > 0 {
            format!(
                "{hours} hour{}, {minutes} minute{}",
                plural(hours),
                plural(minutes)
            )
        } else {
            format!("{hours} hour{}", plural(hours))
        }
    } else {
        format!("{minutes} minute{}", plural(minutes))
    }
}

/// Render a progress bar for a 0–100 percentage.
#[must_use]
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
pub fn render_progress_bar(percent: f64, width: usize) -> String {
    let filled = ((percent.clamp(0.0, 100.0) / 100.0) * width as f64) as usize;
    let empty = width.saturating_sub(filled);

    format!("[{}{}]", "█".repeat(filled), "░".repeat(empty))
}
