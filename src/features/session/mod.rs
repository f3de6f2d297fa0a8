//! Study session lifecycle.
//!
//! - [`timer`]: remaining-seconds bookkeeping and display helpers
//! - [`countdown`]: the cancellable one-second tick task
//! - [`validate`]: request/outcome checks
//! - [`controller`]: the state machine tying them to the backend

pub mod controller;
pub mod countdown;
pub mod timer;
pub mod validate;

pub use controller::{
    ControllerOptions, EndReason, EndReport, LifecycleState, SessionController, TimerSnapshot,
    DEFAULT_FOCUS_SCORE,
};
pub use countdown::{Countdown, Tick, TICK_PERIOD};
pub use timer::{format_minutes, format_mmss, progress_percent, render_progress_bar, ProgressBand, SessionTimer};
