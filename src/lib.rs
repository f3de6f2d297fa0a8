//! studyctl - a terminal client for the study orchestrator backend
//!
//! This crate runs timed study sessions against the backend's REST API,
//! coordinating website blocking, AI study plans, preferences and
//! diagnostics around a single session lifecycle controller.

#![deny(unsafe_code)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod api;
pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod features;
pub mod notify;
pub mod output;

pub use api::ApiClient;
pub use cli::args::{Cli, Commands, OutputFormat};
pub use error::StudyError;
