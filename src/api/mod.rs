//! REST client for the study orchestrator backend.

pub mod client;
pub mod types;

pub use client::{ApiClient, ProbeResult};
pub use types::*;
