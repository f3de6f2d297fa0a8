//! Configuration management for studyctl.
//!
//! This module handles loading and saving configuration from `~/.studyctl/`.

mod paths;
mod settings;

pub use paths::Paths;
pub use settings::{ApiConfig, BlockingConfig, ColorSetting, Config, GeneralConfig, SessionConfig};
