//! Core abstractions for studyctl.
//!
//! This module provides the collaborator traits shared across features.

mod traits;

pub use traits::{BlockingService, SessionStore};

#[cfg(test)]
pub use traits::{MockBlockingService, MockSessionStore};
