//! Collaborator traits for the session lifecycle.
//!
//! The controller only sees these seams, so the REST client can be swapped
//! for an in-memory double in tests.

use async_trait::async_trait;

use crate::api::{BlockRequest, BlockResponse, SessionOutcome, UnblockResponse};
use crate::error::StudyError;

/// Records session transitions.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Mark a session as started.
    async fn start_session(&self, id: &str) -> Result<(), StudyError>;

    /// Record the outcome of a session and mark it ended.
    async fn end_session(&self, id: &str, outcome: &SessionOutcome) -> Result<(), StudyError>;
}

/// Restricts access to distracting websites for a while.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BlockingService: Send + Sync {
    async fn block(&self, request: &BlockRequest) -> Result<BlockResponse, StudyError>;

    async fn unblock(&self) -> Result<UnblockResponse, StudyError>;
}
