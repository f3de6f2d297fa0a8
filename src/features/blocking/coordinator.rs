//! Translates block/unblock requests into calls on a [`BlockingService`].

use serde::Serialize;
use tracing::{debug, info};

use super::domain::normalize_websites;
use crate::api::{BlockRequest, BlockResponse};
use crate::core::BlockingService;
use crate::error::StudyError;

/// Normalized reply to a block request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BlockingResult {
    pub success: bool,
    pub blocked_count: u32,
    pub mock_mode: bool,
}

impl BlockingResult {
    /// Fill in what the backend left out: a missing count means every requested site.
    #[must_use]
    pub fn from_response(response: &BlockResponse, requested: usize) -> Self {
        let requested = u32::try_from(requested).unwrap_or(u32::MAX);
        Self {
            success: response.success,
            blocked_count: response.blocked_count.unwrap_or(if response.success { requested } else { 0 }),
            mock_mode: response.mock_mode.unwrap_or(false),
        }
    }
}

/// Build a validated block request.
///
/// # Errors
///
/// Returns [`StudyError::Validation`] if no usable site remains after
/// normalization or the duration is zero.
pub fn block_request<S: AsRef<str>>(websites: &[S], duration_minutes: u32) -> Result<BlockRequest, StudyError> {
    let websites = normalize_websites(websites);
    if websites.is_empty() {
        return Err(StudyError::Validation("No websites specified".to_string()));
    }
    if duration_minutes == 0 {
        return Err(StudyError::Validation(
            "Blocking duration must be at least one minute".to_string(),
        ));
    }
    Ok(BlockRequest {
        websites,
        duration: duration_minutes,
    })
}

/// Thin wrapper that remembers whether a block may be in effect.
///
/// A block counts as requested once the request has been sent, whatever the
/// reply: a timed-out or failed call may still have been applied.
pub struct BlockingCoordinator<B> {
    service: B,
    requested: bool,
}

impl<B: BlockingService> BlockingCoordinator<B> {
    #[must_use]
    pub const fn new(service: B) -> Self {
        Self {
            service,
            requested: false,
        }
    }

    /// Whether a block was sent through this coordinator and not lifted since.
    #[must_use]
    pub const fn block_requested(&self) -> bool {
        self.requested
    }

    /// Block `websites` for `duration_minutes`.
    ///
    /// # Errors
    ///
    /// Returns [`StudyError::Validation`] for bad input and
    /// [`StudyError::BlockingUnavailable`] when the service call fails.
    pub async fn block<S: AsRef<str>>(
        &mut self,
        websites: &[S],
        duration_minutes: u32,
    ) -> Result<BlockingResult, StudyError> {
        let request = block_request(websites, duration_minutes)?;
        debug!(count = request.websites.len(), duration_minutes, "requesting website block");

        self.requested = true;
        let response = self
            .service
            .block(&request)
            .await
            .map_err(|e| StudyError::BlockingUnavailable(e.to_string()))?;

        let result = BlockingResult::from_response(&response, request.websites.len());
        if result.success {
            info!(blocked = result.blocked_count, mock = result.mock_mode, "websites blocked");
        }
        Ok(result)
    }

    /// Lift a block requested through this coordinator, including one whose
    /// request failed.
    ///
    /// Succeeds without a network call when no block was ever requested.
    /// Returns whether the service was actually asked to unblock.
    ///
    /// # Errors
    ///
    /// Returns [`StudyError::BlockingUnavailable`] when the service call fails;
    /// the block is then still considered requested.
    pub async fn unblock(&mut self) -> Result<bool, StudyError> {
        if !self.requested {
            debug!("no block requested; skipping unblock");
            return Ok(false);
        }
        self.unblock_all().await?;
        Ok(true)
    }

    /// Ask the service to lift every block, whether or not this coordinator issued one.
    ///
    /// # Errors
    ///
    /// Returns [`StudyError::BlockingUnavailable`] when the service call fails.
    pub async fn unblock_all(&mut self) -> Result<bool, StudyError> {
        let response = self
            .service
            .unblock()
            .await
            .map_err(|e| StudyError::BlockingUnavailable(e.to_string()))?;
        self.requested = false;
        info!(success = response.success, "websites unblocked");
        Ok(response.success)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::UnblockResponse;
    use crate::core::MockBlockingService;

    fn ok_block(count: Option<u32>, mock: Option<bool>) -> BlockResponse {
        BlockResponse {
            success: true,
            blocked_count: count,
            mock_mode: mock,
            message: None,
        }
    }

    #[tokio::test]
    async fn test_block_normalizes_and_counts() {
        let mut service = MockBlockingService::new();
        service
            .expect_block()
            .withf(|req| req.websites == vec!["youtube.com".to_string(), "reddit.com".to_string()] && req.duration == 25)
            .times(1)
            .returning(|_| Ok(ok_block(None, Some(true))));

        let mut coordinator = BlockingCoordinator::new(service);
        let result = coordinator
            .block(&["https://www.youtube.com", "Reddit.com", "youtube.com"], 25)
            .await
            .unwrap();

        assert_eq!(
            result,
            BlockingResult {
                success: true,
                blocked_count: 2,
                mock_mode: true
            }
        );
        assert!(coordinator.block_requested());
    }

    #[tokio::test]
    async fn test_block_rejects_empty_list_without_calling_service() {
        let mut service = MockBlockingService::new();
        service.expect_block().never();

        let mut coordinator = BlockingCoordinator::new(service);
        let err = coordinator.block(&["  "], 25).await.unwrap_err();
        assert!(matches!(err, StudyError::Validation(_)));
        assert!(!coordinator.block_requested());
    }

    #[tokio::test]
    async fn test_block_failure_is_blocking_unavailable() {
        let mut service = MockBlockingService::new();
        service
            .expect_block()
            .returning(|_| Err(StudyError::Network("connection refused".to_string())));

        let mut coordinator = BlockingCoordinator::new(service);
        let err = coordinator.block(&["x.com"], 25).await.unwrap_err();
        assert!(matches!(err, StudyError::BlockingUnavailable(_)));
        assert!(coordinator.block_requested());
    }

    #[tokio::test]
    async fn test_unblock_after_timed_out_block() {
        let mut service = MockBlockingService::new();
        service
            .expect_block()
            .returning(|_| Err(StudyError::Timeout("http://localhost:5000".to_string())));
        service.expect_unblock().times(1).returning(|| {
            Ok(UnblockResponse {
                success: true,
                message: None,
            })
        });

        let mut coordinator = BlockingCoordinator::new(service);
        assert!(coordinator.block(&["x.com"], 25).await.is_err());
        assert!(coordinator.unblock().await.unwrap());
        assert!(!coordinator.block_requested());
    }

    #[tokio::test]
    async fn test_unblock_when_nothing_blocked_is_silent() {
        let mut service = MockBlockingService::new();
        service.expect_unblock().never();

        let mut coordinator = BlockingCoordinator::new(service);
        assert!(!coordinator.unblock().await.unwrap());
        assert!(!coordinator.unblock().await.unwrap());
    }

    #[tokio::test]
    async fn test_unblock_after_block() {
        let mut service = MockBlockingService::new();
        service.expect_block().returning(|_| Ok(ok_block(Some(1), None)));
        service.expect_unblock().times(1).returning(|| {
            Ok(UnblockResponse {
                success: true,
                message: None,
            })
        });

        let mut coordinator = BlockingCoordinator::new(service);
        coordinator.block(&["x.com"], 5).await.unwrap();
        assert!(coordinator.unblock().await.unwrap());
        assert!(!coordinator.block_requested());
        // Second call is a no-op.
        assert!(!coordinator.unblock().await.unwrap());
    }

    #[test]
    fn test_result_defaults() {
        let failed = BlockingResult::from_response(&BlockResponse::default(), 3);
        assert!(!failed.success);
        assert_eq!(failed.blocked_count, 0);
        assert!(!failed.mock_mode);
    }
}
