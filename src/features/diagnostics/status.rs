//! One-shot system status probe.

use serde::Serialize;
use tracing::warn;

use crate::api::{ApiClient, SystemStatus};
use crate::config::ApiConfig;

/// What the dashboard shows about the backend and its integrations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SystemHealth {
    pub backend: bool,
    pub ai: bool,
    pub integrations: bool,
    pub mock_mode: bool,
}

impl SystemHealth {
    #[must_use]
    pub fn from_status(status: &SystemStatus) -> Self {
        Self {
            backend: status.status == "running",
            ai: status.groq_available,
            integrations: status.mcp_connected,
            mock_mode: status.mock_mode,
        }
    }

    /// Everything down; used when the probe fails.
    #[must_use]
    pub const fn offline() -> Self {
        Self {
            backend: false,
            ai: false,
            integrations: false,
            mock_mode: false,
        }
    }
}

/// Query `/api/status` with the short status timeout. Never fails.
pub async fn probe_status(client: &ApiClient, config: &ApiConfig) -> SystemHealth {
    match client.system_status(config.status_timeout()).await {
        Ok(status) => SystemHealth::from_status(&status),
        Err(e) => {
            warn!(error = %e, "status probe failed");
            SystemHealth::offline()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_running_status() {
        let status = SystemStatus {
            status: "running".to_string(),
            mcp_connected: true,
            mock_mode: true,
            groq_available: false,
            timestamp: None,
        };
        assert_eq!(
            SystemHealth::from_status(&status),
            SystemHealth {
                backend: true,
                ai: false,
                integrations: true,
                mock_mode: true,
            }
        );
    }

    #[test]
    fn test_other_status_is_down() {
        let status = SystemStatus {
            status: "degraded".to_string(),
            ..SystemStatus::default()
        };
        assert!(!SystemHealth::from_status(&status).backend);
        assert_eq!(SystemHealth::offline(), SystemHealth::default());
    }
}
