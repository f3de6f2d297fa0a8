//! Multi-endpoint health check.

use std::time::Duration;

use serde::Serialize;
use tokio::task::JoinSet;
use tracing::{debug, warn};

use crate::api::{ApiClient, ProbeResult};

/// Delay between starting consecutive checks.
pub const STAGGER: Duration = Duration::from_millis(200);

/// Endpoints probed by a health check, as (name, path).
pub const HEALTH_ENDPOINTS: &[(&str, &str)] = &[
    ("Backend Health", "/health"),
    ("System Status", "/api/status"),
    ("Study API", "/api/study/test"),
    ("Calendar API", "/api/calendar/test"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckStatus {
    Passed,
    Failed,
}

/// Qualitative bucket for a response time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ResponseRating {
    Excellent,
    Good,
    Acceptable,
    Slow,
}

impl std::fmt::Display for ResponseRating {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Excellent => write!(f, "Excellent"),
            Self::Good => write!(f, "Good"),
            Self::Acceptable => write!(f, "Acceptable"),
            Self::Slow => write!(f, "Slow"),
        }
    }
}

#[must_use]
pub const fn rate_response_time(millis: u64) -> ResponseRating {
    match millis {
        0..=99 => ResponseRating::Excellent,
        100..=499 => ResponseRating::Good,
        500..=999 => ResponseRating::Acceptable,
        _ => ResponseRating::Slow,
    }
}

/// Result of probing one endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthCheck {
    pub name: String,
    pub status: CheckStatus,
    pub message: String,
    pub response_time_ms: u64,
}

impl HealthCheck {
    #[must_use]
    pub fn from_probe(name: &str, probe: &ProbeResult) -> Self {
        let (status, message) = if probe.passed() {
            let code = probe.status.unwrap_or_default();
            (CheckStatus::Passed, format!("{name} - Status: {code}"))
        } else {
            let reason = probe
                .status
                .map_or_else(|| "Network error".to_string(), |code| code.to_string());
            (CheckStatus::Failed, format!("{name} - Error: {reason}"))
        };
        Self {
            name: name.to_string(),
            status,
            message,
            response_time_ms: probe.elapsed_ms,
        }
    }

    #[must_use]
    pub fn passed(&self) -> bool {
        self.status == CheckStatus::Passed
    }

    #[must_use]
    pub const fn rating(&self) -> ResponseRating {
        rate_response_time(self.response_time_ms)
    }
}

/// All checks from one run, in endpoint order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HealthReport {
    pub checks: Vec<HealthCheck>,
}

impl HealthReport {
    #[must_use]
    pub fn passed(&self) -> usize {
        self.checks.iter().filter(|c| c.passed()).count()
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.checks.len()
    }

    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.passed() == self.total()
    }

    /// One-line verdict for the notifier.
    #[must_use]
    pub fn summary(&self) -> String {
        if self.all_passed() {
            format!("All {} health checks passed!", self.total())
        } else {
            format!("{}/{} health checks passed", self.passed(), self.total())
        }
    }
}

/// Probe every endpoint in [`HEALTH_ENDPOINTS`].
///
/// Checks start [`STAGGER`] apart and run concurrently, each with its own
/// `timeout`. Failures are recorded in the report, never returned.
pub async fn run_health_check(client: &ApiClient, timeout: Duration) -> HealthReport {
    run_checks(client, HEALTH_ENDPOINTS, timeout, STAGGER).await
}

/// Probe `endpoints` concurrently; see [`run_health_check`].
pub async fn run_checks(
    client: &ApiClient,
    endpoints: &[(&str, &str)],
    timeout: Duration,
    stagger: Duration,
) -> HealthReport {
    let mut tasks: JoinSet<(usize, HealthCheck)> = JoinSet::new();

    for (index, (name, path)) in endpoints.iter().enumerate() {
        let client = client.clone();
        let name = (*name).to_string();
        let path = (*path).to_string();
        let delay = stagger.saturating_mul(u32::try_from(index).unwrap_or(u32::MAX));

        tasks.spawn(async move {
            tokio::time::sleep(delay).await;
            let probe = client.probe(&path, timeout).await;
            debug!(%name, status = ?probe.status, ms = probe.elapsed_ms, "health check finished");
            (index, HealthCheck::from_probe(&name, &probe))
        });
    }

    let mut slots: Vec<Option<HealthCheck>> = vec![None; endpoints.len()];
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((index, check)) => {
                if let Some(slot) = slots.get_mut(index) {
                    *slot = Some(check);
                }
            }
            Err(e) => warn!(error = %e, "health check task failed"),
        }
    }

    HealthReport {
        checks: slots.into_iter().flatten().collect(),
    }
}
