//! Backend diagnostics: the status probe and the endpoint health check.

pub mod health;
pub mod status;

pub use health::{
    rate_response_time, run_checks, run_health_check, CheckStatus, HealthCheck, HealthReport,
    ResponseRating, HEALTH_ENDPOINTS, STAGGER,
};
pub use status::{probe_status, SystemHealth};
