//! Distraction blocking.
//!
//! Normalizes website lists and coordinates block/unblock calls with the
//! backend's blocking service.

pub mod coordinator;
pub mod domain;

pub use coordinator::{block_request, BlockingCoordinator, BlockingResult};
pub use domain::{default_blocklist, normalize_domain, normalize_websites, DEFAULT_BLOCKLIST};
