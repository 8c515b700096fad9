//! HTTP middleware and logging setup.

pub mod auth;
pub mod logging;
pub mod metrics;
pub mod rate_limit;

pub use auth::{require_admin, AdminAuth};
pub use metrics::{init_metrics, metrics_handler, metrics_middleware};
pub use rate_limit::{rate_limit_middleware, RateLimiterState};
