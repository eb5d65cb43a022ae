//! Observability: structured logging and request counters
//!
//! ```ignore
//! use hrms::observability::{Logger, MetricsRegistry};
//!
//! Logger::info("STORAGE_CONNECTED", &[("database", "fiber-hrms")]);
//!
//! let metrics = MetricsRegistry::new();
//! metrics.record_response(200);
//! ```

mod logger;
mod metrics;

pub use logger::{Logger, Severity};
pub use metrics::{MetricsRegistry, MetricsSnapshot};
