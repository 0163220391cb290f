//! # Observability
//!
//! Structured logging setup and the metrics emitted by secret providers.

pub mod logging;
pub mod metrics;

pub use logging::init_logging;
pub use metrics::describe_metrics;
