//! # Metrics
//!
//! Counters emitted through the `metrics` facade. The crate installs no
//! exporter; the host application decides where they go. Without an
//! installed recorder every call is a no-op.

use metrics::{counter, describe_counter, Unit};

pub const CACHE_LOOKUPS_TOTAL: &str = "secrets_cache_lookups_total";
pub const REMOTE_CALLS_TOTAL: &str = "secrets_remote_calls_total";

/// Register descriptions with the installed recorder.
pub fn describe_metrics() {
    describe_counter!(
        CACHE_LOOKUPS_TOTAL,
        Unit::Count,
        "Secret cache lookups, labelled by result (hit or miss)"
    );
    describe_counter!(
        REMOTE_CALLS_TOTAL,
        Unit::Count,
        "Calls made to the parameter store, labelled by operation and outcome"
    );
}

/// Record a cache lookup
pub fn record_cache_lookup(hit: bool) {
    let result = if hit { "hit" } else { "miss" };
    counter!(CACHE_LOOKUPS_TOTAL, "result" => result).increment(1);
}

/// Record a parameter store call and how it ended
pub fn record_remote_call(operation: &'static str, outcome: &'static str) {
    counter!(REMOTE_CALLS_TOTAL, "operation" => operation, "outcome" => outcome).increment(1);
}
