//! Tracing utilities for query observability.
//!
//! Enable the `tracing` feature to emit events via the `tracing` crate.
//! These macros no-op when the feature is disabled, avoiding `#[cfg]`
//! boilerplate at every call site.

/// Emit a debug-level event for a remote round-trip.
///
/// ```ignore
/// strata_trace_fetch!("find", query.class_name(), use_master_key);
/// ```
#[macro_export]
macro_rules! strata_trace_fetch {
    ($op:literal, $class:expr, $master_key:expr) => {
        #[cfg(feature = "tracing")]
        ::tracing::debug!(op = $op, class = %$class, master_key = $master_key, "strata.fetch");
    };
}

/// Emit an event at the given level with structured fields.
///
/// ```ignore
/// strata_trace_event!(warn, "strata.chunk", column = %column, "cursor unavailable");
/// ```
#[macro_export]
macro_rules! strata_trace_event {
    ($level:ident, $target:literal, $($rest:tt)+) => {
        #[cfg(feature = "tracing")]
        ::tracing::$level!(target: $target, $($rest)+);
    };
}
