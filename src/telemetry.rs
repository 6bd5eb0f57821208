//! Tracing bootstrap and metric names.
//!
//! The library only emits through the `tracing` and `metrics` facades;
//! installing a subscriber or exporter is left to the binary embedding it.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

pub const ENV_LOG: &str = "CALIBRATION_LOG";

/// Counter of judged intervals, labelled `outcome = hit | miss`.
pub const METRIC_INTERVALS_SCORED: &str = "calibration_intervals_scored_total";
/// Counter of successfully finalised sessions.
pub const METRIC_SESSIONS_FINALIZED: &str = "calibration_sessions_finalized_total";
/// Counter of sessions rejected by validation, labelled `reason`.
pub const METRIC_SESSIONS_REJECTED: &str = "calibration_sessions_rejected_total";

/// Pick the filter directive: $CALIBRATION_LOG, then $RUST_LOG, then `fallback`.
///
/// The second element carries the parse error when $CALIBRATION_LOG is set
/// but unusable, so the caller can report it once a subscriber exists.
pub fn resolve_filter(fallback: &str) -> (EnvFilter, Option<String>) {
    let mut rejected = None;
    if let Ok(v) = std::env::var(ENV_LOG) {
        match EnvFilter::try_new(&v) {
            Ok(f) => return (f, None),
            Err(e) => rejected = Some(format!("{ENV_LOG}={v:?}: {e}")),
        }
    }
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    (filter, rejected)
}

/// Install a global subscriber. `json = true` switches to one JSON object per line.
///
/// Safe to call more than once; later calls are ignored.
pub fn init_tracing(fallback_filter: &str, json: bool) {
    let (filter, rejected) = resolve_filter(fallback_filter);

    let result = if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_target(false))
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().compact())
            .try_init()
    };

    if result.is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
    if let Some(reason) = rejected {
        tracing::warn!(%reason, "ignoring invalid log filter");
    }
}
