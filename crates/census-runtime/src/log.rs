use census_types::{LeakReport, StatsReport};
use tracing::{info, warn};

/// Emits a leak report as structured `tracing` events.
///
/// One `warn!` per leaking type followed by a summary, or a single `info!`
/// when nothing leaked.
pub fn log_leaks(report: &LeakReport) {
    if report.is_empty() {
        info!("census: no leaked instances");
        return;
    }
    for entry in &report.entries {
        warn!(type_key = %entry.type_key, live = entry.live, "census: leaked instances");
    }
    warn!(
        types = report.entries.len(),
        total_leaked = report.total_leaked,
        "census: leaks found"
    );
}

pub fn log_stats(report: &StatsReport) {
    for entry in &report.entries {
        info!(
            type_key = %entry.type_key,
            live = entry.live,
            total_created = entry.total_created,
            peak = entry.peak,
            "census: instance stats"
        );
    }
}
