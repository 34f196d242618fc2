pub(crate) mod guard;
pub(crate) mod shutdown;

pub use self::guard::*;
pub use self::shutdown::*;
pub use census_runtime::{log_leaks, log_stats};

use census_types::{Delta, InstanceCounts, InvariantError, LeakReport, StatsReport, TypeKey};

/// Records one lifecycle event in the process-wide registry.
///
/// Prefer holding an [`InstanceGuard`]; call this directly only for types
/// whose construction and destruction hooks cannot hold one.
pub fn record(type_key: &TypeKey, delta: Delta) {
    census_runtime::global().record(type_key, delta);
}

pub fn record_raw(type_key: &TypeKey, delta: i64) -> Result<(), InvariantError> {
    census_runtime::global().record_raw(type_key, delta)
}

pub fn instance_count(type_key: &TypeKey) -> u64 {
    census_runtime::global().instance_count(type_key)
}

pub fn counts(type_key: &TypeKey) -> Option<InstanceCounts> {
    census_runtime::global().counts(type_key)
}

pub fn has_leaks() -> bool {
    census_runtime::global().has_leaks()
}

pub fn leak_report() -> LeakReport {
    census_runtime::global().leak_report()
}

pub fn stats_report() -> StatsReport {
    census_runtime::global().stats_report()
}
