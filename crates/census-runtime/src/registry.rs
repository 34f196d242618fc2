use std::collections::BTreeMap;
use std::sync::LazyLock;

use census_types::{Delta, InstanceCounts, InvariantError, LeakReport, StatsReport, TypeKey};
use parking_lot::Mutex;
use tracing::{debug, error};

// ── Process-wide registry ────────────────────────────────
//
// Lazily built on first use and never torn down, so it stays queryable from
// the shutdown path after every tracked value has been dropped.

static GLOBAL: LazyLock<InstanceRegistry> = LazyLock::new(InstanceRegistry::new);

/// The registry shared by every tracked type in the process.
pub fn global() -> &'static InstanceRegistry {
    &GLOBAL
}

/// Type-keyed live/peak/total counters behind one lock.
///
/// Every mutation and every query takes the same lock, so all calls are
/// totally ordered. Entries are created on first record and never removed.
/// Callers only ever get owned snapshots back.
#[derive(Default)]
pub struct InstanceRegistry {
    counters: Mutex<BTreeMap<TypeKey, InstanceCounts>>,
}

impl InstanceRegistry {
    /// An empty registry, independent of [`global`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies one lifecycle record for `type_key`.
    ///
    /// A `Destroyed` with nothing left alive panics in debug builds. Release
    /// builds log the violation, keep `live` at zero, and carry on.
    pub fn record(&self, type_key: &TypeKey, delta: Delta) {
        debug_assert!(
            !type_key.as_str().is_empty(),
            "census type keys must be non-empty"
        );

        let (outcome, first_seen) = {
            let mut counters = self.counters.lock();
            let before = counters.len();
            let outcome = counters.entry(type_key.clone()).or_default().apply(delta);
            (outcome, counters.len() != before)
        };

        if first_seen {
            debug!(%type_key, "tracking new type");
        }
        if let Err(err) = outcome {
            invariant_violated(type_key, delta.as_i64(), &err);
        }
    }

    /// Like [`record`](Self::record), for callers holding a raw `+1`/`-1`.
    ///
    /// Any other value is rejected: it panics in debug builds and is
    /// returned as [`InvariantError::InvalidDelta`] in release builds,
    /// without touching the counters.
    pub fn record_raw(&self, type_key: &TypeKey, delta: i64) -> Result<(), InvariantError> {
        match Delta::try_from(delta) {
            Ok(delta) => {
                self.record(type_key, delta);
                Ok(())
            }
            Err(err) => {
                invariant_violated(type_key, delta, &err);
                Err(err)
            }
        }
    }

    /// Current live count for `type_key`, zero if it was never recorded.
    pub fn instance_count(&self, type_key: &TypeKey) -> u64 {
        self.counters
            .lock()
            .get(type_key)
            .map_or(0, |counts| counts.live)
    }

    /// Full counter snapshot for `type_key`.
    pub fn counts(&self, type_key: &TypeKey) -> Option<InstanceCounts> {
        self.counters.lock().get(type_key).copied()
    }

    pub fn has_leaks(&self) -> bool {
        self.counters.lock().values().any(InstanceCounts::is_leaking)
    }

    /// Types with live instances, in key order, plus their sum.
    pub fn leak_report(&self) -> LeakReport {
        LeakReport::collect(self.counters.lock().iter())
    }

    /// Counters for every type ever recorded, in key order.
    pub fn stats_report(&self) -> StatsReport {
        StatsReport::collect(self.counters.lock().iter())
    }

    /// Number of distinct types recorded so far.
    pub fn tracked_types(&self) -> usize {
        self.counters.lock().len()
    }
}

fn invariant_violated(type_key: &TypeKey, delta: i64, err: &InvariantError) {
    if cfg!(debug_assertions) {
        panic!("census invariant violated for `{type_key}` (delta {delta}): {err}");
    }
    error!(
        %type_key,
        delta,
        error = %err,
        "census invariant violated; counters kept best-effort"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    const A: TypeKey = TypeKey::from_static("A");
    const B: TypeKey = TypeKey::from_static("B");
    const C: TypeKey = TypeKey::from_static("C");

    fn apply(registry: &InstanceRegistry, key: &TypeKey, deltas: &[i64]) {
        for delta in deltas {
            registry.record_raw(key, *delta).expect("unit delta");
        }
    }

    #[test]
    fn partially_released_type_is_reported_as_leaking() {
        let registry = InstanceRegistry::new();
        apply(&registry, &A, &[1, 1, -1]);

        assert_eq!(
            registry.counts(&A),
            Some(InstanceCounts {
                live: 1,
                peak: 2,
                total_created: 2,
            })
        );
        assert!(registry.has_leaks());

        let report = registry.leak_report();
        assert_eq!(report.entries.len(), 1);
        assert_eq!(report.live_for("A"), Some(1));
        assert_eq!(report.total_leaked, 1);
    }

    #[test]
    fn unseen_type_reads_as_zero_and_stays_out_of_reports() {
        let registry = InstanceRegistry::new();
        apply(&registry, &A, &[1, -1]);

        assert_eq!(registry.instance_count(&B), 0);
        assert_eq!(registry.counts(&B), None);
        assert_eq!(registry.leak_report().live_for("B"), None);
        assert!(registry.stats_report().get("B").is_none());
        assert!(!registry.has_leaks());
        assert_eq!(registry.tracked_types(), 1);
    }

    #[test]
    fn fully_released_type_keeps_its_peak() {
        let registry = InstanceRegistry::new();
        apply(&registry, &C, &[1, 1, 1, -1, -1, -1]);

        assert_eq!(
            registry.counts(&C),
            Some(InstanceCounts {
                live: 0,
                peak: 3,
                total_created: 3,
            })
        );
        assert!(!registry.has_leaks());
        assert!(registry.leak_report().is_empty());

        let stats = registry.stats_report();
        let c = stats.get("C").expect("C stays in stats after release");
        assert_eq!((c.live, c.total_created, c.peak), (0, 3, 3));
    }

    #[test]
    fn has_leaks_looks_at_every_type() {
        let registry = InstanceRegistry::new();
        apply(&registry, &C, &[1, -1]);
        assert!(!registry.has_leaks());

        apply(&registry, &A, &[1]);
        assert!(registry.has_leaks());

        apply(&registry, &A, &[-1]);
        assert!(!registry.has_leaks());
    }

    #[test]
    fn reports_are_in_key_order() {
        let registry = InstanceRegistry::new();
        let zeta = TypeKey::new("zeta").expect("key");
        let alpha = TypeKey::new("alpha").expect("key");
        let mid = TypeKey::new("mid").expect("key");
        for key in [&zeta, &alpha, &mid] {
            registry.record(key, Delta::Created);
        }

        let leaked: Vec<String> = registry
            .leak_report()
            .entries
            .into_iter()
            .map(|entry| entry.type_key)
            .collect();
        assert_eq!(leaked, ["alpha", "mid", "zeta"]);

        let stats: Vec<String> = registry
            .stats_report()
            .entries
            .into_iter()
            .map(|entry| entry.type_key)
            .collect();
        assert_eq!(stats, ["alpha", "mid", "zeta"]);
    }

    #[test]
    fn queries_are_idempotent() {
        let registry = InstanceRegistry::new();
        apply(&registry, &A, &[1, 1, -1]);
        apply(&registry, &C, &[1, -1]);

        let first = (
            registry.instance_count(&A),
            registry.has_leaks(),
            registry.leak_report(),
            registry.stats_report(),
        );
        for _ in 0..3 {
            let again = (
                registry.instance_count(&A),
                registry.has_leaks(),
                registry.leak_report(),
                registry.stats_report(),
            );
            assert_eq!(again, first);
        }
    }

    #[test]
    fn live_equals_created_minus_destroyed_over_interleavings() {
        let registry = InstanceRegistry::new();
        let pattern = [1, 1, -1, 1, 1, 1, -1, -1, 1, -1];
        let mut live = 0i64;
        let mut peak = 0i64;
        let mut created = 0u64;
        for delta in pattern {
            registry.record_raw(&A, delta).expect("unit delta");
            live += delta;
            peak = peak.max(live);
            if delta > 0 {
                created += 1;
            }
            let counts = registry.counts(&A).expect("A recorded");
            assert_eq!(counts.live as i64, live);
            assert_eq!(counts.peak as i64, peak);
            assert_eq!(counts.total_created, created);
        }
    }

    #[test]
    fn balanced_records_from_many_threads_net_to_zero() {
        const THREADS: u64 = 32;
        let registry = InstanceRegistry::new();
        thread::scope(|scope| {
            for _ in 0..THREADS {
                scope.spawn(|| {
                    registry.record(&A, Delta::Created);
                    thread::yield_now();
                    registry.record(&A, Delta::Destroyed);
                });
            }
        });

        let counts = registry.counts(&A).expect("A recorded");
        assert_eq!(counts.live, 0);
        assert_eq!(counts.total_created, THREADS);
        assert!(counts.peak >= 1 && counts.peak <= THREADS);
        assert!(!registry.has_leaks());
    }

    #[test]
    fn contended_records_keep_totals_exact() {
        const THREADS: u64 = 8;
        const ROUNDS: u64 = 500;
        let registry = InstanceRegistry::new();
        thread::scope(|scope| {
            for _ in 0..THREADS {
                scope.spawn(|| {
                    for _ in 0..ROUNDS {
                        registry.record(&A, Delta::Created);
                        registry.record(&B, Delta::Created);
                        registry.record(&A, Delta::Destroyed);
                    }
                });
            }
        });

        assert_eq!(registry.instance_count(&A), 0);
        assert_eq!(registry.instance_count(&B), THREADS * ROUNDS);
        let stats = registry.stats_report();
        assert_eq!(stats.get("A").expect("A").total_created, THREADS * ROUNDS);
        assert_eq!(stats.get("B").expect("B").peak, THREADS * ROUNDS);
        assert_eq!(registry.leak_report().total_leaked, THREADS * ROUNDS);
    }

    #[cfg(debug_assertions)]
    #[test]
    #[should_panic(expected = "live count would go negative")]
    fn destroy_without_create_panics_in_debug() {
        let registry = InstanceRegistry::new();
        registry.record(&A, Delta::Destroyed);
    }

    #[cfg(debug_assertions)]
    #[test]
    #[should_panic(expected = "delta must be +1 or -1, got 2")]
    fn invalid_raw_delta_panics_in_debug() {
        let registry = InstanceRegistry::new();
        let _ = registry.record_raw(&A, 2);
    }

    #[cfg(debug_assertions)]
    #[test]
    fn registry_survives_a_debug_panic() {
        let registry = InstanceRegistry::new();
        registry.record(&A, Delta::Created);
        let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            registry.record(&B, Delta::Destroyed);
        }));
        assert!(outcome.is_err());

        registry.record(&A, Delta::Destroyed);
        assert_eq!(registry.instance_count(&A), 0);
        assert_eq!(registry.instance_count(&B), 0);
    }

    #[cfg(not(debug_assertions))]
    #[test]
    fn underflow_is_clamped_in_release() {
        let registry = InstanceRegistry::new();
        registry.record(&A, Delta::Destroyed);
        assert_eq!(registry.instance_count(&A), 0);

        registry.record(&A, Delta::Created);
        assert_eq!(
            registry.counts(&A),
            Some(InstanceCounts {
                live: 1,
                peak: 1,
                total_created: 1,
            })
        );
    }

    #[cfg(not(debug_assertions))]
    #[test]
    fn invalid_raw_delta_is_returned_in_release() {
        let registry = InstanceRegistry::new();
        assert_eq!(
            registry.record_raw(&A, 0),
            Err(InvariantError::InvalidDelta(0))
        );
        assert_eq!(registry.counts(&A), None);
    }
}
