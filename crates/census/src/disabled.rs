use std::fmt;
use std::io::Write;
use std::marker::PhantomData;
use std::sync::Once;

use census_types::{
    Delta, InstanceCounts, InvariantError, LeakReport, ReportMode, StatsReport, TypeKey,
};

use crate::Tracked;
use crate::config::{REPORT_ENV, ReportSink, report_env_value, report_mode_or_leaks};

static REPORT_DISABLED_WARNING_ONCE: Once = Once::new();

/// Zero-sized stand-in; records nothing.
pub struct InstanceGuard<T: Tracked> {
    _marker: PhantomData<fn() -> T>,
}

impl<T: Tracked> InstanceGuard<T> {
    #[inline(always)]
    pub fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<T: Tracked> Default for InstanceGuard<T> {
    #[inline(always)]
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Tracked> Clone for InstanceGuard<T> {
    #[inline(always)]
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl<T: Tracked> fmt::Debug for InstanceGuard<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("InstanceGuard")
            .field(&T::TYPE_KEY.as_str())
            .finish()
    }
}

#[inline(always)]
pub fn record(_type_key: &TypeKey, _delta: Delta) {}

/// Still rejects values other than `+1`/`-1`, so callers see the same
/// contract in both builds.
#[inline(always)]
pub fn record_raw(_type_key: &TypeKey, delta: i64) -> Result<(), InvariantError> {
    Delta::try_from(delta).map(|_| ())
}

#[inline(always)]
pub fn instance_count(_type_key: &TypeKey) -> u64 {
    0
}

#[inline(always)]
pub fn counts(_type_key: &TypeKey) -> Option<InstanceCounts> {
    None
}

#[inline(always)]
pub fn has_leaks() -> bool {
    false
}

#[inline(always)]
pub fn leak_report() -> LeakReport {
    LeakReport::default()
}

#[inline(always)]
pub fn stats_report() -> StatsReport {
    StatsReport::default()
}

#[inline(always)]
pub fn log_leaks(_report: &LeakReport) {}

#[inline(always)]
pub fn log_stats(_report: &StatsReport) {}

/// Pass-through shutdown report; never emits and always exits `0`.
#[derive(Debug)]
pub struct ShutdownReport {
    mode: ReportMode,
    sink: ReportSink,
}

impl ShutdownReport {
    pub fn new(mode: ReportMode) -> Self {
        Self {
            mode,
            sink: ReportSink::default(),
        }
    }

    /// Warns once on stderr when `CENSUS_REPORT` asks for a report this
    /// build cannot produce.
    pub fn from_env() -> Self {
        Self::from_env_value(report_env_value().as_deref())
    }

    pub fn from_env_value(value: Option<&str>) -> Self {
        let (mode, _) = report_mode_or_leaks(value);
        if report_requested(value, mode) {
            emit_disabled_report_warning_once();
        }
        Self::new(mode)
    }

    pub fn with_sink(mut self, sink: ReportSink) -> Self {
        self.sink = sink;
        self
    }

    #[inline(always)]
    pub fn with_writer(self, _writer: impl Write + Send + 'static) -> Self {
        self
    }

    pub fn mode(&self) -> ReportMode {
        self.mode
    }

    pub fn sink(&self) -> ReportSink {
        self.sink
    }

    #[inline(always)]
    pub fn exit_code(&self) -> i32 {
        0
    }

    #[inline(always)]
    pub fn render(&self) -> String {
        String::new()
    }

    #[inline(always)]
    pub fn finish(self) -> i32 {
        0
    }
}

fn report_requested(value: Option<&str>, mode: ReportMode) -> bool {
    value.is_some() && mode != ReportMode::Off
}

fn emit_disabled_report_warning_once() {
    REPORT_DISABLED_WARNING_ONCE.call_once(|| {
        eprintln!(
            "\n\x1b[1;33m\
======================================================================\n\
 CENSUS WARNING: {REPORT_ENV} requests a report, but census diagnostics\n\
 is disabled. Instances are not counted in this build.\n\
 Enable the `diagnostics` cargo feature of `census` to track them.\n\
======================================================================\x1b[0m\n"
        );
    });
}
