use std::fmt::{self, Write as _};
use std::io::{self, Write};

use census_types::ReportMode;
use tracing::warn;

use crate::config::{REPORT_ENV, ReportSink, report_env_value, report_mode_or_leaks};

/// Reports leaks and usage when the program's work is done.
///
/// Create it at the top of `main` and let it drop (or call
/// [`finish`](Self::finish)) after every thread doing tracked work has
/// joined. It emits exactly once.
pub struct ShutdownReport {
    mode: ReportMode,
    sink: ReportSink,
    writer: Option<Box<dyn Write + Send>>,
    emitted: bool,
}

impl ShutdownReport {
    pub fn new(mode: ReportMode) -> Self {
        Self {
            mode,
            sink: ReportSink::default(),
            writer: None,
            emitted: false,
        }
    }

    /// Reads the mode from `CENSUS_REPORT`.
    ///
    /// An unrecognized value logs a warning and falls back to
    /// [`ReportMode::Leaks`].
    pub fn from_env() -> Self {
        Self::from_env_value(report_env_value().as_deref())
    }

    /// Same as [`from_env`](Self::from_env), for an already-read value.
    pub fn from_env_value(value: Option<&str>) -> Self {
        let (mode, err) = report_mode_or_leaks(value);
        if let Some(err) = err {
            warn!(env = REPORT_ENV, error = %err, "census: falling back to leak report");
        }
        Self::new(mode)
    }

    pub fn with_sink(mut self, sink: ReportSink) -> Self {
        self.sink = sink;
        self
    }

    /// Sends the text tables to `writer` instead of stderr.
    ///
    /// Only consulted with [`ReportSink::Stderr`].
    pub fn with_writer(mut self, writer: impl Write + Send + 'static) -> Self {
        self.writer = Some(Box::new(writer));
        self
    }

    pub fn mode(&self) -> ReportMode {
        self.mode
    }

    pub fn sink(&self) -> ReportSink {
        self.sink
    }

    /// `1` if any tracked type still has live instances, `0` otherwise.
    pub fn exit_code(&self) -> i32 {
        if super::has_leaks() { 1 } else { 0 }
    }

    /// The text the stderr sink would print right now.
    ///
    /// The leak table comes first when both are selected; [`ReportMode::Off`]
    /// renders nothing.
    pub fn render(&self) -> String {
        let mut out = String::new();
        if self.mode.includes_leaks() {
            let _ = writeln!(out, "{}", super::leak_report());
        }
        if self.mode.includes_stats() {
            let _ = writeln!(out, "{}", super::stats_report());
        }
        out
    }

    /// Emits the configured reports now and returns [`exit_code`](Self::exit_code).
    pub fn finish(mut self) -> i32 {
        self.emit();
        self.exit_code()
    }

    fn emit(&mut self) {
        if std::mem::replace(&mut self.emitted, true) {
            return;
        }
        match self.sink {
            ReportSink::Stderr => {
                let text = self.render();
                if text.is_empty() {
                    return;
                }
                let written = match self.writer.as_mut() {
                    Some(writer) => writer
                        .write_all(text.as_bytes())
                        .and_then(|()| writer.flush()),
                    None => io::stderr().lock().write_all(text.as_bytes()),
                };
                if let Err(err) = written {
                    warn!(error = %err, "census: failed to write shutdown report");
                }
            }
            ReportSink::Tracing => {
                if self.mode.includes_leaks() {
                    super::log_leaks(&super::leak_report());
                }
                if self.mode.includes_stats() {
                    super::log_stats(&super::stats_report());
                }
            }
        }
    }
}

impl fmt::Debug for ShutdownReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShutdownReport")
            .field("mode", &self.mode)
            .field("sink", &self.sink)
            .field("emitted", &self.emitted)
            .finish_non_exhaustive()
    }
}

impl Drop for ShutdownReport {
    fn drop(&mut self) {
        self.emit();
    }
}
