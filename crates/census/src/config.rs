use census_types::{InvariantError, ReportMode};

/// Environment variable selecting the shutdown report.
pub const REPORT_ENV: &str = "CENSUS_REPORT";

/// Where a [`ShutdownReport`](crate::ShutdownReport) sends its output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReportSink {
    /// Plain text tables on stderr.
    #[default]
    Stderr,
    /// Structured `tracing` events.
    Tracing,
}

pub(crate) fn report_env_value() -> Option<String> {
    std::env::var_os(REPORT_ENV).map(|value| value.to_string_lossy().into_owned())
}

/// An unset variable means [`ReportMode::Off`].
pub(crate) fn parse_report_mode(value: Option<&str>) -> Result<ReportMode, InvariantError> {
    value.map_or(Ok(ReportMode::Off), str::parse)
}

/// Like [`parse_report_mode`], but an unrecognized value falls back to
/// [`ReportMode::Leaks`]. The parse error is handed back for logging.
pub(crate) fn report_mode_or_leaks(value: Option<&str>) -> (ReportMode, Option<InvariantError>) {
    match parse_report_mode(value) {
        Ok(mode) => (mode, None),
        Err(err) => (ReportMode::Leaks, Some(err)),
    }
}
