//! Opt-in instance counting for catching leaked objects.
//!
//! A type opts in by naming itself through [`Tracked`] and holding an
//! [`InstanceGuard`] as a field. Creating the guard (directly, through
//! `Default`, or through `Clone`) counts a new instance; dropping it, on any
//! exit path including unwinding, counts one less. Moving a value runs no
//! code and leaves the counters alone.
//!
//! At shutdown, once every thread doing tracked work has joined, ask the
//! registry what is still alive:
//!
//! ```rust
//! use census::{InstanceGuard, ShutdownReport, Tracked, TypeKey};
//!
//! struct Session {
//!     _census: InstanceGuard<Session>,
//! }
//!
//! impl Tracked for Session {
//!     const TYPE_KEY: TypeKey = TypeKey::from_static("app::Session");
//! }
//!
//! fn main() {
//!     let report = ShutdownReport::from_env();
//!     let session = Session { _census: InstanceGuard::new() };
//!     drop(session);
//!     std::process::exit(report.finish());
//! }
//! ```
//!
//! # Cargo features
//!
//! | Feature | Effect |
//! |---------|--------|
//! | *(default, none)* | Guards are zero-sized, every call is a no-op, reports are empty. |
//! | `diagnostics` | Guards record into the process-wide registry. |
//!
//! # Configuration
//!
//! `CENSUS_REPORT` picks what [`ShutdownReport`] prints: `off` (default),
//! `leaks`, `stats`, or `all`. Without `diagnostics`, setting it emits a
//! warning and nothing is reported.

pub use census_types::{
    Delta, InstanceCounts, InvariantError, LeakEntry, LeakReport, ReportMode, StatsEntry,
    StatsReport, TypeKey,
};

mod config;
pub use config::{REPORT_ENV, ReportSink};

#[cfg(not(feature = "diagnostics"))]
mod disabled;
#[cfg(feature = "diagnostics")]
mod enabled;

#[cfg(not(feature = "diagnostics"))]
pub use disabled::*;
#[cfg(feature = "diagnostics")]
pub use enabled::*;

/// A type whose live instances are counted.
///
/// The key must be unique across every tracked type in the process and
/// stable for its lifetime.
pub trait Tracked {
    const TYPE_KEY: TypeKey;
}
