//! Plain data shared by the census runtime and its facade.
//!
//! Nothing in here touches global state: these are the per-type counter
//! records, the keys they are filed under, and the owned report snapshots
//! handed out to callers.

use std::error::Error;
use std::fmt;

mod counts;
mod key;
mod mode;
mod report;

pub use counts::InstanceCounts;
pub use key::{Delta, TypeKey};
pub use mode::ReportMode;
pub use report::{LeakEntry, LeakReport, StatsEntry, StatsReport};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvariantError {
    EmptyField(&'static str),
    /// A raw delta other than `+1` or `-1`.
    InvalidDelta(i64),
    /// A `Destroyed` record with no live instance left to destroy.
    Underflow,
    UnknownReportMode(String),
}

impl fmt::Display for InvariantError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyField(field) => write!(f, "{field} must be non-empty"),
            Self::InvalidDelta(got) => write!(f, "delta must be +1 or -1, got {got}"),
            Self::Underflow => write!(
                f,
                "live count would go negative (destroyed without a matching create)"
            ),
            Self::UnknownReportMode(value) => write!(
                f,
                "unknown report mode {value:?}, expected one of off, leaks, stats, all"
            ),
        }
    }
}

impl Error for InvariantError {}
