use std::fmt;
use std::str::FromStr;

use crate::InvariantError;

/// Which reports to emit at shutdown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReportMode {
    #[default]
    Off,
    Leaks,
    Stats,
    All,
}

impl ReportMode {
    pub fn includes_leaks(self) -> bool {
        matches!(self, Self::Leaks | Self::All)
    }

    pub fn includes_stats(self) -> bool {
        matches!(self, Self::Stats | Self::All)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Off => "off",
            Self::Leaks => "leaks",
            Self::Stats => "stats",
            Self::All => "all",
        }
    }
}

impl fmt::Display for ReportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReportMode {
    type Err = InvariantError;

    /// Blank input means `Off`, matching an unset environment variable.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Ok(Self::Off);
        }
        match trimmed.to_ascii_lowercase().as_str() {
            "off" => Ok(Self::Off),
            "leaks" => Ok(Self::Leaks),
            "stats" => Ok(Self::Stats),
            "all" => Ok(Self::All),
            _ => Err(InvariantError::UnknownReportMode(trimmed.to_owned())),
        }
    }
}
