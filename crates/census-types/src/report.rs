use std::fmt;

use facet::Facet;

use crate::{InstanceCounts, TypeKey};

#[derive(Facet, Debug, Clone, PartialEq, Eq)]
pub struct LeakEntry {
    pub type_key: String,
    /// Instances still alive when the report was taken.
    pub live: u64,
}

/// Every type with outstanding instances, ordered by key.
#[derive(Facet, Debug, Clone, Default, PartialEq, Eq)]
pub struct LeakReport {
    pub entries: Vec<LeakEntry>,
    /// Sum of `live` over `entries`.
    pub total_leaked: u64,
}

impl LeakReport {
    /// Builds a report from `(key, counts)` pairs already in key order,
    /// keeping only the ones with live instances.
    pub fn collect<'a>(
        counters: impl IntoIterator<Item = (&'a TypeKey, &'a InstanceCounts)>,
    ) -> Self {
        let entries: Vec<LeakEntry> = counters
            .into_iter()
            .filter(|(_, counts)| counts.is_leaking())
            .map(|(key, counts)| LeakEntry {
                type_key: key.as_str().to_owned(),
                live: counts.live,
            })
            .collect();
        let total_leaked = entries.iter().map(|entry| entry.live).sum();
        Self {
            entries,
            total_leaked,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn live_for(&self, type_key: &str) -> Option<u64> {
        self.entries
            .iter()
            .find(|entry| entry.type_key == type_key)
            .map(|entry| entry.live)
    }

    pub fn to_json(&self) -> Result<String, String> {
        facet_json::to_string(self).map_err(|e| e.to_string())
    }
}

impl fmt::Display for LeakReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "census leaks (type, live):")?;
        for entry in &self.entries {
            writeln!(f, "{}, {}", entry.type_key, entry.live)?;
        }
        if self.total_leaked == 0 {
            writeln!(f, "no leaks")
        } else {
            writeln!(f, "{} leaks found", self.total_leaked)
        }
    }
}

#[derive(Facet, Debug, Clone, PartialEq, Eq)]
pub struct StatsEntry {
    pub type_key: String,
    pub live: u64,
    pub total_created: u64,
    pub peak: u64,
}

/// Counters for every type ever recorded, ordered by key.
#[derive(Facet, Debug, Clone, Default, PartialEq, Eq)]
pub struct StatsReport {
    pub entries: Vec<StatsEntry>,
}

impl StatsReport {
    pub fn collect<'a>(
        counters: impl IntoIterator<Item = (&'a TypeKey, &'a InstanceCounts)>,
    ) -> Self {
        Self {
            entries: counters
                .into_iter()
                .map(|(key, counts)| StatsEntry {
                    type_key: key.as_str().to_owned(),
                    live: counts.live,
                    total_created: counts.total_created,
                    peak: counts.peak,
                })
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, type_key: &str) -> Option<&StatsEntry> {
        self.entries.iter().find(|entry| entry.type_key == type_key)
    }

    pub fn to_json(&self) -> Result<String, String> {
        facet_json::to_string(self).map_err(|e| e.to_string())
    }
}

impl fmt::Display for StatsReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "census stats (type, live, total, peak):")?;
        for entry in &self.entries {
            writeln!(
                f,
                "{}, {}, {}, {}",
                entry.type_key, entry.live, entry.total_created, entry.peak
            )?;
        }
        Ok(())
    }
}
