use facet::Facet;

use crate::{Delta, InvariantError};

/// Per-type counters.
///
/// `peak >= live` and `total_created >= live` hold after every successful
/// [`apply`](Self::apply).
#[derive(Facet, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InstanceCounts {
    /// Instances created and not yet destroyed.
    pub live: u64,
    /// Highest value `live` has reached.
    pub peak: u64,
    /// Instances ever created.
    pub total_created: u64,
}

impl InstanceCounts {
    /// Applies one lifecycle record.
    ///
    /// A `Destroyed` with `live == 0` returns [`InvariantError::Underflow`]
    /// and leaves the counters untouched.
    pub fn apply(&mut self, delta: Delta) -> Result<(), InvariantError> {
        match delta {
            Delta::Created => {
                self.live += 1;
                self.total_created += 1;
            }
            Delta::Destroyed => {
                self.live = self.live.checked_sub(1).ok_or(InvariantError::Underflow)?;
            }
        }
        if self.live > self.peak {
            self.peak = self.live;
        }
        Ok(())
    }

    pub fn is_leaking(&self) -> bool {
        self.live > 0
    }
}
