use std::fmt;
use std::marker::PhantomData;

use census_types::Delta;

use crate::Tracked;

/// Counts one live instance of `T` for as long as it exists.
///
/// Hold it as a field of `T`. It is zero-sized and `Send + Sync` whatever
/// `T` is.
pub struct InstanceGuard<T: Tracked> {
    _marker: PhantomData<fn() -> T>,
}

impl<T: Tracked> InstanceGuard<T> {
    pub fn new() -> Self {
        census_runtime::global().record(&T::TYPE_KEY, Delta::Created);
        Self {
            _marker: PhantomData,
        }
    }
}

impl<T: Tracked> Default for InstanceGuard<T> {
    fn default() -> Self {
        Self::new()
    }
}

// A clone is a new instance.
impl<T: Tracked> Clone for InstanceGuard<T> {
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl<T: Tracked> Drop for InstanceGuard<T> {
    fn drop(&mut self) {
        census_runtime::global().record(&T::TYPE_KEY, Delta::Destroyed);
    }
}

impl<T: Tracked> fmt::Debug for InstanceGuard<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("InstanceGuard")
            .field(&T::TYPE_KEY.as_str())
            .finish()
    }
}
