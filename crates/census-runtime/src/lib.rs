//! Core runtime for census: the instance registry and its report sinks.
//!
//! Most code should go through the `census` facade, which compiles all of
//! this away when the `diagnostics` feature is off. Depend on this crate
//! directly only to build an isolated [`InstanceRegistry`].

mod log;
mod registry;

pub use census_types::*;
pub use log::{log_leaks, log_stats};
pub use registry::{InstanceRegistry, global};
