#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Deadlock-avoidance resource allocation for banker
//!
//! This crate implements the Banker's algorithm over a fixed set of processes
//! and resource classes. [`Allocator`] owns the allocation state and answers
//! two questions: whether the current state is safe, and whether a pending
//! request can be granted without giving that safety up.

mod allocator;
mod safety;
mod state;

pub use allocator::Allocator;
pub use safety::{verify_sequence, WitnessError};

pub use banker_errors::{ConstructionError, RequestError};
pub use banker_types::{AllocationSnapshot, ProcessId, RequestOutcome, SafetyReport};
