//! Read-only allocation state views

use serde::{Deserialize, Serialize};

/// Units per resource class
pub type ResourceVector = Vec<u32>;

/// One row per process, one column per resource class
pub type ResourceMatrix = Vec<Vec<u32>>;

/// Copy of the allocator state handed to presentation layers.
///
/// Owning a snapshot never gives access to the allocator itself, so two
/// snapshots taken around an operation can be compared for equality to prove
/// the operation left the state untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationSnapshot {
    /// Units of each class currently unallocated
    pub available: ResourceVector,
    /// Declared maximum demand per process
    pub maximum: ResourceMatrix,
    /// Units currently held per process
    pub allocation: ResourceMatrix,
    /// `maximum - allocation`
    pub need: ResourceMatrix,
}

impl AllocationSnapshot {
    /// Number of processes (n)
    #[must_use]
    pub fn process_count(&self) -> usize {
        self.maximum.len()
    }

    /// Number of resource classes (m)
    #[must_use]
    pub fn resource_count(&self) -> usize {
        self.available.len()
    }

    /// `available[j] + Σ allocation[i][j]` for every class, widened so it
    /// cannot overflow
    #[must_use]
    pub fn total_supply(&self) -> Vec<u64> {
        self.available
            .iter()
            .enumerate()
            .map(|(j, &free)| {
                let held: u64 = self
                    .allocation
                    .iter()
                    .map(|row| u64::from(row.get(j).copied().unwrap_or(0)))
                    .sum();
                u64::from(free) + held
            })
            .collect()
    }
}
