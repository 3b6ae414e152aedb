//! Owned allocation matrices and their invariants

use banker_errors::ConstructionError;
use banker_types::{AllocationSnapshot, ProcessId, ResourceMatrix, ResourceVector};

/// Available/Maximum/Allocation/Need for one allocator.
///
/// `need` is always `maximum - allocation`; every constructor and every
/// transition recomputes it from the other two.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct AllocationState {
    pub(crate) available: ResourceVector,
    pub(crate) maximum: ResourceMatrix,
    pub(crate) allocation: ResourceMatrix,
    pub(crate) need: ResourceMatrix,
}

impl AllocationState {
    /// Validate shapes and per-cell bounds, then derive `need`
    pub(crate) fn new(
        available: ResourceVector,
        maximum: ResourceMatrix,
        allocation: ResourceMatrix,
    ) -> Result<Self, ConstructionError> {
        let processes = maximum.len();
        let resources = available.len();

        if processes == 0 {
            return Err(ConstructionError::EmptyDimension {
                dimension: "process".to_string(),
            });
        }
        if resources == 0 {
            return Err(ConstructionError::EmptyDimension {
                dimension: "resource class".to_string(),
            });
        }
        if allocation.len() != processes {
            return Err(ConstructionError::shape(
                "allocation matrix",
                processes,
                allocation.len(),
            ));
        }
        for (i, (max_row, alloc_row)) in maximum.iter().zip(&allocation).enumerate() {
            if max_row.len() != resources {
                return Err(ConstructionError::shape(
                    format!("maximum row {i}"),
                    resources,
                    max_row.len(),
                ));
            }
            if alloc_row.len() != resources {
                return Err(ConstructionError::shape(
                    format!("allocation row {i}"),
                    resources,
                    alloc_row.len(),
                ));
            }
        }

        let mut need = Vec::with_capacity(processes);
        for (process, (max_row, alloc_row)) in maximum.iter().zip(&allocation).enumerate() {
            let mut row = Vec::with_capacity(resources);
            for (resource, (&max, &held)) in max_row.iter().zip(alloc_row).enumerate() {
                let remaining = max.checked_sub(held).ok_or(
                    ConstructionError::AllocationExceedsMaximum {
                        process,
                        resource,
                        allocated: held,
                        maximum: max,
                    },
                )?;
                row.push(remaining);
            }
            need.push(row);
        }

        Ok(Self {
            available,
            maximum,
            allocation,
            need,
        })
    }

    pub(crate) fn process_count(&self) -> usize {
        self.maximum.len()
    }

    pub(crate) fn resource_count(&self) -> usize {
        self.available.len()
    }

    /// `available[j] + Σ allocation[i][j]`, or the first class whose total
    /// does not fit in a `u32`
    pub(crate) fn total_supply(&self) -> Result<ResourceVector, ConstructionError> {
        (0..self.resource_count())
            .map(|resource| {
                self.allocation
                    .iter()
                    .try_fold(self.available[resource], |total, row| {
                        total.checked_add(row[resource])
                    })
                    .ok_or(ConstructionError::SupplyOverflow { resource })
            })
            .collect()
    }

    /// Copy of this state with `request` moved from `available` to `process`.
    ///
    /// The caller must already have checked `request <= need[process]` and
    /// `request <= available` componentwise.
    pub(crate) fn with_request(&self, process: ProcessId, request: &[u32]) -> Self {
        let mut candidate = self.clone();
        let pid = process.index();
        for (resource, &units) in request.iter().enumerate() {
            candidate.available[resource] -= units;
            candidate.allocation[pid][resource] += units;
            candidate.need[pid][resource] =
                candidate.maximum[pid][resource] - candidate.allocation[pid][resource];
        }
        candidate
    }

    pub(crate) fn snapshot(&self) -> AllocationSnapshot {
        AllocationSnapshot {
            available: self.available.clone(),
            maximum: self.maximum.clone(),
            allocation: self.allocation.clone(),
            need: self.need.clone(),
        }
    }
}
