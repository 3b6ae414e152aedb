//! The allocator engine

use crate::safety::find_safe_sequence;
use crate::state::AllocationState;
use banker_errors::{ConstructionError, RequestError};
use banker_types::{
    AllocationSnapshot, ProcessId, RequestOutcome, ResourceMatrix, ResourceVector, SafetyReport,
};
use tracing::{debug, trace};

/// Banker's-algorithm allocator for a fixed set of processes and resource classes.
///
/// The allocator is a synchronous state machine. [`Allocator::check_safety`]
/// only reads the state; [`Allocator::evaluate_request`] either commits a new
/// state or leaves the current one exactly as it was. Sharing one allocator
/// between concurrent callers needs outside serialization (see the
/// `banker-service` crate).
#[derive(Debug, Clone)]
pub struct Allocator {
    state: AllocationState,
    total_supply: ResourceVector,
}

impl Allocator {
    /// Build an allocator, inferring `n` from `maximum` and `m` from `available`.
    ///
    /// # Errors
    ///
    /// Returns a [`ConstructionError`] if either dimension is zero, if the
    /// matrices do not all have `n` rows of `m` entries, if any process holds
    /// more than its declared maximum, or if a class's total supply overflows.
    pub fn new(
        available: ResourceVector,
        maximum: ResourceMatrix,
        allocation: ResourceMatrix,
    ) -> Result<Self, ConstructionError> {
        let state = AllocationState::new(available, maximum, allocation)?;
        let total_supply = state.total_supply()?;

        debug!(
            processes = state.process_count(),
            resources = state.resource_count(),
            total_supply = ?total_supply,
            "allocator constructed"
        );

        Ok(Self {
            state,
            total_supply,
        })
    }

    /// Build an allocator whose dimensions are declared up front.
    ///
    /// # Errors
    ///
    /// Everything [`Allocator::new`] rejects, plus a
    /// [`ConstructionError::ShapeMismatch`] when the declared counts disagree
    /// with the supplied data.
    pub fn with_dimensions(
        processes: usize,
        resources: usize,
        available: ResourceVector,
        maximum: ResourceMatrix,
        allocation: ResourceMatrix,
    ) -> Result<Self, ConstructionError> {
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
        if available.len() != resources {
            return Err(ConstructionError::shape(
                "available vector",
                resources,
                available.len(),
            ));
        }
        if maximum.len() != processes {
            return Err(ConstructionError::shape(
                "maximum matrix",
                processes,
                maximum.len(),
            ));
        }
        Self::new(available, maximum, allocation)
    }

    /// Number of processes (n)
    #[must_use]
    pub fn process_count(&self) -> usize {
        self.state.process_count()
    }

    /// Number of resource classes (m)
    #[must_use]
    pub fn resource_count(&self) -> usize {
        self.state.resource_count()
    }

    /// Units of each class in the system, free or held. Constant for the
    /// allocator's lifetime.
    #[must_use]
    pub fn total_supply(&self) -> &[u32] {
        &self.total_supply
    }

    /// Read-only copy of Available, Maximum, Allocation and Need
    #[must_use]
    pub fn snapshot(&self) -> AllocationSnapshot {
        self.state.snapshot()
    }

    /// Decide whether every process can still finish from the current state.
    #[must_use]
    pub fn check_safety(&self) -> SafetyReport {
        let report = find_safe_sequence(
            &self.state.available,
            &self.state.need,
            &self.state.allocation,
        );
        trace!(safe = report.is_safe(), "safety check");
        report
    }

    /// Try to grant `request` to `process`.
    ///
    /// The request must fit within the process's remaining need and within
    /// the free units. When both hold, the request is applied to a candidate
    /// copy of the state; the candidate replaces the current state only if it
    /// is safe.
    ///
    /// # Errors
    ///
    /// Returns a [`RequestError`] when `process` is out of range or the
    /// request does not have one entry per resource class. The state is not
    /// touched in that case.
    pub fn evaluate_request(
        &mut self,
        process: ProcessId,
        request: &[u32],
    ) -> Result<RequestOutcome, RequestError> {
        let pid = process.index();
        if pid >= self.process_count() {
            return Err(RequestError::UnknownProcess {
                process: pid,
                processes: self.process_count(),
            });
        }
        if request.len() != self.resource_count() {
            return Err(RequestError::DimensionMismatch {
                expected: self.resource_count(),
                actual: request.len(),
            });
        }

        if let Some((resource, (&requested, &need))) = request
            .iter()
            .zip(&self.state.need[pid])
            .enumerate()
            .find(|(_, (requested, need))| requested > need)
        {
            debug!(%process, resource, requested, need, "request exceeds need");
            return Ok(RequestOutcome::ExceedsNeed {
                resource,
                requested,
                need,
            });
        }

        if let Some((resource, (&requested, &available))) = request
            .iter()
            .zip(&self.state.available)
            .enumerate()
            .find(|(_, (requested, available))| requested > available)
        {
            debug!(%process, resource, requested, available, "request not available");
            return Ok(RequestOutcome::NotAvailable {
                resource,
                requested,
                available,
            });
        }

        let candidate = self.state.with_request(process, request);
        match find_safe_sequence(&candidate.available, &candidate.need, &candidate.allocation) {
            SafetyReport::Safe { sequence } => {
                self.state = candidate;
                debug!(%process, ?request, ?sequence, "request granted");
                Ok(RequestOutcome::Granted { sequence })
            }
            SafetyReport::Unsafe { blocked, .. } => {
                debug!(%process, ?request, ?blocked, "request would leave the system unsafe");
                Ok(RequestOutcome::Unsafe)
            }
        }
    }
}
