//! Results of safety checks and resource requests

use crate::ProcessId;
use serde::{Deserialize, Serialize};

/// Result of a safety check
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SafetyReport {
    /// Every process can finish; `sequence` is one finishing order that proves it
    Safe { sequence: Vec<ProcessId> },
    /// At least one process can never be satisfied
    Unsafe {
        /// Processes that could finish before progress stopped. Not a witness.
        finished: Vec<ProcessId>,
        /// Processes whose need exceeds what could ever be released to them
        blocked: Vec<ProcessId>,
    },
}

impl SafetyReport {
    #[must_use]
    pub fn is_safe(&self) -> bool {
        matches!(self, Self::Safe { .. })
    }

    /// Witness order, only for a safe state
    #[must_use]
    pub fn sequence(&self) -> Option<&[ProcessId]> {
        match self {
            Self::Safe { sequence } => Some(sequence),
            Self::Unsafe { .. } => None,
        }
    }
}

/// Answer to a resource request.
///
/// Only `Granted` changes the allocator state; every other variant means the
/// state is exactly what it was before the request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RequestOutcome {
    /// The request was committed; `sequence` witnesses the new safe state
    Granted { sequence: Vec<ProcessId> },
    /// The request asks for more than the process may still claim
    ExceedsNeed {
        resource: usize,
        requested: u32,
        need: u32,
    },
    /// Not enough free units right now; the caller may retry later
    NotAvailable {
        resource: usize,
        requested: u32,
        available: u32,
    },
    /// Granting would leave the system in an unsafe state
    Unsafe,
}

impl RequestOutcome {
    #[must_use]
    pub fn is_granted(&self) -> bool {
        matches!(self, Self::Granted { .. })
    }

    /// Stable code for structured reporting
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::Granted { .. } => "request.granted",
            Self::ExceedsNeed { .. } => "request.exceeds_need",
            Self::NotAvailable { .. } => "request.not_available",
            Self::Unsafe => "request.unsafe",
        }
    }

    /// Whether the same caller can reasonably try again later.
    ///
    /// `ExceedsNeed` is a caller bug and will fail identically every time.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::NotAvailable { .. } | Self::Unsafe)
    }
}
