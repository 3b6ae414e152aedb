use banker_types::{ProcessId, RequestOutcome, SafetyReport};
use serde::{Deserialize, Serialize};

use super::FailureContext;

/// Allocator domain events: safety checks and request evaluations
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum AllocatorEvent {
    /// A safety check ran against the committed state
    SafetyChecked {
        safe: bool,
        /// Witness order when safe, processes that finished before progress stopped otherwise
        sequence: Vec<ProcessId>,
        blocked: Vec<ProcessId>,
    },

    /// A request was committed
    RequestGranted {
        process: ProcessId,
        request: Vec<u32>,
        sequence: Vec<ProcessId>,
    },

    /// A request was evaluated and refused; the state is unchanged
    RequestDenied {
        process: ProcessId,
        request: Vec<u32>,
        code: String,
        retryable: bool,
        outcome: RequestOutcome,
    },

    /// A request could not be evaluated at all (bad process id or shape)
    RequestRejected {
        process: ProcessId,
        request: Vec<u32>,
        failure: FailureContext,
    },
}

impl AllocatorEvent {
    /// Event describing a safety report
    #[must_use]
    pub fn safety_checked(report: &SafetyReport) -> Self {
        match report {
            SafetyReport::Safe { sequence } => Self::SafetyChecked {
                safe: true,
                sequence: sequence.clone(),
                blocked: Vec::new(),
            },
            SafetyReport::Unsafe { finished, blocked } => Self::SafetyChecked {
                safe: false,
                sequence: finished.clone(),
                blocked: blocked.clone(),
            },
        }
    }

    /// Event describing an evaluated request, granted or not
    #[must_use]
    pub fn request_evaluated(process: ProcessId, request: &[u32], outcome: &RequestOutcome) -> Self {
        match outcome {
            RequestOutcome::Granted { sequence } => Self::RequestGranted {
                process,
                request: request.to_vec(),
                sequence: sequence.clone(),
            },
            denied => Self::RequestDenied {
                process,
                request: request.to_vec(),
                code: denied.code().to_string(),
                retryable: denied.is_retryable(),
                outcome: denied.clone(),
            },
        }
    }
}
