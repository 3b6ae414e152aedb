//! Command execution against the allocator service

use banker_service::AllocatorHandle;
use banker_types::{AllocationSnapshot, ProcessId, RequestOutcome, SafetyReport};
use serde::Serialize;

use crate::error::CliError;

/// Result of a single CLI operation, rendered by [`crate::display::OutputRenderer`]
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OperationResult {
    /// Current allocation state
    State(AllocationSnapshot),
    /// Outcome of a safety check
    Safety(SafetyReport),
    /// Outcome of a resource request plus the state after it
    Request {
        process: ProcessId,
        request: Vec<u32>,
        #[serde(flatten)]
        outcome: RequestOutcome,
        state: AllocationSnapshot,
    },
    /// Verdict on a user-supplied finishing order
    Verification(Verification),
    /// Summary of an interactive menu session
    Session(SessionSummary),
}

/// Whether a proposed finishing order proves the state safe
#[derive(Debug, Clone, Serialize)]
pub struct Verification {
    pub sequence: Vec<ProcessId>,
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub violation: Option<String>,
}

/// Counts of what happened during an interactive menu session
#[derive(Debug, Clone, Default, Serialize)]
pub struct SessionSummary {
    pub checks: usize,
    pub requests: usize,
    pub granted: usize,
}

impl OperationResult {
    /// Convert to pretty-printed JSON
    pub fn to_json(&self) -> Result<String, banker_errors::Error> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Current state of the allocator
pub async fn show(handle: &AllocatorHandle) -> Result<OperationResult, CliError> {
    Ok(OperationResult::State(handle.snapshot().await?))
}

/// Run a safety check against the committed state
pub async fn check(handle: &AllocatorHandle) -> Result<OperationResult, CliError> {
    Ok(OperationResult::Safety(handle.check_safety().await?))
}

/// Evaluate a request from `pid` for `units`
pub async fn request(
    handle: &AllocatorHandle,
    pid: usize,
    units: Vec<u32>,
) -> Result<OperationResult, CliError> {
    let process = ProcessId(pid);
    let (outcome, state) = handle.request_with_state(process, units.clone()).await?;
    Ok(OperationResult::Request {
        process,
        request: units,
        outcome,
        state,
    })
}

/// Replay a proposed finishing order against the committed state
pub async fn verify(
    handle: &AllocatorHandle,
    sequence: Vec<usize>,
) -> Result<OperationResult, CliError> {
    let sequence: Vec<ProcessId> = sequence.into_iter().map(ProcessId).collect();
    let verdict = handle.verify(sequence.clone()).await?;
    Ok(OperationResult::Verification(Verification {
        sequence,
        valid: verdict.is_ok(),
        violation: verdict.err().map(|e| e.to_string()),
    }))
}
