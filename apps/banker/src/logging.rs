//! Structured logging integration for events
//!
//! Converts allocator and general events into tracing records with
//! structured fields, so a `--debug` log file carries every decision.

use banker_events::{AllocatorEvent, AppEvent, EventMessage, GeneralEvent};
use tracing::{debug, error, info, warn};

/// Log an `EventMessage` using the tracing infrastructure with structured fields
pub fn log_event_with_tracing(message: &EventMessage) {
    let meta = &message.meta;
    match &message.event {
        AppEvent::Allocator(event) => match event {
            AllocatorEvent::SafetyChecked {
                safe,
                sequence,
                blocked,
            } => {
                info!(
                    source = meta.source.as_str(),
                    event_id = %meta.event_id,
                    correlation = ?meta.correlation_id,
                    safe = safe,
                    sequence = ?sequence,
                    blocked = ?blocked,
                    "Safety check completed"
                );
            }
            AllocatorEvent::RequestGranted {
                process,
                request,
                sequence,
            } => {
                info!(
                    source = meta.source.as_str(),
                    event_id = %meta.event_id,
                    correlation = ?meta.correlation_id,
                    process = %process,
                    request = ?request,
                    sequence = ?sequence,
                    "Request granted"
                );
            }
            AllocatorEvent::RequestDenied {
                process,
                request,
                code,
                retryable,
                ..
            } => {
                info!(
                    source = meta.source.as_str(),
                    event_id = %meta.event_id,
                    correlation = ?meta.correlation_id,
                    process = %process,
                    request = ?request,
                    code = %code,
                    retryable = retryable,
                    "Request denied"
                );
            }
            AllocatorEvent::RequestRejected {
                process,
                request,
                failure,
            } => {
                warn!(
                    source = meta.source.as_str(),
                    event_id = %meta.event_id,
                    correlation = ?meta.correlation_id,
                    process = %process,
                    request = ?request,
                    code = ?failure.code,
                    message = %failure.message,
                    hint = ?failure.hint,
                    "Request rejected"
                );
            }
        },

        AppEvent::General(event) => match event {
            GeneralEvent::Warning { message, context } => {
                warn!(
                    source = meta.source.as_str(),
                    event_id = %meta.event_id,
                    context = ?context,
                    "{message}"
                );
            }
            GeneralEvent::Error { message, details } => {
                error!(
                    source = meta.source.as_str(),
                    event_id = %meta.event_id,
                    details = ?details,
                    "{message}"
                );
            }
            GeneralEvent::DebugLog { message } => {
                debug!(
                    source = meta.source.as_str(),
                    event_id = %meta.event_id,
                    "{message}"
                );
            }
            GeneralEvent::OperationStarted { operation } => {
                debug!(
                    source = meta.source.as_str(),
                    correlation = ?meta.correlation_id,
                    operation = %operation,
                    "Operation started"
                );
            }
            GeneralEvent::OperationCompleted { operation, success } => {
                info!(
                    source = meta.source.as_str(),
                    correlation = ?meta.correlation_id,
                    operation = %operation,
                    success = success,
                    "Operation completed"
                );
            }
            GeneralEvent::OperationFailed { operation, error } => {
                error!(
                    source = meta.source.as_str(),
                    correlation = ?meta.correlation_id,
                    operation = %operation,
                    error = %error,
                    "Operation failed"
                );
            }
        },
    }
}
