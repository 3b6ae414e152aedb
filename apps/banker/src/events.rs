//! Event handling and user feedback

use banker_events::{AllocatorEvent, AppEvent, EventMessage, GeneralEvent};
use banker_types::ProcessId;
use console::Style;

use crate::display::{format_sequence, format_vector};
use crate::logging::log_event_with_tracing;

/// Mirrors events to tracing and, in debug mode, narrates them on stderr
pub struct EventHandler {
    colors_enabled: bool,
    debug_enabled: bool,
}

impl EventHandler {
    pub fn new(colors_enabled: bool, debug_enabled: bool) -> Self {
        Self {
            colors_enabled,
            debug_enabled,
        }
    }

    /// Handle incoming event
    pub fn handle_event(&mut self, message: EventMessage) {
        log_event_with_tracing(&message);

        let line = match &message.event {
            // Warnings and errors are always shown
            AppEvent::General(GeneralEvent::Warning { message, context }) => Some(
                self.style_warning(&with_suffix(&format!("Warning: {message}"), context.as_deref())),
            ),
            AppEvent::General(GeneralEvent::Error { message, details }) => Some(
                self.style_error(&with_suffix(&format!("Error: {message}"), details.as_deref())),
            ),
            _ if !self.debug_enabled => None,
            event => self
                .describe(event)
                .map(|text| format!("[{}] {text}", event.log_target())),
        };

        if let Some(line) = line {
            eprintln!("{line}");
        }
    }

    /// One-line narration for debug mode
    fn describe(&self, event: &AppEvent) -> Option<String> {
        match event {
            AppEvent::Allocator(AllocatorEvent::SafetyChecked {
                safe: true,
                sequence,
                ..
            }) => Some(format!("safe, witness {}", format_sequence(sequence))),
            AppEvent::Allocator(AllocatorEvent::SafetyChecked { blocked, .. }) => Some(
                self.style_warning(&format!("unsafe, blocked {}", format_sequence(blocked))),
            ),
            AppEvent::Allocator(AllocatorEvent::RequestGranted {
                process, request, ..
            }) => Some(format!("{} granted", describe_request(*process, request))),
            AppEvent::Allocator(AllocatorEvent::RequestDenied {
                process,
                request,
                code,
                ..
            }) => Some(self.style_warning(&format!(
                "{} denied ({code})",
                describe_request(*process, request)
            ))),
            AppEvent::Allocator(AllocatorEvent::RequestRejected {
                process,
                request,
                failure,
            }) => Some(self.style_error(&format!(
                "{} rejected: {}",
                describe_request(*process, request),
                failure.message
            ))),
            AppEvent::General(GeneralEvent::OperationStarted { operation }) => {
                Some(format!("{operation} started"))
            }
            AppEvent::General(GeneralEvent::OperationCompleted { operation, success }) => {
                Some(format!(
                    "{operation} {}",
                    if *success { "completed" } else { "finished with errors" }
                ))
            }
            AppEvent::General(GeneralEvent::OperationFailed { operation, error }) => {
                Some(self.style_error(&format!("{operation} failed: {error}")))
            }
            AppEvent::General(GeneralEvent::DebugLog { message }) => Some(message.clone()),
            AppEvent::General(GeneralEvent::Warning { .. } | GeneralEvent::Error { .. }) => None,
        }
    }

    fn style_warning(&self, text: &str) -> String {
        if self.colors_enabled {
            Style::new().yellow().apply_to(text).to_string()
        } else {
            text.to_string()
        }
    }

    fn style_error(&self, text: &str) -> String {
        if self.colors_enabled {
            Style::new().red().apply_to(text).to_string()
        } else {
            text.to_string()
        }
    }
}

fn describe_request(process: ProcessId, request: &[u32]) -> String {
    format!("{process} request {}", format_vector(request))
}

fn with_suffix(text: &str, suffix: Option<&str>) -> String {
    match suffix {
        Some(extra) => format!("{text} ({extra})"),
        None => text.to_string(),
    }
}
