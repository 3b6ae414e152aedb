//! Integration tests for events

#[cfg(test)]
mod tests {
    use banker_events::*;
    use banker_types::{ProcessId, RequestOutcome, SafetyReport};

    struct Tagged {
        sender: EventSender,
    }

    impl EventEmitter for Tagged {
        fn event_sender(&self) -> Option<&EventSender> {
            Some(&self.sender)
        }

        fn correlation_id(&self) -> Option<&str> {
            Some("menu-1")
        }
    }

    #[tokio::test]
    async fn test_event_sender_emits_with_meta() {
        let (tx, mut rx) = channel();

        tx.emit_error("test error");
        tx.emit_debug("test debug");

        let first = rx.recv().await.unwrap();
        assert!(matches!(
            first.event,
            AppEvent::General(GeneralEvent::Error { .. })
        ));
        assert_eq!(first.meta.level, EventLevel::Error);
        assert_eq!(first.meta.source, EventSource::GENERAL);

        let second = rx.recv().await.unwrap();
        assert!(matches!(
            second.event,
            AppEvent::General(GeneralEvent::DebugLog { .. })
        ));
        assert_eq!(second.meta.level, EventLevel::Debug);
    }

    #[tokio::test]
    async fn test_dropped_receiver() {
        let (tx, rx) = channel();
        drop(rx);

        // Should not panic when receiver is dropped
        tx.emit_warning("ignored");
    }

    #[tokio::test]
    async fn test_correlation_id_is_stamped() {
        let (sender, mut rx) = channel();
        let emitter = Tagged { sender };
        emitter.emit_operation_started("check");

        let message = rx.recv().await.unwrap();
        assert_eq!(message.meta.correlation_id.as_deref(), Some("menu-1"));
    }

    #[tokio::test]
    async fn test_request_events_by_outcome() {
        let (tx, mut rx) = channel();
        tx.emit_request_evaluated(
            ProcessId(1),
            &[1, 0, 2],
            &RequestOutcome::Granted {
                sequence: vec![ProcessId(1), ProcessId(0)],
            },
        );
        tx.emit_request_evaluated(ProcessId(0), &[0, 2, 0], &RequestOutcome::Unsafe);

        let granted = rx.recv().await.unwrap();
        assert!(matches!(
            granted.event,
            AppEvent::Allocator(AllocatorEvent::RequestGranted { .. })
        ));

        let denied = rx.recv().await.unwrap();
        match denied.event {
            AppEvent::Allocator(AllocatorEvent::RequestDenied {
                code, retryable, ..
            }) => {
                assert_eq!(code, "request.unsafe");
                assert!(retryable);
            }
            other => panic!("unexpected event {other:?}"),
        }
        assert_eq!(denied.meta.source, EventSource::ALLOCATOR);
    }

    #[test]
    fn test_unsafe_check_logs_as_warning() {
        let event = AppEvent::Allocator(AllocatorEvent::safety_checked(&SafetyReport::Unsafe {
            finished: vec![],
            blocked: vec![ProcessId(0)],
        }));
        assert_eq!(event.log_level(), tracing::Level::WARN);
        assert_eq!(event.log_target(), "banker::events::allocator");

        let message = EventMessage::from_event(event);
        assert_eq!(message.meta.level, EventLevel::Warn);
        assert_eq!(message.meta.tracing_level(), tracing::Level::WARN);
    }

    #[test]
    fn test_event_serialization() {
        let event = AppEvent::General(GeneralEvent::OperationStarted {
            operation: "check".into(),
        });
        let json = serde_json::to_string(&event).unwrap();
        assert_eq!(
            json,
            r#"{"domain":"general","event":{"type":"OperationStarted","operation":"check"}}"#
        );
    }

    #[test]
    fn test_debug_event_carries_only_message() {
        let event = AppEvent::General(GeneralEvent::debug("scenario loaded"));
        let json = serde_json::to_string(&event).unwrap();
        assert_eq!(
            json,
            r#"{"domain":"general","event":{"type":"DebugLog","message":"scenario loaded"}}"#
        );
    }
}
