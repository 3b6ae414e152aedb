//! Integration tests for types

#[cfg(test)]
mod tests {
    use banker_types::*;

    fn snapshot() -> AllocationSnapshot {
        AllocationSnapshot {
            available: vec![3, 3, 2],
            maximum: vec![vec![7, 5, 3], vec![3, 2, 2]],
            allocation: vec![vec![0, 1, 0], vec![2, 0, 0]],
            need: vec![vec![7, 4, 3], vec![1, 2, 2]],
        }
    }

    #[test]
    fn test_snapshot_dimensions() {
        let snap = snapshot();
        assert_eq!(snap.process_count(), 2);
        assert_eq!(snap.resource_count(), 3);
        assert_eq!(snap.total_supply(), vec![5, 4, 2]);
    }

    #[test]
    fn test_process_id_display() {
        assert_eq!(ProcessId(3).to_string(), "P3");
        assert_eq!(ProcessId::from(4).index(), 4);
    }

    #[test]
    fn test_outcome_serialization() {
        let outcome = RequestOutcome::Granted {
            sequence: vec![ProcessId(1), ProcessId(0)],
        };
        let json = serde_json::to_string(&outcome).unwrap();
        assert_eq!(json, r#"{"outcome":"granted","sequence":[1,0]}"#);

        let json = serde_json::to_string(&RequestOutcome::Unsafe).unwrap();
        assert_eq!(json, r#"{"outcome":"unsafe"}"#);
    }

    #[test]
    fn test_outcome_retryability() {
        assert!(RequestOutcome::Unsafe.is_retryable());
        assert!(RequestOutcome::NotAvailable {
            resource: 0,
            requested: 4,
            available: 3
        }
        .is_retryable());
        let exceeds = RequestOutcome::ExceedsNeed {
            resource: 0,
            requested: 4,
            need: 1,
        };
        assert!(!exceeds.is_retryable());
        assert_eq!(exceeds.code(), "request.exceeds_need");
    }

    #[test]
    fn test_safety_report_sequence() {
        let safe = SafetyReport::Safe {
            sequence: vec![ProcessId(0)],
        };
        assert!(safe.is_safe());
        assert_eq!(safe.sequence(), Some(&[ProcessId(0)][..]));

        let unsafe_report = SafetyReport::Unsafe {
            finished: vec![],
            blocked: vec![ProcessId(0)],
        };
        assert!(!unsafe_report.is_safe());
        assert!(unsafe_report.sequence().is_none());
    }

    #[test]
    fn test_output_format_default() {
        assert_eq!(OutputFormat::default(), OutputFormat::Tty);
        assert_eq!(ColorChoice::default(), ColorChoice::Auto);
    }
}
