//! Integration tests for the progress event channel

#[cfg(test)]
mod tests {
    use caravel_events::*;

    #[tokio::test]
    async fn test_event_emitter() {
        let (tx, mut rx) = channel();

        tx.emit(ProcessUpdate::started(DeployPhase::Components, "core"));
        tx.emit(ProcessUpdate::finished(DeployPhase::Components, "core"));

        let first = rx.recv().await.unwrap();
        assert_eq!(first.kind, ProcessEventKind::Start);
        assert_eq!(first.component.unwrap().name, "core");

        let second = rx.recv().await.unwrap();
        assert_eq!(second.kind, ProcessEventKind::Finished);
    }

    #[tokio::test]
    async fn test_dropped_receiver() {
        let (tx, rx) = channel();
        drop(rx);

        // Should not panic when the receiver is gone
        tx.emit(ProcessUpdate::timed_out(
            DeployPhase::Components,
            "deployment exceeded timeout",
        ));
    }

    #[test]
    fn test_kind_classification() {
        assert!(ProcessEventKind::ForceQuitFailure.is_fatal());
        assert!(ProcessEventKind::TimeoutFailure.is_fatal());
        assert!(!ProcessEventKind::ExecutionFailure.is_fatal());
        assert!(ProcessEventKind::ExecutionFailure.is_component_failure());
        assert!(!ProcessEventKind::Finished.is_component_failure());
    }

    #[test]
    fn test_kind_serialization() {
        let json = serde_json::to_string(&ProcessEventKind::ExecutionFailure).unwrap();
        assert_eq!(json, r#""execution_failure""#);
    }

    #[test]
    fn test_update_serialization_skips_empty_fields() {
        let update = ProcessUpdate::running(DeployPhase::Prerequisites, "istio", "Installing");
        let json = serde_json::to_string(&update).unwrap();
        assert!(json.contains(r#""phase":"prerequisites""#));
        assert!(!json.contains("error"));
    }
}
