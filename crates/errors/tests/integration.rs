//! Integration tests for error types

#[cfg(test)]
mod tests {
    use caravel_errors::*;

    #[test]
    fn test_error_conversion() {
        let resolve_err = ResolveError::NotFound {
            version: "2.4.1".into(),
        };
        let err: Error = resolve_err.into();
        assert!(matches!(err, Error::Resolve(_)));
    }

    #[test]
    fn test_error_display() {
        let err = DeployError::ComponentFailed {
            component: "istio".into(),
            message: "helm release stuck".into(),
        };
        assert_eq!(
            err.to_string(),
            "component istio installation failed: helm release stuck"
        );
    }

    #[test]
    fn test_error_clone() {
        let err = ConfigError::OverrideConflict {
            key: "global.domain".into(),
        };
        let cloned = err.clone();
        assert_eq!(err.to_string(), cloned.to_string());
    }

    #[test]
    fn test_component_failure_is_retryable() {
        let err: Error = DeployError::component_failed("core", "apply failed").into();
        assert!(err.is_retryable());
    }

    #[test]
    fn test_fatal_failure_is_not_retryable() {
        let err: Error = DeployError::fatal("deployment timed out").into();
        assert!(!err.is_retryable());
        assert_eq!(
            err.user_message(),
            "installation failed: deployment timed out"
        );
    }

    #[test]
    fn test_not_supported_operation() {
        let err = DeployError::NotSupported {
            operation: "upgrade".into(),
        };
        assert_eq!(err.to_string(), "operation not supported: upgrade");
        assert!(!err.is_retryable());
    }
}
