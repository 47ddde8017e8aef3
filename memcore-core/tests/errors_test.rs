use memcore_core::errors::*;

#[test]
fn not_found_carries_id() {
    let err = MemCoreError::NotFound {
        id: "abc-123".into(),
    };
    assert!(err.to_string().contains("abc-123"));
}

#[test]
fn capability_unavailable_carries_name_and_reason() {
    let err = MemCoreError::CapabilityUnavailable {
        capability: "embeddings".into(),
        reason: "provider returned None".into(),
    };
    let msg = err.to_string();
    assert!(msg.contains("embeddings"));
    assert!(msg.contains("provider returned None"));
}

#[test]
fn timeout_and_busy_are_retryable() {
    assert!(MemCoreError::Timeout.is_retryable());
    assert!(MemCoreError::Busy.is_retryable());
    assert!(!MemCoreError::Corrupt {
        details: "x".into()
    }
    .is_retryable());
}

#[test]
fn only_six_kinds_abort_the_caller() {
    assert!(MemCoreError::InvalidArgument {
        reason: "x".into()
    }
    .aborts_caller());
    assert!(MemCoreError::Conflict { reason: "x".into() }.aborts_caller());
    assert!(MemCoreError::Timeout.aborts_caller());
    assert!(MemCoreError::Busy.aborts_caller());
    assert!(MemCoreError::Corrupt {
        details: "x".into()
    }
    .aborts_caller());
    assert!(MemCoreError::Internal {
        invariant: "x".into()
    }
    .aborts_caller());
    assert!(!MemCoreError::CapabilityUnavailable {
        capability: "x".into(),
        reason: "y".into()
    }
    .aborts_caller());
}

#[test]
fn store_error_converts_into_memcore_error() {
    let store_err = StoreError::IdCollision { id: "dup".into() };
    let err: MemCoreError = store_err.into();
    assert!(err.to_string().contains("dup"));
}

#[test]
fn consolidation_error_converts_into_memcore_error() {
    let err: MemCoreError = ConsolidationError::AlreadyRunning.into();
    assert!(matches!(err, MemCoreError::Consolidation(_)));
}
