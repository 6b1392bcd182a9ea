//! End-to-end scenarios exercised through the public operation surface,
//! each against a fresh registry with a recording handler.

use tether::{DepKind, ObjectId, RecordingHandler, Registry};

const A: ObjectId = ObjectId(0xa);
const B: ObjectId = ObjectId(0xb);
const C: ObjectId = ObjectId(0xc);

fn tracked() -> (Registry, RecordingHandler) {
    let recorder = RecordingHandler::new();
    let registry = Registry::with_handler(Box::new(recorder.clone()));
    (registry, recorder)
}

#[test]
fn test_destroyed_target_invalidates_existence_dependent() {
    let (mut registry, recorder) = tracked();
    registry.add_dependency(A, B);
    registry.mark_destroyed(B);

    registry.validate(A);
    assert_eq!(recorder.temporal_violations(), vec![A]);
}

#[test]
fn test_modified_target_invalidates_content_dependent_only() {
    let (mut registry, recorder) = tracked();
    registry.add_content_dependency(A, B);
    registry.mark_modified(B);

    registry.validate(A);
    assert_eq!(recorder.temporal_violations(), vec![A]);

    registry.validate(B);
    assert_eq!(recorder.temporal_violations(), vec![A]);
}

#[test]
fn test_copy_inherits_already_broken_state() {
    let (mut registry, recorder) = tracked();
    registry.add_dependency(A, B);
    registry.mark_destroyed(B);
    registry.propagate_invalid(C, A);

    registry.validate(C);
    assert_eq!(recorder.temporal_violations(), vec![C]);
}

#[test]
fn test_reset_clears_the_violation() {
    let (mut registry, recorder) = tracked();
    registry.add_dependency(A, B);
    registry.mark_destroyed(B);
    registry.reset(A);

    registry.validate(A);
    assert!(recorder.temporal_violations().is_empty());
}

#[test]
fn test_content_subsumes_existence() {
    let (mut registry, recorder) = tracked();
    registry.add_dependency(A, B);
    registry.add_content_dependency(A, B);
    registry.mark_modified(B);

    registry.validate(A);
    assert_eq!(recorder.temporal_violations(), vec![A]);
}

#[test]
fn test_destruction_cascades_through_content_chain() {
    let (mut registry, recorder) = tracked();
    registry.add_content_dependency(A, B);
    registry.add_content_dependency(C, A);
    registry.mark_destroyed(B);

    registry.validate(C);
    assert_eq!(recorder.temporal_violations(), vec![C]);
}

#[test]
fn test_repeated_registration_leaves_one_edge() {
    let (mut registry, _) = tracked();
    registry.add_dependency(A, B);
    let before = (registry.edge_count(), registry.dependencies(A));
    registry.add_dependency(A, B);
    assert_eq!((registry.edge_count(), registry.dependencies(A)), before);
}

#[test]
fn test_upgraded_edge_never_downgrades() {
    let (mut registry, _) = tracked();
    registry.add_dependency(A, B);
    registry.add_content_dependency(A, B);
    registry.add_dependency(A, B);

    assert_eq!(registry.dependency_kind(A, B), Some(DepKind::Content));
    assert_eq!(registry.edge_count(), 1);
}

#[test]
fn test_second_destroy_is_a_noop() {
    let (mut registry, recorder) = tracked();
    registry.add_dependency(A, B);
    registry.mark_destroyed(B);
    let snapshot = (registry.object_count(), registry.edge_count());
    registry.mark_destroyed(B);

    assert_eq!((registry.object_count(), registry.edge_count()), snapshot);
    registry.validate(A);
    assert_eq!(recorder.temporal_violations(), vec![A]);
}

#[test]
fn test_violations_report_once_per_validating_call() {
    let (mut registry, recorder) = tracked();
    registry.add_content_dependency(A, B);
    registry.mark_modified(B);

    registry.validate(A);
    registry.validate(A);
    assert_eq!(recorder.temporal_violations(), vec![A, A]);
}
