//! Process-wide engine instance.
//!
//! Free functions mirroring the [`Registry`] operation surface against a
//! single shared instance. The slot starts out dormant; the first
//! operation constructs the registry, and [`shutdown`] retires it for the
//! remainder of the process. Operations on the retired slot are silent
//! no-ops, which makes these functions safe to call from destructors that
//! happen to run after engine teardown.

use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;

use crate::registry::Registry;
use crate::violation::ViolationHandler;
use crate::ObjectId;

enum Slot {
    Dormant,
    Active(Registry),
    Retired,
}

static ENGINE: Mutex<Slot> = Mutex::new(Slot::Dormant);
static NEXT_ID: AtomicU64 = AtomicU64::new(1);

/// Issue a process-unique object id.
pub fn fresh_id() -> ObjectId {
    ObjectId(NEXT_ID.fetch_add(1, Ordering::Relaxed))
}

fn with_engine<R>(op: impl FnOnce(&mut Registry) -> R) -> Option<R> {
    let mut slot = ENGINE.lock();
    if let Slot::Dormant = *slot {
        tracing::debug!("starting dependency engine");
        *slot = Slot::Active(Registry::new());
    }
    match &mut *slot {
        Slot::Active(registry) => Some(op(registry)),
        _ => None,
    }
}

/// Start the engine eagerly.
///
/// Every operation starts it implicitly; this only front-loads the
/// allocation. Does nothing once the engine has been shut down.
pub fn install() {
    let _ = with_engine(|_| ());
}

/// Tear the engine down.
///
/// Every later operation in this process is a no-op.
pub fn shutdown() {
    let mut slot = ENGINE.lock();
    if let Slot::Active(registry) = &*slot {
        tracing::debug!(
            objects = registry.object_count(),
            edges = registry.edge_count(),
            "shutting down dependency engine"
        );
    }
    *slot = Slot::Retired;
}

/// See [`Registry::validate`].
pub fn validate(object: ObjectId) {
    let _ = with_engine(|registry| registry.validate(object));
}

/// See [`Registry::add_dependency`].
pub fn add_dependency(source: ObjectId, target: ObjectId) {
    let _ = with_engine(|registry| registry.add_dependency(source, target));
}

/// See [`Registry::add_content_dependency`].
pub fn add_content_dependency(source: ObjectId, target: ObjectId) {
    let _ = with_engine(|registry| registry.add_content_dependency(source, target));
}

/// See [`Registry::mark_modified`].
pub fn mark_modified(target: ObjectId) {
    let _ = with_engine(|registry| registry.mark_modified(target));
}

/// See [`Registry::mark_destroyed`].
pub fn mark_destroyed(target: ObjectId) {
    let _ = with_engine(|registry| registry.mark_destroyed(target));
}

/// See [`Registry::reset`].
pub fn reset(source: ObjectId) {
    let _ = with_engine(|registry| registry.reset(source));
}

/// See [`Registry::propagate_invalid`].
pub fn propagate_invalid(object: ObjectId, from: ObjectId) {
    let _ = with_engine(|registry| registry.propagate_invalid(object, from));
}

/// See [`Registry::propagate_content`].
pub fn propagate_content(object: ObjectId, from: ObjectId) {
    let _ = with_engine(|registry| registry.propagate_content(object, from));
}

/// See [`Registry::set_violation_handler`].
pub fn set_violation_handler(handler: Option<Box<dyn ViolationHandler>>) {
    let _ = with_engine(|registry| registry.set_violation_handler(handler));
}

/// See [`Registry::assert_spatial`].
pub fn assert_spatial(condition: bool) {
    let _ = with_engine(|registry| registry.assert_spatial(condition));
}
