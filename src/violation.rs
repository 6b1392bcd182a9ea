use std::sync::Arc;

use parking_lot::Mutex;

use crate::ObjectId;

/// Sink for detected safety violations.
///
/// Installed into a [`Registry`](crate::Registry) through
/// `set_violation_handler`. A handler may terminate the process (the
/// default) or record the event and return, in which case the operation
/// that tripped the check proceeds as if no handler were installed.
///
/// Handlers run while the engine is busy and must not call back into it.
pub trait ViolationHandler: Send + 'static {
    /// A temporal violation: `validate` was called on an invalid object.
    fn temporal(&self, object: ObjectId);

    /// A spatial violation: `assert_spatial` was called with `false`.
    fn spatial(&self);
}

/// The default handler: write a diagnostic to stderr and abort.
#[derive(Debug, Clone, Copy, Default)]
pub struct AbortHandler;

impl ViolationHandler for AbortHandler {
    fn temporal(&self, object: ObjectId) {
        eprintln!("violating safety dependency on object {object}");
        std::process::abort();
    }

    fn spatial(&self) {
        eprintln!("spatial safety check failed");
        std::process::abort();
    }
}

/// A handler that records violations and lets execution continue.
///
/// Clones share one log, so tests keep a clone and hand the other to the
/// registry:
///
/// ```
/// use tether::{ObjectId, RecordingHandler, Registry};
///
/// let recorder = RecordingHandler::new();
/// let mut registry = Registry::with_handler(Box::new(recorder.clone()));
///
/// registry.add_dependency(ObjectId(1), ObjectId(2));
/// registry.mark_destroyed(ObjectId(2));
/// registry.validate(ObjectId(1));
/// assert_eq!(recorder.temporal_violations(), vec![ObjectId(1)]);
/// ```
#[derive(Clone, Default)]
pub struct RecordingHandler {
    log: Arc<Mutex<Log>>,
}

#[derive(Default)]
struct Log {
    temporal: Vec<ObjectId>,
    spatial: usize,
}

impl RecordingHandler {
    /// A handler with an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Objects reported as temporal violations, in call order.
    pub fn temporal_violations(&self) -> Vec<ObjectId> {
        self.log.lock().temporal.clone()
    }

    /// Number of spatial violations seen.
    pub fn spatial_violations(&self) -> usize {
        self.log.lock().spatial
    }

    /// Forget everything recorded so far.
    pub fn clear(&self) {
        let mut log = self.log.lock();
        log.temporal.clear();
        log.spatial = 0;
    }
}

impl ViolationHandler for RecordingHandler {
    fn temporal(&self, object: ObjectId) {
        self.log.lock().temporal.push(object);
    }

    fn spatial(&self) {
        self.log.lock().spatial += 1;
    }
}
