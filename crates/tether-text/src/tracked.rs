use tether::{global, ObjectId};

/// RAII registration with the process-wide engine.
///
/// Allocates a fresh id on creation and reports destruction on drop,
/// which discharges the engine contract that every object named in a
/// registration is eventually marked destroyed.
#[derive(Debug)]
pub struct Tracked {
    id: ObjectId,
}

impl Tracked {
    /// Register a new identity.
    pub fn new() -> Self {
        Tracked {
            id: global::fresh_id(),
        }
    }

    /// The engine-facing id.
    pub fn id(&self) -> ObjectId {
        self.id
    }
}

impl Default for Tracked {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Tracked {
    fn drop(&mut self) {
        global::mark_destroyed(self.id);
    }
}
