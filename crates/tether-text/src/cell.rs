use std::cell::RefCell;
use std::rc::{Rc, Weak};

use tether::{global, DepKind, ObjectId};

use crate::Tracked;

/// An owned value whose lifetime and mutations are tracked.
///
/// Dropping the cell voids every [`CellRef`] watching it; mutating it
/// voids the content watchers.
pub struct TrackedCell<T> {
    value: Rc<RefCell<T>>,
    tag: Tracked,
}

impl<T> TrackedCell<T> {
    /// Wrap a value.
    pub fn new(value: T) -> Self {
        TrackedCell {
            value: Rc::new(RefCell::new(value)),
            tag: Tracked::new(),
        }
    }

    /// The engine-facing id of this cell.
    pub fn id(&self) -> ObjectId {
        self.tag.id()
    }

    /// Replace the value, notifying content dependents.
    pub fn set(&self, value: T) {
        global::mark_modified(self.tag.id());
        *self.value.borrow_mut() = value;
    }

    /// Mutate in place, notifying content dependents.
    pub fn update(&self, op: impl FnOnce(&mut T)) {
        global::mark_modified(self.tag.id());
        op(&mut self.value.borrow_mut());
    }

    /// Read through a closure. Owner access needs no validity check.
    pub fn with<R>(&self, op: impl FnOnce(&T) -> R) -> R {
        op(&self.value.borrow())
    }

    /// A reference that is voided when this cell is dropped.
    pub fn watch(&self) -> CellRef<T> {
        let tag = Tracked::new();
        global::add_dependency(tag.id(), self.tag.id());
        CellRef {
            value: Rc::downgrade(&self.value),
            target: self.tag.id(),
            kind: DepKind::Existence,
            tag,
        }
    }

    /// A reference that is voided when this cell is dropped or modified.
    pub fn watch_contents(&self) -> CellRef<T> {
        let tag = Tracked::new();
        global::add_content_dependency(tag.id(), self.tag.id());
        CellRef {
            value: Rc::downgrade(&self.value),
            target: self.tag.id(),
            kind: DepKind::Content,
            tag,
        }
    }
}

/// A checked reference to a [`TrackedCell`].
///
/// Access validates against the engine first; a voided reference with a
/// non-aborting handler yields `None` rather than touching stale state.
pub struct CellRef<T> {
    value: Weak<RefCell<T>>,
    target: ObjectId,
    kind: DepKind,
    tag: Tracked,
}

impl<T> CellRef<T> {
    /// Read the watched value through a closure.
    pub fn with<R>(&self, op: impl FnOnce(&T) -> R) -> Option<R> {
        global::validate(self.tag.id());
        let value = self.value.upgrade()?;
        let borrowed = value.borrow();
        Some(op(&borrowed))
    }

    /// Clone of the watched value, if still reachable.
    pub fn get(&self) -> Option<T>
    where
        T: Clone,
    {
        self.with(T::clone)
    }

    /// Point this reference at another cell, clearing its history.
    pub fn rebind(&mut self, cell: &TrackedCell<T>) {
        global::reset(self.tag.id());
        self.value = Rc::downgrade(&cell.value);
        self.target = cell.tag.id();
        match self.kind {
            DepKind::Existence => global::add_dependency(self.tag.id(), self.target),
            DepKind::Content => global::add_content_dependency(self.tag.id(), self.target),
        }
    }
}

impl<T> Clone for CellRef<T> {
    fn clone(&self) -> Self {
        let tag = Tracked::new();
        match self.kind {
            DepKind::Existence => {
                // Inherit a broken state, then watch the same target.
                global::propagate_invalid(tag.id(), self.tag.id());
                global::add_dependency(tag.id(), self.target);
            }
            DepKind::Content => {
                // Content edges travel with the copy.
                global::propagate_content(tag.id(), self.tag.id());
            }
        }
        CellRef {
            value: self.value.clone(),
            target: self.target,
            kind: self.kind,
            tag,
        }
    }
}
