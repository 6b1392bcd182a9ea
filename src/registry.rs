use std::collections::HashMap;

use crate::edge::{DepKind, Edge, EdgeArena, EdgeId};
use crate::object::ObjectRecord;
use crate::splay;
use crate::violation::{AbortHandler, ViolationHandler};
use crate::ObjectId;

/// The dependency graph engine.
///
/// Records which objects depend on the existence or contents of which
/// others, propagates invalidation when targets are destroyed or modified,
/// and answers validity queries. The registry owns every object and edge
/// record; callers hold only [`ObjectId`]s, which are never dereferenced.
///
/// All operations are total. Input combinations that cannot be honored
/// (a new dependency from an already-invalid source, a notification about
/// an unregistered id) degrade to no-ops, and the only reporting path is
/// the installed [`ViolationHandler`].
///
/// The registry is single-threaded by design; for a process-wide instance
/// behind a lifecycle guard, see the [`global`](crate::global) module.
pub struct Registry {
    objects: HashMap<ObjectId, ObjectRecord, ahash::RandomState>,
    edges: EdgeArena,
    handler: Box<dyn ViolationHandler>,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry {
    /// A registry with the default aborting violation handler.
    pub fn new() -> Self {
        Self::with_handler(Box::new(AbortHandler))
    }

    /// A registry with a specific violation handler.
    pub fn with_handler(handler: Box<dyn ViolationHandler>) -> Self {
        Registry {
            objects: HashMap::default(),
            edges: EdgeArena::new(),
            handler,
        }
    }

    /// Replace the violation handler, or restore the default with `None`.
    pub fn set_violation_handler(&mut self, handler: Option<Box<dyn ViolationHandler>>) {
        self.handler = handler.unwrap_or_else(|| Box::new(AbortHandler));
    }

    /// Report a violation if `object` is registered and invalid.
    ///
    /// Ids the engine has never been told about are trivially valid.
    pub fn validate(&self, object: ObjectId) {
        if let Some(record) = self.objects.get(&object) {
            if !record.valid {
                self.handler.temporal(object);
            }
        }
    }

    /// Record that `source` depends on the existence of `target`.
    ///
    /// `source` becomes invalid when `target` is destroyed. Registering the
    /// same pair again is a no-op; an existing content dependency is left
    /// untouched.
    pub fn add_dependency(&mut self, source: ObjectId, target: ObjectId) {
        self.add_edge(source, target, DepKind::Existence);
    }

    /// Record that `source` depends on the contents of `target`.
    ///
    /// `source` becomes invalid when `target` is destroyed or modified. An
    /// existing existence dependency on the same target is upgraded. If
    /// `target` is already invalid, `source` is invalidated immediately.
    pub fn add_content_dependency(&mut self, source: ObjectId, target: ObjectId) {
        self.add_edge(source, target, DepKind::Content);
    }

    /// The contents of `target` changed: invalidate every content-dependent
    /// source. `target` itself stays valid and keeps its own dependencies.
    pub fn mark_modified(&mut self, target: ObjectId) {
        if self.objects.contains_key(&target) {
            let work = self.incoming_sources(target, DepKind::Content);
            self.invalidate_many(work);
        }
    }

    /// `target` no longer exists: invalidate every dependent of either kind,
    /// release the record and its remaining outgoing edges.
    ///
    /// Later notifications naming `target` are no-ops until the id is used
    /// in a new registration.
    pub fn mark_destroyed(&mut self, target: ObjectId) {
        if !self.objects.contains_key(&target) {
            return;
        }
        let mut work = self.incoming_sources(target, DepKind::Content);
        work.extend(self.incoming_sources(target, DepKind::Existence));
        self.invalidate_many(work);
        self.drop_outgoing(target);
        let removed = self.objects.remove(&target);
        debug_assert!(removed.is_some_and(|record| record.incoming == [None, None]));
    }

    /// Drop all outgoing dependencies of `source` and make it valid again.
    ///
    /// Incoming edges are untouched: whoever depended on `source` still
    /// does.
    pub fn reset(&mut self, source: ObjectId) {
        if self.objects.contains_key(&source) {
            self.drop_outgoing(source);
            if let Some(record) = self.objects.get_mut(&source) {
                record.valid = true;
            }
        }
    }

    /// If `from` is invalid, `object` becomes invalid too.
    ///
    /// Used when copying a wrapper that may already be broken.
    pub fn propagate_invalid(&mut self, object: ObjectId, from: ObjectId) {
        if self.objects.get(&from).is_some_and(|record| !record.valid) {
            self.objects.entry(object).or_default();
            self.invalidate(object);
        }
    }

    /// Like [`propagate_invalid`](Registry::propagate_invalid), but a valid
    /// `from` additionally passes its content dependencies on: `object` now
    /// tracks the contents of everything `from` was tracking.
    pub fn propagate_content(&mut self, object: ObjectId, from: ObjectId) {
        match self.objects.get(&from) {
            None => {}
            Some(record) if !record.valid => {
                self.objects.entry(object).or_default();
                self.invalidate(object);
            }
            Some(_) => {
                let inherited: Vec<ObjectId> = self
                    .collect_outgoing(from)
                    .into_iter()
                    .filter(|&(_, kind)| kind == DepKind::Content)
                    .map(|(target, _)| target)
                    .collect();
                for target in inherited {
                    self.add_edge(object, target, DepKind::Content);
                }
            }
        }
    }

    /// Check a spatial condition, reporting through the handler on `false`.
    pub fn assert_spatial(&self, condition: bool) {
        if !condition {
            self.handler.spatial();
        }
    }

    /// Is there a record for `object`?
    pub fn is_registered(&self, object: ObjectId) -> bool {
        self.objects.contains_key(&object)
    }

    /// Validity flag of `object`, if registered.
    pub fn is_valid(&self, object: ObjectId) -> Option<bool> {
        self.objects.get(&object).map(|record| record.valid)
    }

    /// Kind of the edge from `source` to `target`, if one exists.
    ///
    /// Read-only: unlike registration, this lookup does not splay.
    pub fn dependency_kind(&self, source: ObjectId, target: ObjectId) -> Option<DepKind> {
        let record = self.objects.get(&source)?;
        let mut cursor = record.outgoing;
        while let Some(edge) = cursor {
            let e = &self.edges[edge];
            if target == e.target {
                return Some(e.kind);
            }
            cursor = if target < e.target { e.left } else { e.right };
        }
        None
    }

    /// Outgoing dependencies of `source`, ordered by target id.
    pub fn dependencies(&self, source: ObjectId) -> Vec<(ObjectId, DepKind)> {
        let mut deps = self.collect_outgoing(source);
        deps.sort_unstable_by_key(|&(target, _)| target);
        deps
    }

    /// Sources currently holding a `kind` dependency on `target`.
    pub fn dependents(&self, target: ObjectId, kind: DepKind) -> Vec<ObjectId> {
        self.incoming_sources(target, kind)
    }

    /// Ids of all registered objects, in no particular order.
    pub fn objects(&self) -> Vec<ObjectId> {
        self.objects.keys().copied().collect()
    }

    /// Number of registered objects.
    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    /// Number of live edges.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    fn add_edge(&mut self, source: ObjectId, target: ObjectId, kind: DepKind) {
        // Invalid sources do not acquire new dependencies.
        if !self.objects.entry(source).or_default().valid {
            return;
        }
        if kind == DepKind::Content {
            // Depending on the contents of a broken object breaks the
            // source immediately.
            if self.objects.get(&target).is_some_and(|record| !record.valid) {
                self.invalidate(source);
                return;
            }
        }
        self.objects.entry(target).or_default();

        let mut cursor = self.objects[&source].outgoing;
        let mut parent = None;
        while let Some(edge) = cursor {
            let at = self.edges[edge].target;
            if target == at {
                if kind > self.edges[edge].kind {
                    // Upgrade in place; the edge moves to the content list.
                    self.unlink_incoming(edge);
                    self.edges[edge].kind = DepKind::Content;
                    self.link_incoming(edge);
                }
                self.splay_outgoing(source, edge);
                return;
            }
            parent = cursor;
            cursor = if target < at {
                self.edges[edge].left
            } else {
                self.edges[edge].right
            };
        }

        let mut record = Edge::detached(source, target, kind);
        record.parent = parent;
        let edge = self.edges.insert(record);
        match parent {
            None => {
                if let Some(rec) = self.objects.get_mut(&source) {
                    rec.outgoing = Some(edge);
                }
            }
            Some(p) if target < self.edges[p].target => self.edges[p].left = Some(edge),
            Some(p) => self.edges[p].right = Some(edge),
        }
        self.link_incoming(edge);
        self.splay_outgoing(source, edge);
    }

    fn splay_outgoing(&mut self, source: ObjectId, edge: EdgeId) {
        if let Some(record) = self.objects.get_mut(&source) {
            splay::splay(&mut self.edges, &mut record.outgoing, edge);
        }
    }

    /// Prepend `edge` to its target's incoming list for its kind.
    fn link_incoming(&mut self, edge: EdgeId) {
        let (target, kind) = {
            let e = &self.edges[edge];
            (e.target, e.kind)
        };
        let head = self.objects.entry(target).or_default().incoming[kind.index()];
        self.edges[edge].prev = None;
        self.edges[edge].next = head;
        if let Some(h) = head {
            self.edges[h].prev = Some(edge);
        }
        if let Some(record) = self.objects.get_mut(&target) {
            record.incoming[kind.index()] = Some(edge);
        }
    }

    /// Detach `edge` from its target's incoming list.
    fn unlink_incoming(&mut self, edge: EdgeId) {
        let (target, kind, prev, next) = {
            let e = &self.edges[edge];
            (e.target, e.kind, e.prev, e.next)
        };
        match prev {
            Some(p) => self.edges[p].next = next,
            None => {
                if let Some(record) = self.objects.get_mut(&target) {
                    record.incoming[kind.index()] = next;
                }
            }
        }
        if let Some(n) = next {
            self.edges[n].prev = prev;
        }
        self.edges[edge].prev = None;
        self.edges[edge].next = None;
    }

    /// Release every outgoing edge of `source`, detaching each from its
    /// target's incoming list.
    fn drop_outgoing(&mut self, source: ObjectId) {
        let Some(record) = self.objects.get_mut(&source) else {
            return;
        };
        let mut stack: Vec<EdgeId> = record.outgoing.take().into_iter().collect();
        while let Some(edge) = stack.pop() {
            let (left, right) = {
                let e = &self.edges[edge];
                (e.left, e.right)
            };
            stack.extend(left);
            stack.extend(right);
            self.unlink_incoming(edge);
            self.edges.remove(edge);
        }
    }

    fn incoming_sources(&self, target: ObjectId, kind: DepKind) -> Vec<ObjectId> {
        let mut sources = Vec::new();
        let Some(record) = self.objects.get(&target) else {
            return sources;
        };
        let mut cursor = record.incoming[kind.index()];
        while let Some(edge) = cursor {
            sources.push(self.edges[edge].source);
            cursor = self.edges[edge].next;
        }
        sources
    }

    fn collect_outgoing(&self, source: ObjectId) -> Vec<(ObjectId, DepKind)> {
        let mut out = Vec::new();
        let Some(record) = self.objects.get(&source) else {
            return out;
        };
        let mut stack: Vec<EdgeId> = record.outgoing.into_iter().collect();
        while let Some(edge) = stack.pop() {
            let e = &self.edges[edge];
            stack.extend(e.left);
            stack.extend(e.right);
            out.push((e.target, e.kind));
        }
        out
    }

    /// Drain a work list of objects to invalidate.
    ///
    /// Flipping the flag queues every content-dependent source; dropping
    /// the drained object's outgoing edges is what unlinks it from the
    /// incoming lists it sits on, so the lists of the invalidated targets
    /// empty out as the loop runs. Objects reached twice are no-ops on the
    /// second visit.
    fn invalidate_many(&mut self, mut work: Vec<ObjectId>) {
        while let Some(object) = work.pop() {
            let Some(record) = self.objects.get_mut(&object) else {
                continue;
            };
            let newly_invalid = record.valid;
            record.valid = false;
            if newly_invalid {
                work.extend(self.incoming_sources(object, DepKind::Content));
            }
            self.drop_outgoing(object);
        }
    }

    fn invalidate(&mut self, object: ObjectId) {
        self.invalidate_many(vec![object]);
    }

    #[cfg(test)]
    pub(crate) fn outgoing_root(&self, source: ObjectId) -> Option<ObjectId> {
        let record = self.objects.get(&source)?;
        record.outgoing.map(|edge| self.edges[edge].target)
    }
}
