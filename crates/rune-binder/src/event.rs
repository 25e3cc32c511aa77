//! Event graph
//!
//! An event is a one-shot condition a binding can wait on: a signature's
//! return datatype is known, a name has been defined, a variable has a
//! datatype. Firing an event hands every waiter back to the scheduler once.
//! Waiting on an event that already fired does not block.

use crate::ast::{BlockId, VarId};
use crate::engine::BindingId;
use crate::interner::Symbol;
use crate::signature::SignatureId;
use crate::template::ClassId;
use rune_types::define_id;
use rustc_hash::FxHashMap;

define_id!(
    /// An event in the event graph
    EventId
);

/// Where a name is looked up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Namespace {
    /// The lexical scope rooted at a function body
    Scope(BlockId),
    /// The data members of a class
    Class(ClassId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// The signature's return datatype is known
    Signature(SignatureId),
    /// A name was defined in a namespace
    IdentDefined(Namespace, Symbol),
    /// The variable has a datatype
    Variable(VarId),
}

#[derive(Debug, Clone)]
pub struct Event {
    pub kind: EventKind,
    pub fired: bool,
    waiters: Vec<BindingId>,
}

impl Event {
    pub fn waiters(&self) -> &[BindingId] {
        &self.waiters
    }
}

/// Result of registering a wait
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitOutcome {
    /// The binding is parked until the event fires
    Suspended,
    /// The event already fired; the binding should be re-queued right away
    AlreadyFired,
}

#[derive(Debug, Clone, Default)]
pub struct EventGraph {
    events: Vec<Event>,
    index: FxHashMap<EventKind, EventId>,
    /// The single event each waiting binding is parked on
    waiting: FxHashMap<BindingId, EventId>,
}

impl EventGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Find or create the event for a condition
    pub fn create_event(&mut self, kind: EventKind) -> EventId {
        if let Some(&id) = self.index.get(&kind) {
            return id;
        }
        let id = EventId::new(self.events.len() as u32);
        self.events.push(Event {
            kind,
            fired: false,
            waiters: Vec::new(),
        });
        self.index.insert(kind, id);
        id
    }

    pub fn event(&self, id: EventId) -> &Event {
        &self.events[id.index()]
    }

    pub fn is_fired(&self, kind: EventKind) -> bool {
        self.index
            .get(&kind)
            .map(|id| self.events[id.index()].fired)
            .unwrap_or(false)
    }

    /// Park a binding on an event, replacing any earlier wait
    pub fn wait(&mut self, binding: BindingId, kind: EventKind) -> WaitOutcome {
        let id = self.create_event(kind);
        self.cancel_wait(binding);

        let event = &mut self.events[id.index()];
        if event.fired {
            return WaitOutcome::AlreadyFired;
        }
        event.waiters.push(binding);
        self.waiting.insert(binding, id);
        WaitOutcome::Suspended
    }

    /// Remove a binding from the event it waits on
    pub fn cancel_wait(&mut self, binding: BindingId) -> Option<EventId> {
        let id = self.waiting.remove(&binding)?;
        self.events[id.index()].waiters.retain(|b| *b != binding);
        Some(id)
    }

    /// Mark an event satisfied and take its waiters
    ///
    /// An event fires at most once; firing it again returns no waiters.
    pub fn fire(&mut self, kind: EventKind) -> Vec<BindingId> {
        let id = self.create_event(kind);
        let event = &mut self.events[id.index()];
        if event.fired {
            return Vec::new();
        }
        event.fired = true;
        let waiters = std::mem::take(&mut event.waiters);
        for binding in &waiters {
            self.waiting.remove(binding);
        }
        tracing::trace!(?kind, waiters = waiters.len(), "event fired");
        waiters
    }

    /// Event a binding is currently parked on
    pub fn waiting_on(&self, binding: BindingId) -> Option<EventKind> {
        self.waiting.get(&binding).map(|id| self.events[id.index()].kind)
    }

    /// Unfired events that still have waiters, in creation order
    pub fn pending(&self) -> impl Iterator<Item = &Event> {
        self.events.iter().filter(|e| !e.fired && !e.waiters.is_empty())
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
