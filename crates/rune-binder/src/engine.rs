//! Binding scheduler
//!
//! A binding is the deferred work "type-check this statement in the context
//! of this signature". Bindings move through an explicit state machine:
//!
//! ```text
//! queued -> running -> bound
//!                   -> failed
//!                   -> waiting -> queued (when its event fires)
//! ```
//!
//! The ready queue is FIFO. A binding that runs again restarts from the
//! beginning of its statement; nothing is resumed mid-expression.

use crate::ast::StmtId;
use crate::signature::SignatureId;
use rune_types::define_id;
use std::collections::VecDeque;

define_id!(
    /// A binding in the scheduler
    BindingId
);

/// Where a binding is in its state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BindingState {
    /// On the ready queue
    Queued,
    /// Being bound right now
    Running,
    /// Parked on an event
    Waiting,
    /// Every datatype of the statement is known
    Bound,
    /// The statement has an error, reported or silent
    Failed,
}

impl BindingState {
    /// `Bound` and `Failed` never change again
    pub fn is_terminal(&self) -> bool {
        matches!(self, BindingState::Bound | BindingState::Failed)
    }
}

/// One statement to bind in the context of one signature
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Binding {
    pub signature: SignatureId,
    pub statement: StmtId,
    /// The statement is on a runtime path of the signature
    pub instantiating: bool,
    pub state: BindingState,
}

/// Every binding of the pass plus the FIFO ready queue
#[derive(Debug, Clone, Default)]
pub struct BindingEngine {
    bindings: Vec<Binding>,
    queue: VecDeque<BindingId>,
    runs: usize,
}

impl BindingEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a queued binding
    pub fn add(&mut self, signature: SignatureId, statement: StmtId, instantiating: bool) -> BindingId {
        let id = BindingId::new(self.bindings.len() as u32);
        self.bindings.push(Binding {
            signature,
            statement,
            instantiating,
            state: BindingState::Queued,
        });
        self.queue.push_back(id);
        tracing::trace!(binding = id.as_u32(), "binding queued");
        id
    }

    /// Take the next ready binding and mark it running
    pub fn pop(&mut self) -> Option<BindingId> {
        let id = self.queue.pop_front()?;
        self.transition(id, BindingState::Running);
        self.runs += 1;
        Some(id)
    }

    /// Put a waiting binding back on the ready queue
    pub fn requeue(&mut self, id: BindingId) {
        if self.bindings[id.index()].state == BindingState::Waiting {
            self.transition(id, BindingState::Queued);
            self.queue.push_back(id);
        }
    }

    /// Mark a binding that has not finished as being on a runtime path
    pub fn make_instantiating(&mut self, id: BindingId) {
        let binding = &mut self.bindings[id.index()];
        if !binding.state.is_terminal() {
            binding.instantiating = true;
        }
    }

    /// Park a running binding until its event fires
    pub fn suspend(&mut self, id: BindingId) {
        self.transition(id, BindingState::Waiting);
    }

    /// Move a binding to `Bound` or `Failed`
    pub fn finish(&mut self, id: BindingId, state: BindingState) {
        debug_assert!(state.is_terminal());
        self.transition(id, state);
    }

    fn transition(&mut self, id: BindingId, state: BindingState) {
        let binding = &mut self.bindings[id.index()];
        tracing::trace!(binding = id.as_u32(), from = ?binding.state, to = ?state, "binding transition");
        binding.state = state;
    }

    /// Look up a binding by id
    pub fn get(&self, id: BindingId) -> &Binding {
        &self.bindings[id.index()]
    }

    /// Nothing is ready to run
    pub fn is_idle(&self) -> bool {
        self.queue.is_empty()
    }

    /// Bindings parked on an event, in creation order
    pub fn waiting(&self) -> Vec<BindingId> {
        self.iter()
            .filter(|(_, b)| b.state == BindingState::Waiting)
            .map(|(id, _)| id)
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (BindingId, &Binding)> {
        self.bindings
            .iter()
            .enumerate()
            .map(|(i, b)| (BindingId::new(i as u32), b))
    }

    /// Total number of binding executions so far
    pub fn runs(&self) -> usize {
        self.runs
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine_with(n: u32) -> BindingEngine {
        let mut engine = BindingEngine::new();
        for i in 0..n {
            engine.add(SignatureId::new(0), StmtId::new(i), true);
        }
        engine
    }

    #[test]
    fn test_fifo_order() {
        let mut engine = engine_with(3);
        assert_eq!(engine.pop(), Some(BindingId::new(0)));
        assert_eq!(engine.pop(), Some(BindingId::new(1)));
        assert_eq!(engine.pop(), Some(BindingId::new(2)));
        assert_eq!(engine.pop(), None);
        assert_eq!(engine.runs(), 3);
    }

    #[test]
    fn test_waiting_binding_returns_to_back_of_queue() {
        let mut engine = engine_with(2);
        let first = engine.pop().unwrap();
        engine.suspend(first);
        assert_eq!(engine.waiting(), vec![first]);

        engine.requeue(first);
        assert_eq!(engine.get(first).state, BindingState::Queued);
        assert_eq!(engine.pop(), Some(BindingId::new(1)));
        assert_eq!(engine.pop(), Some(first));
    }

    #[test]
    fn test_make_instantiating_leaves_finished_bindings() {
        let mut engine = BindingEngine::new();
        let done = engine.add(SignatureId::new(0), StmtId::new(0), false);
        let pending = engine.add(SignatureId::new(0), StmtId::new(1), false);
        let id = engine.pop().unwrap();
        engine.finish(id, BindingState::Bound);

        engine.make_instantiating(done);
        engine.make_instantiating(pending);
        assert!(!engine.get(done).instantiating);
        assert!(engine.get(pending).instantiating);
    }

    #[test]
    fn test_requeue_ignores_terminal_bindings() {
        let mut engine = engine_with(1);
        let id = engine.pop().unwrap();
        engine.finish(id, BindingState::Bound);
        engine.requeue(id);
        assert!(engine.is_idle());
        assert_eq!(engine.get(id).state, BindingState::Bound);
    }
}
