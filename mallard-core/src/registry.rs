//! Per-kind handler slots and dispatch policy.
//!
//! Events are opt-in: a kind with no handler dispatches to nothing and that
//! is success. Registration is last-wins; replacing an existing handler is
//! logged, not an error.

use tracing::warn;

use crate::error::EngineResult;
use crate::events::{EventKind, EventPayload};

/// What the dispatch loop does with a handler error for a given kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchPolicy {
    /// Stop draining, publish state mutated so far, return the error.
    Propagate,
    /// Log the error and continue with the rest of the tick's backlog.
    LogAndContinue,
}

impl DispatchPolicy {
    /// Default policy per kind: the critical tags propagate, everything
    /// else is best-effort.
    pub fn default_for(kind: EventKind) -> Self {
        match kind {
            EventKind::Quitting | EventKind::LowMemory => Self::Propagate,
            _ => Self::LogAndContinue,
        }
    }
}

/// An externally supplied callback for one event kind.
pub type EventHandler = Box<dyn FnMut(&EventPayload) -> EngineResult<()>>;

/// Fixed-size mapping from event kind to at most one handler, plus the
/// per-kind failure policy.
pub struct HandlerRegistry {
    handlers: [Option<EventHandler>; EventKind::COUNT],
    policies: [DispatchPolicy; EventKind::COUNT],
}

impl Default for HandlerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl HandlerRegistry {
    pub fn new() -> Self {
        let mut policies = [DispatchPolicy::LogAndContinue; EventKind::COUNT];
        policies[EventKind::Quitting as usize] = DispatchPolicy::Propagate;
        policies[EventKind::LowMemory as usize] = DispatchPolicy::Propagate;
        Self {
            handlers: std::array::from_fn(|_| None),
            policies,
        }
    }

    /// Registers `handler` for `kind`, replacing and dropping any previous
    /// one. Last registration wins.
    pub fn set_handler(&mut self, kind: EventKind, handler: EventHandler) {
        let slot = &mut self.handlers[kind as usize];
        if slot.is_some() {
            warn!(event = %kind, "overriding event handler");
        }
        *slot = Some(handler);
    }

    /// Overrides the failure policy for `kind`.
    pub fn set_policy(&mut self, kind: EventKind, policy: DispatchPolicy) {
        self.policies[kind as usize] = policy;
    }

    pub fn policy(&self, kind: EventKind) -> DispatchPolicy {
        self.policies[kind as usize]
    }

    pub fn has_handler(&self, kind: EventKind) -> bool {
        self.handlers[kind as usize].is_some()
    }

    /// Invokes the handler registered for the payload's kind. Absence of a
    /// handler is success. A handler error is returned as-is; the caller
    /// applies the kind's policy.
    pub fn invoke(&mut self, payload: &EventPayload) -> EngineResult<()> {
        match &mut self.handlers[payload.kind() as usize] {
            Some(handler) => handler(payload),
            None => Ok(()),
        }
    }
}

impl std::fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let registered: Vec<usize> = self
            .handlers
            .iter()
            .enumerate()
            .filter_map(|(i, h)| h.is_some().then_some(i))
            .collect();
        f.debug_struct("HandlerRegistry")
            .field("registered", &registered)
            .finish()
    }
}
