//! Event Dispatch Primitives
//!
//! Contexts register typed handlers per event name at kind-declaration time. A broadcast
//! invokes the handler registered under the event's name on each visited context, and
//! non-empty results are funneled into the registry's single-slot return channel.

use crate::context::ContextRef;
use crate::error::RuntimeError;
use serde_json::Value;
use std::cell::RefCell;
use std::collections::HashMap;
use std::sync::Arc;

/// Handler invoked with the visited context and the broadcast arguments.
/// `Ok(None)` is the empty result and never overwrites the return slot.
pub type EventHandler =
    Arc<dyn Fn(&ContextRef, &[Value]) -> Result<Option<Value>, RuntimeError> + Send + Sync>;

/// Event name -> handler table of one context kind
#[derive(Clone, Default)]
pub struct EventTable {
    handlers: HashMap<String, EventHandler>,
}

impl EventTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler; a later registration under the same name replaces the earlier one
    pub fn register(&mut self, event: impl Into<String>, handler: EventHandler) {
        self.handlers.insert(event.into(), handler);
    }

    pub fn get(&self, event: &str) -> Option<&EventHandler> {
        self.handlers.get(event)
    }

    /// Registered event names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl std::fmt::Debug for EventTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.names()).finish()
    }
}

/// Single-slot event return channel owned by a registry
///
/// Only meaningful within one dispatch: reset at the start, read at the end.
#[derive(Debug, Default)]
pub struct EventReturnSlot(RefCell<Option<Value>>);

impl EventReturnSlot {
    pub fn reset(&self) {
        self.0.borrow_mut().take();
    }

    pub fn set(&self, value: Value) {
        *self.0.borrow_mut() = Some(value);
    }

    /// Store a handler result unless it is empty
    pub fn offer(&self, value: Option<Value>) {
        if let Some(value) = value {
            self.set(value);
        }
    }

    pub fn take(&self) -> Option<Value> {
        self.0.borrow_mut().take()
    }
}
