//! Behavior bundle of a context type: state constructor, lazy getters, event handlers
//! and teardown hook.

use crate::context::ContextRef;
use crate::error::RuntimeError;
use crate::event::{EventHandler, EventTable};
use crate::lazy::Getter;
use crate::params::ConstructionParams;
use crate::state::{boxed_constructor, unit_constructor, StateConstructor};
use serde_json::Value;
use std::any::Any;
use std::sync::Arc;

/// Teardown hook run when the registry owning the context is removed
///
/// Must release any non-memory resources held by the subtree and tolerate being called
/// more than once.
pub type TeardownHook = Arc<dyn Fn(&ContextRef) -> Result<(), RuntimeError> + Send + Sync>;

/// Declared behavior of a context type
#[derive(Clone)]
pub struct ContextKind {
    constructor: StateConstructor,
    getters: Vec<(String, Getter<ContextRef>)>,
    events: EventTable,
    teardown: Option<TeardownHook>,
}

impl ContextKind {
    /// Kind with unit state, no getters, no handlers
    pub fn new() -> Self {
        Self {
            constructor: unit_constructor(),
            getters: Vec::new(),
            events: EventTable::new(),
            teardown: None,
        }
    }

    /// Build each instance's state from the registry's construction parameters
    pub fn with_state<T, F>(mut self, constructor: F) -> Self
    where
        T: Any,
        F: Fn(&ConstructionParams) -> Result<T, RuntimeError> + Send + Sync + 'static,
    {
        self.constructor = boxed_constructor(constructor);
        self
    }

    /// Declare a lazy property, materialized once the whole tree's services exist
    pub fn getter<F>(mut self, name: impl Into<String>, getter: F) -> Self
    where
        F: Fn(&ContextRef) -> Result<Value, RuntimeError> + Send + Sync + 'static,
    {
        let getter: Getter<ContextRef> = Arc::new(getter);
        self.getters.push((name.into(), getter));
        self
    }

    /// Register the handler invoked when `event` is broadcast through this context
    pub fn on<F>(mut self, event: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&ContextRef, &[Value]) -> Result<Option<Value>, RuntimeError>
            + Send
            + Sync
            + 'static,
    {
        self.events.register(event, Arc::new(handler));
        self
    }

    pub fn on_destroy<F>(mut self, hook: F) -> Self
    where
        F: Fn(&ContextRef) -> Result<(), RuntimeError> + Send + Sync + 'static,
    {
        self.teardown = Some(Arc::new(hook));
        self
    }

    pub(crate) fn construct(&self, params: &ConstructionParams) -> Result<Box<dyn Any>, RuntimeError> {
        (self.constructor)(params)
    }

    pub(crate) fn getters(&self) -> &[(String, Getter<ContextRef>)] {
        &self.getters
    }

    pub fn handler(&self, event: &str) -> Option<&EventHandler> {
        self.events.get(event)
    }

    pub fn events(&self) -> &EventTable {
        &self.events
    }

    pub(crate) fn teardown(&self) -> Option<&TeardownHook> {
        self.teardown.as_ref()
    }
}

impl Default for ContextKind {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ContextKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContextKind")
            .field(
                "getters",
                &self.getters.iter().map(|(name, _)| name).collect::<Vec<_>>(),
            )
            .field("events", &self.events)
            .field("teardown", &self.teardown.is_some())
            .finish()
    }
}
