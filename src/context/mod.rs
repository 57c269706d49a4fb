//! Context Nodes
//!
//! A context instance is one node of a personal tree. It exclusively owns its child
//! contexts and its services (each in slots indexed by schema id), keeps weak references
//! to its parent and to the registry that built it, and carries the freeze flag and the
//! lazily materialized properties of its kind.

pub mod kind;
mod tree;

pub use kind::{ContextKind, TeardownHook};

use crate::lazy::LazyProperties;
use crate::registry::Registry;
use crate::schema::{ContextSchema, ServiceSchema};
use crate::service::ServiceRef;
use crate::state::InstanceState;
use crate::types::{ContextId, ServiceId};
use serde_json::Value;
use std::any::Any;
use std::cell::{Cell, Ref, RefCell, RefMut};
use std::rc::{Rc, Weak};
use std::sync::Arc;

/// Shared handle to a live context node
pub type ContextRef = Rc<ContextInstance>;

/// Runtime node instantiated from a [`ContextSchema`]
pub struct ContextInstance {
    schema: Arc<ContextSchema>,
    registry: Weak<Registry>,
    parent: Weak<ContextInstance>,
    children: RefCell<Vec<Option<ContextRef>>>,
    services: RefCell<Vec<Option<ServiceRef>>>,
    state: InstanceState,
    properties: RefCell<LazyProperties<ContextRef>>,
    frozen: Cell<bool>,
}

impl ContextInstance {
    pub(crate) fn new(
        schema: Arc<ContextSchema>,
        registry: Weak<Registry>,
        parent: Option<&ContextRef>,
        state: Box<dyn Any>,
    ) -> ContextRef {
        let properties = LazyProperties::from_getters(schema.kind().getters());
        Rc::new(Self {
            schema,
            registry,
            parent: parent.map(Rc::downgrade).unwrap_or_default(),
            children: RefCell::new(Vec::new()),
            services: RefCell::new(Vec::new()),
            state: InstanceState::new(state),
            properties: RefCell::new(properties),
            frozen: Cell::new(false),
        })
    }

    pub fn schema(&self) -> &Arc<ContextSchema> {
        &self.schema
    }

    pub fn name(&self) -> &str {
        self.schema.name()
    }

    pub fn context_id(&self) -> Option<ContextId> {
        self.schema.context_id()
    }

    /// Registry that built this node; `None` once the registry has been dropped
    pub fn get_registry(&self) -> Option<Rc<Registry>> {
        self.registry.upgrade()
    }

    /// Parent node; `None` for the root
    pub fn get_parent_context(&self) -> Option<ContextRef> {
        self.parent.upgrade()
    }

    /// Direct children in ascending context id order
    pub fn get_context_children(&self) -> Vec<ContextRef> {
        self.children.borrow().iter().flatten().cloned().collect()
    }

    /// Direct child of the given type
    pub fn get_context_child(&self, schema: &ContextSchema) -> Option<ContextRef> {
        let context_id = schema.context_id()?;
        self.children.borrow().get(context_id).cloned().flatten()
    }

    /// Direct child of the given type, else the instance of that type anywhere in the tree
    pub fn get_context(&self, schema: &ContextSchema) -> Option<ContextRef> {
        self.get_context_child(schema)
            .or_else(|| self.get_registry()?.get_context(schema))
    }

    /// Own services in ascending service id order
    pub fn get_context_services(&self) -> Vec<ServiceRef> {
        self.services.borrow().iter().flatten().cloned().collect()
    }

    /// Own service of the given type
    pub fn get_service(&self, schema: &ServiceSchema) -> Option<ServiceRef> {
        let service_id = schema.service_id()?;
        self.services.borrow().get(service_id).cloned().flatten()
    }

    pub(crate) fn attach_child(&self, context_id: ContextId, child: ContextRef) {
        insert_slot(&mut self.children.borrow_mut(), context_id, child);
    }

    pub(crate) fn attach_service(&self, service_id: ServiceId, service: ServiceRef) {
        insert_slot(&mut self.services.borrow_mut(), service_id, service);
    }

    /// Typed view of the state built by the kind's constructor
    pub fn state<T: Any>(&self) -> Option<Ref<'_, T>> {
        self.state.get()
    }

    pub fn state_mut<T: Any>(&self) -> Option<RefMut<'_, T>> {
        self.state.get_mut()
    }

    /// Materialized property value; absent while its getter is still pending
    pub fn property(&self, name: &str) -> Option<Value> {
        self.properties.borrow().get(name).cloned()
    }

    pub fn set_property(&self, name: &str, value: Value) {
        self.properties.borrow_mut().set(name, value);
    }

    pub fn is_property_pending(&self, name: &str) -> bool {
        self.properties.borrow().is_pending(name)
    }

    pub fn set_context_event_return_value(&self, value: Value) {
        if let Some(registry) = self.get_registry() {
            registry.set_event_return_value(value);
        }
    }

    /// Forward a handler result to the registry's return slot; empty results are dropped
    pub fn handle_context_event_return_value(&self, value: Option<Value>) {
        if let Some(registry) = self.get_registry() {
            registry.offer_event_return_value(value);
        }
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen.get()
    }

    /// Frozen itself or directly under a frozen parent
    ///
    /// Only one level is checked. Broadcast cuts at any frozen ancestor, so a node under a
    /// frozen grandparent is skipped by dispatch yet reports `false` here.
    pub fn is_frozen_strict(&self) -> bool {
        self.is_frozen()
            || self
                .get_parent_context()
                .map(|parent| parent.is_frozen())
                .unwrap_or(false)
    }

    pub fn freeze(&self) {
        self.frozen.set(true);
    }

    pub fn unfreeze(&self) {
        self.frozen.set(false);
    }
}

impl std::fmt::Debug for ContextInstance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContextInstance")
            .field("name", &self.name())
            .field("context_id", &self.context_id())
            .field("frozen", &self.is_frozen())
            .field(
                "properties",
                &self.properties.borrow().names().collect::<Vec<_>>(),
            )
            .field("children", &self.get_context_children().len())
            .field("services", &self.get_context_services().len())
            .finish()
    }
}

fn insert_slot<T>(slots: &mut Vec<Option<T>>, index: usize, value: T) {
    if slots.len() <= index {
        slots.resize_with(index + 1, || None);
    }
    slots[index] = Some(value);
}
