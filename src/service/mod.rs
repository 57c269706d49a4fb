//! Service Leaves
//!
//! Services are leaf units owned by exactly one context. Lookups made through a service
//! are answered by its owning context.

pub mod kind;

pub use kind::ServiceKind;

use crate::context::{ContextInstance, ContextRef};
use crate::error::RuntimeError;
use crate::lazy::{self, LazyProperties};
use crate::schema::{ContextSchema, ServiceSchema};
use crate::state::InstanceState;
use crate::types::ServiceId;
use serde_json::Value;
use std::any::Any;
use std::cell::{Ref, RefCell, RefMut};
use std::rc::{Rc, Weak};
use std::sync::Arc;

/// Shared handle to a live service
pub type ServiceRef = Rc<ServiceInstance>;

/// Runtime service instantiated from a [`ServiceSchema`]
pub struct ServiceInstance {
    schema: Arc<ServiceSchema>,
    context: Weak<ContextInstance>,
    state: InstanceState,
    properties: RefCell<LazyProperties<ServiceRef>>,
}

impl ServiceInstance {
    pub(crate) fn new(
        schema: Arc<ServiceSchema>,
        context: &ContextRef,
        state: Box<dyn Any>,
    ) -> ServiceRef {
        let properties = LazyProperties::from_getters(schema.kind().getters());
        Rc::new(Self {
            schema,
            context: Rc::downgrade(context),
            state: InstanceState::new(state),
            properties: RefCell::new(properties),
        })
    }

    pub fn schema(&self) -> &Arc<ServiceSchema> {
        &self.schema
    }

    pub fn name(&self) -> &str {
        self.schema.name()
    }

    pub fn service_id(&self) -> Option<ServiceId> {
        self.schema.service_id()
    }

    /// Owning context; `None` once the context has been dropped
    pub fn get_service_context(&self) -> Option<ContextRef> {
        self.context.upgrade()
    }

    pub fn get_context(&self, schema: &ContextSchema) -> Option<ContextRef> {
        self.get_service_context()?.get_context(schema)
    }

    /// Sibling service (or this one) on the owning context
    pub fn get_service(&self, schema: &ServiceSchema) -> Option<ServiceRef> {
        self.get_service_context()?.get_service(schema)
    }

    pub fn state<T: Any>(&self) -> Option<Ref<'_, T>> {
        self.state.get()
    }

    pub fn state_mut<T: Any>(&self) -> Option<RefMut<'_, T>> {
        self.state.get_mut()
    }

    pub fn property(&self, name: &str) -> Option<Value> {
        self.properties.borrow().get(name).cloned()
    }

    pub fn set_property(&self, name: &str, value: Value) {
        self.properties.borrow_mut().set(name, value);
    }

    pub fn is_property_pending(&self, name: &str) -> bool {
        self.properties.borrow().is_pending(name)
    }

    pub(crate) fn init_service_getters(self: &ServiceRef) -> Result<(), RuntimeError> {
        lazy::materialize(self, self.name(), &self.properties)
    }
}

impl std::fmt::Debug for ServiceInstance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceInstance")
            .field("name", &self.name())
            .field("service_id", &self.service_id())
            .finish()
    }
}
