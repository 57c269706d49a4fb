//! Personal Registry
//!
//! A registry owns one complete context tree built from the factory's root schema for a
//! single external id, the flat `context id -> instance` index covering every node of
//! that tree, the construction parameters every node was built with, and the single-slot
//! return channel used while an event is being broadcast.

use crate::config::RuntimeConfig;
use crate::context::{ContextInstance, ContextRef};
use crate::error::{RuntimeError, SchemaError};
use crate::event::EventReturnSlot;
use crate::params::ConstructionParams;
use crate::schema::{ContextSchema, ServiceSchema};
use crate::service::{ServiceInstance, ServiceRef};
use crate::types::{ContextId, PersonalId, EMPTY_PERSONAL_ID};
use serde_json::Value;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;
use std::sync::Arc;
use tracing::{debug, instrument, warn};

/// One independently multiplexed context tree plus its flat lookup index
pub struct Registry {
    id: PersonalId,
    params: ConstructionParams,
    config: RuntimeConfig,
    root: RefCell<Option<ContextRef>>,
    all_contexts: RefCell<BTreeMap<ContextId, ContextRef>>,
    event_return_value: EventReturnSlot,
}

impl Registry {
    pub(crate) fn new(id: PersonalId, params: ConstructionParams, config: RuntimeConfig) -> Rc<Self> {
        Rc::new(Self {
            id,
            params,
            config,
            root: RefCell::new(None),
            all_contexts: RefCell::new(BTreeMap::new()),
            event_return_value: EventReturnSlot::default(),
        })
    }

    /// Sentinel registry: id `-1`, no tree, every lookup misses and every event is a no-op
    pub fn empty() -> Rc<Self> {
        Self::new(
            EMPTY_PERSONAL_ID,
            ConstructionParams::empty(),
            RuntimeConfig::default(),
        )
    }

    pub fn id(&self) -> PersonalId {
        self.id
    }

    /// Parameters every context and service of this tree was constructed with
    pub fn params(&self) -> &ConstructionParams {
        &self.params
    }

    /// Whether this registry holds no tree (sentinel, or already removed)
    pub fn is_empty(&self) -> bool {
        self.root.borrow().is_none()
    }

    /// Build the whole tree: structure, then services with their getters, then context getters
    pub(crate) fn create_root_context(self: &Rc<Self>, schema: &Arc<ContextSchema>) -> Result<(), RuntimeError> {
        let root = self.create_context(schema, None)?;
        *self.root.borrow_mut() = Some(root.clone());
        root.create_services(self)?;
        root.init_context_getters()?;
        debug!(
            personal = self.id,
            contexts = self.all_contexts.borrow().len(),
            "Context tree built"
        );
        Ok(())
    }

    /// Construct `schema` under `parent`, index it, then construct its children in
    /// declaration order
    pub(crate) fn create_context(
        self: &Rc<Self>,
        schema: &Arc<ContextSchema>,
        parent: Option<&ContextRef>,
    ) -> Result<ContextRef, RuntimeError> {
        let context_id = schema
            .context_id()
            .ok_or_else(|| SchemaError::NotContext(schema.name().to_string()))?;
        let state = schema
            .kind()
            .construct(&self.params)
            .map_err(|e| RuntimeError::ContextConstruction {
                context: schema.name().to_string(),
                source: Box::new(e),
            })?;
        let context = ContextInstance::new(schema.clone(), Rc::downgrade(self), parent, state);
        debug!(context = schema.name(), context_id, "Context constructed");
        self.register_context(context_id, &context);

        for child_schema in schema.context_children() {
            let child = self.create_context(child_schema, Some(&context))?;
            if let Some(child_id) = child_schema.context_id() {
                context.attach_child(child_id, child);
            }
        }
        Ok(context)
    }

    pub(crate) fn create_service(
        &self,
        schema: &Arc<ServiceSchema>,
        context: &ContextRef,
    ) -> Result<ServiceRef, RuntimeError> {
        let state = schema
            .kind()
            .construct(&self.params)
            .map_err(|e| RuntimeError::ServiceConstruction {
                service: schema.name().to_string(),
                source: Box::new(e),
            })?;
        Ok(ServiceInstance::new(schema.clone(), context, state))
    }

    fn register_context(&self, context_id: ContextId, context: &ContextRef) {
        let previous = self
            .all_contexts
            .borrow_mut()
            .insert(context_id, context.clone());
        if let Some(previous) = previous {
            if self.config.warn_on_index_collision {
                warn!(
                    personal = self.id,
                    context_id,
                    previous = previous.name(),
                    current = context.name(),
                    "Context id collision in flat index, keeping the latest"
                );
            }
        }
    }

    pub fn get_root_context(&self) -> Option<ContextRef> {
        self.root.borrow().clone()
    }

    /// Every context of the tree, ascending by context id
    pub fn get_all_contexts(&self) -> Vec<ContextRef> {
        self.all_contexts.borrow().values().cloned().collect()
    }

    /// The instance of the given context type anywhere in the tree
    pub fn get_context(&self, schema: &ContextSchema) -> Option<ContextRef> {
        let context_id = schema.context_id()?;
        self.all_contexts.borrow().get(&context_id).cloned()
    }

    /// Broadcast `event` from the root and return the last non-empty handler result
    #[instrument(skip(self, args), fields(personal = self.id))]
    pub fn call_event(&self, event: &str, args: &[Value]) -> Result<Option<Value>, RuntimeError> {
        self.event_return_value.reset();
        if let Some(root) = self.get_root_context() {
            root.call_context_event(event, args)?;
        }
        Ok(self.event_return_value.take())
    }

    pub fn set_event_return_value(&self, value: Value) {
        self.event_return_value.set(value);
    }

    /// Tear the tree down through the root's teardown hook and drop it
    ///
    /// The flat index stays populated while the hook runs. If the hook fails the tree is
    /// left in place and the error returned; once removed, calling it again is a no-op.
    pub fn remove(&self) -> Result<(), RuntimeError> {
        let Some(root) = self.root.borrow_mut().take() else {
            return Ok(());
        };
        debug!(personal = self.id, "Tearing down context tree");
        if let Err(e) = root.destroy_context() {
            *self.root.borrow_mut() = Some(root);
            return Err(e);
        }
        self.all_contexts.borrow_mut().clear();
        self.event_return_value.reset();
        Ok(())
    }

    /// Store a handler result in the return slot unless it is empty
    pub(crate) fn offer_event_return_value(&self, value: Option<Value>) {
        self.event_return_value.offer(value);
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("id", &self.id)
            .field("params", &self.params)
            .field("contexts", &self.all_contexts.borrow().len())
            .finish()
    }
}
