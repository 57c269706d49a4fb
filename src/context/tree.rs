//! Whole-subtree passes: service instantiation, context getter materialization, event
//! broadcast and teardown. Every pass visits a node before its children and children in
//! ascending context id order.

use crate::context::{ContextInstance, ContextRef};
use crate::error::{RuntimeError, SchemaError};
use crate::lazy;
use crate::registry::Registry;
use serde_json::Value;
use tracing::{debug, trace};

impl ContextInstance {
    /// Instantiate this node's services, materialize their getters, then recurse
    ///
    /// All services of one context exist before the first of their getters runs, and a
    /// context's services are finished before any descendant's are constructed.
    pub(crate) fn create_services(self: &ContextRef, registry: &Registry) -> Result<(), RuntimeError> {
        if let Some(service_schemas) = self.schema.context_services() {
            for service_schema in service_schemas {
                let service_id = service_schema
                    .service_id()
                    .ok_or_else(|| SchemaError::NotService(service_schema.name().to_string()))?;
                let service = registry.create_service(service_schema, self)?;
                self.attach_service(service_id, service);
            }
            debug!(
                context = self.name(),
                services = service_schemas.len(),
                "Services constructed"
            );
            for service in self.get_context_services() {
                service.init_service_getters()?;
            }
        }
        for child in self.get_context_children() {
            child.create_services(registry)?;
        }
        Ok(())
    }

    /// Materialize this node's lazy properties, then its children's
    pub(crate) fn init_context_getters(self: &ContextRef) -> Result<(), RuntimeError> {
        lazy::materialize(self, self.name(), &self.properties)?;
        for child in self.get_context_children() {
            child.init_context_getters()?;
        }
        Ok(())
    }

    /// Broadcast `event` through this subtree, pre-order
    ///
    /// A frozen node cuts dispatch for itself and everything below it. Non-empty handler
    /// results overwrite the registry's return slot; the slot is not reset here.
    pub fn call_context_event(self: &ContextRef, event: &str, args: &[Value]) -> Result<(), RuntimeError> {
        if self.is_frozen() {
            trace!(context = self.name(), event, "Context frozen, subtree skipped");
            return Ok(());
        }
        if let Some(handler) = self.schema.kind().handler(event) {
            trace!(context = self.name(), event, "Dispatching event");
            let value = handler(self, args).map_err(|e| RuntimeError::EventHandler {
                context: self.name().to_string(),
                event: event.to_string(),
                source: Box::new(e),
            })?;
            self.handle_context_event_return_value(value);
        }
        for child in self.get_context_children() {
            child.call_context_event(event, args)?;
        }
        Ok(())
    }

    /// Run the kind's teardown hook, if it declares one
    pub fn destroy_context(self: &ContextRef) -> Result<(), RuntimeError> {
        match self.schema.kind().teardown() {
            Some(hook) => {
                debug!(context = self.name(), "Running teardown hook");
                hook(self).map_err(|e| RuntimeError::Teardown {
                    context: self.name().to_string(),
                    source: Box::new(e),
                })
            }
            None => Ok(()),
        }
    }
}
