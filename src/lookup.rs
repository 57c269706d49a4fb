//! Lookup capability shared by contexts and services.

use crate::context::{ContextInstance, ContextRef};
use crate::schema::{ContextSchema, ServiceSchema};
use crate::service::{ServiceInstance, ServiceRef};

/// Non-mutating lookups; absence is `None`, never an error
pub trait Lookup {
    /// Instance of the given context type reachable from here
    fn get_context(&self, schema: &ContextSchema) -> Option<ContextRef>;

    /// Service of the given type on the nearest owning context
    fn get_service(&self, schema: &ServiceSchema) -> Option<ServiceRef>;
}

impl Lookup for ContextInstance {
    fn get_context(&self, schema: &ContextSchema) -> Option<ContextRef> {
        ContextInstance::get_context(self, schema)
    }

    fn get_service(&self, schema: &ServiceSchema) -> Option<ServiceRef> {
        ContextInstance::get_service(self, schema)
    }
}

impl Lookup for ServiceInstance {
    fn get_context(&self, schema: &ContextSchema) -> Option<ContextRef> {
        ServiceInstance::get_context(self, schema)
    }

    fn get_service(&self, schema: &ServiceSchema) -> Option<ServiceRef> {
        ServiceInstance::get_service(self, schema)
    }
}
