//! Static Schema Descriptors
//!
//! A schema describes the shape of a context or service type: its id, where it sits in
//! the tree, and the behavior bundle used to instantiate it. Schemas are plain shared
//! data; validation walks them without creating any instance, and construction consumes
//! them to produce runtime nodes.
//!
//! The id and child/service declarations are optional so that an incompletely declared
//! type can be represented and reported by the validator.

use crate::context::ContextKind;
use crate::service::ServiceKind;
use crate::types::{ContextId, ServiceId};
use std::sync::Arc;

/// Descriptor of a service type
#[derive(Debug, Clone)]
pub struct ServiceSchema {
    name: String,
    service_id: Option<ServiceId>,
    kind: ServiceKind,
}

impl ServiceSchema {
    /// Undeclared service type; give it an id with [`ServiceSchema::with_id`]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            service_id: None,
            kind: ServiceKind::new(),
        }
    }

    /// Fully declared service type
    pub fn service(name: impl Into<String>, service_id: ServiceId) -> Self {
        Self::new(name).with_id(service_id)
    }

    pub fn with_id(mut self, service_id: ServiceId) -> Self {
        self.service_id = Some(service_id);
        self
    }

    pub fn with_kind(mut self, kind: ServiceKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn build(self) -> Arc<Self> {
        Arc::new(self)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn service_id(&self) -> Option<ServiceId> {
        self.service_id
    }

    pub fn kind(&self) -> &ServiceKind {
        &self.kind
    }

    /// Minimal shape required to be treated as a service
    pub fn is_service(&self) -> bool {
        self.service_id.is_some()
    }
}

/// Descriptor of a context type
#[derive(Debug, Clone)]
pub struct ContextSchema {
    name: String,
    context_id: Option<ContextId>,
    context_children: Option<Vec<Arc<ContextSchema>>>,
    context_services: Option<Vec<Arc<ServiceSchema>>>,
    kind: ContextKind,
}

impl ContextSchema {
    /// Undeclared context type; declare id and children before use
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            context_id: None,
            context_children: None,
            context_services: None,
            kind: ContextKind::new(),
        }
    }

    /// Context type declaring its id and (possibly empty) children
    pub fn context(
        name: impl Into<String>,
        context_id: ContextId,
        children: Vec<Arc<ContextSchema>>,
    ) -> Self {
        Self::new(name).with_id(context_id).with_children(children)
    }

    /// Leaf context type
    pub fn leaf(name: impl Into<String>, context_id: ContextId) -> Self {
        Self::context(name, context_id, Vec::new())
    }

    pub fn with_id(mut self, context_id: ContextId) -> Self {
        self.context_id = Some(context_id);
        self
    }

    pub fn with_children(mut self, children: Vec<Arc<ContextSchema>>) -> Self {
        self.context_children = Some(children);
        self
    }

    pub fn with_services(mut self, services: Vec<Arc<ServiceSchema>>) -> Self {
        self.context_services = Some(services);
        self
    }

    pub fn with_kind(mut self, kind: ContextKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn build(self) -> Arc<Self> {
        Arc::new(self)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn context_id(&self) -> Option<ContextId> {
        self.context_id
    }

    /// Declared children in declaration order; empty when undeclared
    pub fn context_children(&self) -> &[Arc<ContextSchema>] {
        self.context_children.as_deref().unwrap_or(&[])
    }

    /// Declared services, `None` when the type declares no service list
    pub fn context_services(&self) -> Option<&[Arc<ServiceSchema>]> {
        self.context_services.as_deref()
    }

    pub fn kind(&self) -> &ContextKind {
        &self.kind
    }

    /// Minimal shape required to be treated as a context
    pub fn is_context(&self) -> bool {
        self.context_id.is_some() && self.context_children.is_some()
    }

    /// Number of context types in this schema subtree, root included
    pub fn count_contexts(&self) -> usize {
        1 + self
            .context_children()
            .iter()
            .map(|child| child.count_contexts())
            .sum::<usize>()
    }
}
