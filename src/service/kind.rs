//! Behavior bundle of a service type.

use crate::error::RuntimeError;
use crate::lazy::Getter;
use crate::params::ConstructionParams;
use crate::service::ServiceRef;
use crate::state::{boxed_constructor, unit_constructor, StateConstructor};
use serde_json::Value;
use std::any::Any;
use std::sync::Arc;

/// Declared behavior of a service type
#[derive(Clone)]
pub struct ServiceKind {
    constructor: StateConstructor,
    getters: Vec<(String, Getter<ServiceRef>)>,
}

impl ServiceKind {
    pub fn new() -> Self {
        Self {
            constructor: unit_constructor(),
            getters: Vec::new(),
        }
    }

    pub fn with_state<T, F>(mut self, constructor: F) -> Self
    where
        T: Any,
        F: Fn(&ConstructionParams) -> Result<T, RuntimeError> + Send + Sync + 'static,
    {
        self.constructor = boxed_constructor(constructor);
        self
    }

    /// Declare a lazy property
    ///
    /// Service getters run right after every service of the owning context has been
    /// constructed, before any descendant context gets its services. They may only rely
    /// on state materialized earlier in that order.
    pub fn getter<F>(mut self, name: impl Into<String>, getter: F) -> Self
    where
        F: Fn(&ServiceRef) -> Result<Value, RuntimeError> + Send + Sync + 'static,
    {
        let getter: Getter<ServiceRef> = Arc::new(getter);
        self.getters.push((name.into(), getter));
        self
    }

    pub(crate) fn construct(&self, params: &ConstructionParams) -> Result<Box<dyn Any>, RuntimeError> {
        (self.constructor)(params)
    }

    pub(crate) fn getters(&self) -> &[(String, Getter<ServiceRef>)] {
        &self.getters
    }
}

impl Default for ServiceKind {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ServiceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceKind")
            .field(
                "getters",
                &self.getters.iter().map(|(name, _)| name).collect::<Vec<_>>(),
            )
            .finish()
    }
}
