//! Type-erased per-instance state produced by a kind's constructor.

use crate::error::RuntimeError;
use crate::params::ConstructionParams;
use std::any::Any;
use std::cell::{Ref, RefCell, RefMut};
use std::sync::Arc;

/// Builds the state of one context or service instance from the registry's parameters
pub type StateConstructor =
    Arc<dyn Fn(&ConstructionParams) -> Result<Box<dyn Any>, RuntimeError> + Send + Sync>;

pub(crate) fn boxed_constructor<T, F>(constructor: F) -> StateConstructor
where
    T: Any,
    F: Fn(&ConstructionParams) -> Result<T, RuntimeError> + Send + Sync + 'static,
{
    Arc::new(move |params: &ConstructionParams| {
        constructor(params).map(|state| Box::new(state) as Box<dyn Any>)
    })
}

pub(crate) fn unit_constructor() -> StateConstructor {
    boxed_constructor(|_| Ok(()))
}

/// Interior-mutable holder for an instance's state
///
/// Borrows follow `RefCell` rules: holding a `state_mut` borrow while something else
/// reads the same instance panics.
pub struct InstanceState(RefCell<Box<dyn Any>>);

impl InstanceState {
    pub(crate) fn new(state: Box<dyn Any>) -> Self {
        Self(RefCell::new(state))
    }

    pub fn get<T: Any>(&self) -> Option<Ref<'_, T>> {
        Ref::filter_map(self.0.borrow(), |state| (**state).downcast_ref::<T>()).ok()
    }

    pub fn get_mut<T: Any>(&self) -> Option<RefMut<'_, T>> {
        RefMut::filter_map(self.0.borrow_mut(), |state| (**state).downcast_mut::<T>()).ok()
    }
}

impl std::fmt::Debug for InstanceState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("InstanceState(..)")
    }
}
