//! Lazy Property Materialization
//!
//! Context and service kinds may declare named zero-argument producers. Each instance
//! starts with every declared property pending; a single materialization pass evaluates
//! the producers in declaration order against the owning instance and replaces each one
//! with its value for good.

use crate::error::RuntimeError;
use serde_json::Value;
use std::cell::RefCell;
use std::sync::Arc;
use tracing::{debug, trace};

/// Producer evaluated against its owning instance `O`
pub type Getter<O> = Arc<dyn Fn(&O) -> Result<Value, RuntimeError> + Send + Sync>;

/// Two-phase property value
pub enum Property<O> {
    /// Declared but not yet evaluated
    Pending(Getter<O>),
    /// Evaluated (or explicitly assigned) value
    Materialized(Value),
}

impl<O> Property<O> {
    pub fn value(&self) -> Option<&Value> {
        match self {
            Property::Pending(_) => None,
            Property::Materialized(value) => Some(value),
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, Property::Pending(_))
    }
}

/// Ordered property table of one instance
pub struct LazyProperties<O> {
    entries: Vec<(String, Property<O>)>,
    materialized: bool,
}

impl<O> LazyProperties<O> {
    pub(crate) fn from_getters(getters: &[(String, Getter<O>)]) -> Self {
        Self {
            entries: getters
                .iter()
                .map(|(name, getter)| (name.clone(), Property::Pending(getter.clone())))
                .collect(),
            materialized: false,
        }
    }

    /// Value of a property; pending properties read as absent
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(key, _)| key == name)
            .and_then(|(_, property)| property.value())
    }

    /// Assign a value, replacing a pending producer or an earlier value
    pub fn set(&mut self, name: &str, value: Value) {
        match self.entries.iter_mut().find(|(key, _)| key == name) {
            Some((_, property)) => *property = Property::Materialized(value),
            None => self
                .entries
                .push((name.to_string(), Property::Materialized(value))),
        }
    }

    pub fn is_pending(&self, name: &str) -> bool {
        self.entries
            .iter()
            .any(|(key, property)| key == name && property.is_pending())
    }

    /// Whether the materialization pass has already run
    pub fn is_materialized(&self) -> bool {
        self.materialized
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    fn take_pending(&mut self) -> Vec<(String, Getter<O>)> {
        self.entries
            .iter()
            .filter_map(|(name, property)| match property {
                Property::Pending(getter) => Some((name.clone(), getter.clone())),
                Property::Materialized(_) => None,
            })
            .collect()
    }
}

/// Run the materialization pass for `owner`
///
/// The pass runs at most once per table; later calls are no-ops. No borrow of the table
/// is held while a producer runs, so producers may read properties materialized before
/// them.
pub(crate) fn materialize<O>(
    owner: &O,
    owner_name: &str,
    properties: &RefCell<LazyProperties<O>>,
) -> Result<(), RuntimeError> {
    let pending = {
        let mut table = properties.borrow_mut();
        if table.is_materialized() {
            debug!(owner = owner_name, "Properties already materialized, skipping");
            return Ok(());
        }
        table.materialized = true;
        table.take_pending()
    };

    for (name, getter) in pending {
        trace!(owner = owner_name, property = %name, "Materializing property");
        let value = getter(owner).map_err(|e| RuntimeError::Getter {
            owner: owner_name.to_string(),
            property: name.clone(),
            source: Box::new(e),
        })?;
        properties.borrow_mut().set(&name, value);
    }
    Ok(())
}
