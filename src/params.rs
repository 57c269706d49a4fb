//! Construction parameters shared by every context and service of one registry.

use crate::error::RuntimeError;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Ordered parameter list handed to every constructor in a personal tree
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConstructionParams(Vec<Value>);

impl ConstructionParams {
    pub fn new(values: Vec<Value>) -> Self {
        Self(values)
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Raw parameter at `index`, if supplied
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.0.get(index)
    }

    /// Deserialize the parameter at `index` into `T`
    ///
    /// A missing parameter is reported the same way as a mistyped one so constructors
    /// can simply `?` the result.
    pub fn get_as<T: DeserializeOwned>(&self, index: usize) -> Result<T, RuntimeError> {
        let value = self.get(index).ok_or_else(|| RuntimeError::InvalidParam {
            index,
            message: format!("missing (only {} supplied)", self.len()),
        })?;
        serde_json::from_value(value.clone()).map_err(|e| RuntimeError::InvalidParam {
            index,
            message: e.to_string(),
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = &Value> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[Value] {
        &self.0
    }
}

impl From<Vec<Value>> for ConstructionParams {
    fn from(values: Vec<Value>) -> Self {
        Self(values)
    }
}

impl FromIterator<Value> for ConstructionParams {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
