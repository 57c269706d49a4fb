//! Error types for the context composition runtime.

use crate::types::{PersonalId, MAX_SLOT_ID};
use thiserror::Error;

/// Schema-level violations found by the validator
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("{0:?} class is not context")]
    NotContext(String),

    #[error("{0:?} class is not service")]
    NotService(String),

    #[error("{name:?} declares id {id}, above the maximum of {max}", max = MAX_SLOT_ID)]
    IdOutOfRange { name: String, id: usize },
}

/// Runtime errors raised while building, dispatching to, or tearing down context trees
#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),

    #[error("Factory has not been created; call Factory::create before creating personals")]
    FactoryNotCreated,

    #[error("Personal {0} already exists")]
    DuplicatePersonal(PersonalId),

    #[error("Failed to construct context {context:?}: {source}")]
    ContextConstruction {
        context: String,
        source: Box<RuntimeError>,
    },

    #[error("Failed to construct service {service:?}: {source}")]
    ServiceConstruction {
        service: String,
        source: Box<RuntimeError>,
    },

    #[error("Getter {property:?} on {owner:?} failed: {source}")]
    Getter {
        owner: String,
        property: String,
        source: Box<RuntimeError>,
    },

    #[error("Event {event:?} handler on context {context:?} failed: {source}")]
    EventHandler {
        context: String,
        event: String,
        source: Box<RuntimeError>,
    },

    #[error("Teardown of context {context:?} failed: {source}")]
    Teardown {
        context: String,
        source: Box<RuntimeError>,
    },

    #[error("Invalid construction parameter {index}: {message}")]
    InvalidParam { index: usize, message: String },

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("{0}")]
    Custom(String),
}

impl RuntimeError {
    /// Error raised from user constructors, getters, and event handlers
    pub fn custom(message: impl Into<String>) -> Self {
        RuntimeError::Custom(message.into())
    }
}

impl From<config::ConfigError> for RuntimeError {
    fn from(err: config::ConfigError) -> Self {
        RuntimeError::ConfigError(err.to_string())
    }
}
