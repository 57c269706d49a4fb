//! Contexture: Hierarchical Context/Service Composition
//!
//! A runtime that instantiates a statically declared tree of contexts, each owning a set
//! of services, once per external identity. Every personal tree carries a flat index for
//! direct lookup by type, lazily materialized properties, and a pre-order event broadcast
//! that can be cut per subtree and collects a single return value.

pub mod config;
pub mod context;
pub mod error;
pub mod event;
pub mod extension;
pub mod factory;
pub mod lazy;
pub mod logging;
pub mod lookup;
pub mod params;
pub mod registry;
pub mod schema;
pub mod service;
pub mod state;
pub mod types;

pub use config::{ConfigLoader, ContextureConfig, RuntimeConfig};
pub use context::{ContextInstance, ContextKind, ContextRef};
pub use error::{RuntimeError, SchemaError};
pub use extension::Extension;
pub use factory::Factory;
pub use lookup::Lookup;
pub use params::ConstructionParams;
pub use registry::Registry;
pub use schema::{ContextSchema, ServiceSchema};
pub use service::{ServiceInstance, ServiceKind, ServiceRef};
pub use types::{ContextId, PersonalId, ServiceId, EMPTY_PERSONAL_ID, MAX_SLOT_ID};
