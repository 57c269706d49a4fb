//! Factory
//!
//! Owns the root context schema and multiplexes personal registries by external id.
//! The schema is validated once, in [`Factory::create`], before any registry exists;
//! extensions are built at the same time. Unknown ids never fail: they resolve to an
//! empty sentinel registry.

pub mod validate;

use crate::config::RuntimeConfig;
use crate::error::{RuntimeError, SchemaError};
use crate::extension::{extension_type, Extension, ExtensionType};
use crate::params::ConstructionParams;
use crate::registry::Registry;
use crate::schema::{ContextSchema, ServiceSchema};
use crate::types::PersonalId;
use serde_json::Value;
use std::collections::HashMap;
use std::rc::Rc;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Owner of the root schema and of every personal registry built from it
pub struct Factory {
    root_context_schema: Arc<ContextSchema>,
    extension_types: Vec<ExtensionType>,
    extensions: Vec<Box<dyn Extension>>,
    personals: HashMap<PersonalId, Rc<Registry>>,
    config: RuntimeConfig,
    created: bool,
}

impl Factory {
    pub fn new(root_context_schema: Arc<ContextSchema>) -> Self {
        Self {
            root_context_schema,
            extension_types: Vec::new(),
            extensions: Vec::new(),
            personals: HashMap::new(),
            config: RuntimeConfig::default(),
            created: false,
        }
    }

    /// Declare an extension type; extensions are built in declaration order
    pub fn with_extension<E, F>(mut self, constructor: F) -> Self
    where
        E: Extension + 'static,
        F: Fn(&Factory) -> E + Send + Sync + 'static,
    {
        self.extension_types.push(extension_type(constructor));
        self
    }

    pub fn with_config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    pub fn root_context_schema(&self) -> &Arc<ContextSchema> {
        &self.root_context_schema
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    pub fn check_context(schema: &ContextSchema) -> Result<(), SchemaError> {
        validate::check_context(schema)
    }

    pub fn check_service(schema: &ServiceSchema) -> Result<(), SchemaError> {
        validate::check_service(schema)
    }

    pub fn check_root_context(&self) -> Result<(), SchemaError> {
        validate::check_context(&self.root_context_schema)?;
        debug!(
            root = self.root_context_schema.name(),
            contexts = self.root_context_schema.count_contexts(),
            "Schema validated"
        );
        Ok(())
    }

    /// Build every declared extension and give each its `create` call
    pub fn create_extensions(&mut self) -> Result<(), RuntimeError> {
        let mut extensions = Vec::with_capacity(self.extension_types.len());
        for constructor in &self.extension_types {
            let mut extension = constructor(self);
            extension.create(self)?;
            debug!(extension = extension.name(), "Extension created");
            extensions.push(extension);
        }
        self.extensions = extensions;
        Ok(())
    }

    pub fn get_extensions(&self) -> &[Box<dyn Extension>] {
        &self.extensions
    }

    /// Validate the root schema and build the extensions; required before any personal
    pub fn create(&mut self) -> Result<(), RuntimeError> {
        self.check_root_context()?;
        self.create_extensions()?;
        self.created = true;
        info!(
            root = self.root_context_schema.name(),
            extensions = self.extensions.len(),
            "Factory created"
        );
        Ok(())
    }

    pub fn is_created(&self) -> bool {
        self.created
    }

    /// Build and store a fresh registry for `id`
    ///
    /// Nothing is stored if construction fails. An existing registry for `id` is replaced
    /// without teardown unless the runtime config forbids replacement.
    #[instrument(skip(self, params), fields(param_count = params.len()))]
    pub fn create_personal_by_id(
        &mut self,
        id: PersonalId,
        params: ConstructionParams,
    ) -> Result<Rc<Registry>, RuntimeError> {
        if !self.created {
            return Err(RuntimeError::FactoryNotCreated);
        }
        if self.personals.contains_key(&id) {
            if !self.config.replace_existing_personal {
                return Err(RuntimeError::DuplicatePersonal(id));
            }
            warn!(personal = id, "Replacing existing personal without teardown");
        }

        let personal = Registry::new(id, params, self.config.clone());
        personal.create_root_context(&self.root_context_schema)?;
        self.personals.insert(id, personal.clone());
        info!(personal = id, "Personal created");
        Ok(personal)
    }

    /// Stored registry for `id`, or an empty sentinel registry
    pub fn get_personal_by_id(&self, id: PersonalId) -> Rc<Registry> {
        self.personals
            .get(&id)
            .cloned()
            .unwrap_or_else(Registry::empty)
    }

    pub fn has_personal(&self, id: PersonalId) -> bool {
        self.personals.contains_key(&id)
    }

    pub fn personal_count(&self) -> usize {
        self.personals.len()
    }

    /// Ids with a stored registry, ascending
    pub fn personal_ids(&self) -> Vec<PersonalId> {
        let mut ids: Vec<PersonalId> = self.personals.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Tear down the registry for `id` and forget it
    ///
    /// If teardown fails the error is returned and the registry stays stored with its
    /// tree intact, so removing again retries the teardown.
    #[instrument(skip(self))]
    pub fn remove_personal_by_id(&mut self, id: PersonalId) -> Result<(), RuntimeError> {
        let personal = self.get_personal_by_id(id);
        personal.remove()?;
        if self.personals.remove(&id).is_some() {
            info!(personal = id, "Personal removed");
        }
        Ok(())
    }

    /// Broadcast `event` through the tree of `id`; unknown ids yield `Ok(None)`
    pub fn call_event(
        &self,
        id: PersonalId,
        event: &str,
        args: &[Value],
    ) -> Result<Option<Value>, RuntimeError> {
        self.get_personal_by_id(id).call_event(event, args)
    }
}

impl std::fmt::Debug for Factory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Factory")
            .field("root", &self.root_context_schema.name())
            .field("extensions", &self.extension_types.len())
            .field("personals", &self.personal_ids())
            .field("created", &self.created)
            .finish()
    }
}
