//! Factory extensions: objects built once per factory, independent of any personal tree.

use crate::error::RuntimeError;
use crate::factory::Factory;
use std::sync::Arc;

/// Plugin constructed and created once when its factory is created
pub trait Extension {
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// Called once, right after construction, in declaration order
    fn create(&mut self, _factory: &Factory) -> Result<(), RuntimeError> {
        Ok(())
    }
}

/// Constructor of one extension type
pub type ExtensionType = Arc<dyn Fn(&Factory) -> Box<dyn Extension> + Send + Sync>;

pub fn extension_type<E, F>(constructor: F) -> ExtensionType
where
    E: Extension + 'static,
    F: Fn(&Factory) -> E + Send + Sync + 'static,
{
    Arc::new(move |factory: &Factory| Box::new(constructor(factory)) as Box<dyn Extension>)
}
