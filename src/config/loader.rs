//! Configuration loading facade.

use crate::config::{merge, sources, ContextureConfig};
use config::ConfigError;
use std::path::Path;

/// Loads [`ContextureConfig`] from layered sources
pub struct ConfigLoader;

impl ConfigLoader {
    /// Defaults, then the file at `path` if it exists, then environment overrides
    pub fn load(path: Option<&Path>) -> Result<ContextureConfig, ConfigError> {
        let mut builder = merge::builder_with_defaults()?;
        if let Some(path) = path {
            builder = sources::add_file(builder, path, false);
        }
        builder = sources::add_environment(builder);
        builder.build()?.try_deserialize()
    }

    /// Defaults overlaid with exactly one file, which must exist
    pub fn load_from_file(path: &Path) -> Result<ContextureConfig, ConfigError> {
        let builder = sources::add_file(merge::builder_with_defaults()?, path, true);
        builder.build()?.try_deserialize()
    }
}
