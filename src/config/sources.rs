//! Configuration sources: TOML file and process environment.

use config::builder::DefaultState;
use config::{ConfigBuilder, Environment, File, FileFormat};
use std::path::Path;
use tracing::debug;

/// Prefix of environment overrides, e.g. `CONTEXTURE__RUNTIME__REPLACE_EXISTING_PERSONAL`
pub const ENV_PREFIX: &str = "CONTEXTURE";

pub fn add_file(
    builder: ConfigBuilder<DefaultState>,
    path: &Path,
    required: bool,
) -> ConfigBuilder<DefaultState> {
    debug!(config_path = %path.display(), required, "Adding config file source");
    builder.add_source(File::from(path).format(FileFormat::Toml).required(required))
}

pub fn add_environment(builder: ConfigBuilder<DefaultState>) -> ConfigBuilder<DefaultState> {
    builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("__")
            .separator("__")
            .try_parsing(true),
    )
}
