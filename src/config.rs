//! Configuration System
//!
//! Layered configuration for the composition runtime: built-in defaults, an optional TOML
//! file, then `CONTEXTURE__*` environment overrides. Runtime options are handed to the
//! factory and inherited by every registry it creates.

use crate::logging::LoggingConfig;
use serde::{Deserialize, Serialize};

mod loader;
mod merge;
mod sources;

pub use loader::ConfigLoader;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContextureConfig {
    /// Composition runtime behavior
    #[serde(default)]
    pub runtime: RuntimeConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Options applied by the factory and its registries
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuntimeConfig {
    /// Emit a warning when two context types in one tree share a context id.
    /// The flat index keeps the last one registered either way.
    #[serde(default = "default_true")]
    pub warn_on_index_collision: bool,

    /// Creating a personal for an id that already has one replaces the stored registry.
    /// When false the call fails with `DuplicatePersonal`.
    #[serde(default = "default_true")]
    pub replace_existing_personal: bool,
}

fn default_true() -> bool {
    true
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            warn_on_index_collision: default_true(),
            replace_existing_personal: default_true(),
        }
    }
}

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error", "off"];
const LOG_FORMATS: &[&str] = &["text", "json"];
const LOG_OUTPUTS: &[&str] = &["stdout", "stderr", "file", "both"];

/// Configuration validation errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    Logging(String),
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::Logging(msg) => write!(f, "Logging: {}", msg),
        }
    }
}

impl std::error::Error for ValidationError {}

impl ContextureConfig {
    /// Validate the entire configuration, collecting every problem found
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();
        let logging = &self.logging;

        if !LOG_LEVELS.contains(&logging.level.as_str()) {
            errors.push(ValidationError::Logging(format!(
                "invalid level '{}'",
                logging.level
            )));
        }
        if !LOG_FORMATS.contains(&logging.format.as_str()) {
            errors.push(ValidationError::Logging(format!(
                "invalid format '{}'",
                logging.format
            )));
        }
        if !LOG_OUTPUTS.contains(&logging.output.as_str()) {
            errors.push(ValidationError::Logging(format!(
                "invalid output '{}'",
                logging.output
            )));
        }
        for (module, level) in &logging.modules {
            if !LOG_LEVELS.contains(&level.as_str()) {
                errors.push(ValidationError::Logging(format!(
                    "invalid level '{}' for module '{}'",
                    level, module
                )));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
