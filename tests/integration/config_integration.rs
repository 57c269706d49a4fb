//! Integration tests for the configuration system

use crate::integration::test_utils::{sample_schemas, with_env};
use contexture::{ConfigLoader, ConstructionParams, Factory, RuntimeError};
use tempfile::TempDir;

#[test]
fn test_file_config_drives_duplicate_policy() {
    let temp_dir = TempDir::new().unwrap();
    let config_file = temp_dir.path().join("contexture.toml");
    std::fs::write(
        &config_file,
        r#"
[runtime]
replace_existing_personal = false

[logging]
level = "warn"
"#,
    )
    .unwrap();

    let config = with_env(&[], || ConfigLoader::load(Some(&config_file))).unwrap();
    assert!(config.validate().is_ok());
    assert!(!config.runtime.replace_existing_personal);
    assert_eq!(config.logging.level, "warn");

    let mut factory = Factory::new(sample_schemas().root).with_config(config.runtime);
    factory.create().unwrap();
    factory
        .create_personal_by_id(1, ConstructionParams::empty())
        .unwrap();
    assert!(matches!(
        factory.create_personal_by_id(1, ConstructionParams::empty()),
        Err(RuntimeError::DuplicatePersonal(1))
    ));
}

#[test]
fn test_environment_overrides_file() {
    let temp_dir = TempDir::new().unwrap();
    let config_file = temp_dir.path().join("contexture.toml");
    std::fs::write(
        &config_file,
        r#"
[runtime]
warn_on_index_collision = true
"#,
    )
    .unwrap();

    let config = with_env(
        &[
            ("CONTEXTURE__RUNTIME__WARN_ON_INDEX_COLLISION", "false"),
            ("CONTEXTURE__LOGGING__FORMAT", "json"),
        ],
        || ConfigLoader::load(Some(&config_file)),
    )
    .unwrap();

    assert!(!config.runtime.warn_on_index_collision);
    assert!(config.runtime.replace_existing_personal);
    assert_eq!(config.logging.format, "json");
}

#[test]
fn test_defaults_without_sources() {
    let config = with_env(&[], || ConfigLoader::load(None)).unwrap();
    assert!(config.runtime.warn_on_index_collision);
    assert!(config.runtime.replace_existing_personal);
    assert_eq!(config.logging.level, "info");
    assert_eq!(config.logging.format, "text");
    assert!(config.validate().is_ok());
}

#[test]
fn test_invalid_logging_values_reported() {
    let temp_dir = TempDir::new().unwrap();
    let config_file = temp_dir.path().join("contexture.toml");
    std::fs::write(
        &config_file,
        r#"
[logging]
level = "verbose"
output = "syslog"
"#,
    )
    .unwrap();

    let config = ConfigLoader::load_from_file(&config_file).unwrap();
    let errors = config.validate().unwrap_err();
    assert_eq!(errors.len(), 2);
}
