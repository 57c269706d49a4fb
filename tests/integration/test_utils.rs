//! Shared fixtures for integration tests
//!
//! The sample tree used across the suite:
//!
//! ```text
//! Root(0) [Clock(0), Ledger(1)]
//! ├── Left(1)
//! │   └── Deep(3)
//! └── Right(2) [Cache(0)]
//! ```

use contexture::{
    ConstructionParams, ContextKind, ContextSchema, Factory, RuntimeError, ServiceKind,
    ServiceSchema,
};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};

/// Serializes tests that touch process environment variables
static ENV_MUTEX: Mutex<()> = Mutex::new(());

/// State of the `Deep` context: counts `hit` events
#[derive(Debug, Default)]
pub struct HitCounter {
    pub hits: u32,
}

/// State of the `Right` context: label taken from construction parameter 0
#[derive(Debug)]
pub struct Label(pub String);

pub struct SampleSchemas {
    pub root: Arc<ContextSchema>,
    pub left: Arc<ContextSchema>,
    pub right: Arc<ContextSchema>,
    pub deep: Arc<ContextSchema>,
    pub clock: Arc<ServiceSchema>,
    pub ledger: Arc<ServiceSchema>,
    pub cache: Arc<ServiceSchema>,
}

pub fn sample_schemas() -> SampleSchemas {
    let clock = ServiceSchema::service("Clock", 0)
        .with_kind(ServiceKind::new().getter("now", |_| Ok(json!(1_700_000_000))))
        .build();
    let ledger = ServiceSchema::service("Ledger", 1).build();
    let cache = ServiceSchema::service("Cache", 0)
        .with_kind(ServiceKind::new().getter("capacity", |_| Ok(json!(64))))
        .build();

    let deep = ContextSchema::leaf("Deep", 3)
        .with_kind(
            ContextKind::new()
                .with_state(|_: &ConstructionParams| Ok(HitCounter::default()))
                .on("hit", |context, _| {
                    if let Some(mut counter) = context.state_mut::<HitCounter>() {
                        counter.hits += 1;
                    }
                    Ok(None)
                }),
        )
        .build();
    let left = ContextSchema::context("Left", 1, vec![deep.clone()]).build();
    let right = ContextSchema::leaf("Right", 2)
        .with_services(vec![cache.clone()])
        .with_kind(ContextKind::new().with_state(|params: &ConstructionParams| {
            let label = params
                .get(0)
                .and_then(Value::as_str)
                .unwrap_or("unlabeled");
            Ok(Label(label.to_string()))
        }))
        .build();
    let root = ContextSchema::context("Root", 0, vec![left.clone(), right.clone()])
        .with_services(vec![clock.clone(), ledger.clone()])
        .build();

    SampleSchemas {
        root,
        left,
        right,
        deep,
        clock,
        ledger,
        cache,
    }
}

/// Factory over the sample tree, already created
pub fn created_factory() -> (Factory, SampleSchemas) {
    let schemas = sample_schemas();
    let mut factory = Factory::new(schemas.root.clone());
    factory.create().unwrap();
    (factory, schemas)
}

/// Event handler that appends the context name to `visits` and returns nothing
pub fn recording_kind(visits: &Arc<Mutex<Vec<String>>>, event: &str) -> ContextKind {
    let visits = visits.clone();
    ContextKind::new().on(event, move |context, _| {
        visits.lock().unwrap().push(context.name().to_string());
        Ok(None)
    })
}

/// Handler failing with a custom error
pub fn failing(message: &'static str) -> impl Fn(&contexture::ContextRef) -> Result<Value, RuntimeError> {
    move |_| Err(RuntimeError::custom(message))
}

/// Run `f` with the given environment variables set, restoring them afterwards
pub fn with_env<F, R>(vars: &[(&str, &str)], f: F) -> R
where
    F: FnOnce() -> R,
{
    let _guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    let previous: Vec<(String, Option<String>)> = vars
        .iter()
        .map(|(key, _)| (key.to_string(), std::env::var(key).ok()))
        .collect();

    for (key, value) in vars {
        std::env::set_var(key, value);
    }

    let result = f();

    for (key, value) in previous {
        match value {
            Some(value) => std::env::set_var(&key, value),
            None => std::env::remove_var(&key),
        }
    }

    result
}
