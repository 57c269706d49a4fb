//! Integration tests for schema validation at factory creation

use contexture::types::MAX_SLOT_ID;
use contexture::{
    ConstructionParams, ContextSchema, Extension, Factory, RuntimeError, SchemaError,
    ServiceSchema,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

struct Counting(Arc<AtomicUsize>);

impl Extension for Counting {
    fn create(&mut self, _factory: &Factory) -> Result<(), RuntimeError> {
        self.0.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

fn schema_error(root: Arc<ContextSchema>) -> SchemaError {
    let mut factory = Factory::new(root);
    match factory.create() {
        Err(RuntimeError::Schema(err)) => err,
        other => panic!("expected schema error, got {:?}", other),
    }
}

#[test]
fn test_missing_context_id() {
    let root = ContextSchema::new("Anonymous").with_children(vec![]).build();
    assert_eq!(
        schema_error(root),
        SchemaError::NotContext("Anonymous".to_string())
    );
}

#[test]
fn test_missing_children_declaration() {
    let root = ContextSchema::new("Childless").with_id(0).build();
    assert_eq!(
        schema_error(root),
        SchemaError::NotContext("Childless".to_string())
    );
}

#[test]
fn test_service_without_id() {
    let root = ContextSchema::context("Root", 0, vec![])
        .with_services(vec![
            ServiceSchema::service("Good", 0).build(),
            ServiceSchema::new("Bad").build(),
        ])
        .build();
    let err = schema_error(root);
    assert_eq!(err, SchemaError::NotService("Bad".to_string()));
    assert_eq!(err.to_string(), "\"Bad\" class is not service");
}

#[test]
fn test_first_violation_is_depth_first() {
    let nested_bad = ContextSchema::new("NestedBad").build();
    let first = ContextSchema::context("First", 1, vec![nested_bad]).build();
    let second_bad = ContextSchema::new("SecondBad").build();
    let root = ContextSchema::context("Root", 0, vec![first, second_bad]).build();

    let err = schema_error(root);
    assert_eq!(err, SchemaError::NotContext("NestedBad".to_string()));
    assert_eq!(err.to_string(), "\"NestedBad\" class is not context");
}

#[test]
fn test_invalid_schema_creates_no_extensions() {
    let created = Arc::new(AtomicUsize::new(0));
    let counter = created.clone();
    let root = ContextSchema::context("Root", 0, vec![ContextSchema::new("Loose").build()]).build();
    let mut factory = Factory::new(root).with_extension(move |_| Counting(counter.clone()));

    assert!(factory.create().is_err());
    assert_eq!(created.load(Ordering::SeqCst), 0);
    assert!(factory.get_extensions().is_empty());
    assert!(matches!(
        factory.create_personal_by_id(1, ConstructionParams::empty()),
        Err(RuntimeError::FactoryNotCreated)
    ));
}

#[test]
fn test_validator_is_callable_without_factory() {
    let valid = ContextSchema::context("Root", 0, vec![ContextSchema::leaf("Leaf", 1).build()]);
    assert!(Factory::check_context(&valid).is_ok());
    assert!(Factory::check_service(&ServiceSchema::service("Svc", 0)).is_ok());
    assert_eq!(
        Factory::check_service(&ServiceSchema::new("Svc")),
        Err(SchemaError::NotService("Svc".to_string()))
    );
}

#[test]
fn test_oversized_context_id_rejected_before_any_personal() {
    let root = ContextSchema::context("Root", 0, vec![ContextSchema::leaf("Big", usize::MAX).build()])
        .build();
    let mut factory = Factory::new(root);

    match factory.create() {
        Err(RuntimeError::Schema(SchemaError::IdOutOfRange { name, id })) => {
            assert_eq!(name, "Big");
            assert_eq!(id, usize::MAX);
        }
        other => panic!("expected id range error, got {:?}", other),
    }
    assert!(matches!(
        factory.create_personal_by_id(1, ConstructionParams::empty()),
        Err(RuntimeError::FactoryNotCreated)
    ));

    let edge = ContextSchema::context("Root", 0, vec![ContextSchema::leaf("Edge", MAX_SLOT_ID).build()]);
    assert!(Factory::check_context(&edge).is_ok());
}
