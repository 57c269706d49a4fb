//! Integration tests for personal registry isolation and removal

use crate::integration::test_utils::{created_factory, HitCounter, Label};
use contexture::{
    ConstructionParams, ContextKind, ContextSchema, Factory, RuntimeError, EMPTY_PERSONAL_ID,
};
use serde_json::json;
use std::rc::Rc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

#[test]
fn test_personals_from_one_schema_are_isolated() {
    let (mut factory, schemas) = created_factory();
    let alice = factory
        .create_personal_by_id(1, ConstructionParams::new(vec![json!("alice")]))
        .unwrap();
    let bob = factory
        .create_personal_by_id(2, ConstructionParams::new(vec![json!("bob")]))
        .unwrap();

    assert!(!Rc::ptr_eq(
        &alice.get_root_context().unwrap(),
        &bob.get_root_context().unwrap()
    ));
    assert_eq!(
        alice.get_context(&schemas.right).unwrap().state::<Label>().unwrap().0,
        "alice"
    );
    assert_eq!(
        bob.get_context(&schemas.right).unwrap().state::<Label>().unwrap().0,
        "bob"
    );

    alice.get_context(&schemas.left).unwrap().freeze();
    alice.call_event("hit", &[]).unwrap();
    bob.call_event("hit", &[]).unwrap();

    let alice_hits = alice
        .get_context(&schemas.deep)
        .unwrap()
        .state::<HitCounter>()
        .unwrap()
        .hits;
    let bob_hits = bob
        .get_context(&schemas.deep)
        .unwrap()
        .state::<HitCounter>()
        .unwrap()
        .hits;
    assert_eq!(alice_hits, 0);
    assert_eq!(bob_hits, 1);
    assert!(!bob.get_context(&schemas.left).unwrap().is_frozen());
}

#[test]
fn test_removed_personal_resolves_to_sentinel() {
    let (mut factory, schemas) = created_factory();
    factory
        .create_personal_by_id(1, ConstructionParams::empty())
        .unwrap();
    let before = factory.get_personal_by_id(1);
    assert_eq!(before.id(), 1);

    factory.remove_personal_by_id(1).unwrap();

    let after = factory.get_personal_by_id(1);
    assert_eq!(after.id(), EMPTY_PERSONAL_ID);
    assert!(after.is_empty());
    assert!(after.get_context(&schemas.deep).is_none());
    assert_eq!(factory.personal_count(), 0);

    // handles held across removal see an empty tree
    assert!(before.is_empty());
    assert!(before.get_context(&schemas.deep).is_none());
}

#[test]
fn test_remove_unknown_personal_is_noop() {
    let (mut factory, _) = created_factory();
    assert!(factory.remove_personal_by_id(12345).is_ok());
}

#[test]
fn test_teardown_runs_once() {
    let teardowns = Arc::new(AtomicUsize::new(0));
    let counter = teardowns.clone();
    let root = ContextSchema::leaf("Root", 0)
        .with_kind(ContextKind::new().on_destroy(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }))
        .build();
    let mut factory = Factory::new(root);
    factory.create().unwrap();

    let personal = factory
        .create_personal_by_id(1, ConstructionParams::empty())
        .unwrap();
    factory.remove_personal_by_id(1).unwrap();
    factory.remove_personal_by_id(1).unwrap();
    personal.remove().unwrap();

    assert_eq!(teardowns.load(Ordering::SeqCst), 1);
}

#[test]
fn test_failed_teardown_keeps_tree_until_retried() {
    let attempts = Arc::new(AtomicUsize::new(0));
    let counter = attempts.clone();
    let leaf = ContextSchema::leaf("Leaf", 1).build();
    let root = ContextSchema::context("Root", 0, vec![leaf.clone()])
        .with_kind(ContextKind::new().on_destroy(move |_| {
            if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                Err(RuntimeError::custom("socket still open"))
            } else {
                Ok(())
            }
        }))
        .build();
    let mut factory = Factory::new(root);
    factory.create().unwrap();
    factory
        .create_personal_by_id(1, ConstructionParams::empty())
        .unwrap();

    match factory.remove_personal_by_id(1) {
        Err(RuntimeError::Teardown { context, .. }) => assert_eq!(context, "Root"),
        other => panic!("expected teardown failure, got {:?}", other),
    }
    let personal = factory.get_personal_by_id(1);
    assert_eq!(personal.id(), 1);
    assert!(!personal.is_empty());
    assert!(personal.get_context(&leaf).is_some());

    factory.remove_personal_by_id(1).unwrap();
    assert!(!factory.has_personal(1));
    assert!(personal.is_empty());
    assert_eq!(attempts.load(Ordering::SeqCst), 2);
}

#[test]
fn test_teardown_hook_resolves_nested_contexts() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let recorded = seen.clone();
    let grandchild = ContextSchema::leaf("Grandchild", 2).build();
    let child = ContextSchema::context("Child", 1, vec![grandchild.clone()]).build();
    let lookup = grandchild.clone();
    let root = ContextSchema::context("Root", 0, vec![child])
        .with_kind(ContextKind::new().on_destroy(move |context| {
            recorded
                .lock()
                .unwrap()
                .push(context.get_context(&lookup).map(|found| found.name().to_string()));
            Ok(())
        }))
        .build();
    let mut factory = Factory::new(root);
    factory.create().unwrap();
    let personal = factory
        .create_personal_by_id(1, ConstructionParams::empty())
        .unwrap();

    factory.remove_personal_by_id(1).unwrap();

    assert_eq!(*seen.lock().unwrap(), vec![Some("Grandchild".to_string())]);
    assert!(personal.get_context(&grandchild).is_none());
}

#[test]
fn test_registry_drop_releases_tree() {
    let (mut factory, schemas) = created_factory();
    let personal = factory
        .create_personal_by_id(1, ConstructionParams::empty())
        .unwrap();
    let weak_root = Rc::downgrade(&personal.get_root_context().unwrap());
    let deep = personal.get_context(&schemas.deep).unwrap();

    drop(personal);
    factory.remove_personal_by_id(1).unwrap();

    assert!(weak_root.upgrade().is_none());
    // a retained node outlives its tree but loses its back references
    assert!(deep.get_registry().is_none());
    assert!(deep.get_parent_context().is_none());
}
