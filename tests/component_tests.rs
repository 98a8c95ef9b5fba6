//! Component building tests

mod common;
use common::*;

use std::sync::Arc;

use cinnamon_core::component::{ComponentArgs, ComponentClass, ComponentError};
use cinnamon_core::configuration::Variant;
use cinnamon_core::registry::{Registry, RegistryError};

fn bound<C: cinnamon_core::BuildComponent + 'static>(
    registration: cinnamon_core::Registration,
) -> cinnamon_core::Registration {
    registration.component(ComponentClass::of::<C>())
}

#[test]
fn test_build_empty_component() {
    let mut registry = Registry::new();
    let key = registry
        .register_configuration(bound::<EmptyComponent>(base_registration("component", &[])))
        .unwrap();
    registry.dag_resolution().unwrap();

    let component = registry.build_component(&key, ComponentArgs::new()).unwrap();
    assert!(component.is::<EmptyComponent>());
}

#[test]
fn test_build_component() {
    let mut registry = Registry::new();
    let key = registry
        .register_configuration(bound::<BaseComponent>(registration::<BaseConfig>("component", &[])))
        .unwrap();
    registry.dag_resolution().unwrap();

    let component = registry.build_component(&key, ComponentArgs::new()).unwrap();
    let component = component.downcast_ref::<BaseComponent>().unwrap();
    assert_eq!(component.x, 5);
    assert_eq!(component.y, 10);
}

#[test]
fn test_build_component_with_overrides() {
    let mut registry = Registry::new();
    let key = registry
        .register_configuration(bound::<BaseComponent>(registration::<BaseConfig>("component", &[])))
        .unwrap();
    registry.dag_resolution().unwrap();

    let component = registry
        .build_component(&key, ComponentArgs::new().with("y", 42))
        .unwrap();
    assert_eq!(component.downcast_ref::<BaseComponent>().unwrap().y, 42);
}

#[test]
fn test_trigger_invalid_build_component() {
    let mut registry = Registry::new();
    let key = registry
        .register_configuration(bound::<EmptyComponent>(registration::<BaseConfig>("component", &[])))
        .unwrap();
    registry.dag_resolution().unwrap();

    let err = registry.build_component(&key, ComponentArgs::new()).unwrap_err();
    assert!(matches!(
        err,
        RegistryError::Component(ComponentError::UnexpectedArguments { ref names, .. })
            if names == &["x".to_string(), "y".to_string()]
    ));
}

#[test]
fn test_build_component_with_child() {
    let mut registry = Registry::new();
    let parent_key = registry
        .register_configuration(bound::<ComponentWithChild>(registration::<ConfigWithChild>("config", &[])))
        .unwrap();
    let child_key = registry
        .register_configuration(bound::<ChildComponent>(registration::<ChildConfig>("test", &["t2"])))
        .unwrap();
    registry.dag_resolution().unwrap();

    let parent = registry.build_component(&parent_key, ComponentArgs::new()).unwrap();
    let child = registry.build_component(&child_key, ComponentArgs::new()).unwrap();

    let parent = parent.downcast_ref::<ComponentWithChild>().unwrap();
    let parent_child = parent.child().unwrap();
    assert_eq!(parent_child.downcast_ref::<ChildComponent>().unwrap().y, None);
    assert!(!Arc::ptr_eq(parent_child, &child));
}

#[test]
fn test_build_component_with_child_variants() {
    let mut registry = Registry::new();
    let parent_key = registry
        .register_configuration(bound::<ComponentWithChild>(registration::<ConfigWithChild>("config", &[])))
        .unwrap();
    let child_key = registry
        .register_configuration(bound::<ChildComponent>(registration::<ChildConfig>("test", &["t2"])))
        .unwrap();
    let resolution = registry.dag_resolution().unwrap();

    for y in [false, true] {
        let child_variant = child_key.from_variant(&Variant::new().bind("y", y)).unwrap();
        let parent_variant = parent_key
            .from_variant(&Variant::new().bind("c1", child_variant))
            .unwrap();
        assert!(resolution.is_valid(&parent_variant));

        let component = registry
            .build_component(&parent_variant, ComponentArgs::new())
            .unwrap();
        let child = component
            .downcast_ref::<ComponentWithChild>()
            .and_then(ComponentWithChild::child)
            .and_then(|child| child.downcast_ref::<ChildComponent>())
            .unwrap();
        assert_eq!(child.y, Some(y));
    }
}

#[test]
fn test_build_without_recursion_passes_configuration() {
    let mut registry = Registry::new();
    let parent_key = registry
        .register_configuration(
            bound::<ComponentWithChild>(registration::<ConfigWithChild>("config", &[])).build_recursively(false),
        )
        .unwrap();
    registry
        .register_configuration(bound::<BaseComponent>(registration::<BaseConfig>("test", &["t2"])))
        .unwrap();
    registry.dag_resolution().unwrap();

    let component = registry.build_component(&parent_key, ComponentArgs::new()).unwrap();
    let parent = component.downcast_ref::<ComponentWithChild>().unwrap();
    let child = parent.c1.as_config().unwrap();
    assert_eq!(child.value("x").unwrap().as_int(), Some(5));
}

#[test]
fn test_run_defaults_to_not_runnable() {
    let mut registry = Registry::new();
    let key = registry
        .register_configuration(bound::<EmptyComponent>(base_registration("component", &[])))
        .unwrap();
    registry.dag_resolution().unwrap();

    let component = registry.build_component(&key, ComponentArgs::new()).unwrap();
    assert!(matches!(component.run(), Err(ComponentError::NotRunnable(_))));
}
