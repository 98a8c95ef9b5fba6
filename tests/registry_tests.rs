//! Registry tests: registration phase, graph checks and the expansion latch

mod common;
use common::*;

use cinnamon_core::component::ComponentArgs;
use cinnamon_core::configuration::{Value, Variant};
use cinnamon_core::registry::{root_key, EdgeKind, Registry, RegistryError, RegistryState};

#[test]
fn test_register_empty_config() {
    let mut registry = Registry::new();
    let key = registry.register_configuration(base_registration("test", &[])).unwrap();

    assert!(registry.in_registry(&key));
    assert!(registry.in_graph(&key));
    assert_eq!(registry.graph().node_count(), 2);
    assert_eq!(registry.graph().edge_count(), 1);
}

#[test]
fn test_register_two_empty_configs() {
    let mut registry = Registry::new();
    let key_1 = registry.register_configuration(base_registration("test", &[])).unwrap();
    let key_2 = registry.register_configuration(base_registration("test", &["t2"])).unwrap();

    assert!(registry.in_registry(&key_1));
    assert!(registry.in_registry(&key_2));
    assert_eq!(registry.graph().node_count(), 3);
    assert_eq!(registry.graph().edge_count(), 2);
}

#[test]
fn test_register_empty_and_nested_config() {
    let mut registry = Registry::new();
    let key_1 = registry
        .register_configuration(registration::<ConfigWithChild>("test", &[]))
        .unwrap();
    let key_2 = registry.register_configuration(base_registration("test", &["t2"])).unwrap();

    assert_eq!(registry.graph().node_count(), 3);
    assert_eq!(registry.graph().edge_count(), 2);
    assert!(registry.graph().has_edge(&root_key(), &key_1));
    assert!(registry.graph().has_edge(&key_1, &key_2));
    assert_eq!(registry.graph().edge_kind(&key_1, &key_2), Some(EdgeKind::Child));
}

#[test]
fn test_trigger_repeated_registration_error() {
    let mut registry = Registry::new();
    registry
        .register_configuration(base_registration("test", &["tag1"]))
        .unwrap();
    let err = registry
        .register_configuration(base_registration("test", &["tag1"]))
        .unwrap_err();
    assert!(matches!(err, RegistryError::AlreadyRegistered(_)));
}

#[test]
fn test_retrieve_unregistered_config() {
    let registry = Registry::new();
    let err = registry
        .retrieve_configuration(&key("test_config", &["tag1", "tag2"]))
        .unwrap_err();
    assert!(matches!(err, RegistryError::NotRegistered(_)));
}

#[test]
fn test_register_and_bind_config() {
    let mut registry = Registry::new();
    let key = registry
        .register_configuration(
            base_registration("test", &["tag"])
                .component(cinnamon_core::ComponentClass::of::<EmptyComponent>()),
        )
        .unwrap();
    let info = registry.retrieve_configuration_info(&key).unwrap();
    assert_eq!(info.component_class.as_ref().map(|class| class.name()), Some("EmptyComponent"));
}

#[test]
fn test_register_config_with_variants_no_expansion() {
    let mut registry = Registry::new();
    let key = registry
        .register_configuration(registration::<VariantConfig>("test", &[]))
        .unwrap();

    assert_eq!(registry.graph().node_count(), 2);
    assert_eq!(registry.graph().edge_count(), 1);
    for x in 1..=3 {
        let variant_key = key.from_variant(&Variant::new().bind("x", x)).unwrap();
        assert!(!registry.graph().has_edge(&key, &variant_key));
        assert!(!registry.in_registry(&variant_key));
    }
}

#[test]
fn test_register_config_with_child_and_child_variants_no_expansion() {
    let mut registry = Registry::new();
    let key = registry
        .register_configuration(registration::<VariantConfigWithChild>("test", &[]))
        .unwrap();
    assert_eq!(registry.graph().node_count(), 3);
    assert_eq!(registry.graph().edge_count(), 2);

    let child_key = registry
        .register_configuration(registration::<ChildConfig>("test", &["t2"]))
        .unwrap();
    assert!(registry.in_registry(&child_key));
    assert_eq!(registry.graph().node_count(), 3);
    assert_eq!(registry.graph().edge_count(), 2);
    assert!(registry.graph().has_edge(&key, &child_key));
}

#[test]
fn test_register_config_from_variant() {
    let mut registry = Registry::new();
    let mut values = cinnamon_core::ParamValues::new();
    values.insert("x".to_string(), Value::Int(10));
    values.insert("y".to_string(), Value::Int(15));

    let key = registry
        .register_configuration_from_variant(registration::<BaseConfig>("config", &[]), &values)
        .unwrap();
    let config = registry.retrieve_configuration(&key).unwrap();
    assert_eq!(config.value("x").unwrap().as_int(), Some(10));
    assert_eq!(config.value("y").unwrap().as_int(), Some(15));
}

#[test]
fn test_clique() {
    let mut registry = Registry::new();
    registry
        .register_configuration(registration::<CliqueConfigA>("config", &["c1"]))
        .unwrap();
    registry
        .register_configuration(registration::<CliqueConfigB>("config", &["c2"]))
        .unwrap();

    let err = registry.check_registration_graph().unwrap_err();
    assert!(matches!(err, RegistryError::NotADag(nodes) if nodes.len() == 2));
}

#[test]
fn test_expansion_latch() {
    let mut registry = Registry::new();
    let key = registry.register_configuration(base_registration("config", &[])).unwrap();

    let err = registry.build_configuration(&key).unwrap_err();
    assert!(matches!(err, RegistryError::NotExpanded));

    registry.dag_resolution().unwrap();
    assert_eq!(registry.state(), RegistryState::Expanded);

    let err = registry
        .register_configuration(base_registration("late", &[]))
        .unwrap_err();
    assert!(matches!(err, RegistryError::AlreadyExpanded));
    assert!(matches!(registry.dag_resolution(), Err(RegistryError::AlreadyExpanded)));

    registry.reset();
    assert_eq!(registry.state(), RegistryState::Registering);
    assert_eq!(registry.keys().count(), 0);
}

#[test]
fn test_build_unbound_component() {
    let mut registry = Registry::new();
    let key = registry.register_configuration(base_registration("config", &[])).unwrap();
    registry.dag_resolution().unwrap();

    let err = registry.build_component(&key, ComponentArgs::new()).unwrap_err();
    assert!(matches!(err, RegistryError::NotBound(_)));
}

#[test]
fn test_registration_context_keys() {
    let mut context = cinnamon_core::RegistrationContext::new();
    context
        .register(base_registration("a", &[]))
        .register(base_registration("b", &["t"]));
    assert_eq!(context.keys(), vec![key("a", &[]), key("b", &["t"])]);

    let mut registry = Registry::new();
    let keys = registry.replay(context).unwrap();
    assert!(keys.iter().all(|key| registry.in_registry(key)));
}
