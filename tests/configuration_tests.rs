//! Configuration tests

use cinnamon_core::configuration::{
    Condition, Configuration, ConfigurationError, Param, TypeHint, Value,
};
use cinnamon_core::registry::RegistrationKey;

fn define_configuration() -> Configuration {
    let mut config = Configuration::default();
    config
        .add(
            Param::new("x")
                .value(10)
                .type_hint(TypeHint::Int)
                .description("a parameter"),
        )
        .unwrap();
    config
}

#[test]
fn test_add_and_read_param() {
    let config = define_configuration();
    assert_eq!(config.value("x").unwrap(), &Value::Int(10));
    assert_eq!(config.get("x").unwrap().description.as_deref(), Some("a parameter"));
    assert!(matches!(
        config.value("missing"),
        Err(ConfigurationError::NonExistingParameter(_))
    ));
}

#[test]
fn test_set_param() {
    let mut config = define_configuration();
    config.set("x", 20).unwrap();
    assert_eq!(config.value("x").unwrap().as_int(), Some(20));
    assert!(config.set("missing", 1).is_err());
}

#[test]
fn test_variants_one_axis_with_fixed_param() {
    let mut config = Configuration::default();
    config.add(Param::new("x").variants([1, 2, 3])).unwrap();
    config.add(Param::new("fixed").value(true)).unwrap();

    let variants = config.variants();
    assert_eq!(variants.len(), 3);

    let base = RegistrationKey::new("config", "testing");
    for (variant, expected) in variants.iter().zip(["x=1", "x=2", "x=3"]) {
        assert_eq!(variant.len(), 1);
        let key = base.from_variant(variant).unwrap();
        assert_eq!(key.tags().len(), 1);
        assert!(key.tags().contains(expected));
    }
}

#[test]
fn test_variants_two_axes() {
    let mut config = Configuration::default();
    config.add(Param::new("x").variants([1, 2, 3])).unwrap();
    config.add(Param::new("y").variants(["a", "b"])).unwrap();

    let variants = config.variants();
    assert_eq!(variants.len(), 6);

    let base = RegistrationKey::new("config", "testing");
    for variant in &variants {
        assert_eq!(base.from_variant(variant).unwrap().tags().len(), 2);
    }
}

#[test]
fn test_variants_deduplicate_current_value() {
    let mut config = Configuration::default();
    config.add(Param::new("x").value(2).variants([1, 2, 3])).unwrap();

    let values: Vec<Value> = config
        .variants()
        .iter()
        .filter_map(|variant| variant.get("x").cloned())
        .collect();
    assert_eq!(values, vec![Value::Int(2), Value::Int(1), Value::Int(3)]);
}

#[test]
fn test_required_param_fails_validation() {
    let mut config = Configuration::default();
    config.add(Param::new("x")).unwrap();

    let result = config.validate(false).unwrap();
    assert!(!result.passed);
    assert_eq!(result.error_message.as_deref(), Some("Condition x_is_required failed!"));

    let err = config.validate(true).unwrap_err();
    assert!(matches!(err, ConfigurationError::ValidationFailure(_)));
}

#[test]
fn test_optional_param_passes_validation() {
    let mut config = Configuration::default();
    config.add(Param::new("x").required(false)).unwrap();
    assert!(config.validate(true).unwrap().passed);
}

#[test]
fn test_child_failure_propagates() {
    let mut child = Configuration::new("ChildConfig");
    child
        .add(
            Param::new("x")
                .value(5)
                .allowed_range(|value| matches!(value.as_int(), Some(1 | 2))),
        )
        .unwrap();

    let mut parent = Configuration::new("ParentConfig");
    parent.add(Param::new("child").value(child)).unwrap();

    let err = parent.validate(true).unwrap_err();
    match err {
        ConfigurationError::ValidationFailure(result) => {
            assert_eq!(result.source, "ChildConfig");
            assert_eq!(result.error_message.as_deref(), Some("Condition x_allowed_range failed!"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_custom_pre_condition() {
    let mut config = Configuration::default();
    config.add(Param::new("x").value(3)).unwrap();
    config
        .add_condition(
            Condition::new("x_is_even", |config: &Configuration| {
                config.value("x").ok().and_then(Value::as_int).map_or(false, |x| x % 2 == 0)
            })
            .tags(["pre-condition"]),
        )
        .unwrap();

    assert!(!config.pre_validate(false).unwrap().passed);
    assert!(config.validate(false).unwrap().passed);
}

#[test]
fn test_condition_name_clashes_with_param() {
    let mut config = Configuration::default();
    config.add(Param::new("x").value(1)).unwrap();
    let err = config
        .add_condition(Condition::new("x", |_: &Configuration| true))
        .unwrap_err();
    assert!(matches!(err, ConfigurationError::AlreadyExistingParameter(name) if name == "x"));
}

#[test]
fn test_search_param() {
    let mut config = Configuration::default();
    config.add(Param::new("lr").value(0.1).tags(["optim"])).unwrap();
    config.add(Param::new("epochs").value(3)).unwrap();

    let is_float = |param: &Param| param.value.as_float().is_some() && param.value.as_int().is_none();
    let found = config.search_param(&[&is_float]);
    assert_eq!(found.len(), 1);
    assert!(found.contains_key("lr"));
}
