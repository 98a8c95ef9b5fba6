#![allow(dead_code)]

use std::fs;
use std::path::Path;
use std::sync::Arc;

use cinnamon_core::component::{BuildComponent, Component, ComponentArgs, ComponentError};
use cinnamon_core::configuration::{
    Configuration, ConfigurationError, ConfigurationType, Param, TypeHint, Value,
};
use cinnamon_core::loader::DeclarationCatalog;
use cinnamon_core::registry::{ConfigClass, Registration, RegistrationKey};

pub const NAMESPACE: &str = "testing";

pub fn key(name: &str, tags: &[&str]) -> RegistrationKey {
    RegistrationKey::new(name, NAMESPACE).with_tags(tags.iter().copied())
}

pub fn registration<T: ConfigurationType + 'static>(name: &str, tags: &[&str]) -> Registration {
    Registration::new(ConfigClass::of::<T>(), name, NAMESPACE).tags(tags.iter().copied())
}

pub fn base_registration(name: &str, tags: &[&str]) -> Registration {
    Registration::new(ConfigClass::base(), name, NAMESPACE).tags(tags.iter().copied())
}

/// Write `contents` at `relative` below `root`, creating parent folders
pub fn write_file(root: &Path, relative: &str, contents: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

pub fn catalog() -> DeclarationCatalog {
    DeclarationCatalog::new()
        .with_config::<BaseConfig>()
        .with_config::<ChildConfig>()
        .with_config::<ConfigWithChild>()
        .with_config::<ConfigWithExternalDependency>()
        .with_config::<VariantConfig>()
        .with_component::<BaseComponent>()
        .with_component::<ChildComponent>()
        .with_component::<ComponentWithChild>()
        .with_component::<EmptyComponent>()
}

// Configurations

pub struct BaseConfig;

impl ConfigurationType for BaseConfig {
    const NAME: &'static str = "BaseConfig";

    fn default_configuration() -> Result<Configuration, ConfigurationError> {
        let mut config = Configuration::default();
        config.add(Param::new("x").value(5).type_hint(TypeHint::Int))?;
        config.add(Param::new("y").value(10).type_hint(TypeHint::Int))?;
        Ok(config)
    }
}

pub struct InvalidConfig;

impl ConfigurationType for InvalidConfig {
    const NAME: &'static str = "InvalidConfig";

    fn default_configuration() -> Result<Configuration, ConfigurationError> {
        let mut config = Configuration::default();
        config.add(
            Param::new("x")
                .value(5)
                .allowed_range(|value| matches!(value.as_int(), Some(2 | 3))),
        )?;
        Ok(config)
    }
}

pub struct ChildConfig;

impl ConfigurationType for ChildConfig {
    const NAME: &'static str = "ChildConfig";

    fn default_configuration() -> Result<Configuration, ConfigurationError> {
        let mut config = Configuration::default();
        config.add(Param::new("y").variants([false, true]))?;
        Ok(config)
    }
}

pub struct ConfigWithChild;

impl ConfigurationType for ConfigWithChild {
    const NAME: &'static str = "ConfigWithChild";

    fn default_configuration() -> Result<Configuration, ConfigurationError> {
        let mut config = Configuration::default();
        config.add(Param::new("c1").value(key("test", &["t2"])))?;
        Ok(config)
    }
}

pub struct ConfigWithVariantChild;

impl ConfigurationType for ConfigWithVariantChild {
    const NAME: &'static str = "ConfigWithVariantChild";

    fn default_configuration() -> Result<Configuration, ConfigurationError> {
        let mut config = Configuration::default();
        config.add(Param::new("c1").value(key("test", &["x=1"])))?;
        Ok(config)
    }
}

pub struct ParentWithVariantsAndChild;

impl ConfigurationType for ParentWithVariantsAndChild {
    const NAME: &'static str = "ParentWithVariantsAndChild";

    fn default_configuration() -> Result<Configuration, ConfigurationError> {
        let mut config = Configuration::default();
        config.add(Param::new("x").variants([1, 2]))?;
        config.add(Param::new("c1").value(key("intermediate", &[])))?;
        Ok(config)
    }
}

pub struct VariantConfig;

impl ConfigurationType for VariantConfig {
    const NAME: &'static str = "VariantConfig";

    fn default_configuration() -> Result<Configuration, ConfigurationError> {
        let mut config = Configuration::default();
        config.add(Param::new("x").variants([1, 2, 3]))?;
        Ok(config)
    }
}

pub struct InvalidVariantConfig;

impl ConfigurationType for InvalidVariantConfig {
    const NAME: &'static str = "InvalidVariantConfig";

    fn default_configuration() -> Result<Configuration, ConfigurationError> {
        let mut config = Configuration::default();
        config.add(
            Param::new("x")
                .value(5)
                .variants([1, 2, 3])
                .allowed_range(|value| matches!(value.as_int(), Some(1 | 2 | 5))),
        )?;
        Ok(config)
    }
}

pub struct VariantConfigWithChild;

impl ConfigurationType for VariantConfigWithChild {
    const NAME: &'static str = "VariantConfigWithChild";

    fn default_configuration() -> Result<Configuration, ConfigurationError> {
        let mut config = Configuration::default();
        config.add(Param::new("x").variants([1, 2, 3]))?;
        config.add(Param::new("c1").value(key("test", &["t2"])))?;
        Ok(config)
    }
}

pub struct VariantConfigWithVariantChild;

impl ConfigurationType for VariantConfigWithVariantChild {
    const NAME: &'static str = "VariantConfigWithVariantChild";

    fn default_configuration() -> Result<Configuration, ConfigurationError> {
        let mut config = Configuration::default();
        config.add(Param::new("y").variants(["a", "b"]))?;
        config.add(
            Param::new("c1")
                .type_hint(TypeHint::Key)
                .variants([key("test", &["t3"])]),
        )?;
        Ok(config)
    }
}

pub struct CliqueConfigA;

impl ConfigurationType for CliqueConfigA {
    const NAME: &'static str = "CliqueConfigA";

    fn default_configuration() -> Result<Configuration, ConfigurationError> {
        let mut config = Configuration::default();
        config.add(Param::new("child").value(key("config", &["c2"])))?;
        Ok(config)
    }
}

pub struct CliqueConfigB;

impl ConfigurationType for CliqueConfigB {
    const NAME: &'static str = "CliqueConfigB";

    fn default_configuration() -> Result<Configuration, ConfigurationError> {
        let mut config = Configuration::default();
        config.add(Param::new("child").value(key("config", &["c1"])))?;
        Ok(config)
    }
}

pub struct ConfigWithExternalDependency;

impl ConfigurationType for ConfigWithExternalDependency {
    const NAME: &'static str = "ConfigWithExternalDependency";

    fn default_configuration() -> Result<Configuration, ConfigurationError> {
        let mut config = Configuration::default();
        config.add(Param::new("c1").value(RegistrationKey::new("test", "external")))?;
        Ok(config)
    }
}

// Components

#[derive(Debug)]
pub struct EmptyComponent;

impl Component for EmptyComponent {}

impl BuildComponent for EmptyComponent {
    const NAME: &'static str = "EmptyComponent";

    fn build(_args: &mut ComponentArgs) -> Result<Self, ComponentError> {
        Ok(Self)
    }
}

#[derive(Debug)]
pub struct BaseComponent {
    pub x: i64,
    pub y: i64,
}

impl Component for BaseComponent {}

impl BuildComponent for BaseComponent {
    const NAME: &'static str = "BaseComponent";

    fn build(args: &mut ComponentArgs) -> Result<Self, ComponentError> {
        Ok(Self {
            x: args.take("x")?,
            y: args.take("y")?,
        })
    }
}

#[derive(Debug)]
pub struct ChildComponent {
    pub y: Option<bool>,
}

impl Component for ChildComponent {}

impl BuildComponent for ChildComponent {
    const NAME: &'static str = "ChildComponent";

    fn build(args: &mut ComponentArgs) -> Result<Self, ComponentError> {
        Ok(Self {
            y: args.take("y")?,
        })
    }
}

#[derive(Debug)]
pub struct ComponentWithChild {
    pub c1: Value,
}

impl Component for ComponentWithChild {}

impl BuildComponent for ComponentWithChild {
    const NAME: &'static str = "ComponentWithChild";

    fn build(args: &mut ComponentArgs) -> Result<Self, ComponentError> {
        Ok(Self {
            c1: args.take("c1")?,
        })
    }
}

impl ComponentWithChild {
    pub fn child(&self) -> Option<&Arc<dyn Component>> {
        self.c1.as_component()
    }
}
