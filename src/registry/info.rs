//! Registered configuration metadata

use std::fmt;
use std::sync::Arc;

use crate::component::ComponentClass;
use crate::configuration::{Configuration, ConfigurationError, ConfigurationType, BASE_KIND};

/// Zero-argument configuration factory
pub type Constructor = Arc<dyn Fn() -> Result<Configuration, ConfigurationError> + Send + Sync>;

/// A configuration kind together with its default constructor
#[derive(Clone)]
pub struct ConfigClass {
    name: String,
    default: Constructor,
}

impl ConfigClass {
    pub fn of<T: ConfigurationType + 'static>() -> Self {
        Self {
            name: T::NAME.to_string(),
            default: Arc::new(|| T::default_configuration().map(|config| config.with_kind(T::NAME))),
        }
    }

    /// The plain, parameterless configuration kind
    pub fn base() -> Self {
        Self {
            name: BASE_KIND.to_string(),
            default: Arc::new(|| Ok(Configuration::default())),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn default_constructor(&self) -> Constructor {
        self.default.clone()
    }
}

impl fmt::Debug for ConfigClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ConfigClass").field(&self.name).finish()
    }
}

/// Everything the registry stores for one key
#[derive(Clone)]
pub struct ConfigurationInfo {
    pub config_class: ConfigClass,
    pub constructor: Constructor,
    pub component_class: Option<ComponentClass>,
    pub build_recursively: bool,
}

impl ConfigurationInfo {
    pub fn build(&self) -> Result<Configuration, ConfigurationError> {
        (self.constructor)()
    }
}

impl fmt::Debug for ConfigurationInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigurationInfo")
            .field("config_class", &self.config_class)
            .field("component_class", &self.component_class)
            .field("build_recursively", &self.build_recursively)
            .finish()
    }
}
