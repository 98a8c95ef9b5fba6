//! Building configurations and components from an expanded registry

use std::sync::Arc;
use tracing::debug;

use crate::component::{Component, ComponentArgs};
use crate::configuration::{Configuration, Value};
use crate::registry::{Registry, RegistryError, RegistrationKey};

/// Names and keys of dependency params that still hold a key
fn pending_dependencies(config: &Configuration) -> Vec<(String, RegistrationKey)> {
    config
        .dependencies()
        .filter_map(|param| param.value.as_key().map(|key| (param.name.clone(), key.clone())))
        .collect()
}

impl Registry {
    /// Build a configuration with every dependency key replaced by its built configuration
    pub fn build_configuration(&self, key: &RegistrationKey) -> Result<Configuration, RegistryError> {
        self.ensure_expanded()?;

        let mut config = self.retrieve_configuration_info(key)?.build()?;
        for (name, child_key) in pending_dependencies(&config) {
            let child = self.build_configuration(&child_key)?;
            config.set(&name, child)?;
        }
        Ok(config)
    }

    /// Instantiate the component bound to `key`
    ///
    /// Dependencies become components when the registration builds
    /// recursively, configurations otherwise. `extra_args` override the
    /// configuration values.
    pub fn build_component(
        &self,
        key: &RegistrationKey,
        extra_args: ComponentArgs,
    ) -> Result<Arc<dyn Component>, RegistryError> {
        self.ensure_expanded()?;

        let info = self.retrieve_configuration_info(key)?;
        let component_class = info
            .component_class
            .as_ref()
            .ok_or_else(|| RegistryError::NotBound(key.to_string()))?;

        let mut config = info.build()?;
        for (name, child_key) in pending_dependencies(&config) {
            let child = if info.build_recursively {
                Value::Component(self.build_component(&child_key, ComponentArgs::new())?)
            } else {
                Value::from(self.build_configuration(&child_key)?)
            };
            config.set(&name, child)?;
        }

        debug!("Building component {} for {}", component_class.name(), key);
        let args = ComponentArgs::from(config.values()).merge(extra_args);
        Ok(component_class.instantiate(args)?)
    }
}
