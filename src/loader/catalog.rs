//! Declaration catalog
//!
//! Manifests name configuration classes, component classes and declaration
//! functions by string. The host application registers those names here.

use indexmap::IndexMap;

use crate::component::{BuildComponent, ComponentClass};
use crate::configuration::ConfigurationType;
use crate::loader::manifest::DeclarationManifest;
use crate::registry::{ConfigClass, DeclareFn, Registration, RegistrationContext, RegistryError};

#[derive(Clone)]
pub struct DeclarationCatalog {
    configs: IndexMap<String, ConfigClass>,
    components: IndexMap<String, ComponentClass>,
    declarations: IndexMap<String, DeclareFn>,
}

impl DeclarationCatalog {
    /// Catalog knowing only the base configuration class
    pub fn new() -> Self {
        let mut catalog = Self {
            configs: IndexMap::new(),
            components: IndexMap::new(),
            declarations: IndexMap::new(),
        };
        catalog.add_config(ConfigClass::base());
        catalog
    }

    pub fn add_config(&mut self, config_class: ConfigClass) -> &mut Self {
        self.configs.insert(config_class.name().to_string(), config_class);
        self
    }

    pub fn with_config<T: ConfigurationType + 'static>(mut self) -> Self {
        self.add_config(ConfigClass::of::<T>());
        self
    }

    pub fn add_component(&mut self, component_class: ComponentClass) -> &mut Self {
        self.components
            .insert(component_class.name().to_string(), component_class);
        self
    }

    pub fn with_component<C: BuildComponent + 'static>(mut self) -> Self {
        self.add_component(ComponentClass::of::<C>());
        self
    }

    pub fn add_declaration(&mut self, name: impl Into<String>, declare: DeclareFn) -> &mut Self {
        self.declarations.insert(name.into(), declare);
        self
    }

    pub fn with_declaration(mut self, name: impl Into<String>, declare: DeclareFn) -> Self {
        self.add_declaration(name, declare);
        self
    }

    pub fn config(&self, name: &str) -> Result<&ConfigClass, RegistryError> {
        self.configs
            .get(name)
            .ok_or_else(|| RegistryError::UnknownDeclaration(format!("configuration class {}", name)))
    }

    pub fn component(&self, name: &str) -> Result<&ComponentClass, RegistryError> {
        self.components
            .get(name)
            .ok_or_else(|| RegistryError::UnknownDeclaration(format!("component class {}", name)))
    }

    pub fn declaration(&self, name: &str) -> Result<DeclareFn, RegistryError> {
        self.declarations
            .get(name)
            .copied()
            .ok_or_else(|| RegistryError::UnknownDeclaration(format!("declaration {}", name)))
    }

    /// Namespaces a manifest covers, including those its declaration functions register into
    pub fn namespaces(&self, manifest: &DeclarationManifest) -> Result<Vec<String>, RegistryError> {
        let mut namespaces = manifest.namespaces();
        for name in &manifest.declarations {
            let mut scratch = RegistrationContext::new();
            self.declaration(name)?(&mut scratch);
            for key in scratch.keys() {
                if !namespaces.iter().any(|namespace| namespace == key.namespace()) {
                    namespaces.push(key.namespace().to_string());
                }
            }
        }
        Ok(namespaces)
    }

    /// Queue everything a manifest declares
    ///
    /// Entries come first, in file order, followed by the registrations of
    /// each listed declaration function.
    pub fn populate(
        &self,
        manifest: &DeclarationManifest,
        context: &mut RegistrationContext,
    ) -> Result<(), RegistryError> {
        for entry in &manifest.registrations {
            let namespace = manifest.entry_namespace(entry)?;
            let mut registration =
                Registration::new(self.config(&entry.config)?.clone(), entry.name.clone(), namespace)
                    .tags(entry.tags.iter().cloned())
                    .build_recursively(entry.build_recursively);
            if let Some(description) = &entry.description {
                registration = registration.description(description.clone());
            }
            if let Some(component) = &entry.component {
                registration = registration.component(self.component(component)?.clone());
            }

            match entry.variant_values()? {
                Some(values) => {
                    context.register_from_variant(registration, values);
                }
                None => {
                    context.register(registration);
                }
            }
        }

        for name in &manifest.declarations {
            let declare = self.declaration(name)?;
            declare(context);
        }
        Ok(())
    }
}

impl Default for DeclarationCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for DeclarationCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeclarationCatalog")
            .field("configs", &self.configs.keys().collect::<Vec<_>>())
            .field("components", &self.components.keys().collect::<Vec<_>>())
            .field("declarations", &self.declarations.keys().collect::<Vec<_>>())
            .finish()
    }
}
