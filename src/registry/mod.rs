//! Configuration registry
//!
//! The [`Registry`] maps [`RegistrationKey`]s to [`ConfigurationInfo`] and
//! keeps the dependency graph between them. It goes through two phases:
//! registrations are accepted while it is [`RegistryState::Registering`];
//! [`Registry::dag_resolution`] expands variants and switches it to
//! [`RegistryState::Expanded`], after which configurations and components
//! can be built.

pub mod build;
pub mod error;
pub mod graph;
pub mod info;
pub mod key;
pub mod loading;
pub mod registration;
pub mod resolution;

pub use error::RegistryError;
pub use graph::{root_key, DependencyGraph, EdgeKind};
pub use info::{ConfigClass, ConfigurationInfo, Constructor};
pub use key::{KeyRecord, KeyRef, RegistrationKey, Tags, DEFAULT_NAMESPACE};
pub use registration::{DeclareFn, PendingRegistration, Registration, RegistrationContext};
pub use resolution::{Resolution, ResolvedKey};

use indexmap::{IndexMap, IndexSet};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info};

use crate::configuration::{Configuration, ParamValues, Value};
use crate::loader::DeclarationCatalog;

/// Registration phase of a [`Registry`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistryState {
    Registering,
    Expanded,
}

pub struct Registry {
    entries: IndexMap<RegistrationKey, ConfigurationInfo>,
    graph: DependencyGraph,
    state: RegistryState,
    /// Namespaces whose declarations are known to exist
    namespaces: IndexSet<String>,
    namespace_directories: IndexMap<String, PathBuf>,
    loaded_directories: IndexSet<PathBuf>,
    catalog: DeclarationCatalog,
}

impl Registry {
    pub fn new() -> Self {
        Self::with_catalog(DeclarationCatalog::new())
    }

    /// Registry resolving manifest names against `catalog`
    pub fn with_catalog(catalog: DeclarationCatalog) -> Self {
        Self {
            entries: IndexMap::new(),
            graph: DependencyGraph::new(),
            state: RegistryState::Registering,
            namespaces: IndexSet::new(),
            namespace_directories: IndexMap::new(),
            loaded_directories: IndexSet::new(),
            catalog,
        }
    }

    /// Drop every registration and go back to the registration phase
    ///
    /// The catalog is kept.
    pub fn reset(&mut self) {
        self.entries.clear();
        self.graph = DependencyGraph::new();
        self.state = RegistryState::Registering;
        self.namespaces.clear();
        self.namespace_directories.clear();
        self.loaded_directories.clear();
    }

    pub fn catalog(&self) -> &DeclarationCatalog {
        &self.catalog
    }

    pub fn catalog_mut(&mut self) -> &mut DeclarationCatalog {
        &mut self.catalog
    }

    pub fn state(&self) -> RegistryState {
        self.state
    }

    pub fn is_expanded(&self) -> bool {
        self.state == RegistryState::Expanded
    }

    pub fn graph(&self) -> &DependencyGraph {
        &self.graph
    }

    pub fn in_registry(&self, key: &RegistrationKey) -> bool {
        self.entries.contains_key(key)
    }

    pub fn in_graph(&self, key: &RegistrationKey) -> bool {
        self.graph.contains(key)
    }

    /// Registered keys in registration order
    pub fn keys(&self) -> impl Iterator<Item = &RegistrationKey> {
        self.entries.keys()
    }

    pub fn namespaces(&self) -> impl Iterator<Item = &str> {
        self.namespaces.iter().map(String::as_str)
    }

    pub fn is_namespace_covered(&self, namespace: &str) -> bool {
        self.namespaces.contains(namespace)
    }

    fn ensure_registering(&self) -> Result<(), RegistryError> {
        if self.is_expanded() {
            return Err(RegistryError::AlreadyExpanded);
        }
        Ok(())
    }

    fn ensure_expanded(&self) -> Result<(), RegistryError> {
        if !self.is_expanded() {
            return Err(RegistryError::NotExpanded);
        }
        Ok(())
    }

    /// Register a configuration and wire its declared dependencies
    ///
    /// One configuration instance is built to discover dependency keys.
    /// Depending on a key in another namespace requires that namespace to be
    /// covered; its declaration directory, if known, is loaded on demand.
    /// Nothing is recorded unless every check passes.
    pub fn register_configuration(
        &mut self,
        registration: Registration,
    ) -> Result<RegistrationKey, RegistryError> {
        self.ensure_registering()?;

        let key = registration.key();
        key.validate()?;
        if self.in_registry(&key) {
            return Err(RegistryError::AlreadyRegistered(key.to_string()));
        }

        let constructor = registration.effective_constructor();
        let info = ConfigurationInfo {
            config_class: registration.config_class,
            constructor,
            component_class: registration.component_class,
            build_recursively: registration.build_recursively,
        };
        let built = info.build()?;

        let dependencies: Vec<RegistrationKey> = built
            .dependencies()
            .flat_map(|param| {
                param
                    .value
                    .as_key()
                    .into_iter()
                    .chain(param.variants.iter().filter_map(Value::as_key))
                    .cloned()
                    .collect::<Vec<_>>()
            })
            .collect();

        let foreign: Vec<&RegistrationKey> = dependencies
            .iter()
            .filter(|dependency| dependency.namespace() != key.namespace())
            .collect();
        if let Some(uncovered) = foreign
            .iter()
            .find(|dependency| !self.is_namespace_covered(dependency.namespace()))
        {
            return Err(RegistryError::NamespaceNotFound {
                key: key.to_string(),
                namespace: uncovered.namespace().to_string(),
                known: self.namespaces.iter().cloned().collect(),
            });
        }
        for dependency in foreign {
            self.load_namespace(dependency.namespace())?;
        }

        // A namespace load may have registered the same key
        if self.in_registry(&key) {
            return Err(RegistryError::AlreadyRegistered(key.to_string()));
        }

        self.entries.insert(key.clone(), info);
        self.graph.add_node(key.clone());
        if self.graph.in_degree(&key) == 0 {
            self.graph.add_edge(&root_key(), &key, EdgeKind::Child);
        }
        for dependency in &dependencies {
            self.graph.add_edge(&key, dependency, EdgeKind::Child);
        }

        debug!("Registered {}", key);
        Ok(key)
    }

    fn load_namespace(&mut self, namespace: &str) -> Result<(), RegistryError> {
        if let Some(directory) = self.namespace_directories.get(namespace).cloned() {
            self.load_registrations(&directory)?;
        }
        Ok(())
    }

    /// Register a specialization of a class with some parameter values fixed
    ///
    /// The bound parameters lose their variants, so a registered variant is
    /// never expanded again along an axis it already fixes.
    pub fn register_configuration_from_variant(
        &mut self,
        mut registration: Registration,
        values: &ParamValues,
    ) -> Result<RegistrationKey, RegistryError> {
        let base = registration.effective_constructor();
        let values = values.clone();
        registration.constructor = Some(Arc::new(move || {
            let mut config = base()?.delta_copy(&values)?;
            for name in values.keys() {
                if let Some(param) = config.get_mut(name) {
                    param.variants.clear();
                }
            }
            Ok(config)
        }));
        self.register_configuration(registration)
    }

    /// Run a declaration function and replay what it registered
    pub fn declare(&mut self, declare: DeclareFn) -> Result<Vec<RegistrationKey>, RegistryError> {
        let mut context = RegistrationContext::new();
        declare(&mut context);
        self.replay(context)
    }

    /// Apply buffered registrations in order
    pub fn replay(&mut self, context: RegistrationContext) -> Result<Vec<RegistrationKey>, RegistryError> {
        let mut keys = Vec::with_capacity(context.len());
        for pending in context.into_pending() {
            let key = match pending {
                PendingRegistration::Configuration(registration) => {
                    self.register_configuration(registration)?
                }
                PendingRegistration::FromVariant {
                    registration,
                    values,
                } => self.register_configuration_from_variant(registration, &values)?,
            };
            keys.push(key);
        }
        Ok(keys)
    }

    /// Build a configuration without resolving its dependencies
    pub fn retrieve_configuration(&self, key: &RegistrationKey) -> Result<Configuration, RegistryError> {
        Ok(self.retrieve_configuration_info(key)?.build()?)
    }

    pub fn retrieve_configuration_info(
        &self,
        key: &RegistrationKey,
    ) -> Result<&ConfigurationInfo, RegistryError> {
        self.entries
            .get(key)
            .ok_or_else(|| RegistryError::NotRegistered(key.to_string()))
    }

    /// Structural checks run before resolution
    pub fn check_registration_graph(&self) -> Result<(), RegistryError> {
        self.ensure_registering()?;

        let cyclic = self.graph.cyclic_nodes();
        if !cyclic.is_empty() {
            return Err(RegistryError::NotADag(
                cyclic.iter().map(ToString::to_string).collect(),
            ));
        }

        let isolated = self.graph.isolated_nodes();
        if !isolated.is_empty() && self.graph.node_count() > 1 {
            return Err(RegistryError::DisconnectedGraph(
                isolated.iter().map(ToString::to_string).collect(),
            ));
        }
        Ok(())
    }

    pub fn show_registrations<'a, I>(&self, keys: I)
    where
        I: IntoIterator<Item = &'a RegistrationKey>,
    {
        for key in keys {
            info!("{}", key);
        }
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}
