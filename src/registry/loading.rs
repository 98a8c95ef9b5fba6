//! Loading declarations from directories
//!
//! [`Registry::setup`] is the usual entry point: it maps every namespace
//! found in the main and external directories, loads the main directory and
//! resolves the graph. External namespaces are loaded only when a
//! registration depends on one of their keys.

use indexmap::IndexMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::config::RegistryConfig;
use crate::loader::discovery;
use crate::registry::{Registry, RegistryError, RegistrationContext, RegistrationKey, Resolution};

impl Registry {
    /// Reset, load the main directory and run [`Registry::dag_resolution`]
    pub fn setup(&mut self, config: &RegistryConfig) -> Result<Resolution, RegistryError> {
        self.reset();

        let directory = canonical_directory(&config.directory)?;
        let (namespaces, mapping) = self.parse_configuration_files(&[directory.clone()])?;
        self.update_namespaces(namespaces, mapping)?;

        for external in resolve_external_directories(config)? {
            let (namespaces, mapping) = self.parse_configuration_files(&[external])?;
            self.update_namespaces(namespaces, mapping)?;
        }

        self.load_registrations(&directory)?;
        self.dag_resolution()
    }

    /// Namespaces found in `directories` and the directory each maps to
    pub fn parse_configuration_files(
        &self,
        directories: &[PathBuf],
    ) -> Result<(Vec<String>, IndexMap<String, PathBuf>), RegistryError> {
        discovery::parse_configuration_files(directories, &self.catalog)
    }

    /// Mark namespaces as covered and remember where their declarations live
    ///
    /// A namespace may map to a single directory.
    pub fn update_namespaces(
        &mut self,
        namespaces: Vec<String>,
        mapping: IndexMap<String, PathBuf>,
    ) -> Result<(), RegistryError> {
        for (namespace, directory) in mapping {
            if let Some(existing) = self.namespace_directories.get(&namespace) {
                return Err(RegistryError::DuplicateNamespace {
                    namespace,
                    existing: existing.clone(),
                });
            }
            debug!("Namespace {} maps to {:?}", namespace, directory);
            self.namespace_directories.insert(namespace, directory);
        }
        self.namespaces.extend(namespaces);
        Ok(())
    }

    /// Register every declaration found under `directory`
    ///
    /// A directory is loaded at most once.
    pub fn load_registrations(&mut self, directory: &Path) -> Result<Vec<RegistrationKey>, RegistryError> {
        self.ensure_registering()?;

        let directory = canonical_directory(directory)?;
        if self.loaded_directories.contains(&directory) {
            debug!("Declarations in {:?} already loaded", directory);
            return Ok(Vec::new());
        }
        let mut context = RegistrationContext::new();
        for discovered in discovery::discover_manifests(&directory)? {
            self.catalog.populate(&discovered.manifest, &mut context)?;
        }

        // Marked while replaying: dependencies back into this directory must not reload it
        let snapshot = (
            self.entries.clone(),
            self.graph.clone(),
            self.loaded_directories.clone(),
        );
        self.loaded_directories.insert(directory.clone());

        match self.replay(context) {
            Ok(keys) => {
                info!("Loaded {} registrations from {:?}", keys.len(), directory);
                Ok(keys)
            }
            Err(err) => {
                warn!("Loading {:?} failed, registrations rolled back: {}", directory, err);
                (self.entries, self.graph, self.loaded_directories) = snapshot;
                Err(err)
            }
        }
    }
}

fn canonical_directory(directory: &Path) -> Result<PathBuf, RegistryError> {
    if !directory.is_dir() {
        return Err(RegistryError::InvalidDirectory(directory.to_path_buf()));
    }
    Ok(directory.canonicalize()?)
}

/// External directories as given, or relative to the save directory
fn resolve_external_directories(config: &RegistryConfig) -> Result<Vec<PathBuf>, RegistryError> {
    let save_directory = config.save_directory();
    config
        .external_directories
        .iter()
        .map(|directory| {
            if directory.is_dir() {
                return canonical_directory(directory);
            }
            let saved = save_directory.join(directory);
            if saved.is_dir() {
                return canonical_directory(&saved);
            }
            warn!("External directory {:?} not found", directory);
            Err(RegistryError::InvalidDirectory(directory.clone()))
        })
        .collect()
}
