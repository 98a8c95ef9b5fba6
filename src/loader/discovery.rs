//! Manifest discovery
//!
//! Scans a directory tree for `*.toml` manifests stored below a folder
//! named `configurations`.

use indexmap::IndexMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::loader::catalog::DeclarationCatalog;
use crate::loader::manifest::DeclarationManifest;
use crate::registry::RegistryError;

/// Folder name that marks declaration manifests
pub const CONFIGURATIONS_DIR: &str = "configurations";

const MANIFEST_EXTENSION: &str = "toml";

/// Manifest file with its parsed content
#[derive(Debug, Clone)]
pub struct DiscoveredManifest {
    pub path: PathBuf,
    pub manifest: DeclarationManifest,
}

/// Manifest paths under `directory`, in sorted path order
pub fn find_manifest_files(directory: &Path) -> Result<Vec<PathBuf>, RegistryError> {
    if !directory.is_dir() {
        return Err(RegistryError::InvalidDirectory(directory.to_path_buf()));
    }

    let mut files = Vec::new();
    walk(directory, false, &mut files)?;
    Ok(files)
}

fn walk(directory: &Path, in_configurations: bool, files: &mut Vec<PathBuf>) -> Result<(), RegistryError> {
    let mut entries = fs::read_dir(directory)?
        .map(|entry| entry.map(|entry| entry.path()))
        .collect::<Result<Vec<_>, _>>()?;
    entries.sort();

    for path in entries {
        let file_type = fs::symlink_metadata(&path)?.file_type();
        if file_type.is_dir() {
            let is_configurations = path
                .file_name()
                .map_or(false, |name| name == CONFIGURATIONS_DIR);
            walk(&path, in_configurations || is_configurations, files)?;
        } else if file_type.is_file()
            && in_configurations
            && path.extension().map_or(false, |ext| ext == MANIFEST_EXTENSION)
        {
            files.push(path);
        }
    }
    Ok(())
}

/// Parse every manifest under `directory`
pub fn discover_manifests(directory: &Path) -> Result<Vec<DiscoveredManifest>, RegistryError> {
    let manifests = find_manifest_files(directory)?
        .into_iter()
        .map(|path| {
            debug!("Parsing manifest {:?}", path);
            let manifest = DeclarationManifest::from_file(&path)?;
            Ok(DiscoveredManifest { path, manifest })
        })
        .collect::<Result<Vec<_>, RegistryError>>()?;

    info!("Discovered {} manifests in {:?}", manifests.len(), directory);
    Ok(manifests)
}

/// Namespaces declared below each directory, and the directory each maps to
///
/// Declaration functions named by a manifest are run against a scratch
/// context so that the namespaces they register into are covered too. A
/// namespace found below several of the given directories keeps the first.
pub fn parse_configuration_files(
    directories: &[PathBuf],
    catalog: &DeclarationCatalog,
) -> Result<(Vec<String>, IndexMap<String, PathBuf>), RegistryError> {
    let mut namespaces = Vec::new();
    let mut mapping = IndexMap::new();
    for directory in directories {
        for discovered in discover_manifests(directory)? {
            for namespace in catalog.namespaces(&discovered.manifest)? {
                if !namespaces.contains(&namespace) {
                    namespaces.push(namespace.clone());
                }
                mapping
                    .entry(namespace)
                    .or_insert_with(|| directory.clone());
            }
        }
    }
    Ok((namespaces, mapping))
}
