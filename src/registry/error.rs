//! Registry errors

use std::path::PathBuf;
use thiserror::Error;

use crate::component::ComponentError;
use crate::configuration::ConfigurationError;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Key {0} is already registered")]
    AlreadyRegistered(String),

    #[error("Key {key} references namespace {namespace} which is not covered (known: {known:?})")]
    NamespaceNotFound {
        key: String,
        namespace: String,
        known: Vec<String>,
    },

    #[error("Key {0} is not registered")]
    NotRegistered(String),

    #[error("Key {0} is not bound to any component")]
    NotBound(String),

    #[error("The registry has already been expanded")]
    AlreadyExpanded,

    #[error("The registry has not been expanded yet")]
    NotExpanded,

    #[error("Registration graph has isolated nodes: {0:?}")]
    DisconnectedGraph(Vec<String>),

    #[error("Registration graph is not a DAG (cycle through: {0:?})")]
    NotADag(Vec<String>),

    #[error("Invalid directory: {}", .0.display())]
    InvalidDirectory(PathBuf),

    #[error("Namespace {namespace} is already mapped to {}", .existing.display())]
    DuplicateNamespace { namespace: String, existing: PathBuf },

    #[error("Tag conflict on {key} for tag {tag}: {reason}")]
    TagConflict {
        key: String,
        tag: String,
        reason: String,
    },

    #[error("Invalid registration key {input:?}: {reason}")]
    InvalidKey { input: String, reason: String },

    #[error("A registration key requires at least a name")]
    MissingKeyName,

    #[error("Invalid declaration manifest: {0}")]
    InvalidManifest(String),

    #[error("Unknown declaration: {0}")]
    UnknownDeclaration(String),

    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error(transparent)]
    Component(#[from] ComponentError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
