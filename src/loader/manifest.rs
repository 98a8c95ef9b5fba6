//! Declaration manifest parsing
//!
//! A manifest is a TOML file listing registrations and catalog declaration
//! functions for one or more namespaces.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::configuration::{ParamValues, Value};
use crate::registry::{RegistrationKey, RegistryError};

/// Declaration manifest (`configurations/*.toml` structure)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeclarationManifest {
    /// Default namespace for entries that do not set one
    pub namespace: Option<String>,
    /// Catalog declaration functions to run
    #[serde(default)]
    pub declarations: Vec<String>,
    #[serde(default, rename = "registration")]
    pub registrations: Vec<RegistrationEntry>,
}

/// One `[[registration]]` table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistrationEntry {
    pub name: String,
    pub namespace: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Catalog configuration class name
    pub config: String,
    /// Catalog component class name
    pub component: Option<String>,
    #[serde(default = "default_build_recursively")]
    pub build_recursively: bool,
    pub description: Option<String>,
    /// Parameter values fixed by a registration from variant
    pub variant: Option<toml::Table>,
}

fn default_build_recursively() -> bool {
    true
}

impl DeclarationManifest {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, RegistryError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            RegistryError::InvalidManifest(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&contents).map_err(|e| match e {
            RegistryError::InvalidManifest(reason) => {
                RegistryError::InvalidManifest(format!("{}: {}", path.display(), reason))
            }
            other => other,
        })
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, RegistryError> {
        let manifest: DeclarationManifest = toml::from_str(contents)
            .map_err(|e| RegistryError::InvalidManifest(format!("Failed to parse manifest TOML: {}", e)))?;

        for entry in &manifest.registrations {
            if entry.name.is_empty() {
                return Err(RegistryError::InvalidManifest(
                    "Registration name cannot be empty".to_string(),
                ));
            }
            manifest.entry_namespace(entry)?;
        }
        Ok(manifest)
    }

    /// Namespace of an entry, falling back to the manifest namespace
    pub fn entry_namespace(&self, entry: &RegistrationEntry) -> Result<String, RegistryError> {
        entry
            .namespace
            .as_ref()
            .or(self.namespace.as_ref())
            .cloned()
            .ok_or_else(|| {
                RegistryError::InvalidManifest(format!(
                    "Registration {} has no namespace",
                    entry.name
                ))
            })
    }

    /// Every namespace this manifest declares, first seen first
    pub fn namespaces(&self) -> Vec<String> {
        let mut namespaces = Vec::new();
        let declared = self
            .namespace
            .iter()
            .chain(self.registrations.iter().filter_map(|entry| entry.namespace.as_ref()));
        for namespace in declared {
            if !namespaces.contains(namespace) {
                namespaces.push(namespace.clone());
            }
        }
        namespaces
    }
}

impl RegistrationEntry {
    /// Variant table converted to parameter values, if any
    pub fn variant_values(&self) -> Result<Option<ParamValues>, RegistryError> {
        self.variant
            .as_ref()
            .map(|table| {
                table
                    .iter()
                    .map(|(name, value)| Ok((name.clone(), toml_to_value(value)?)))
                    .collect::<Result<ParamValues, RegistryError>>()
            })
            .transpose()
    }
}

/// Convert a TOML value into a parameter value
///
/// `{ key = "..." }` is a registration key and `{ symbol = "..." }` a
/// symbol; any other table becomes a map.
pub fn toml_to_value(value: &toml::Value) -> Result<Value, RegistryError> {
    Ok(match value {
        toml::Value::String(s) => Value::Str(s.clone()),
        toml::Value::Integer(i) => Value::Int(*i),
        toml::Value::Float(f) => Value::Float(*f),
        toml::Value::Boolean(b) => Value::Bool(*b),
        toml::Value::Datetime(d) => Value::Str(d.to_string()),
        toml::Value::Array(items) => {
            Value::List(items.iter().map(toml_to_value).collect::<Result<_, _>>()?)
        }
        toml::Value::Table(table) => match single_string_entry(table) {
            Some(("key", key)) => Value::Key(key.parse::<RegistrationKey>()?),
            Some(("symbol", symbol)) => Value::Symbol(symbol.to_string()),
            _ => Value::Map(
                table
                    .iter()
                    .map(|(name, value)| Ok((name.clone(), toml_to_value(value)?)))
                    .collect::<Result<_, RegistryError>>()?,
            ),
        },
    })
}

fn single_string_entry(table: &toml::Table) -> Option<(&str, &str)> {
    if table.len() != 1 {
        return None;
    }
    let (name, value) = table.iter().next()?;
    Some((name.as_str(), value.as_str()?))
}
