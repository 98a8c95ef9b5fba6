//! Registration keys
//!
//! A [`RegistrationKey`] identifies a registered configuration by name,
//! namespace and tag set. Keys have a canonical string form that other tools
//! parse, so the format below is a contract:
//!
//! ```text
//! name=<name>--tags=[<sorted, comma-separated tags>]--namespace=<namespace>
//! ```

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeSet;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use crate::configuration::{Value, Variant};
use crate::registry::error::RegistryError;

/// Namespace assigned to keys that do not specify one
pub const DEFAULT_NAMESPACE: &str = "default";

const ATTRIBUTE_SEPARATOR: &str = "--";
const NAME_PREFIX: &str = "name=";
const TAGS_PREFIX: &str = "tags=[";
const NAMESPACE_PREFIX: &str = "namespace=";
const TAG_SEPARATOR: &str = ", ";

/// Tag set of a key, kept sorted
pub type Tags = BTreeSet<String>;

/// Compound key used for registration
#[derive(Clone)]
pub struct RegistrationKey {
    name: String,
    namespace: String,
    tags: Tags,
    description: Option<String>,
    metadata: Option<String>,
}

/// Tabular projection of a key (name, sorted tags, namespace, description, metadata)
pub type KeyRecord = (String, Vec<String>, String, Option<String>, Option<String>);

impl RegistrationKey {
    /// Create a key with the given name and namespace and no tags
    pub fn new(name: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
            tags: Tags::new(),
            description: None,
            metadata: None,
        }
    }

    /// Create a key in the default namespace
    pub fn in_default_namespace(name: impl Into<String>) -> Self {
        Self::new(name, DEFAULT_NAMESPACE)
    }

    /// Replace the tag set
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_metadata(mut self, metadata: impl Into<String>) -> Self {
        self.metadata = Some(metadata.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn tags(&self) -> &Tags {
        &self.tags
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn metadata(&self) -> Option<&str> {
        self.metadata.as_deref()
    }

    /// Attach post-hoc metadata (e.g. a validation failure reason)
    ///
    /// Metadata does not take part in equality or hashing.
    pub fn set_metadata(&mut self, metadata: impl Into<String>) {
        self.metadata = Some(metadata.into());
    }

    /// Check that the key survives a round trip through its string form
    ///
    /// Name, namespace and every tag must be non-empty and free of the
    /// separators used by the canonical format.
    pub fn validate(&self) -> Result<(), RegistryError> {
        let invalid = |reason: String| RegistryError::InvalidKey {
            input: self.to_string(),
            reason,
        };

        if !is_taggable_str(&self.name) {
            return Err(invalid(format!("malformed name {:?}", self.name)));
        }
        if !is_taggable_str(&self.namespace) {
            return Err(invalid(format!("malformed namespace {:?}", self.namespace)));
        }
        if let Some(tag) = self.tags.iter().find(|tag| !is_taggable_str(tag)) {
            return Err(invalid(format!("malformed tag {:?}", tag)));
        }
        Ok(())
    }

    /// Normalize any supported key shape into a key
    pub fn parse(reference: KeyRef<'_>) -> Result<Self, RegistryError> {
        match reference {
            KeyRef::Key(key) => Ok(key.clone()),
            KeyRef::Str(string_format) => string_format.parse(),
            KeyRef::Parts {
                name,
                namespace,
                tags,
            } => {
                let name = name.ok_or(RegistryError::MissingKeyName)?;
                let key = Self::new(name, namespace.unwrap_or(DEFAULT_NAMESPACE))
                    .with_tags(tags.iter().copied());
                key.validate()?;
                Ok(key)
            }
        }
    }

    /// Derive a new key from a variant binding
    ///
    /// Every bound parameter contributes tags:
    /// - a key value inlines its tags as `<param>.<tag>` (or `<param>=<name>`
    ///   when the key carries no tags)
    /// - a taggable scalar becomes `<param>=<value>`
    /// - anything else becomes `<param>=default-value` (index 0) or
    ///   `<param>=variant-<index>`
    ///
    /// A synthesized tag that already exists on this key, or that two bound
    /// parameters would both produce, is a [`RegistryError::TagConflict`].
    pub fn from_variant(&self, variant: &Variant) -> Result<Self, RegistryError> {
        let mut synthesized: Vec<(String, &str)> = Vec::new();

        for (param_name, value) in variant.values() {
            match value {
                Value::Key(child) if child.tags.is_empty() => {
                    synthesized.push((format!("{}={}", param_name, child.name), param_name));
                }
                Value::Key(child) => {
                    for child_tag in &child.tags {
                        synthesized.push((format!("{}.{}", param_name, child_tag), param_name));
                    }
                }
                other => {
                    let tag = match other.tag_repr() {
                        Some(repr) => format!("{}={}", param_name, repr),
                        None => match variant.index_of(param_name) {
                            0 => format!("{}=default-value", param_name),
                            index => format!("{}=variant-{}", param_name, index),
                        },
                    };
                    synthesized.push((tag, param_name));
                }
            }
        }

        let mut tags = self.tags.clone();
        let mut provenance: Vec<(&str, &str)> = Vec::with_capacity(synthesized.len());
        for (tag, param_name) in &synthesized {
            if self.tags.contains(tag) {
                return Err(RegistryError::TagConflict {
                    key: self.to_string(),
                    tag: tag.clone(),
                    reason: format!("parameter '{}' collides with an existing tag", param_name),
                });
            }
            if let Some((_, other)) = provenance.iter().find(|(t, _)| *t == tag.as_str()) {
                if *other != *param_name {
                    return Err(RegistryError::TagConflict {
                        key: self.to_string(),
                        tag: tag.clone(),
                        reason: format!(
                            "parameters '{}' and '{}' both produce it",
                            other, param_name
                        ),
                    });
                }
            }
            provenance.push((tag.as_str(), param_name));
            tags.insert(tag.clone());
        }

        let derived = Self {
            name: self.name.clone(),
            namespace: self.namespace.clone(),
            tags,
            description: self.description.clone(),
            metadata: None,
        };
        derived.validate()?;
        Ok(derived)
    }

    /// Pure read view for tabular display and export
    pub fn to_record(&self) -> KeyRecord {
        (
            self.name.clone(),
            self.tags.iter().cloned().collect(),
            self.namespace.clone(),
            self.description.clone(),
            self.metadata.clone(),
        )
    }
}

/// Any of the input shapes accepted by [`RegistrationKey::parse`]
#[derive(Debug, Clone, Copy)]
pub enum KeyRef<'a> {
    Key(&'a RegistrationKey),
    Str(&'a str),
    Parts {
        name: Option<&'a str>,
        namespace: Option<&'a str>,
        tags: &'a [&'a str],
    },
}

impl<'a> From<&'a RegistrationKey> for KeyRef<'a> {
    fn from(key: &'a RegistrationKey) -> Self {
        KeyRef::Key(key)
    }
}

impl<'a> From<&'a str> for KeyRef<'a> {
    fn from(string_format: &'a str) -> Self {
        KeyRef::Str(string_format)
    }
}

impl fmt::Display for RegistrationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tags: Vec<&str> = self.tags.iter().map(String::as_str).collect();
        write!(
            f,
            "{}{}{}{}{}]{}{}{}",
            NAME_PREFIX,
            self.name,
            ATTRIBUTE_SEPARATOR,
            TAGS_PREFIX,
            tags.join(TAG_SEPARATOR),
            ATTRIBUTE_SEPARATOR,
            NAMESPACE_PREFIX,
            self.namespace
        )
    }
}

impl fmt::Debug for RegistrationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl FromStr for RegistrationKey {
    type Err = RegistryError;

    fn from_str(string_format: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| RegistryError::InvalidKey {
            input: string_format.to_string(),
            reason: reason.to_string(),
        };

        let rest = string_format
            .strip_prefix(NAME_PREFIX)
            .ok_or_else(|| invalid("missing 'name=' attribute"))?;

        let namespace_marker = format!("{}{}", ATTRIBUTE_SEPARATOR, NAMESPACE_PREFIX);
        let namespace_pos = rest
            .rfind(&namespace_marker)
            .ok_or_else(|| invalid("missing 'namespace=' attribute"))?;
        let namespace = &rest[namespace_pos + namespace_marker.len()..];
        let head = &rest[..namespace_pos];

        let tags_marker = format!("{}{}", ATTRIBUTE_SEPARATOR, TAGS_PREFIX);
        let (name, tags) = match head.find(&tags_marker) {
            Some(tags_pos) => {
                let tag_list = head[tags_pos + tags_marker.len()..]
                    .strip_suffix(']')
                    .ok_or_else(|| invalid("unterminated tag list"))?;
                let tags: Tags = if tag_list.is_empty() {
                    Tags::new()
                } else {
                    tag_list.split(TAG_SEPARATOR).map(str::to_string).collect()
                };
                (&head[..tags_pos], tags)
            }
            None => (head, Tags::new()),
        };

        if name.is_empty() {
            return Err(invalid("empty name"));
        }
        if namespace.is_empty() {
            return Err(invalid("empty namespace"));
        }

        let key = Self::new(name, namespace).with_tags(tags);
        key.validate().map_err(|_| invalid("malformed name, namespace or tag"))?;
        Ok(key)
    }
}

impl PartialEq for RegistrationKey {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.namespace == other.namespace && self.tags == other.tags
    }
}

impl Eq for RegistrationKey {}

impl Hash for RegistrationKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.to_string().hash(state);
    }
}

impl Serialize for RegistrationKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for RegistrationKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let string_format = String::deserialize(deserializer)?;
        string_format.parse().map_err(serde::de::Error::custom)
    }
}

/// True if a string can be embedded in a tag without breaking the key format
pub(crate) fn is_taggable_str(value: &str) -> bool {
    !value.is_empty()
        && !value.contains(TAG_SEPARATOR)
        && !value.contains(ATTRIBUTE_SEPARATOR)
        && !value.contains('[')
        && !value.contains(']')
}
