//! Declarative class metadata
//!
//! Maps class identifiers to the properties they expose, each property tagged
//! with the serialization groups it belongs to.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Group implicitly holding every property declared without groups
pub const DEFAULT_GROUP: &str = "Default";

/// A single serialized property
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyMetadata {
    pub name: String,
    /// Type reference: a builtin (`string`, `int`, ...), a class or `Class[]`
    #[serde(rename = "type")]
    pub type_ref: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub groups: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl PropertyMetadata {
    pub fn new(name: impl Into<String>, type_ref: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_ref: type_ref.into(),
            required: false,
            groups: None,
            description: None,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn in_groups(mut self, groups: &[&str]) -> Self {
        self.groups = Some(groups.iter().map(|g| g.to_string()).collect());
        self
    }

    /// Whether the property is serialized when viewed through `groups`.
    ///
    /// No groups means every property. Properties declared without groups
    /// belong to [`DEFAULT_GROUP`].
    pub fn is_visible_in(&self, groups: Option<&[String]>) -> bool {
        let Some(groups) = groups else {
            return true;
        };

        match &self.groups {
            Some(own) => own.iter().any(|g| groups.contains(g)),
            None => groups.iter().any(|g| g == DEFAULT_GROUP),
        }
    }
}

/// Metadata of one class
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClassMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub properties: Vec<PropertyMetadata>,
}

/// All known classes, keyed by fully qualified identifier
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModelCatalog {
    classes: IndexMap<String, ClassMetadata>,
}

impl ModelCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, class: impl Into<String>, metadata: ClassMetadata) {
        self.classes.insert(class.into(), metadata);
    }

    pub fn get(&self, class: &str) -> Option<&ClassMetadata> {
        self.classes.get(class)
    }

    pub fn contains(&self, class: &str) -> bool {
        self.classes.contains_key(class)
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}
