//! Model descriptors
//!
//! A [`Model`] describes *what* to document: a [`ModelType`], the
//! serialization groups it is viewed through and free-form describer options.
//! Its identity is a content hash, so two models built independently from the
//! same inputs always land on the same definition.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::checksum::Checksum;
use crate::error::{ApiDocError, Result};

static CLASS_IDENTIFIER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*((\\|::)[A-Za-z_][A-Za-z0-9_]*)*$")
        .expect("class identifier pattern is valid")
});

/// Semantic type of a model
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelType {
    /// Builtin scalar such as `string` or `int`
    Scalar(String),
    /// Class, identified by its fully qualified name
    Object(String),
    /// Collection; `None` when the element type is unknown
    Array(Option<Box<ModelType>>),
}

impl ModelType {
    pub fn scalar(name: impl Into<String>) -> Self {
        ModelType::Scalar(name.into())
    }

    pub fn object(class: impl Into<String>) -> Self {
        ModelType::Object(class.into())
    }

    pub fn array_of(element: ModelType) -> Self {
        ModelType::Array(Some(Box::new(element)))
    }

    /// Parse a type reference as written in route and property declarations.
    ///
    /// Each trailing `[]` wraps the remainder in an array, everything else is
    /// a class identifier: `App\Entity\Item[]` is an array of `App\Entity\Item`.
    pub fn parse(type_ref: &str) -> Result<Self> {
        let trimmed = type_ref.trim();
        if let Some(element) = trimmed.strip_suffix("[]") {
            return Ok(Self::array_of(Self::parse(element)?));
        }

        let class = trimmed.strip_prefix('\\').unwrap_or(trimmed);
        if !CLASS_IDENTIFIER.is_match(class) {
            return Err(ApiDocError::InvalidTypeReference(type_ref.to_string()));
        }

        Ok(Self::object(class))
    }

    /// Base name used when generating definition names.
    pub fn short_name(&self) -> String {
        match self {
            ModelType::Array(Some(element)) => format!("{}[]", element.short_name()),
            ModelType::Array(None) => "array".to_string(),
            ModelType::Object(class) => class
                .rsplit(|c: char| c == '\\' || c == ':')
                .next()
                .unwrap_or(class)
                .to_string(),
            ModelType::Scalar(name) => name.clone(),
        }
    }

    /// Fully qualified rendering used in diagnostics.
    pub fn display_string(&self) -> String {
        match self {
            ModelType::Object(class) => class.clone(),
            ModelType::Array(Some(element)) => format!("{}[]", element.display_string()),
            ModelType::Array(None) => "mixed[]".to_string(),
            ModelType::Scalar(name) => name.clone(),
        }
    }
}

impl fmt::Display for ModelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_string())
    }
}

/// A documentable type viewed through a set of serialization groups
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Model {
    #[serde(rename = "type")]
    ty: ModelType,
    #[serde(default)]
    groups: Option<Vec<String>>,
    #[serde(default)]
    options: Map<String, Value>,
}

impl Model {
    /// Create a model; duplicate groups are dropped, keeping first occurrences.
    pub fn new(ty: ModelType, groups: Option<Vec<String>>, options: Map<String, Value>) -> Self {
        let groups = groups.map(|groups| {
            let mut seen = Vec::with_capacity(groups.len());
            for group in groups {
                if !seen.contains(&group) {
                    seen.push(group);
                }
            }
            seen
        });

        Self { ty, groups, options }
    }

    /// Object model without options
    pub fn object(class: impl Into<String>, groups: Option<Vec<String>>) -> Self {
        Self::new(ModelType::object(class), groups, Map::new())
    }

    pub fn ty(&self) -> &ModelType {
        &self.ty
    }

    pub fn groups(&self) -> Option<&[String]> {
        self.groups.as_deref()
    }

    pub fn options(&self) -> &Map<String, Value> {
        &self.options
    }

    /// Same groups and options, different type. Used for nested models.
    pub fn with_type(&self, ty: ModelType) -> Self {
        Self {
            ty,
            groups: self.groups.clone(),
            options: self.options.clone(),
        }
    }

    /// Identity hash over type, groups and options
    pub fn hash(&self) -> Checksum {
        Checksum::from_json(&json!({
            "type": self.ty,
            "groups": self.groups,
            "options": self.options,
        }))
    }

    pub fn short_name(&self) -> String {
        self.ty.short_name()
    }

    pub fn display_string(&self) -> String {
        self.ty.display_string()
    }
}
