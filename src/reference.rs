//! Model references found while walking routes
//!
//! A reference is the raw declaration (`type`, `groups`, `options`) before
//! it is parsed into a [`Model`].

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::warn;

use crate::error::Result;
use crate::model::{Model, ModelType};
use crate::registry::ModelRegistry;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelReference {
    #[serde(rename = "type")]
    pub type_ref: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub groups: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub options: Map<String, Value>,
}

impl ModelReference {
    pub fn new(type_ref: impl Into<String>) -> Self {
        Self {
            type_ref: type_ref.into(),
            groups: None,
            options: Map::new(),
        }
    }

    pub fn with_groups(mut self, groups: &[&str]) -> Self {
        self.groups = Some(groups.iter().map(|g| g.to_string()).collect());
        self
    }

    /// Groups of the reference in the context of its parent.
    ///
    /// Without own groups the parent's are inherited, otherwise the own
    /// groups are appended to the parent's.
    pub fn resolve_groups(&self, parent_groups: Option<&[String]>) -> Option<Vec<String>> {
        match &self.groups {
            None => parent_groups.map(<[String]>::to_vec),
            Some(own) => {
                let mut groups = parent_groups.map(<[String]>::to_vec).unwrap_or_default();
                groups.extend(own.iter().cloned());
                Some(groups)
            }
        }
    }

    pub fn to_model(&self, parent_groups: Option<&[String]>) -> Result<Model> {
        Ok(Model::new(
            ModelType::parse(&self.type_ref)?,
            self.resolve_groups(parent_groups),
            self.options.clone(),
        ))
    }
}

/// Register a reference, skipping it with a warning when it is malformed.
pub fn register_reference(
    registry: &mut ModelRegistry,
    reference: &ModelReference,
    parent_groups: Option<&[String]>,
    location: &str,
) -> Option<String> {
    match reference.to_model(parent_groups) {
        Ok(model) => Some(registry.register(model)),
        Err(err) => {
            warn!(location, error = %err, "ignoring invalid model reference");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn groups(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_inherits_parent_groups() {
        let reference = ModelReference::new("App\\User");
        let parent = groups(&["list"]);
        assert_eq!(reference.resolve_groups(Some(parent.as_slice())), Some(groups(&["list"])));
        assert_eq!(reference.resolve_groups(None), None);
    }

    #[test]
    fn test_appends_own_groups() {
        let reference = ModelReference::new("App\\User").with_groups(&["detail"]);
        let parent = groups(&["list"]);
        assert_eq!(
            reference.resolve_groups(Some(parent.as_slice())),
            Some(groups(&["list", "detail"]))
        );
        assert_eq!(reference.resolve_groups(None), Some(groups(&["detail"])));
    }

    #[test]
    fn test_to_model_parses_arrays() {
        let model = ModelReference::new("App\\User[]").to_model(None).unwrap();
        assert_eq!(
            model.ty(),
            &ModelType::array_of(ModelType::object("App\\User"))
        );
    }

    #[test]
    fn test_to_model_rejects_invalid_type() {
        assert!(ModelReference::new("not a type").to_model(None).is_err());
    }
}
