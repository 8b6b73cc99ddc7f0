//! Output document
//!
//! A Swagger-style document with a single `definitions` namespace. Definition
//! names are the only collision domain the registry cares about; reserving a
//! name means creating an empty slot for it.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::config::OutputFormat;
use crate::error::Result;

/// Prefix of every definition reference
pub const DEFINITIONS_PREFIX: &str = "#/definitions/";

/// Reference string pointing at the definition `name`
pub fn definition_ref(name: &str) -> String {
    format!("{}{}", DEFINITIONS_PREFIX, name)
}

/// HTTP methods an operation can be declared for, in output order
pub const OPERATION_METHODS: [&str; 7] = ["get", "put", "post", "delete", "options", "head", "patch"];

/// A named schema slot
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Definition(Map<String, Value>);

impl Definition {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether nothing has been written to the slot yet
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn set(&mut self, key: impl Into<String>, value: Value) {
        self.0.insert(key.into(), value);
    }

    /// Copy every key of `other` into this slot, overwriting existing keys
    pub fn merge(&mut self, other: Definition) {
        self.0.extend(other.0);
    }
}

/// Document metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Info {
    pub title: String,
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Default for Info {
    fn default() -> Self {
        Self {
            title: "API".to_string(),
            version: "1.0.0".to_string(),
            description: None,
        }
    }
}

/// A documented response
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Response {
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<Value>,
}

/// A single method on a path
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operation_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default)]
    pub responses: IndexMap<String, Response>,
}

/// The whole document being built
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiDocument {
    pub swagger: String,
    pub info: Info,
    #[serde(default)]
    pub paths: IndexMap<String, IndexMap<String, Operation>>,
    #[serde(default)]
    definitions: IndexMap<String, Definition>,
}

impl Default for ApiDocument {
    fn default() -> Self {
        Self::new(Info::default())
    }
}

impl ApiDocument {
    pub fn new(info: Info) -> Self {
        Self {
            swagger: "2.0".to_string(),
            info,
            paths: IndexMap::new(),
            definitions: IndexMap::new(),
        }
    }

    /// Get the definition slot for `name`, reserving it if it does not exist
    pub fn definition_mut(&mut self, name: &str) -> &mut Definition {
        self.definitions.entry(name.to_string()).or_default()
    }

    pub fn definition(&self, name: &str) -> Option<&Definition> {
        self.definitions.get(name)
    }

    pub fn has_definition(&self, name: &str) -> bool {
        self.definitions.contains_key(name)
    }

    /// Reserved definition names, in reservation order
    pub fn definition_names(&self) -> impl Iterator<Item = &str> {
        self.definitions.keys().map(String::as_str)
    }

    pub fn definitions(&self) -> &IndexMap<String, Definition> {
        &self.definitions
    }

    /// Get the operation for `method` on `path`, creating both if needed
    pub fn operation_mut(&mut self, path: &str, method: &str) -> &mut Operation {
        self.paths
            .entry(path.to_string())
            .or_default()
            .entry(method.to_string())
            .or_default()
    }

    /// Serialize the document
    pub fn to_json(&self, format: OutputFormat) -> Result<String> {
        let json = match format {
            OutputFormat::Pretty => serde_json::to_string_pretty(self)?,
            OutputFormat::Compact => serde_json::to_string(self)?,
        };
        Ok(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_definition_mut_reserves_once() {
        let mut doc = ApiDocument::default();
        doc.definition_mut("User");
        doc.definition_mut("User").set("type", json!("object"));

        assert_eq!(doc.definitions().len(), 1);
        assert_eq!(doc.definition("User").unwrap().get("type"), Some(&json!("object")));
    }

    #[test]
    fn test_definition_names_keep_reservation_order() {
        let mut doc = ApiDocument::default();
        for name in ["Zeta", "Alpha", "Mid"] {
            doc.definition_mut(name);
        }
        let names: Vec<_> = doc.definition_names().collect();
        assert_eq!(names, vec!["Zeta", "Alpha", "Mid"]);
    }

    #[test]
    fn test_merge_overwrites_keys() {
        let mut slot = Definition::new();
        slot.set("type", json!("object"));
        slot.set("description", json!("old"));

        let mut other = Definition::new();
        other.set("description", json!("new"));
        slot.merge(other);

        assert_eq!(slot.get("type"), Some(&json!("object")));
        assert_eq!(slot.get("description"), Some(&json!("new")));
    }

    #[test]
    fn test_to_json_shape() {
        let mut doc = ApiDocument::default();
        doc.definition_mut("Empty");
        doc.operation_mut("/users", "get").responses.insert(
            "200".into(),
            Response {
                description: "ok".into(),
                schema: Some(json!({"$ref": definition_ref("Empty")})),
            },
        );

        let value: Value = serde_json::from_str(&doc.to_json(OutputFormat::Compact).unwrap()).unwrap();
        assert_eq!(value["swagger"], "2.0");
        assert_eq!(value["definitions"]["Empty"], json!({}));
        assert_eq!(
            value["paths"]["/users"]["get"]["responses"]["200"]["schema"]["$ref"],
            "#/definitions/Empty"
        );
    }
}
