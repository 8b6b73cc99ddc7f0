//! Model describers
//!
//! A describer fills in the definition of the models it supports. The
//! registry asks its describers in order and the first one whose
//! [`ModelDescriber::supports`] returns true describes the model.

use serde_json::{json, Map, Value};
use tracing::warn;

use crate::catalog::ModelCatalog;
use crate::document::Definition;
use crate::error::{ApiDocError, Result};
use crate::model::{Model, ModelType};
use crate::registry::ModelRegistry;

/// Turns a model into a populated definition
pub trait ModelDescriber {
    fn supports(&self, model: &Model) -> bool;

    /// Populate `definition` for `model`.
    ///
    /// Nested models go through `registry.register()`, which queues them for
    /// description and returns the reference to embed. Calling
    /// `registry.finalize()` from here is not supported.
    fn describe(&self, model: &Model, definition: &mut Definition, registry: &mut ModelRegistry) -> Result<()>;
}

/// OpenAPI type of a builtin scalar name
pub fn openapi_scalar_type(builtin: &str) -> Option<&'static str> {
    match builtin {
        "string" => Some("string"),
        "int" | "integer" => Some("integer"),
        "float" | "number" => Some("number"),
        "bool" | "boolean" => Some("boolean"),
        "array" => Some("array"),
        "object" => Some("object"),
        _ => None,
    }
}

/// Whether `name` is a builtin scalar rather than a class
pub fn is_builtin(name: &str) -> bool {
    openapi_scalar_type(name).is_some() || matches!(name, "mixed" | "null")
}

/// Inline schema of a builtin; builtins without an OpenAPI type get `{}`
fn builtin_schema(builtin: &str) -> Value {
    match openapi_scalar_type(builtin) {
        Some(ty) => json!({ "type": ty }),
        None => json!({}),
    }
}

/// Describes builtin scalars
#[derive(Debug, Default, Clone, Copy)]
pub struct ScalarDescriber;

impl ModelDescriber for ScalarDescriber {
    fn supports(&self, model: &Model) -> bool {
        matches!(model.ty(), ModelType::Scalar(_))
    }

    fn describe(&self, model: &Model, definition: &mut Definition, _registry: &mut ModelRegistry) -> Result<()> {
        if let ModelType::Scalar(builtin) = model.ty() {
            if let Some(ty) = openapi_scalar_type(builtin) {
                definition.set("type", json!(ty));
            }
        }
        Ok(())
    }
}

/// Describes arrays with a known element type, registering the element
#[derive(Debug, Default, Clone, Copy)]
pub struct CollectionDescriber;

impl ModelDescriber for CollectionDescriber {
    fn supports(&self, model: &Model) -> bool {
        matches!(model.ty(), ModelType::Array(Some(_)))
    }

    fn describe(&self, model: &Model, definition: &mut Definition, registry: &mut ModelRegistry) -> Result<()> {
        let ModelType::Array(Some(element)) = model.ty() else {
            return Err(ApiDocError::UnsupportedType {
                type_name: model.display_string(),
            });
        };

        let element = model.with_type(element.as_ref().clone());
        definition.set("type", json!("array"));
        definition.set("items", json!({ "$ref": registry.register(element) }));
        Ok(())
    }
}

/// Describes classes known to a [`ModelCatalog`]
#[derive(Debug, Default, Clone)]
pub struct ObjectDescriber {
    catalog: ModelCatalog,
}

impl ObjectDescriber {
    pub fn new(catalog: ModelCatalog) -> Self {
        Self { catalog }
    }

    /// Builtins and arrays of builtins (`int[][]`) are inlined, anything
    /// else is registered as a nested model.
    fn property_schema(type_ref: &str, model: &Model, registry: &mut ModelRegistry) -> Result<Value> {
        let type_ref = type_ref.trim();

        let mut base = type_ref;
        while let Some(element) = base.strip_suffix("[]") {
            base = element.trim_end();
        }
        if is_builtin(base) {
            return Ok(Self::inline_schema(type_ref));
        }

        let nested = model.with_type(ModelType::parse(type_ref)?);
        Ok(json!({ "$ref": registry.register(nested) }))
    }

    fn inline_schema(type_ref: &str) -> Value {
        match type_ref.strip_suffix("[]") {
            Some(element) => json!({ "type": "array", "items": Self::inline_schema(element.trim_end()) }),
            None => builtin_schema(type_ref),
        }
    }
}

impl ModelDescriber for ObjectDescriber {
    fn supports(&self, model: &Model) -> bool {
        match model.ty() {
            ModelType::Object(class) => self.catalog.contains(class),
            _ => false,
        }
    }

    fn describe(&self, model: &Model, definition: &mut Definition, registry: &mut ModelRegistry) -> Result<()> {
        let class = match model.ty() {
            ModelType::Object(class) => class,
            _ => return Err(ApiDocError::UnknownClass(model.display_string())),
        };
        let metadata = self
            .catalog
            .get(class)
            .ok_or_else(|| ApiDocError::UnknownClass(class.clone()))?;

        let mut properties = Map::new();
        let mut required = Vec::new();
        for property in metadata
            .properties
            .iter()
            .filter(|p| p.is_visible_in(model.groups()))
        {
            let mut schema = match Self::property_schema(&property.type_ref, model, registry) {
                Ok(schema) => schema,
                Err(ApiDocError::InvalidTypeReference(type_ref)) => {
                    warn!(class = %class, property = %property.name, type_ref = %type_ref, "ignoring property with invalid type");
                    continue;
                }
                Err(err) => return Err(err),
            };
            if let (Some(description), Some(object)) = (&property.description, schema.as_object_mut()) {
                object.insert("description".to_string(), json!(description));
            }
            properties.insert(property.name.clone(), schema);
            if property.required {
                required.push(json!(property.name));
            }
        }

        definition.set("type", json!("object"));
        if let Some(description) = &metadata.description {
            definition.set("description", json!(description));
        }
        if !required.is_empty() {
            definition.set("required", Value::Array(required));
        }
        definition.set("properties", Value::Object(properties));

        Ok(())
    }
}
