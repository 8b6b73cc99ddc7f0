//! Route walker
//!
//! Turns declared routes into document operations and registers the models
//! their responses refer to.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;

use crate::document::{Response, OPERATION_METHODS};
use crate::reference::{register_reference, ModelReference};
use crate::registry::ModelRegistry;

const FORMAT_SUFFIX: &str = ".{_format}";

/// A documented route
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Route {
    pub path: String,
    /// HTTP methods; empty means every method
    #[serde(default)]
    pub methods: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operation_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    /// Serialization groups inherited by the response models
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub groups: Option<Vec<String>>,
    /// Responses keyed by status code
    #[serde(default)]
    pub responses: IndexMap<String, RouteResponse>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RouteResponse {
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<ModelReference>,
}

impl Route {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    pub fn with_methods(mut self, methods: &[&str]) -> Self {
        self.methods = methods.iter().map(|m| m.to_string()).collect();
        self
    }

    pub fn with_response(mut self, status: &str, description: &str, model: Option<ModelReference>) -> Self {
        self.responses.insert(
            status.to_string(),
            RouteResponse {
                description: description.to_string(),
                model,
            },
        );
        self
    }

    /// Lower-cased methods this route documents. Unknown methods are dropped.
    pub fn operation_methods(&self) -> Vec<&'static str> {
        if self.methods.is_empty() {
            return OPERATION_METHODS.to_vec();
        }

        let mut methods = Vec::new();
        for method in &self.methods {
            let lower = method.to_lowercase();
            match OPERATION_METHODS.iter().find(|m| **m == lower) {
                Some(known) if !methods.contains(known) => methods.push(*known),
                Some(_) => {}
                None => debug!(path = %self.path, method = %method, "skipping unsupported method"),
            }
        }
        methods
    }
}

/// Path as documented: a trailing `.{_format}` placeholder is dropped
pub fn normalize_path(path: &str) -> &str {
    path.strip_suffix(FORMAT_SUFFIX).unwrap_or(path)
}

/// Describe `routes` into the registry's document.
///
/// Routes are walked sorted by path so that definition names come out the
/// same whatever order the routes were declared in.
pub fn describe_routes(registry: &mut ModelRegistry, routes: &[Route]) {
    let mut sorted: Vec<&Route> = routes.iter().collect();
    sorted.sort_by(|a, b| a.path.cmp(&b.path));

    for route in sorted {
        let path = normalize_path(&route.path);
        let methods = route.operation_methods();
        let single_method = methods.len() == 1;

        for method in methods {
            let mut responses = IndexMap::new();
            for (status, response) in &route.responses {
                let location = format!("{} {} {}", method.to_uppercase(), path, status);
                let schema = response
                    .model
                    .as_ref()
                    .and_then(|model| register_reference(registry, model, route.groups.as_deref(), &location))
                    .map(|reference| json!({ "$ref": reference }));

                responses.insert(
                    status.clone(),
                    Response {
                        description: response.description.clone(),
                        schema,
                    },
                );
            }

            let operation = registry.document_mut().operation_mut(path, method);
            if let Some(id) = &route.operation_id {
                operation.operation_id = Some(if single_method {
                    id.clone()
                } else {
                    format!("{}_{}", id, method)
                });
            }
            if route.summary.is_some() {
                operation.summary = route.summary.clone();
            }
            operation.responses.extend(responses);
        }
    }
}
