//! Documentation build
//!
//! Wires the pieces together for one build: config, describers, route walk,
//! finalize.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::catalog::ModelCatalog;
use crate::config::ApiDocConfig;
use crate::describer::{CollectionDescriber, ModelDescriber, ObjectDescriber, ScalarDescriber};
use crate::document::ApiDocument;
use crate::error::Result;
use crate::registry::ModelRegistry;
use crate::routes::{describe_routes, Route};

/// Everything a build documents: known classes and declared routes
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApiSource {
    #[serde(default)]
    pub classes: ModelCatalog,
    #[serde(default)]
    pub routes: Vec<Route>,
}

impl ApiSource {
    /// Load from a `.toml` file, or JSON for any other extension
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;

        let source = if path.extension().is_some_and(|ext| ext == "toml") {
            toml::from_str(&content)?
        } else {
            serde_json::from_str(&content)?
        };

        Ok(source)
    }
}

/// Describers used by default, in dispatch order
pub fn default_describers(catalog: ModelCatalog) -> Vec<Box<dyn ModelDescriber>> {
    vec![
        Box::new(ObjectDescriber::new(catalog)),
        Box::new(CollectionDescriber),
        Box::new(ScalarDescriber),
    ]
}

/// Build the document for `source`
pub fn build_document(config: &ApiDocConfig, source: ApiSource) -> Result<ApiDocument> {
    let ApiSource { classes, routes } = source;
    info!(classes = classes.len(), routes = routes.len(), "building api documentation");

    let mut registry = ModelRegistry::new(
        default_describers(classes),
        ApiDocument::new(config.document.info()),
        config.alternative_name_models(),
    );

    describe_routes(&mut registry, &routes);
    registry.finalize()?;

    Ok(registry.into_document())
}
