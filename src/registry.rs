//! Model Registry
//!
//! Deduplicates models by identity hash, gives each one a unique definition
//! name in the output document and drives the describers until every model
//! reachable from the registered ones has a populated definition.
//!
//! ```text
//! register(model) ──► models / names ──► pending ─┐
//!        ▲                                        │ finalize()
//!        └──── describer discovers nested model ◄─┘
//! ```
//!
//! Names are reserved in the document as soon as they are assigned, so a name
//! handed out by [`ModelRegistry::register`] never changes afterwards and is
//! never reused for another model.

use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};

use tracing::{debug, info};

use crate::checksum::Checksum;
use crate::describer::ModelDescriber;
use crate::document::{definition_ref, ApiDocument, Definition};
use crate::error::{ApiDocError, Result};
use crate::model::Model;

/// The registry for one documentation build
pub struct ModelRegistry {
    /// Document receiving the definitions
    document: ApiDocument,
    /// Describers, tried in order
    describers: Vec<Box<dyn ModelDescriber>>,
    /// Every distinct model seen so far
    models: HashMap<Checksum, Model>,
    /// Definition name assigned to each model
    names: HashMap<Checksum, String>,
    /// Models registered but not yet described, in registration order
    pending: Vec<Checksum>,
    /// Models with a reserved name that still have to be registered
    alternative_names: Vec<Model>,
}

impl ModelRegistry {
    /// Create a registry writing into `document`.
    ///
    /// Each declared alternative name is reserved in the document right away,
    /// so generated names never take one. When several declarations target
    /// the same model or the same name, the last declaration decides which
    /// name the model gets; the earlier names stay reserved.
    pub fn new(
        describers: Vec<Box<dyn ModelDescriber>>,
        document: ApiDocument,
        alternative_names: Vec<(String, Model)>,
    ) -> Self {
        let mut registry = Self {
            document,
            describers,
            models: HashMap::new(),
            names: HashMap::new(),
            pending: Vec::new(),
            alternative_names: Vec::new(),
        };

        let mut reserved = HashSet::new();
        for (name, model) in alternative_names.into_iter().rev() {
            registry.document.definition_mut(&name);

            let hash = model.hash();
            if registry.names.contains_key(&hash) || !reserved.insert(name.clone()) {
                debug!(name = %name, model = %model.display_string(), "alternative name shadowed by a later declaration");
                continue;
            }

            registry.names.insert(hash, name);
            registry.alternative_names.push(model);
        }

        registry
    }

    /// Register a model and return a reference to its definition.
    ///
    /// Registering an equal model again returns the same reference and does
    /// not queue a second description.
    pub fn register(&mut self, model: Model) -> String {
        let hash = model.hash();

        let name = match self.names.get(&hash) {
            Some(name) => name.clone(),
            None => {
                let name = self.generate_model_name(&model);
                self.names.insert(hash.clone(), name.clone());
                name
            }
        };

        if let Entry::Vacant(entry) = self.models.entry(hash.clone()) {
            debug!(name = %name, model = %model.display_string(), hash = %hash, "model registered");
            entry.insert(model);
            self.pending.push(hash);
        }

        // Reserve the name
        self.document.definition_mut(&name);

        definition_ref(&name)
    }

    /// Describe every pending model, then the alternative names, until no
    /// new model is discovered.
    ///
    /// Fails with [`ApiDocError::UnsupportedType`] as soon as a model has no
    /// supporting describer.
    pub fn finalize(&mut self) -> Result<()> {
        let describers = std::mem::take(&mut self.describers);
        let result = self.describe_to_fixed_point(&describers);
        self.describers = describers;
        result
    }

    fn describe_to_fixed_point(&mut self, describers: &[Box<dyn ModelDescriber>]) -> Result<()> {
        let mut described = 0usize;

        loop {
            while !self.pending.is_empty() {
                let wave = std::mem::take(&mut self.pending);
                for hash in &wave {
                    self.describe_model(hash, describers)?;
                    described += 1;
                }
            }

            if self.alternative_names.is_empty() {
                break;
            }

            for model in std::mem::take(&mut self.alternative_names) {
                self.register(model);
            }
        }

        info!(
            described,
            definitions = self.document.definitions().len(),
            "model definitions complete"
        );
        Ok(())
    }

    fn describe_model(&mut self, hash: &Checksum, describers: &[Box<dyn ModelDescriber>]) -> Result<()> {
        // register() stores the model and its name before queueing the hash
        let model = self.models[hash].clone();
        let name = self.names[hash].clone();

        let describer = describers
            .iter()
            .find(|describer| describer.supports(&model))
            .ok_or_else(|| ApiDocError::UnsupportedType {
                type_name: model.display_string(),
            })?;

        debug!(name = %name, model = %model.display_string(), "describing model");

        // Nested registrations during describe() only touch the queue, the
        // slot itself stays reserved in the document.
        let mut definition = Definition::new();
        describer.describe(&model, &mut definition, self)?;
        self.document.definition_mut(&name).merge(definition);

        Ok(())
    }

    fn generate_model_name(&self, model: &Model) -> String {
        let base = model.short_name();
        let mut name = base.clone();
        let mut i = 1;
        while self.document.has_definition(&name) {
            i += 1;
            name = format!("{}{}", base, i);
        }

        if i > 1 {
            debug!(base = %base, name = %name, "definition name already taken");
        }

        name
    }

    /// Definition name assigned to `model`, if any
    pub fn name_of(&self, model: &Model) -> Option<&str> {
        self.names.get(&model.hash()).map(String::as_str)
    }

    /// Number of distinct models registered so far
    pub fn model_count(&self) -> usize {
        self.models.len()
    }

    /// Number of models waiting for a describer
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub fn document(&self) -> &ApiDocument {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut ApiDocument {
        &mut self.document
    }

    /// Tear the registry down and hand back the built document
    pub fn into_document(self) -> ApiDocument {
        self.document
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ModelType;
    use serde_json::json;

    /// Supports objects; describing `Order` registers `LineItem[]`.
    struct OrderDescriber;

    impl ModelDescriber for OrderDescriber {
        fn supports(&self, model: &Model) -> bool {
            matches!(model.ty(), ModelType::Object(_))
        }

        fn describe(&self, model: &Model, definition: &mut Definition, registry: &mut ModelRegistry) -> Result<()> {
            definition.set("type", json!("object"));
            if model.short_name() == "Order" {
                let items = model.with_type(ModelType::array_of(ModelType::object("LineItem")));
                definition.set("properties", json!({ "items": { "$ref": registry.register(items) } }));
            }
            Ok(())
        }
    }

    /// Supports arrays of known element type
    struct ArrayDescriber;

    impl ModelDescriber for ArrayDescriber {
        fn supports(&self, model: &Model) -> bool {
            matches!(model.ty(), ModelType::Array(Some(_)))
        }

        fn describe(&self, model: &Model, definition: &mut Definition, registry: &mut ModelRegistry) -> Result<()> {
            if let ModelType::Array(Some(element)) = model.ty() {
                let element = model.with_type(element.as_ref().clone());
                definition.set("type", json!("array"));
                definition.set("items", json!({ "$ref": registry.register(element) }));
            }
            Ok(())
        }
    }

    fn registry(alternative_names: Vec<(String, Model)>) -> ModelRegistry {
        ModelRegistry::new(
            vec![Box::new(OrderDescriber), Box::new(ArrayDescriber)],
            ApiDocument::default(),
            alternative_names,
        )
    }

    #[test]
    fn test_register_is_idempotent() {
        let mut registry = registry(vec![]);

        let first = registry.register(Model::object("App\\User", None));
        let second = registry.register(Model::object("App\\User", None));

        assert_eq!(first, "#/definitions/User");
        assert_eq!(first, second);
        assert_eq!(registry.model_count(), 1);
        assert_eq!(registry.pending_count(), 1);
        assert_eq!(registry.document().definitions().len(), 1);
    }

    #[test]
    fn test_register_reserves_name_immediately() {
        let mut registry = registry(vec![]);
        registry.register(Model::object("App\\User", None));

        let slot = registry.document().definition("User").unwrap();
        assert!(slot.is_empty());
    }

    #[test]
    fn test_name_collision_suffixes() {
        let mut registry = registry(vec![]);

        let a = registry.register(Model::object("Shop\\Item", None));
        let b = registry.register(Model::object("Blog\\Item", None));
        let c = registry.register(Model::object("Item", Some(vec!["read".into()])));

        assert_eq!(a, "#/definitions/Item");
        assert_eq!(b, "#/definitions/Item2");
        assert_eq!(c, "#/definitions/Item3");
    }

    #[test]
    fn test_alternative_name_reserved_up_front() {
        let registry = registry(vec![("PublicUser".into(), Model::object("App\\User", Some(vec!["public".into()])))]);

        assert!(registry.document().has_definition("PublicUser"));
        assert_eq!(registry.model_count(), 0);
    }

    #[test]
    fn test_generated_name_skips_alternative_names() {
        let mut registry = registry(vec![("User".into(), Model::object("App\\User", Some(vec!["public".into()])))]);

        let reference = registry.register(Model::object("App\\User", None));
        assert_eq!(reference, "#/definitions/User2");

        let aliased = registry.register(Model::object("App\\User", Some(vec!["public".into()])));
        assert_eq!(aliased, "#/definitions/User");
    }

    #[test]
    fn test_last_alternative_name_wins() {
        let model = Model::object("App\\User", None);
        let registry = registry(vec![
            ("FirstUser".into(), model.clone()),
            ("LastUser".into(), model.clone()),
        ]);

        assert_eq!(registry.name_of(&model), Some("LastUser"));
        assert!(registry.document().has_definition("FirstUser"));
    }

    #[test]
    fn test_shadowed_alternative_name_stays_reserved() {
        let mut registry = registry(vec![
            ("User".into(), Model::object("App\\User", None)),
            ("Account".into(), Model::object("App\\User", None)),
        ]);

        assert_eq!(registry.name_of(&Model::object("App\\User", None)), Some("Account"));
        assert_eq!(registry.register(Model::object("Other\\User", None)), "#/definitions/User2");

        registry.finalize().unwrap();
        let names: Vec<_> = registry.document().definition_names().collect();
        assert_eq!(names, vec!["Account", "User", "User2"]);
        assert_eq!(registry.model_count(), 2);
    }

    #[test]
    fn test_finalize_registers_unreferenced_alternative_names() {
        let mut registry = registry(vec![("Account".into(), Model::object("App\\User", None))]);

        registry.finalize().unwrap();

        let account = registry.document().definition("Account").unwrap();
        assert_eq!(account.get("type"), Some(&json!("object")));
        assert_eq!(registry.pending_count(), 0);
    }

    #[test]
    fn test_finalize_follows_nested_models() {
        let mut registry = registry(vec![]);
        registry.register(Model::object("Shop\\Order", None));
        registry.finalize().unwrap();

        let names: Vec<_> = registry.document().definition_names().collect();
        assert_eq!(names, vec!["Order", "LineItem[]", "LineItem"]);

        let order = registry.document().definition("Order").unwrap();
        assert_eq!(
            order.get("properties"),
            Some(&json!({ "items": { "$ref": "#/definitions/LineItem[]" } }))
        );
        let items = registry.document().definition("LineItem[]").unwrap();
        assert_eq!(items.get("items"), Some(&json!({ "$ref": "#/definitions/LineItem" })));
        assert_eq!(registry.pending_count(), 0);
    }

    #[test]
    fn test_first_supporting_describer_wins() {
        struct Tagging(&'static str);

        impl ModelDescriber for Tagging {
            fn supports(&self, _model: &Model) -> bool {
                true
            }

            fn describe(&self, _model: &Model, definition: &mut Definition, _registry: &mut ModelRegistry) -> Result<()> {
                definition.set("x-describer", json!(self.0));
                Ok(())
            }
        }

        let mut registry = ModelRegistry::new(
            vec![Box::new(Tagging("first")), Box::new(Tagging("second"))],
            ApiDocument::default(),
            vec![],
        );
        registry.register(Model::object("User", None));
        registry.finalize().unwrap();

        let user = registry.document().definition("User").unwrap();
        assert_eq!(user.get("x-describer"), Some(&json!("first")));
    }

    #[test]
    fn test_unsupported_type_fails() {
        let mut registry = registry(vec![]);
        registry.register(Model::new(ModelType::Array(None), None, Default::default()));

        let err = registry.finalize().unwrap_err();
        assert!(matches!(err, ApiDocError::UnsupportedType { ref type_name } if type_name == "mixed[]"));
        assert!(err.to_string().contains("\"mixed[]\""));
    }

    #[test]
    fn test_finalize_twice_is_noop() {
        let mut registry = registry(vec![]);
        registry.register(Model::object("Shop\\Order", None));
        registry.finalize().unwrap();
        let before = registry.document().clone();

        registry.finalize().unwrap();
        assert_eq!(registry.document(), &before);
    }
}
