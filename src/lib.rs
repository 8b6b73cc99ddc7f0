//! API Documentation Models
//!
//! Builds the `definitions` of a Swagger document from the models that routes
//! refer to.
//!
//! ## Features
//!
//! - **Deduplication**: Models are identified by a SHA256 content hash of type, groups and options
//! - **Stable Naming**: Each model gets a unique definition name (`Item`, `Item2`, ...) that never changes
//! - **Alternative Names**: Names can be reserved up front for specific models
//! - **Pluggable Describers**: The first describer supporting a model fills in its definition
//! - **Nested Discovery**: Describers register nested models, which are described in turn
//!
//! ## Architecture
//!
//! ```text
//! routes ──► ModelReference ──► Model ──► ModelRegistry::register ──► "#/definitions/Name"
//!                                               │
//!                                   finalize()  ▼
//!                       ObjectDescriber / CollectionDescriber / ScalarDescriber
//!                                               │
//!                                               ▼
//!                                     ApiDocument.definitions
//! ```

pub mod build;
pub mod catalog;
pub mod checksum;
pub mod config;
pub mod describer;
pub mod document;
pub mod error;
pub mod model;
pub mod reference;
pub mod registry;
pub mod routes;

pub use build::{build_document, default_describers, ApiSource};
pub use catalog::{ClassMetadata, ModelCatalog, PropertyMetadata};
pub use checksum::Checksum;
pub use config::{AlternativeName, ApiDocConfig, OutputFormat};
pub use describer::{CollectionDescriber, ModelDescriber, ObjectDescriber, ScalarDescriber};
pub use document::{definition_ref, ApiDocument, Definition, Info};
pub use error::{ApiDocError, Result};
pub use model::{Model, ModelType};
pub use reference::ModelReference;
pub use registry::ModelRegistry;
pub use routes::{describe_routes, Route, RouteResponse};
