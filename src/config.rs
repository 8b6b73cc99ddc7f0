//! Configuration for documentation builds
//!
//! Supports loading configuration from:
//! - Default values
//! - Config file (apidoc.toml)
//! - Environment variables (APIDOC__*)
//!
//! ## Example config file (apidoc.toml):
//! ```toml
//! [document]
//! title = "Shop API"
//! version = "2.1.0"
//!
//! [export]
//! output_format = "pretty"
//!
//! # Declaration order matters: the last entry for a model wins.
//! [[alternative_names]]
//! name = "PublicUser"
//! type = "App\\Entity\\User"
//! groups = ["public"]
//! ```

use config_crate::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};

use crate::document::Info;
use crate::model::Model;

/// Main configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiDocConfig {
    /// Document metadata
    #[serde(default)]
    pub document: DocumentConfig,

    /// Export settings
    #[serde(default)]
    pub export: ExportConfig,

    /// Definition names reserved for specific models
    #[serde(default)]
    pub alternative_names: Vec<AlternativeName>,
}

/// Document metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentConfig {
    #[serde(default = "default_title")]
    pub title: String,

    #[serde(default = "default_version")]
    pub version: String,

    #[serde(default)]
    pub description: Option<String>,
}

/// Export configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Output format (pretty or compact)
    #[serde(default)]
    pub output_format: OutputFormat,
}

/// Output format for JSON
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Pretty,
    Compact,
}

/// A definition name reserved for the object model `class` seen through `groups`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlternativeName {
    pub name: String,

    #[serde(rename = "type")]
    pub class: String,

    #[serde(default)]
    pub groups: Option<Vec<String>>,
}

fn default_title() -> String {
    "API".to_string()
}

fn default_version() -> String {
    "1.0.0".to_string()
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            version: default_version(),
            description: None,
        }
    }
}

impl DocumentConfig {
    pub fn info(&self) -> Info {
        Info {
            title: self.title.clone(),
            version: self.version.clone(),
            description: self.description.clone(),
        }
    }
}

impl ApiDocConfig {
    /// Load configuration from the default locations, then `config_path`
    pub fn load_from(config_path: Option<&str>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();

        // Load from default locations
        let config_locations = [
            "apidoc.toml",
            ".apidoc.toml",
            "config/apidoc.toml",
        ];

        for location in config_locations {
            builder = builder.add_source(File::with_name(location).required(false));
        }

        // Load from XDG config directory
        if let Some(config_dir) = directories::ProjectDirs::from("dev", "familiar", "apidoc") {
            let xdg_config = config_dir.config_dir().join("apidoc.toml");
            if xdg_config.exists() {
                builder = builder.add_source(File::from(xdg_config).required(false));
            }
        }

        // Load from specified path
        if let Some(path) = config_path {
            builder = builder.add_source(File::with_name(path).required(true));
        }

        // Load from environment variables (APIDOC__*)
        builder = builder.add_source(
            Environment::with_prefix("APIDOC")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;
        config.try_deserialize()
    }

    /// Save configuration to a file
    pub fn save(&self, path: &str) -> std::io::Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        std::fs::write(path, content)
    }

    /// Alternative names as `(name, model)` pairs, in declaration order
    pub fn alternative_name_models(&self) -> Vec<(String, Model)> {
        self.alternative_names
            .iter()
            .map(|alt| (alt.name.clone(), Model::object(alt.class.clone(), alt.groups.clone())))
            .collect()
    }
}
