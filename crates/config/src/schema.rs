// Attribute schema
// Loaded from ~/.config/trellis/attribs.toml

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_json::Value;

use crate::error::ConfigError;

/// Entity kinds an attribute scope may name.
pub const SUPPORTED_KINDS: &[&str] = &["folder", "task"];

/// One inheritable attribute: where it applies and what it falls back
/// to when no ancestor owns a value.
#[derive(Debug, Clone, Deserialize)]
pub struct AttributeSpec {
    pub name: String,
    /// Column header text; the raw name is used when absent.
    #[serde(default)]
    pub label: Option<String>,
    /// Entity kinds this attribute applies to.
    pub scope: Vec<String>,
    #[serde(default)]
    pub default: Option<Value>,
}

impl AttributeSpec {
    pub fn display_label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.name)
    }

    pub fn applies_to(&self, kind: &str) -> bool {
        self.scope.iter().any(|s| s == kind)
    }
}

#[derive(Debug, Deserialize)]
struct SchemaFile {
    #[serde(default, rename = "attrib")]
    attribs: Vec<AttributeSpec>,
}

/// The full attribute schema, in declaration order. Declaration order
/// is also column order for attribute columns.
#[derive(Debug, Clone, Default)]
pub struct AttributeSchema {
    attribs: Vec<AttributeSpec>,
}

impl AttributeSchema {
    pub fn from_toml(input: &str) -> Result<Self, ConfigError> {
        let file: SchemaFile =
            toml::from_str(input).map_err(|e| ConfigError::Parse(e.to_string()))?;
        let schema = Self {
            attribs: file.attribs,
        };
        schema.validate()?;
        Ok(schema)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let input = fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(format!("{}: {e}", path.display())))?;
        Self::from_toml(&input)
    }

    /// Default schema location.
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("trellis")
            .join("attribs.toml")
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut seen: HashSet<&str> = HashSet::new();
        for spec in &self.attribs {
            if spec.name.is_empty() {
                return Err(ConfigError::Validation(
                    "attribute name must not be empty".into(),
                ));
            }
            if !seen.insert(&spec.name) {
                return Err(ConfigError::DuplicateAttrib(spec.name.clone()));
            }
            if spec.scope.is_empty() {
                return Err(ConfigError::Validation(format!(
                    "attribute '{}': scope must not be empty",
                    spec.name
                )));
            }
            for kind in &spec.scope {
                if !SUPPORTED_KINDS.contains(&kind.as_str()) {
                    return Err(ConfigError::UnknownKind {
                        attrib: spec.name.clone(),
                        kind: kind.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    pub fn attribs(&self) -> &[AttributeSpec] {
        &self.attribs
    }

    pub fn len(&self) -> usize {
        self.attribs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attribs.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&AttributeSpec> {
        self.attribs.iter().find(|spec| spec.name == name)
    }

    /// Schema default for an attribute, if it declares one.
    pub fn default_of(&self, name: &str) -> Option<&Value> {
        self.get(name)?.default.as_ref()
    }

    /// Attributes that apply to the given entity kind, in schema order.
    pub fn for_kind<'a>(&'a self, kind: &'a str) -> impl Iterator<Item = &'a AttributeSpec> {
        self.attribs.iter().filter(move |spec| spec.applies_to(kind))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
