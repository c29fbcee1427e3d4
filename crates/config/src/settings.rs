// Grid settings
// Loaded from ~/.config/trellis/grid.toml

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Grid-level settings: which entity field columns the table shows and
/// whether it carries the leading row-selection column. Attribute
/// columns are not listed here; they come from the attribute schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridSettings {
    /// Field columns in display order.
    pub columns: Vec<String>,

    /// Whether rows get the selection pseudo-column.
    pub row_selection: bool,
}

impl Default for GridSettings {
    fn default() -> Self {
        Self {
            columns: vec!["name".into(), "status".into(), "assignee".into()],
            row_selection: true,
        }
    }
}

impl GridSettings {
    pub fn from_toml(input: &str) -> Result<Self, ConfigError> {
        let settings: GridSettings =
            toml::from_str(input).map_err(|e| ConfigError::Parse(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let input = fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(format!("{}: {e}", path.display())))?;
        Self::from_toml(&input)
    }

    /// Default settings location.
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("trellis")
            .join("grid.toml")
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut seen: std::collections::HashSet<&str> = std::collections::HashSet::new();
        for column in &self.columns {
            if column.is_empty() {
                return Err(ConfigError::Validation(
                    "column name must not be empty".into(),
                ));
            }
            if !seen.insert(column) {
                return Err(ConfigError::Validation(format!(
                    "duplicate column: {column}"
                )));
            }
        }
        Ok(())
    }

    /// Save settings to disk, creating the parent directory if needed.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| ConfigError::Io(format!("{}: {e}", parent.display())))?;
        }
        let toml = toml::to_string_pretty(self).map_err(|e| ConfigError::Io(e.to_string()))?;
        fs::write(path, toml).map_err(|e| ConfigError::Io(format!("{}: {e}", path.display())))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
