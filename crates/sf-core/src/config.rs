//! Configuration types and parsing for schemaflow.yml

use crate::error::{CoreError, CoreResult};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// Main project configuration from schemaflow.yml
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Project name
    pub name: String,

    /// Directory holding the delta files, relative to the project root
    #[serde(default = "default_deltas_dir")]
    pub deltas_dir: String,

    /// Name of the table recording applied deltas
    #[serde(default = "default_ledger_table")]
    pub ledger_table: String,

    /// Database connection configuration
    #[serde(default)]
    pub database: DatabaseConfig,
}

/// Database type selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DbType {
    /// DuckDB (default)
    #[default]
    DuckDb,
}

impl std::fmt::Display for DbType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DbType::DuckDb => write!(f, "duckdb"),
        }
    }
}

/// Database connection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DatabaseConfig {
    /// Database type
    #[serde(rename = "type", default)]
    pub db_type: DbType,

    /// Database path (file-based or :memory:)
    #[serde(default = "default_db_path")]
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            db_type: DbType::default(),
            path: default_db_path(),
        }
    }
}

/// Config file name looked up in the project directory.
pub const CONFIG_FILE_NAME: &str = "schemaflow.yml";

/// Alternate config file extension.
pub const CONFIG_FILE_NAME_ALT: &str = "schemaflow.yaml";

fn default_deltas_dir() -> String {
    "deltas".to_string()
}

fn default_ledger_table() -> String {
    "schemaflow_ledger".to_string()
}

fn default_db_path() -> String {
    "app.duckdb".to_string()
}

static IDENTIFIER_RE: OnceLock<Regex> = OnceLock::new();

/// Whether `name` is safe to splice into SQL as an unquoted identifier.
pub fn is_valid_identifier(name: &str) -> bool {
    IDENTIFIER_RE
        .get_or_init(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("valid regex literal"))
        .is_match(name)
}

impl Config {
    /// Load configuration from a file path
    pub fn load(path: &Path) -> CoreResult<Self> {
        if !path.exists() {
            return Err(CoreError::ConfigNotFound {
                path: path.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| CoreError::IoWithPath {
            path: path.display().to_string(),
            source: e,
        })?;
        let config: Config =
            serde_yaml::from_str(&content).map_err(|e| CoreError::ConfigParseError {
                message: format!("{}: {}", path.display(), e),
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a project directory
    /// Looks for schemaflow.yml or schemaflow.yaml
    pub fn load_from_dir(dir: &Path) -> CoreResult<Self> {
        let yml_path = dir.join(CONFIG_FILE_NAME);
        let yaml_path = dir.join(CONFIG_FILE_NAME_ALT);

        if yml_path.exists() {
            Self::load(&yml_path)
        } else if yaml_path.exists() {
            Self::load(&yaml_path)
        } else {
            Err(CoreError::ConfigNotFound {
                path: yml_path.display().to_string(),
            })
        }
    }

    /// Validate the configuration
    fn validate(&self) -> CoreResult<()> {
        if self.name.is_empty() {
            return Err(CoreError::ConfigInvalid {
                message: "Project name cannot be empty".to_string(),
            });
        }

        if self.deltas_dir.trim().is_empty() {
            return Err(CoreError::ConfigInvalid {
                message: "deltas_dir cannot be empty".to_string(),
            });
        }

        if !is_valid_identifier(&self.ledger_table) {
            return Err(CoreError::ConfigInvalid {
                message: format!(
                    "ledger_table '{}' must start with a letter or underscore and contain only letters, digits and underscores",
                    self.ledger_table
                ),
            });
        }

        Ok(())
    }

    /// Absolute path of the deltas directory
    pub fn deltas_dir_absolute(&self, root: &Path) -> PathBuf {
        root.join(&self.deltas_dir)
    }

    /// Database path resolved against the project root.
    ///
    /// `:memory:` and absolute paths are returned unchanged.
    pub fn database_path_absolute(&self, root: &Path) -> String {
        let path = &self.database.path;
        if path == ":memory:" || Path::new(path).is_absolute() {
            path.clone()
        } else {
            root.join(path).display().to_string()
        }
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
