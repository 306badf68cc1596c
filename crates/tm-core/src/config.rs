//! Configuration types and parsing for tidemark.yml

use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable that overrides the migration directory.
pub const MIGRATION_PATH_ENV: &str = "TIDEMARK_MIGRATION_PATH";

/// Environment variable that overrides the database path.
pub const DATABASE_ENV: &str = "TIDEMARK_DATABASE";

/// Config file names probed in a project directory, in order.
const CONFIG_FILE_NAMES: &[&str] = &["tidemark.yml", "tidemark.yaml"];

/// Main project configuration from tidemark.yml
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Project name
    pub name: String,

    /// Database connection configuration
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Directory holding migration source files, relative to the project root.
    ///
    /// Defaults to `src/migrations` when unset.
    #[serde(default)]
    pub migration_path: Option<String>,

    /// Table that stores the migration ledger
    #[serde(default = "default_ledger_table")]
    pub ledger_table: String,

    /// Identifier column used by the row helpers
    #[serde(default = "default_id_column")]
    pub id_column: String,

    /// Table-name suffixes of the stage variants of a versioned entity
    #[serde(default = "default_versioned_suffixes")]
    pub versioned_suffixes: Vec<String>,
}

/// Database connection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DatabaseConfig {
    /// DuckDB file path relative to the project dir, or `:memory:`
    #[serde(default = "default_db_path")]
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

const DEFAULT_DB_PATH: &str = "tidemark.duckdb";

const IN_MEMORY_DB: &str = ":memory:";

const DEFAULT_MIGRATION_PATH: &str = "src/migrations";

fn default_db_path() -> String {
    DEFAULT_DB_PATH.to_string()
}

fn default_ledger_table() -> String {
    "tidemark_migrations".to_string()
}

fn default_id_column() -> String {
    "ID".to_string()
}

fn default_versioned_suffixes() -> Vec<String> {
    vec![String::new(), "_Live".to_string(), "_Versions".to_string()]
}

impl Config {
    /// Build a default configuration for a project with the given name.
    pub fn with_name(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            database: DatabaseConfig::default(),
            migration_path: None,
            ledger_table: default_ledger_table(),
            id_column: default_id_column(),
            versioned_suffixes: default_versioned_suffixes(),
        }
    }

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
                path: path.display().to_string(),
                source: e,
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a project directory
    /// Looks for tidemark.yml or tidemark.yaml
    pub fn load_from_dir(dir: &Path) -> CoreResult<Self> {
        CONFIG_FILE_NAMES
            .iter()
            .map(|name| dir.join(name))
            .find(|path| path.exists())
            .map(|path| Self::load(&path))
            .unwrap_or_else(|| {
                Err(CoreError::ConfigNotFound {
                    path: dir.join(CONFIG_FILE_NAMES[0]).display().to_string(),
                })
            })
    }

    /// Load configuration from a project directory, falling back to defaults
    /// named after the directory when no config file is present.
    pub fn load_or_default(dir: &Path) -> CoreResult<Self> {
        match Self::load_from_dir(dir) {
            Err(CoreError::ConfigNotFound { .. }) => {
                log::debug!(
                    "No tidemark.yml in {}, using default configuration",
                    dir.display()
                );
                let name = dir
                    .canonicalize()
                    .ok()
                    .and_then(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
                    .unwrap_or_else(|| "tidemark".to_string());
                Ok(Self::with_name(name))
            }
            other => other,
        }
    }

    /// Validate the configuration
    fn validate(&self) -> CoreResult<()> {
        if self.name.is_empty() {
            return Err(CoreError::ConfigInvalid {
                message: "Project name cannot be empty".to_string(),
            });
        }

        if self.ledger_table.trim().is_empty() {
            return Err(CoreError::ConfigInvalid {
                message: "ledger_table cannot be empty".to_string(),
            });
        }

        if self.id_column.trim().is_empty() {
            return Err(CoreError::ConfigInvalid {
                message: "id_column cannot be empty".to_string(),
            });
        }

        if self.versioned_suffixes.is_empty() {
            return Err(CoreError::ConfigInvalid {
                message: "versioned_suffixes must list at least one suffix".to_string(),
            });
        }

        Ok(())
    }

    /// Resolve the migration directory.
    ///
    /// Priority: CLI flag > `TIDEMARK_MIGRATION_PATH` > `migration_path` in
    /// config > `src/migrations`. Relative paths are joined onto `root`.
    pub fn resolve_migration_path(&self, cli_override: Option<&str>, root: &Path) -> PathBuf {
        let raw = cli_override
            .map(String::from)
            .or_else(|| std::env::var(MIGRATION_PATH_ENV).ok())
            .or_else(|| self.migration_path.clone())
            .unwrap_or_else(|| DEFAULT_MIGRATION_PATH.to_string());
        resolve_against(root, &raw)
    }

    /// Resolve the database path.
    ///
    /// Priority: CLI flag > `TIDEMARK_DATABASE` > `database.path` in config.
    /// `:memory:` is passed through untouched.
    pub fn resolve_database_path(&self, cli_override: Option<&str>, root: &Path) -> String {
        let raw = cli_override
            .map(String::from)
            .or_else(|| std::env::var(DATABASE_ENV).ok())
            .unwrap_or_else(|| self.database.path.clone());
        if raw == IN_MEMORY_DB {
            return raw;
        }
        resolve_against(root, &raw).display().to_string()
    }
}

fn resolve_against(root: &Path, raw: &str) -> PathBuf {
    let path = Path::new(raw);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
