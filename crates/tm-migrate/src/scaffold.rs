//! Timestamped migration file generation.

use crate::error::{MigrateError, MigrateResult};
use crate::registry::{MigrationRegistry, TEMPLATE_CLASS_NAME};
use chrono::{DateTime, Utc};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use tm_core::{normalize_migration_name, type_identifier};

/// Source of every generated migration.
pub const TEMPLATE: &str = include_str!("../templates/migration.rs");

const FILE_STAMP_FORMAT: &str = "%Y_%m_%d_%H%M%S";

/// Writes new migration files into the migration directory.
pub struct ScaffoldGenerator<'a> {
    migration_dir: PathBuf,
    registry: &'a MigrationRegistry,
}

impl<'a> ScaffoldGenerator<'a> {
    pub fn new(migration_dir: impl Into<PathBuf>, registry: &'a MigrationRegistry) -> Self {
        Self {
            migration_dir: migration_dir.into(),
            registry,
        }
    }

    pub fn migration_dir(&self) -> &Path {
        &self.migration_dir
    }

    /// Generate `<UTC timestamp>_<normalized name>.rs` and return its path.
    pub fn make(&self, raw_name: &str) -> MigrateResult<PathBuf> {
        self.make_at(raw_name, Utc::now())
    }

    /// [`make`](Self::make) with an explicit creation time.
    pub fn make_at(&self, raw_name: &str, now: DateTime<Utc>) -> MigrateResult<PathBuf> {
        let normalized = normalize_migration_name(raw_name).ok_or_else(|| {
            MigrateError::ValidationError(format!(
                "migration name '{raw_name}' has no letters or digits"
            ))
        })?;
        self.check_directory()?;

        let class_name = type_identifier(&normalized);
        let file_name = format!("{}_{normalized}.rs", now.format(FILE_STAMP_FORMAT));
        let path = self.migration_dir.join(&file_name);

        if self.registry.class_names().contains(class_name.as_str()) {
            return Err(collision(&class_name, &normalized, "it is already registered"));
        }
        if let Some(declared_in) = self.find_declaration(&class_name)? {
            return Err(collision(
                &class_name,
                &normalized,
                &format!("it is already declared in {}", declared_in.display()),
            ));
        }

        let source = TEMPLATE.replace(TEMPLATE_CLASS_NAME, &class_name);
        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .map_err(|e| create_error(&path, &class_name, &normalized, e))?;
        file.write_all(source.as_bytes())
            .map_err(|e| io_error(&path, e))?;

        log::info!("Created {} ({class_name})", path.display());
        Ok(path)
    }

    fn check_directory(&self) -> MigrateResult<()> {
        let dir = &self.migration_dir;
        let metadata = std::fs::metadata(dir).map_err(|_| {
            MigrateError::ConfigurationError(format!(
                "cannot find the directory '{}'; make sure it exists and is writable",
                dir.display()
            ))
        })?;
        if !metadata.is_dir() {
            return Err(MigrateError::ConfigurationError(format!(
                "'{}' is not a directory",
                dir.display()
            )));
        }
        if metadata.permissions().readonly() {
            return Err(MigrateError::ConfigurationError(format!(
                "cannot write to '{}'; make sure it is writable",
                dir.display()
            )));
        }
        Ok(())
    }

    /// First `.rs` file in the migration directory that declares `ident`.
    fn find_declaration(&self, ident: &str) -> MigrateResult<Option<PathBuf>> {
        let entries =
            std::fs::read_dir(&self.migration_dir).map_err(|e| io_error(&self.migration_dir, e))?;
        let mut files: Vec<PathBuf> = entries
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == "rs"))
            .collect();
        files.sort();

        for path in files {
            let source = std::fs::read_to_string(&path).map_err(|e| io_error(&path, e))?;
            if declares_type(&source, ident) {
                return Ok(Some(path));
            }
        }
        Ok(None)
    }
}

/// Registration lines for a generated file, to paste into the migrations
/// module.
pub fn registration_snippet(path: &Path) -> Option<String> {
    let file_name = path.file_name()?.to_str()?;
    let stem = path.file_stem()?.to_str()?;
    let suffix = stem
        .splitn(5, '_')
        .nth(4)
        .filter(|s| !s.is_empty())
        .unwrap_or(stem);
    let module = if suffix.starts_with(|c: char| c.is_ascii_digit()) {
        format!("m_{suffix}")
    } else {
        suffix.to_string()
    };
    Some(format!(
        "#[path = \"{file_name}\"]\nmod {module};\n\n{module}::registration(),"
    ))
}

/// Whether `source` declares a struct, enum, or type alias named `ident`.
fn declares_type(source: &str, ident: &str) -> bool {
    let mut previous: Option<&str> = None;
    for token in source
        .split(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
        .filter(|t| !t.is_empty())
    {
        if token == ident && matches!(previous, Some("struct" | "enum" | "type")) {
            return true;
        }
        previous = Some(token);
    }
    false
}

fn collision(class_name: &str, normalized: &str, reason: &str) -> MigrateError {
    MigrateError::NameCollisionError(format!(
        "cannot generate a migration type called '{class_name}' (derived from '{normalized}'): {reason}"
    ))
}

/// Map a failure to create the migration file. The readonly check above only
/// sees mode bits, so ownership problems surface here.
fn create_error(
    path: &Path,
    class_name: &str,
    normalized: &str,
    source: std::io::Error,
) -> MigrateError {
    match source.kind() {
        std::io::ErrorKind::AlreadyExists => {
            collision(class_name, normalized, "the file already exists")
        }
        std::io::ErrorKind::PermissionDenied => MigrateError::ConfigurationError(format!(
            "cannot write to '{}'; make sure it is writable",
            path.parent().unwrap_or(path).display()
        )),
        _ => io_error(path, source),
    }
}

fn io_error(path: &Path, source: std::io::Error) -> MigrateError {
    MigrateError::Io {
        path: path.display().to_string(),
        source,
    }
}

#[cfg(test)]
#[path = "scaffold_test.rs"]
mod tests;
