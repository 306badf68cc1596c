//! tm-core - Core library for Tidemark
//!
//! This crate provides the pieces shared by every Tidemark component:
//! project configuration, migration naming rules, the strongly-typed
//! [`MigrationName`], and SQL identifier quoting.

pub mod config;
pub mod error;
pub mod migration_name;
pub mod naming;
pub mod sql_utils;

pub use config::{Config, DatabaseConfig};
pub use error::{CoreError, CoreResult};
pub use migration_name::MigrationName;
pub use naming::{normalize_migration_name, type_identifier};
