//! tm-migrate - Migration engine for Tidemark
//!
//! Discovers registered migration units, applies outstanding ones as a new
//! batch, reverses the latest batch, and scaffolds new migration files. Each
//! `up` or `down` executes inside a single store transaction.

pub mod context;
pub mod error;
pub mod ledger;
pub mod migration;
pub mod registry;
pub mod runner;
pub mod scaffold;

pub use context::MigrationContext;
pub use error::{MigrateError, MigrateResult};
pub use ledger::{BatchLedger, MigrationRecord};
pub use migration::{Migration, MigrationFactory, Registration};
pub use registry::MigrationRegistry;
pub use runner::{MigrationRunner, MigrationStatus, RunEvent, RunReport, RunState};
pub use scaffold::ScaffoldGenerator;
pub use tm_db::{CopyOptions, RowValue};
