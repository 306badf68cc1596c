//! Explicit migration registration table.
//!
//! There is no reflection to enumerate implementors, so every migration is
//! listed once at startup. Keys come from the registering file name, which
//! carries the timestamp prefix that orders the run.

use crate::error::{MigrateError, MigrateResult};
use crate::migration::{Migration, Registration};
use std::collections::{BTreeMap, BTreeSet};
use tm_core::MigrationName;

/// Type identifier of the scaffold template. Never discovered.
pub const TEMPLATE_CLASS_NAME: &str = "MigrationTemplate";

/// Every migration the project knows about.
#[derive(Debug, Default, Clone)]
pub struct MigrationRegistry {
    registrations: Vec<Registration>,
}

impl MigrationRegistry {
    pub fn new(registrations: Vec<Registration>) -> Self {
        Self { registrations }
    }

    pub fn register(&mut self, registration: Registration) {
        self.registrations.push(registration);
    }

    pub fn len(&self) -> usize {
        self.registrations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registrations.is_empty()
    }

    /// Registered migrations keyed by base name, ascending.
    ///
    /// The scaffold template is skipped. Two registrations resolving to the
    /// same base name are a [`MigrateError::DiscoveryError`].
    pub fn discover(&self) -> MigrateResult<BTreeMap<MigrationName, Registration>> {
        let mut found: BTreeMap<MigrationName, Registration> = BTreeMap::new();
        for registration in self.active() {
            let base_name = registration.base_name().ok_or_else(|| {
                MigrateError::DiscoveryError(format!(
                    "cannot derive a base name for {} from '{}'",
                    registration.class_name, registration.source_file
                ))
            })?;
            if let Some(existing) = found.get(&base_name) {
                return Err(MigrateError::DiscoveryError(format!(
                    "duplicate migration base name '{base_name}' ({} and {})",
                    existing.class_name, registration.class_name
                )));
            }
            found.insert(base_name, *registration);
        }
        Ok(found)
    }

    /// Type identifiers in use, the template excluded.
    pub fn class_names(&self) -> BTreeSet<&'static str> {
        self.active().map(|r| r.class_name).collect()
    }

    /// Instantiate the migration registered under `base_name`.
    pub fn get(&self, base_name: &str) -> MigrateResult<Box<dyn Migration>> {
        self.active()
            .find(|r| r.base_name().is_some_and(|name| name == base_name))
            .map(Registration::instantiate)
            .ok_or_else(|| MigrateError::DiscoveryError(format!("unknown migration '{base_name}'")))
    }

    fn active(&self) -> impl Iterator<Item = &Registration> {
        self.registrations
            .iter()
            .filter(|r| r.class_name != TEMPLATE_CLASS_NAME)
    }
}

#[cfg(test)]
#[path = "registry_test.rs"]
mod tests;
