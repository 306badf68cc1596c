//! Up/down orchestration.
//!
//! A whole `up` or `down` runs inside one store transaction: unit bodies and
//! ledger writes share the connection, so any failure leaves both the schema
//! and the ledger exactly as they were.

use crate::context::MigrationContext;
use crate::error::{MigrateError, MigrateResult};
use crate::ledger::{BatchLedger, DEFAULT_LEDGER_TABLE};
use crate::migration::Registration;
use crate::registry::MigrationRegistry;
use chrono::{DateTime, Utc};
use duckdb::Connection;
use serde::Serialize;
use std::cell::Cell;
use std::collections::BTreeMap;
use std::fmt;
use tm_core::{Config, MigrationName};
use tm_db::copy::DEFAULT_STAGE_SUFFIXES;
use tm_db::{SchemaIntrospector, Store};

/// Lifecycle of one runner invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunState {
    Idle,
    Running,
    Committed,
    RolledBack,
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RunState::Idle => "idle",
            RunState::Running => "running",
            RunState::Committed => "committed",
            RunState::RolledBack => "rolled back",
        };
        f.write_str(s)
    }
}

/// One progress line of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunEvent {
    NothingToMigrate,
    NothingToReverse,
    Migrated(MigrationName),
    Reversed(MigrationName),
    SkippedObsolete(MigrationName),
}

impl fmt::Display for RunEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunEvent::NothingToMigrate => f.write_str("There are no new migrations."),
            RunEvent::NothingToReverse => f.write_str("There are no migrations to reverse."),
            RunEvent::Migrated(name) => write!(f, "Migrated: {name}"),
            RunEvent::Reversed(name) => write!(f, "Reversed: {name}"),
            RunEvent::SkippedObsolete(name) => write!(f, "Skipped (obsolete): {name}"),
        }
    }
}

/// Outcome of a committed `up` or `down`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub state: RunState,
    /// Batch written by `up` or removed by `down`; `None` when nothing ran.
    pub batch: Option<i64>,
    pub events: Vec<RunEvent>,
}

impl RunReport {
    fn empty(event: RunEvent) -> Self {
        Self {
            state: RunState::Committed,
            batch: None,
            events: vec![event],
        }
    }

    /// Units whose ledger record was written or removed.
    pub fn processed(&self) -> usize {
        self.events
            .iter()
            .filter(|e| {
                matches!(
                    e,
                    RunEvent::Migrated(_) | RunEvent::Reversed(_) | RunEvent::SkippedObsolete(_)
                )
            })
            .count()
    }
}

/// Applied/pending state of one migration.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MigrationStatus {
    pub base_name: MigrationName,
    pub migration_class: String,
    pub registered: bool,
    pub applied: bool,
    pub batch: Option<i64>,
    pub stamp: Option<DateTime<Utc>>,
}

/// Runs registered migrations against a store.
pub struct MigrationRunner<'a> {
    store: &'a Store,
    registry: &'a MigrationRegistry,
    ledger_table: String,
    id_column: String,
    stage_suffixes: Vec<String>,
    state: Cell<RunState>,
}

impl<'a> MigrationRunner<'a> {
    pub fn new(store: &'a Store, registry: &'a MigrationRegistry) -> Self {
        Self {
            store,
            registry,
            ledger_table: DEFAULT_LEDGER_TABLE.to_string(),
            id_column: "ID".to_string(),
            stage_suffixes: DEFAULT_STAGE_SUFFIXES.iter().map(|s| s.to_string()).collect(),
            state: Cell::new(RunState::Idle),
        }
    }

    /// Take ledger table, identifier column, and stage suffixes from config.
    pub fn with_config(mut self, config: &Config) -> Self {
        self.ledger_table = config.ledger_table.clone();
        self.id_column = config.id_column.clone();
        self.stage_suffixes = config.versioned_suffixes.clone();
        self
    }

    pub fn with_ledger_table(mut self, table: impl Into<String>) -> Self {
        self.ledger_table = table.into();
        self
    }

    pub fn state(&self) -> RunState {
        self.state.get()
    }

    /// Apply every registered migration not yet in the ledger, as one new
    /// batch, ascending by base name.
    pub fn up(&self) -> MigrateResult<RunReport> {
        let discovered = self.registry.discover()?;
        self.run(|conn| self.apply_up(conn, &discovered))
    }

    /// Reverse the most recent batch, descending by base name.
    pub fn down(&self) -> MigrateResult<RunReport> {
        let discovered = self.registry.discover()?;
        self.run(|conn| self.apply_down(conn, &discovered))
    }

    /// Every registered or recorded migration with its ledger state.
    /// Read-only; does not create the ledger table.
    pub fn status(&self) -> MigrateResult<Vec<MigrationStatus>> {
        let discovered = self.registry.discover()?;
        let conn = self.store.conn();
        let records = if SchemaIntrospector::new(conn).table_exists(&self.ledger_table)? {
            BatchLedger::new(conn, self.ledger_table.as_str()).records()?
        } else {
            Vec::new()
        };

        let mut statuses: BTreeMap<MigrationName, MigrationStatus> = discovered
            .iter()
            .map(|(name, registration)| {
                let status = MigrationStatus {
                    base_name: name.clone(),
                    migration_class: registration.class_name.to_string(),
                    registered: true,
                    applied: false,
                    batch: None,
                    stamp: None,
                };
                (name.clone(), status)
            })
            .collect();

        for record in records {
            let status = statuses
                .entry(record.base_name.clone())
                .or_insert_with(|| MigrationStatus {
                    base_name: record.base_name.clone(),
                    migration_class: record.migration_class.clone(),
                    registered: false,
                    applied: false,
                    batch: None,
                    stamp: None,
                });
            status.applied = true;
            status.batch = Some(record.batch);
            status.stamp = Some(record.stamp);
        }
        Ok(statuses.into_values().collect())
    }

    fn run<F>(&self, body: F) -> MigrateResult<RunReport>
    where
        F: FnOnce(&Connection) -> MigrateResult<RunReport>,
    {
        if self.state.get() != RunState::Idle {
            return Err(MigrateError::UsageError(format!(
                "runner already {}; create a new runner per invocation",
                self.state.get()
            )));
        }
        self.state.set(RunState::Running);
        match self.store.transaction(body) {
            Ok(report) => {
                self.state.set(RunState::Committed);
                Ok(report)
            }
            Err(err) => {
                self.state.set(RunState::RolledBack);
                log::error!("Batch rolled back: {err}");
                Err(err)
            }
        }
    }

    fn context<'c>(&self, conn: &'c Connection) -> MigrationContext<'c> {
        MigrationContext::new(conn)
            .with_id_column(self.id_column.as_str())
            .with_stage_suffixes(self.stage_suffixes.clone())
    }

    fn apply_up(
        &self,
        conn: &Connection,
        discovered: &BTreeMap<MigrationName, Registration>,
    ) -> MigrateResult<RunReport> {
        let ledger = BatchLedger::new(conn, self.ledger_table.as_str());
        ledger.ensure_table()?;
        let already_run = ledger.run_migrations(false)?;

        let queue: Vec<(&MigrationName, &Registration)> = discovered
            .iter()
            .filter(|(name, _)| !already_run.contains_key(*name))
            .collect();
        if queue.is_empty() {
            return Ok(RunReport::empty(RunEvent::NothingToMigrate));
        }

        let batch = ledger.latest_batch()? + 1;
        log::debug!("Applying {} migration(s) as batch {batch}", queue.len());
        let ctx = self.context(conn);
        let mut events = Vec::with_capacity(queue.len());

        for (name, registration) in queue {
            let unit = registration.instantiate();
            let event = if unit.is_obsolete() {
                log::warn!("Skipping obsolete migration {name}");
                RunEvent::SkippedObsolete(name.clone())
            } else {
                unit.up(&ctx)
                    .map_err(|e| MigrateError::fault(name.as_str(), e))?;
                RunEvent::Migrated(name.clone())
            };
            ledger.record(name, registration.class_name, batch, Utc::now())?;
            log::info!("{event}");
            events.push(event);
        }

        Ok(RunReport {
            state: RunState::Committed,
            batch: Some(batch),
            events,
        })
    }

    fn apply_down(
        &self,
        conn: &Connection,
        discovered: &BTreeMap<MigrationName, Registration>,
    ) -> MigrateResult<RunReport> {
        let ledger = BatchLedger::new(conn, self.ledger_table.as_str());
        ledger.ensure_table()?;
        let last = ledger.run_migrations(true)?;
        if last.is_empty() {
            return Ok(RunReport::empty(RunEvent::NothingToReverse));
        }

        let unknown: Vec<&str> = last
            .keys()
            .filter(|name| !discovered.contains_key(*name))
            .map(MigrationName::as_str)
            .collect();
        if !unknown.is_empty() {
            return Err(MigrateError::DiscoveryError(format!(
                "unknown migration(s) in ledger: {}",
                unknown.join(", ")
            )));
        }

        let batch = ledger.latest_batch()?;
        log::debug!("Reversing {} migration(s) of batch {batch}", last.len());
        let ctx = self.context(conn);
        let mut events = Vec::with_capacity(last.len());

        for name in last.keys().rev() {
            let unit = self.registry.get(name)?;
            let event = if unit.is_obsolete() {
                log::warn!("Skipping obsolete migration {name}");
                RunEvent::SkippedObsolete(name.clone())
            } else {
                unit.down(&ctx)
                    .map_err(|e| MigrateError::fault(name.as_str(), e))?;
                RunEvent::Reversed(name.clone())
            };
            ledger.remove(name)?;
            log::info!("{event}");
            events.push(event);
        }

        Ok(RunReport {
            state: RunState::Committed,
            batch: Some(batch),
            events,
        })
    }
}

#[cfg(test)]
#[path = "runner_test.rs"]
mod tests;
