//! The migration unit contract and its registration record.

use crate::context::MigrationContext;
use crate::error::MigrateResult;
use tm_core::MigrationName;

/// A schema or data change with a paired reversal.
///
/// Implementations are instantiated fresh for every run through the
/// factory captured in their [`Registration`].
pub trait Migration {
    /// Apply the change.
    fn up(&self, ctx: &MigrationContext<'_>) -> MigrateResult<()>;

    /// Reverse the change.
    fn down(&self, ctx: &MigrationContext<'_>) -> MigrateResult<()>;

    /// Obsolete units stay in history: the ledger still records and removes
    /// them, but neither body runs.
    fn is_obsolete(&self) -> bool {
        false
    }
}

/// Builds a fresh unit instance.
pub type MigrationFactory = fn() -> Box<dyn Migration>;

/// One entry of the registration table.
///
/// Usually produced by [`register_migration!`](crate::register_migration)
/// inside the migration's own source file, so `source_file` names that file.
#[derive(Clone, Copy)]
pub struct Registration {
    /// Registering source file, as reported by `file!()`.
    pub source_file: &'static str,
    /// Implementing type identifier.
    pub class_name: &'static str,
    pub factory: MigrationFactory,
}

impl Registration {
    pub const fn new(
        source_file: &'static str,
        class_name: &'static str,
        factory: MigrationFactory,
    ) -> Self {
        Self {
            source_file,
            class_name,
            factory,
        }
    }

    /// Source file stem, the key the ledger records.
    pub fn base_name(&self) -> Option<MigrationName> {
        MigrationName::from_source_file(self.source_file)
    }

    pub fn instantiate(&self) -> Box<dyn Migration> {
        (self.factory)()
    }
}

impl std::fmt::Debug for Registration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registration")
            .field("source_file", &self.source_file)
            .field("class_name", &self.class_name)
            .finish_non_exhaustive()
    }
}

/// Register a migration type from inside its source file.
///
/// The type must implement [`Migration`] and [`Default`]. The base name is
/// taken from the file the macro is invoked in.
///
/// ```ignore
/// pub fn registration() -> Registration {
///     register_migration!(MigrationAddSummaryToPage)
/// }
/// ```
#[macro_export]
macro_rules! register_migration {
    ($ty:ident) => {
        $crate::Registration::new(file!(), stringify!($ty), || -> ::std::boxed::Box<
            dyn $crate::Migration,
        > {
            ::std::boxed::Box::new(<$ty as ::std::default::Default>::default())
        })
    };
}
