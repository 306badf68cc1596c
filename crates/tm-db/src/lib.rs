//! tm-db - Store layer for Tidemark
//!
//! Wraps a DuckDB connection and provides the helper primitives migrations
//! use to inspect and mutate schema without going through any mapping layer:
//! [`SchemaIntrospector`], [`RowAccessor`], and [`TableCopier`].

pub mod copy;
pub mod error;
pub mod rows;
pub mod schema;
pub(crate) mod sql;
pub mod store;
pub mod value;

pub use copy::{CopyOptions, TableCopier};
pub use error::{DbError, DbResult};
pub use rows::RowAccessor;
pub use schema::{SchemaIntrospector, TableRef};
pub use store::Store;
pub use value::RowValue;
