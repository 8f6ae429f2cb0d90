//! Scoped collection access over PostgreSQL.
//!
//! The three planner collections (shopping items, menu days, weight entries)
//! share one generic accessor: a [`Collection`] descriptor names the table,
//! columns, and sort order; [`Filter`]s carry the owner/scope equality
//! constraints; a [`ChangeSet`] carries only the fields a caller explicitly
//! supplied. SQL text is produced by pure builder functions and executed by
//! [`Store`], which maps rows to JSON objects.

pub mod collection;
pub mod db;
pub mod row;
pub mod store;

pub use collection::{
    Arg, ChangeSet, Collection, Filter, MENU_DAYS, SHOPPING_ITEMS, WEIGHT_ENTRIES,
};
pub use store::{Store, UpsertMode};
