//! Collection descriptors and query builders.
//!
//! Each planner collection is a declarative [`Collection`] value rather than
//! hand-written per-table SQL. The builder functions here produce the final
//! `$N`-parameterized statements; bind values travel alongside as [`Arg`]s in
//! the same order the placeholders were emitted (change-set first, then
//! filters).

use uuid::Uuid;

/// Declarative description of one scoped collection.
#[derive(Debug, Clone, Copy)]
pub struct Collection {
    pub table: &'static str,
    pub columns: &'static [&'static str],
    pub owner_column: &'static str,
    /// Collection-specific sort clause applied to list queries.
    pub order_by: &'static str,
}

pub const SHOPPING_ITEMS: Collection = Collection {
    table: "shopping_items",
    columns: &["id", "owner_id", "name", "category", "qty", "done", "created_at"],
    owner_column: "owner_id",
    order_by: "created_at DESC",
};

pub const MENU_DAYS: Collection = Collection {
    table: "menu_days",
    columns: &[
        "id",
        "owner_id",
        "week_start",
        "day_index",
        "breakfast",
        "lunch",
        "dinner",
        "is_done",
        "created_at",
    ],
    owner_column: "owner_id",
    order_by: "day_index ASC",
};

pub const WEIGHT_ENTRIES: Collection = Collection {
    table: "weight_entries",
    columns: &["id", "owner_id", "entry_date", "weight_kg", "notes", "created_at"],
    owner_column: "owner_id",
    order_by: "entry_date ASC",
};

/// A single bind value. Covers every column type the planner tables use.
#[derive(Debug, Clone, PartialEq)]
pub enum Arg {
    Text(String),
    Int(i32),
    Float(f64),
    Bool(bool),
    Uuid(Uuid),
}

/// An equality constraint applied in a WHERE clause.
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    pub column: &'static str,
    pub value: Arg,
}

impl Filter {
    pub fn eq(column: &'static str, value: Arg) -> Self {
        Self { column, value }
    }
}

/// The subset of a record's fields explicitly supplied by a caller.
///
/// Presence-based, not falsiness-based: `done = false` is an entry, an
/// omitted field is not.
#[derive(Debug, Clone, Default)]
pub struct ChangeSet {
    entries: Vec<(&'static str, Arg)>,
}

impl ChangeSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, column: &'static str, value: Arg) -> &mut Self {
        self.entries.push((column, value));
        self
    }

    /// Add the field only when the caller supplied it.
    pub fn set_opt(&mut self, column: &'static str, value: Option<Arg>) -> &mut Self {
        if let Some(v) = value {
            self.entries.push((column, v));
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn entries(&self) -> &[(&'static str, Arg)] {
        &self.entries
    }

    pub fn into_args(self) -> Vec<Arg> {
        self.entries.into_iter().map(|(_, v)| v).collect()
    }
}

// ── SQL builders ────────────────────────────────────────────────

fn where_clause(filters: &[Filter], first_placeholder: usize) -> String {
    if filters.is_empty() {
        return String::new();
    }
    let conditions: Vec<String> = filters
        .iter()
        .enumerate()
        .map(|(i, f)| format!("{} = ${}", f.column, first_placeholder + i))
        .collect();
    format!(" WHERE {}", conditions.join(" AND "))
}

/// `SELECT <cols> FROM <table> WHERE ... ORDER BY <order_by>`
pub fn select_sql(c: &Collection, filters: &[Filter]) -> String {
    format!(
        "SELECT {} FROM {}{} ORDER BY {}",
        c.columns.join(", "),
        c.table,
        where_clause(filters, 1),
        c.order_by
    )
}

/// `SELECT id FROM <table> WHERE ... LIMIT 1` — the upsert lookup.
pub fn select_id_sql(c: &Collection, filters: &[Filter]) -> String {
    format!("SELECT id FROM {}{} LIMIT 1", c.table, where_clause(filters, 1))
}

/// `INSERT INTO <table> (..) VALUES (..) RETURNING <cols>`
pub fn insert_sql(c: &Collection, values: &ChangeSet) -> String {
    let columns: Vec<&str> = values.entries().iter().map(|(col, _)| *col).collect();
    let placeholders: Vec<String> = (1..=values.len()).map(|i| format!("${i}")).collect();
    format!(
        "INSERT INTO {} ({}) VALUES ({}) RETURNING {}",
        c.table,
        columns.join(", "),
        placeholders.join(", "),
        c.columns.join(", ")
    )
}

/// `UPDATE <table> SET .. WHERE .. RETURNING <cols>`
///
/// Change-set binds come first, filter binds after — matching the order
/// [`Store`](crate::Store) pushes them.
pub fn update_sql(c: &Collection, changes: &ChangeSet, filters: &[Filter]) -> String {
    let assignments: Vec<String> = changes
        .entries()
        .iter()
        .enumerate()
        .map(|(i, (col, _))| format!("{} = ${}", col, i + 1))
        .collect();
    format!(
        "UPDATE {} SET {}{} RETURNING {}",
        c.table,
        assignments.join(", "),
        where_clause(filters, changes.len() + 1),
        c.columns.join(", ")
    )
}

/// `DELETE FROM <table> WHERE .. RETURNING <cols>`
pub fn delete_sql(c: &Collection, filters: &[Filter]) -> String {
    format!(
        "DELETE FROM {}{} RETURNING {}",
        c.table,
        where_clause(filters, 1),
        c.columns.join(", ")
    )
}
