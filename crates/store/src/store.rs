//! Generic scoped accessor executing built queries against the pool.

use serde_json::{json, Value};
use sqlx::postgres::{PgArguments, PgRow};
use sqlx::query::Query;
use sqlx::{PgPool, Postgres};
use uuid::Uuid;

use crate::collection::{self, Arg, ChangeSet, Collection, Filter};
use crate::row::row_to_json;

/// Which branch an upsert took.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertMode {
    Inserted,
    Updated,
}

impl UpsertMode {
    pub fn as_str(self) -> &'static str {
        match self {
            UpsertMode::Inserted => "inserted",
            UpsertMode::Updated => "updated",
        }
    }
}

/// Thin handle over the connection pool. Cheap to clone.
#[derive(Clone)]
pub struct Store {
    pool: PgPool,
}

fn bind_arg<'q>(
    query: Query<'q, Postgres, PgArguments>,
    arg: Arg,
) -> Query<'q, Postgres, PgArguments> {
    match arg {
        Arg::Text(v) => query.bind(v),
        Arg::Int(v) => query.bind(v),
        Arg::Float(v) => query.bind(v),
        Arg::Bool(v) => query.bind(v),
        Arg::Uuid(v) => query.bind(v),
    }
}

impl Store {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    async fn fetch_rows(
        &self,
        sql: &str,
        args: impl IntoIterator<Item = Arg>,
    ) -> Result<Vec<PgRow>, sqlx::Error> {
        let mut query = sqlx::query(sql);
        for arg in args {
            query = bind_arg(query, arg);
        }
        query.fetch_all(&self.pool).await
    }

    /// Select every record matching the scope filters, in collection order.
    pub async fn list(
        &self,
        c: &Collection,
        filters: &[Filter],
    ) -> Result<Vec<Value>, sqlx::Error> {
        let sql = collection::select_sql(c, filters);
        let rows = self
            .fetch_rows(&sql, filters.iter().map(|f| f.value.clone()))
            .await?;
        Ok(rows.iter().map(row_to_json).collect())
    }

    /// Insert a fully-constructed record; returns the stored row, or an
    /// empty object when the store returns nothing.
    pub async fn insert(&self, c: &Collection, values: ChangeSet) -> Result<Value, sqlx::Error> {
        let sql = collection::insert_sql(c, &values);
        let rows = self.fetch_rows(&sql, values.into_args()).await?;
        Ok(rows.first().map(row_to_json).unwrap_or_else(|| json!({})))
    }

    /// Apply a change-set to every row matching the filters; returns the
    /// updated rows (empty when nothing matched — not an error).
    ///
    /// Callers are responsible for rejecting an empty change-set before
    /// reaching this method.
    pub async fn update(
        &self,
        c: &Collection,
        filters: &[Filter],
        changes: ChangeSet,
    ) -> Result<Vec<Value>, sqlx::Error> {
        let sql = collection::update_sql(c, &changes, filters);
        let args = changes
            .into_args()
            .into_iter()
            .chain(filters.iter().map(|f| f.value.clone()));
        let rows = self.fetch_rows(&sql, args).await?;
        Ok(rows.iter().map(row_to_json).collect())
    }

    /// Delete rows matching the filters; returns the deleted rows (possibly
    /// empty — not an error).
    pub async fn delete(
        &self,
        c: &Collection,
        filters: &[Filter],
    ) -> Result<Vec<Value>, sqlx::Error> {
        let sql = collection::delete_sql(c, filters);
        let rows = self
            .fetch_rows(&sql, filters.iter().map(|f| f.value.clone()))
            .await?;
        Ok(rows.iter().map(row_to_json).collect())
    }

    /// Insert-or-update by natural key.
    ///
    /// Looks up an existing row id by the natural-key filters; when found,
    /// replaces the mutable fields on that row (restricted to the id plus
    /// the same natural-key scope), otherwise inserts natural key + changes
    /// as a new record. The lookup-then-write sequence is not atomic: two
    /// concurrent upserts for the same natural key can both take the insert
    /// branch and leave duplicate rows.
    pub async fn upsert(
        &self,
        c: &Collection,
        natural_key: &[Filter],
        changes: ChangeSet,
    ) -> Result<(UpsertMode, Value), sqlx::Error> {
        let existing = self.lookup_id(c, natural_key).await?;

        match existing {
            Some(id) => {
                let mut filters = vec![Filter::eq("id", Arg::Uuid(id))];
                filters.extend_from_slice(natural_key);
                let updated = self.update(c, &filters, changes).await?;
                let row = updated.into_iter().next().unwrap_or_else(|| json!({}));
                Ok((UpsertMode::Updated, row))
            }
            None => {
                let mut values = ChangeSet::new();
                for f in natural_key {
                    values.set(f.column, f.value.clone());
                }
                for (col, v) in changes.entries() {
                    values.set(col, v.clone());
                }
                let row = self.insert(c, values).await?;
                Ok((UpsertMode::Inserted, row))
            }
        }
    }

    async fn lookup_id(
        &self,
        c: &Collection,
        filters: &[Filter],
    ) -> Result<Option<Uuid>, sqlx::Error> {
        let sql = collection::select_id_sql(c, filters);
        let mut query = sqlx::query_scalar::<_, Uuid>(&sql);
        for f in filters {
            query = match f.value.clone() {
                Arg::Text(v) => query.bind(v),
                Arg::Int(v) => query.bind(v),
                Arg::Float(v) => query.bind(v),
                Arg::Bool(v) => query.bind(v),
                Arg::Uuid(v) => query.bind(v),
            };
        }
        query.fetch_optional(&self.pool).await
    }
}
