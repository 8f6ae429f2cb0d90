//! PostgreSQL row → JSON object mapping.

use chrono::{DateTime, Utc};
use serde_json::{Map, Number, Value};
use sqlx::postgres::PgRow;
use sqlx::{Column, Row, TypeInfo};
use uuid::Uuid;

/// Convert a row into a JSON object keyed by column name.
///
/// Columns with types outside the planner schema decode to `null` rather
/// than failing the whole read.
pub fn row_to_json(row: &PgRow) -> Value {
    let mut obj = Map::new();
    for column in row.columns() {
        let name = column.name();
        let value = match column.type_info().name() {
            "TEXT" | "VARCHAR" => row
                .try_get::<Option<String>, _>(name)
                .ok()
                .flatten()
                .map(Value::String),
            "UUID" => row
                .try_get::<Option<Uuid>, _>(name)
                .ok()
                .flatten()
                .map(|u| Value::String(u.to_string())),
            "INT2" => row
                .try_get::<Option<i16>, _>(name)
                .ok()
                .flatten()
                .map(|n| Value::Number(n.into())),
            "INT4" => row
                .try_get::<Option<i32>, _>(name)
                .ok()
                .flatten()
                .map(|n| Value::Number(n.into())),
            "INT8" => row
                .try_get::<Option<i64>, _>(name)
                .ok()
                .flatten()
                .map(|n| Value::Number(n.into())),
            "FLOAT4" => row
                .try_get::<Option<f32>, _>(name)
                .ok()
                .flatten()
                .and_then(|n| Number::from_f64(f64::from(n)))
                .map(Value::Number),
            "FLOAT8" => row
                .try_get::<Option<f64>, _>(name)
                .ok()
                .flatten()
                .and_then(Number::from_f64)
                .map(Value::Number),
            "BOOL" => row
                .try_get::<Option<bool>, _>(name)
                .ok()
                .flatten()
                .map(Value::Bool),
            "TIMESTAMPTZ" => row
                .try_get::<Option<DateTime<Utc>>, _>(name)
                .ok()
                .flatten()
                .map(|ts| Value::String(ts.to_rfc3339())),
            _ => None,
        };
        obj.insert(name.to_string(), value.unwrap_or(Value::Null));
    }
    Value::Object(obj)
}
