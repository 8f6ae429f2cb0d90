//! Weight log tools.
//!
//! Entries are scoped by owner; (owner, date) is the natural key for
//! `weight_upsert_by_date`.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};

use hearth_core::scope;
use hearth_store::{Arg, ChangeSet, Filter, WEIGHT_ENTRIES};

use crate::tool::{parse_item_id, parse_params, Tool, ToolContext, ToolDefinition, ToolError};

fn owner_filter(owner: &str) -> Filter {
    Filter::eq("owner_id", Arg::Text(owner.to_string()))
}

// ── weight_list ─────────────────────────────────────────────────

pub struct WeightListTool;

#[derive(Deserialize)]
struct ListParams {
    owner: Option<String>,
}

#[async_trait]
impl Tool for WeightListTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "weight_list".to_string(),
            description: "List weight entries for an owner, oldest first.".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "owner": { "type": "string" }
                }
            }),
        }
    }

    async fn execute(&self, input: Value, context: &ToolContext) -> Result<Value, ToolError> {
        let p: ListParams = parse_params(input)?;
        let owner = scope::resolve_owner(p.owner.as_deref(), context.default_owner())?;

        let items = context
            .store
            .list(&WEIGHT_ENTRIES, &[owner_filter(&owner)])
            .await?;
        Ok(json!({ "ok": true, "owner": owner, "items": items }))
    }
}

// ── weight_add ──────────────────────────────────────────────────

pub struct WeightAddTool;

#[derive(Deserialize)]
struct AddParams {
    date: Option<String>,
    weight_kg: Option<Value>,
    owner: Option<String>,
    notes: Option<String>,
}

#[async_trait]
impl Tool for WeightAddTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "weight_add".to_string(),
            description: "Insert a weight entry for a date.".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "date": { "type": "string", "description": "Entry date, YYYY-MM-DD" },
                    "weight_kg": { "type": "number", "description": "Weight in kilograms; numeric strings accepted" },
                    "owner": { "type": "string" },
                    "notes": { "type": "string" }
                },
                "required": ["date", "weight_kg"]
            }),
        }
    }

    async fn execute(&self, input: Value, context: &ToolContext) -> Result<Value, ToolError> {
        let p: AddParams = parse_params(input)?;
        let owner = scope::resolve_owner(p.owner.as_deref(), context.default_owner())?;
        let date = scope::resolve_date(p.date.as_deref())?;
        let weight = scope::resolve_weight(p.weight_kg.as_ref())?;

        let mut values = ChangeSet::new();
        values
            .set("owner_id", Arg::Text(owner.clone()))
            .set("entry_date", Arg::Text(date))
            .set("weight_kg", Arg::Float(weight))
            .set("notes", Arg::Text(p.notes.unwrap_or_default()));

        let item = context.store.insert(&WEIGHT_ENTRIES, values).await?;
        Ok(json!({ "ok": true, "owner": owner, "item": item }))
    }
}

// ── weight_update ───────────────────────────────────────────────

pub struct WeightUpdateTool;

#[derive(Deserialize)]
struct UpdateParams {
    item_id: String,
    owner: Option<String>,
    weight_kg: Option<Value>,
    notes: Option<String>,
}

#[async_trait]
impl Tool for WeightUpdateTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "weight_update".to_string(),
            description: "Update a weight entry's weight or notes.".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "item_id": { "type": "string" },
                    "owner": { "type": "string" },
                    "weight_kg": { "type": "number", "description": "Numeric strings accepted" },
                    "notes": { "type": "string" }
                },
                "required": ["item_id"]
            }),
        }
    }

    async fn execute(&self, input: Value, context: &ToolContext) -> Result<Value, ToolError> {
        let p: UpdateParams = parse_params(input)?;

        let mut changes = ChangeSet::new();
        if let Some(candidate) = p.weight_kg.as_ref() {
            changes.set("weight_kg", Arg::Float(scope::resolve_weight(Some(candidate))?));
        }
        changes.set_opt("notes", p.notes.map(Arg::Text));
        if changes.is_empty() {
            return Ok(json!({ "ok": false, "error": "No fields to update" }));
        }

        let id = parse_item_id(&p.item_id)?;
        let owner = scope::resolve_owner(p.owner.as_deref(), context.default_owner())?;
        let filters = [Filter::eq("id", Arg::Uuid(id)), owner_filter(&owner)];

        let updated = context.store.update(&WEIGHT_ENTRIES, &filters, changes).await?;
        Ok(json!({ "ok": true, "updated": updated }))
    }
}

// ── weight_delete ───────────────────────────────────────────────

pub struct WeightDeleteTool;

#[derive(Deserialize)]
struct DeleteParams {
    item_id: String,
    owner: Option<String>,
}

#[async_trait]
impl Tool for WeightDeleteTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "weight_delete".to_string(),
            description: "Remove a weight entry.".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "item_id": { "type": "string" },
                    "owner": { "type": "string" }
                },
                "required": ["item_id"]
            }),
        }
    }

    async fn execute(&self, input: Value, context: &ToolContext) -> Result<Value, ToolError> {
        let p: DeleteParams = parse_params(input)?;
        let id = parse_item_id(&p.item_id)?;
        let owner = scope::resolve_owner(p.owner.as_deref(), context.default_owner())?;
        let filters = [Filter::eq("id", Arg::Uuid(id)), owner_filter(&owner)];

        let deleted = context.store.delete(&WEIGHT_ENTRIES, &filters).await?;
        Ok(json!({ "ok": true, "deleted": deleted }))
    }
}

// ── weight_upsert_by_date ───────────────────────────────────────

pub struct WeightUpsertByDateTool;

#[derive(Deserialize)]
struct UpsertParams {
    date: Option<String>,
    weight_kg: Option<Value>,
    owner: Option<String>,
    notes: Option<String>,
}

#[async_trait]
impl Tool for WeightUpsertByDateTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "weight_upsert_by_date".to_string(),
            description: "Insert or replace the weight entry for a date, keyed by \
                          (owner, date). The update branch replaces weight and notes \
                          with this call's values."
                .to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "date": { "type": "string", "description": "Entry date, YYYY-MM-DD" },
                    "weight_kg": { "type": "number", "description": "Numeric strings accepted" },
                    "owner": { "type": "string" },
                    "notes": { "type": "string" }
                },
                "required": ["date", "weight_kg"]
            }),
        }
    }

    async fn execute(&self, input: Value, context: &ToolContext) -> Result<Value, ToolError> {
        let p: UpsertParams = parse_params(input)?;
        let owner = scope::resolve_owner(p.owner.as_deref(), context.default_owner())?;
        let date = scope::resolve_date(p.date.as_deref())?;
        let weight = scope::resolve_weight(p.weight_kg.as_ref())?;

        let natural_key = [
            owner_filter(&owner),
            Filter::eq("entry_date", Arg::Text(date)),
        ];

        let mut changes = ChangeSet::new();
        changes
            .set("weight_kg", Arg::Float(weight))
            .set("notes", Arg::Text(p.notes.unwrap_or_default()));

        let (mode, item) = context
            .store
            .upsert(&WEIGHT_ENTRIES, &natural_key, changes)
            .await?;
        Ok(json!({ "ok": true, "mode": mode.as_str(), "item": item }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::test_support::test_context;
    use hearth_core::HearthError;

    #[tokio::test]
    async fn add_rejects_non_numeric_weight_before_the_store() {
        let ctx = test_context(Some("alice"));
        let err = WeightAddTool
            .execute(json!({"date": "2024-01-01", "weight_kg": "abc"}), &ctx)
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::Scope(HearthError::Validation(_))));
    }

    #[tokio::test]
    async fn add_requires_a_date() {
        let ctx = test_context(Some("alice"));
        let err = WeightAddTool
            .execute(json!({"date": "  ", "weight_kg": 70}), &ctx)
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::Scope(HearthError::Validation(_))));
    }

    #[tokio::test]
    async fn upsert_validates_weight_before_the_lookup() {
        let ctx = test_context(Some("alice"));
        let err = WeightUpsertByDateTool
            .execute(json!({"date": "2024-01-01", "weight_kg": "heavy"}), &ctx)
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::Scope(HearthError::Validation(_))));
    }

    #[tokio::test]
    async fn update_with_no_fields_is_a_soft_failure() {
        let ctx = test_context(Some("alice"));
        let out = WeightUpdateTool
            .execute(
                json!({"item_id": "5f64a2bc-97a8-4b6c-9f35-6a2c66a1d3a2"}),
                &ctx,
            )
            .await
            .unwrap();
        assert_eq!(out, json!({"ok": false, "error": "No fields to update"}));
    }

    #[tokio::test]
    async fn update_rejects_malformed_weight_even_with_other_fields() {
        let ctx = test_context(Some("alice"));
        let err = WeightUpdateTool
            .execute(
                json!({
                    "item_id": "5f64a2bc-97a8-4b6c-9f35-6a2c66a1d3a2",
                    "weight_kg": "abc",
                    "notes": "x"
                }),
                &ctx,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::Scope(HearthError::Validation(_))));
    }
}
