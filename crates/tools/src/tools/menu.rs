//! Weekly menu tools.
//!
//! Menu days are scoped by owner and week start (a `YYYY-MM-DD` string for
//! the Monday of the week), with `day_index` 1..=7 inside the week. The
//! natural key (owner, week_start, day_index) drives `menu_upsert_day`.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};

use hearth_core::scope;
use hearth_store::{Arg, ChangeSet, Filter, MENU_DAYS};

use crate::tool::{parse_item_id, parse_params, Tool, ToolContext, ToolDefinition, ToolError};

fn owner_filter(owner: &str) -> Filter {
    Filter::eq("owner_id", Arg::Text(owner.to_string()))
}

// ── menu_list ───────────────────────────────────────────────────

pub struct MenuListTool;

#[derive(Deserialize)]
struct ListParams {
    week_start: Option<String>,
    owner: Option<String>,
}

#[async_trait]
impl Tool for MenuListTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "menu_list".to_string(),
            description: "List a week's menu days in day order.".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "week_start": { "type": "string", "description": "Week start date, YYYY-MM-DD" },
                    "owner": { "type": "string" }
                },
                "required": ["week_start"]
            }),
        }
    }

    async fn execute(&self, input: Value, context: &ToolContext) -> Result<Value, ToolError> {
        let p: ListParams = parse_params(input)?;
        let owner = scope::resolve_owner(p.owner.as_deref(), context.default_owner())?;
        let week_start = scope::resolve_week_start(p.week_start.as_deref())?;

        let filters = [
            owner_filter(&owner),
            Filter::eq("week_start", Arg::Text(week_start)),
        ];
        let items = context.store.list(&MENU_DAYS, &filters).await?;
        Ok(json!({ "ok": true, "owner": owner, "items": items }))
    }
}

// ── menu_add ────────────────────────────────────────────────────

pub struct MenuAddTool;

#[derive(Deserialize)]
struct AddParams {
    day_index: Option<Value>,
    week_start: Option<String>,
    owner: Option<String>,
    breakfast: Option<String>,
    lunch: Option<String>,
    dinner: Option<String>,
    is_done: Option<bool>,
}

#[async_trait]
impl Tool for MenuAddTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "menu_add".to_string(),
            description: "Insert a menu day entry.".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "day_index": { "type": "integer", "description": "1 (Monday) through 7 (Sunday)" },
                    "week_start": { "type": "string", "description": "Week start date, YYYY-MM-DD" },
                    "owner": { "type": "string" },
                    "breakfast": { "type": "string" },
                    "lunch": { "type": "string" },
                    "dinner": { "type": "string" },
                    "is_done": { "type": "boolean" }
                },
                "required": ["day_index", "week_start"]
            }),
        }
    }

    async fn execute(&self, input: Value, context: &ToolContext) -> Result<Value, ToolError> {
        let p: AddParams = parse_params(input)?;
        let owner = scope::resolve_owner(p.owner.as_deref(), context.default_owner())?;
        let week_start = scope::resolve_week_start(p.week_start.as_deref())?;
        let day_index = scope::resolve_day_index(p.day_index.as_ref())?;

        let mut values = ChangeSet::new();
        values
            .set("owner_id", Arg::Text(owner.clone()))
            .set("week_start", Arg::Text(week_start))
            .set("day_index", Arg::Int(day_index))
            .set("breakfast", Arg::Text(p.breakfast.unwrap_or_default()))
            .set("lunch", Arg::Text(p.lunch.unwrap_or_default()))
            .set("dinner", Arg::Text(p.dinner.unwrap_or_default()))
            .set("is_done", Arg::Bool(p.is_done.unwrap_or(false)));

        let item = context.store.insert(&MENU_DAYS, values).await?;
        Ok(json!({ "ok": true, "owner": owner, "item": item }))
    }
}

// ── menu_update ─────────────────────────────────────────────────

pub struct MenuUpdateTool;

#[derive(Deserialize)]
struct UpdateParams {
    item_id: String,
    owner: Option<String>,
    week_start: Option<String>,
    breakfast: Option<String>,
    lunch: Option<String>,
    dinner: Option<String>,
    is_done: Option<bool>,
}

#[async_trait]
impl Tool for MenuUpdateTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "menu_update".to_string(),
            description: "Update any subset of a menu day's meals or done flag.".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "item_id": { "type": "string" },
                    "owner": { "type": "string" },
                    "week_start": { "type": "string", "description": "Extra scope filter when supplied" },
                    "breakfast": { "type": "string" },
                    "lunch": { "type": "string" },
                    "dinner": { "type": "string" },
                    "is_done": { "type": "boolean" }
                },
                "required": ["item_id"]
            }),
        }
    }

    async fn execute(&self, input: Value, context: &ToolContext) -> Result<Value, ToolError> {
        let p: UpdateParams = parse_params(input)?;

        let mut changes = ChangeSet::new();
        changes
            .set_opt("breakfast", p.breakfast.map(Arg::Text))
            .set_opt("lunch", p.lunch.map(Arg::Text))
            .set_opt("dinner", p.dinner.map(Arg::Text))
            .set_opt("is_done", p.is_done.map(Arg::Bool));
        if changes.is_empty() {
            return Ok(json!({ "ok": false, "error": "No fields to update" }));
        }

        let id = parse_item_id(&p.item_id)?;
        let owner = scope::resolve_owner(p.owner.as_deref(), context.default_owner())?;
        let mut filters = vec![Filter::eq("id", Arg::Uuid(id)), owner_filter(&owner)];
        if let Some(week) = p.week_start.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            filters.push(Filter::eq("week_start", Arg::Text(week.to_string())));
        }

        let updated = context.store.update(&MENU_DAYS, &filters, changes).await?;
        Ok(json!({ "ok": true, "updated": updated }))
    }
}

// ── menu_set_done ───────────────────────────────────────────────

pub struct MenuSetDoneTool;

#[derive(Deserialize)]
struct SetDoneParams {
    item_id: String,
    owner: Option<String>,
    is_done: Option<bool>,
}

#[async_trait]
impl Tool for MenuSetDoneTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "menu_set_done".to_string(),
            description: "Mark a menu day as done or not done (default: done).".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "item_id": { "type": "string" },
                    "owner": { "type": "string" },
                    "is_done": { "type": "boolean", "description": "Default true" }
                },
                "required": ["item_id"]
            }),
        }
    }

    async fn execute(&self, input: Value, context: &ToolContext) -> Result<Value, ToolError> {
        let p: SetDoneParams = parse_params(input)?;
        let id = parse_item_id(&p.item_id)?;
        let owner = scope::resolve_owner(p.owner.as_deref(), context.default_owner())?;

        let mut changes = ChangeSet::new();
        changes.set("is_done", Arg::Bool(p.is_done.unwrap_or(true)));
        let filters = [Filter::eq("id", Arg::Uuid(id)), owner_filter(&owner)];

        let updated = context.store.update(&MENU_DAYS, &filters, changes).await?;
        Ok(json!({ "ok": true, "updated": updated }))
    }
}

// ── menu_delete ─────────────────────────────────────────────────

pub struct MenuDeleteTool;

#[derive(Deserialize)]
struct DeleteParams {
    item_id: String,
    owner: Option<String>,
    week_start: Option<String>,
}

#[async_trait]
impl Tool for MenuDeleteTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "menu_delete".to_string(),
            description: "Remove a menu day entry.".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "item_id": { "type": "string" },
                    "owner": { "type": "string" },
                    "week_start": { "type": "string", "description": "Extra scope filter when supplied" }
                },
                "required": ["item_id"]
            }),
        }
    }

    async fn execute(&self, input: Value, context: &ToolContext) -> Result<Value, ToolError> {
        let p: DeleteParams = parse_params(input)?;
        let id = parse_item_id(&p.item_id)?;
        let owner = scope::resolve_owner(p.owner.as_deref(), context.default_owner())?;

        let mut filters = vec![Filter::eq("id", Arg::Uuid(id)), owner_filter(&owner)];
        if let Some(week) = p.week_start.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            filters.push(Filter::eq("week_start", Arg::Text(week.to_string())));
        }

        let deleted = context.store.delete(&MENU_DAYS, &filters).await?;
        Ok(json!({ "ok": true, "deleted": deleted }))
    }
}

// ── menu_upsert_day ─────────────────────────────────────────────

pub struct MenuUpsertDayTool;

#[derive(Deserialize)]
struct UpsertParams {
    day_index: Option<Value>,
    week_start: Option<String>,
    owner: Option<String>,
    breakfast: Option<String>,
    lunch: Option<String>,
    dinner: Option<String>,
    is_done: Option<bool>,
}

#[async_trait]
impl Tool for MenuUpsertDayTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "menu_upsert_day".to_string(),
            description: "Insert or replace the menu for one day of a week, keyed by \
                          (owner, week_start, day_index). The update branch replaces all \
                          meal fields with this call's values."
                .to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "day_index": { "type": "integer", "description": "1 (Monday) through 7 (Sunday)" },
                    "week_start": { "type": "string", "description": "Week start date, YYYY-MM-DD" },
                    "owner": { "type": "string" },
                    "breakfast": { "type": "string" },
                    "lunch": { "type": "string" },
                    "dinner": { "type": "string" },
                    "is_done": { "type": "boolean" }
                },
                "required": ["day_index", "week_start"]
            }),
        }
    }

    async fn execute(&self, input: Value, context: &ToolContext) -> Result<Value, ToolError> {
        let p: UpsertParams = parse_params(input)?;
        let owner = scope::resolve_owner(p.owner.as_deref(), context.default_owner())?;
        let week_start = scope::resolve_week_start(p.week_start.as_deref())?;
        let day_index = scope::resolve_day_index(p.day_index.as_ref())?;

        let natural_key = [
            owner_filter(&owner),
            Filter::eq("week_start", Arg::Text(week_start)),
            Filter::eq("day_index", Arg::Int(day_index)),
        ];

        // Wholesale replacement: omitted meals reset to their defaults.
        let mut changes = ChangeSet::new();
        changes
            .set("breakfast", Arg::Text(p.breakfast.unwrap_or_default()))
            .set("lunch", Arg::Text(p.lunch.unwrap_or_default()))
            .set("dinner", Arg::Text(p.dinner.unwrap_or_default()))
            .set("is_done", Arg::Bool(p.is_done.unwrap_or(false)));

        let (mode, item) = context.store.upsert(&MENU_DAYS, &natural_key, changes).await?;
        Ok(json!({ "ok": true, "mode": mode.as_str(), "item": item }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::test_support::test_context;
    use hearth_core::HearthError;

    #[tokio::test]
    async fn add_rejects_out_of_range_day_index_before_the_store() {
        let ctx = test_context(Some("alice"));
        for bad in [json!(0), json!(8), json!(-1), json!("wed")] {
            let err = MenuAddTool
                .execute(json!({"day_index": bad, "week_start": "2024-01-01"}), &ctx)
                .await
                .unwrap_err();
            assert!(matches!(err, ToolError::Scope(HearthError::Validation(_))));
        }
    }

    #[tokio::test]
    async fn list_requires_week_start() {
        let ctx = test_context(Some("alice"));
        let err = MenuListTool.execute(json!({}), &ctx).await.unwrap_err();
        assert!(matches!(err, ToolError::Scope(HearthError::Validation(_))));
    }

    #[tokio::test]
    async fn upsert_requires_week_start_and_day_index() {
        let ctx = test_context(Some("alice"));
        let err = MenuUpsertDayTool
            .execute(json!({"week_start": "2024-01-01"}), &ctx)
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::Scope(HearthError::Validation(_))));
        let err = MenuUpsertDayTool
            .execute(json!({"day_index": 3}), &ctx)
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::Scope(HearthError::Validation(_))));
    }

    #[tokio::test]
    async fn update_with_no_fields_is_a_soft_failure() {
        let ctx = test_context(Some("alice"));
        let out = MenuUpdateTool
            .execute(
                json!({"item_id": "5f64a2bc-97a8-4b6c-9f35-6a2c66a1d3a2"}),
                &ctx,
            )
            .await
            .unwrap();
        assert_eq!(out, json!({"ok": false, "error": "No fields to update"}));
    }
}
