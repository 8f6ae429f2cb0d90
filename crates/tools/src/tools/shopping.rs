//! Shopping list tools.
//!
//! Items are scoped by owner only; adds always insert (no natural key).

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};

use hearth_core::{scope, HearthError};
use hearth_store::{Arg, ChangeSet, Filter, SHOPPING_ITEMS};

use crate::tool::{parse_item_id, parse_params, Tool, ToolContext, ToolDefinition, ToolError};

fn owner_filter(owner: &str) -> Filter {
    Filter::eq("owner_id", Arg::Text(owner.to_string()))
}

// ── shopping_list ───────────────────────────────────────────────

pub struct ShoppingListTool;

#[derive(Deserialize)]
struct ListParams {
    owner: Option<String>,
    include_done: Option<bool>,
}

#[async_trait]
impl Tool for ShoppingListTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "shopping_list".to_string(),
            description: "List shopping items for an owner, newest first.".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "owner": { "type": "string", "description": "Owner id; defaults to the configured owner" },
                    "include_done": { "type": "boolean", "description": "Include checked-off items (default true)" }
                }
            }),
        }
    }

    async fn execute(&self, input: Value, context: &ToolContext) -> Result<Value, ToolError> {
        let p: ListParams = parse_params(input)?;
        let owner = scope::resolve_owner(p.owner.as_deref(), context.default_owner())?;

        let mut filters = vec![owner_filter(&owner)];
        if p.include_done == Some(false) {
            filters.push(Filter::eq("done", Arg::Bool(false)));
        }

        let items = context.store.list(&SHOPPING_ITEMS, &filters).await?;
        Ok(json!({ "ok": true, "owner": owner, "items": items }))
    }
}

// ── shopping_add ────────────────────────────────────────────────

pub struct ShoppingAddTool;

#[derive(Deserialize)]
struct AddParams {
    name: String,
    owner: Option<String>,
    category: Option<String>,
    qty: Option<String>,
    done: Option<bool>,
}

#[async_trait]
impl Tool for ShoppingAddTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "shopping_add".to_string(),
            description: "Add a shopping item.".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "name": { "type": "string", "description": "Item name" },
                    "owner": { "type": "string" },
                    "category": { "type": "string", "description": "Default 'Other'" },
                    "qty": { "type": "string", "description": "Default '1'" },
                    "done": { "type": "boolean", "description": "Default false" }
                },
                "required": ["name"]
            }),
        }
    }

    async fn execute(&self, input: Value, context: &ToolContext) -> Result<Value, ToolError> {
        let p: AddParams = parse_params(input)?;
        let owner = scope::resolve_owner(p.owner.as_deref(), context.default_owner())?;
        let name = p.name.trim();
        if name.is_empty() {
            return Err(HearthError::validation("name must not be empty").into());
        }

        let mut values = ChangeSet::new();
        values
            .set("owner_id", Arg::Text(owner.clone()))
            .set("name", Arg::Text(name.to_string()))
            .set("category", Arg::Text(p.category.unwrap_or_else(|| "Other".to_string())))
            .set("qty", Arg::Text(p.qty.unwrap_or_else(|| "1".to_string())))
            .set("done", Arg::Bool(p.done.unwrap_or(false)));

        let item = context.store.insert(&SHOPPING_ITEMS, values).await?;
        Ok(json!({ "ok": true, "owner": owner, "item": item }))
    }
}

// ── shopping_update ─────────────────────────────────────────────

pub struct ShoppingUpdateTool;

#[derive(Deserialize)]
struct UpdateParams {
    item_id: String,
    owner: Option<String>,
    name: Option<String>,
    category: Option<String>,
    qty: Option<String>,
    done: Option<bool>,
}

#[async_trait]
impl Tool for ShoppingUpdateTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "shopping_update".to_string(),
            description: "Update any subset of a shopping item's fields.".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "item_id": { "type": "string" },
                    "owner": { "type": "string" },
                    "name": { "type": "string" },
                    "category": { "type": "string" },
                    "qty": { "type": "string" },
                    "done": { "type": "boolean" }
                },
                "required": ["item_id"]
            }),
        }
    }

    async fn execute(&self, input: Value, context: &ToolContext) -> Result<Value, ToolError> {
        let p: UpdateParams = parse_params(input)?;

        let mut changes = ChangeSet::new();
        changes
            .set_opt("name", p.name.map(Arg::Text))
            .set_opt("category", p.category.map(Arg::Text))
            .set_opt("qty", p.qty.map(Arg::Text))
            .set_opt("done", p.done.map(Arg::Bool));
        if changes.is_empty() {
            return Ok(json!({ "ok": false, "error": "No fields to update" }));
        }

        let id = parse_item_id(&p.item_id)?;
        let owner = scope::resolve_owner(p.owner.as_deref(), context.default_owner())?;
        let filters = [Filter::eq("id", Arg::Uuid(id)), owner_filter(&owner)];

        let updated = context.store.update(&SHOPPING_ITEMS, &filters, changes).await?;
        Ok(json!({ "ok": true, "updated": updated }))
    }
}

// ── shopping_set_done ───────────────────────────────────────────

pub struct ShoppingSetDoneTool;

#[derive(Deserialize)]
struct SetDoneParams {
    item_id: String,
    owner: Option<String>,
    done: Option<bool>,
}

#[async_trait]
impl Tool for ShoppingSetDoneTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "shopping_set_done".to_string(),
            description: "Check or uncheck a shopping item (default: check).".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "item_id": { "type": "string" },
                    "owner": { "type": "string" },
                    "done": { "type": "boolean", "description": "Default true" }
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
        changes.set("done", Arg::Bool(p.done.unwrap_or(true)));
        let filters = [Filter::eq("id", Arg::Uuid(id)), owner_filter(&owner)];

        let updated = context.store.update(&SHOPPING_ITEMS, &filters, changes).await?;
        Ok(json!({ "ok": true, "updated": updated }))
    }
}

// ── shopping_delete ─────────────────────────────────────────────

pub struct ShoppingDeleteTool;

#[derive(Deserialize)]
struct DeleteParams {
    item_id: String,
    owner: Option<String>,
}

#[async_trait]
impl Tool for ShoppingDeleteTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "shopping_delete".to_string(),
            description: "Remove a shopping item.".to_string(),
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

        let deleted = context.store.delete(&SHOPPING_ITEMS, &filters).await?;
        Ok(json!({ "ok": true, "deleted": deleted }))
    }
}
