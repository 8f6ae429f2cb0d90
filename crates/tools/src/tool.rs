use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use hearth_core::HearthError;
use hearth_store::Store;

/// Describes a tool's interface for MCP clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Unique tool name (e.g. "shopping_add", "weight_upsert_by_date")
    pub name: String,
    /// Human-readable description for the caller
    pub description: String,
    /// JSON Schema describing the expected input
    pub input_schema: Value,
}

/// Shared state passed to every tool execution.
pub struct ToolContext {
    pub store: Store,
    /// Owner id used when a call does not supply one.
    pub default_owner: Option<String>,
}

impl ToolContext {
    pub fn new(store: Store, default_owner: Option<String>) -> Self {
        Self {
            store,
            default_owner,
        }
    }

    pub fn default_owner(&self) -> Option<&str> {
        self.default_owner.as_deref()
    }
}

/// The primary extension point: all planner operations implement this trait.
///
/// `execute` returns the JSON response envelope on success (including the
/// soft failure `{ok:false, ...}` shapes); a returned error is a fault.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Returns the tool's definition (name, description, JSON Schema).
    fn definition(&self) -> ToolDefinition;

    /// Execute the tool with the given JSON input.
    async fn execute(&self, input: Value, context: &ToolContext) -> Result<Value, ToolError>;
}

#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    /// The input did not match the tool's schema.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Validation or configuration failure, raised before any store call.
    #[error(transparent)]
    Scope(#[from] HearthError),

    /// Store-level failure, propagated unmodified.
    #[error(transparent)]
    Store(#[from] sqlx::Error),
}

/// Deserialize tool input into a typed parameter struct.
pub fn parse_params<T: DeserializeOwned>(input: Value) -> Result<T, ToolError> {
    serde_json::from_value(input).map_err(|e| ToolError::InvalidInput(e.to_string()))
}

/// Item identifiers are store-assigned UUIDs; reject malformed ones before
/// touching the store.
pub fn parse_item_id(item_id: &str) -> Result<Uuid, ToolError> {
    Uuid::parse_str(item_id.trim())
        .map_err(|_| HearthError::validation(format!("item_id is not a valid id: '{item_id}'")).into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Deserialize)]
    struct Params {
        name: String,
        done: Option<bool>,
    }

    #[test]
    fn parse_params_maps_schema_mismatch_to_invalid_input() {
        let err = parse_params::<Params>(json!({"done": true})).unwrap_err();
        assert!(matches!(err, ToolError::InvalidInput(_)));
    }

    #[test]
    fn parse_params_keeps_presence_information() {
        let p: Params = parse_params(json!({"name": "milk", "done": false})).unwrap();
        assert_eq!(p.name, "milk");
        assert_eq!(p.done, Some(false));
        let p: Params = parse_params(json!({"name": "milk"})).unwrap();
        assert_eq!(p.done, None);
    }

    #[test]
    fn item_id_must_be_a_uuid() {
        assert!(parse_item_id("5f64a2bc-97a8-4b6c-9f35-6a2c66a1d3a2").is_ok());
        let err = parse_item_id("not-a-uuid").unwrap_err();
        assert!(matches!(err, ToolError::Scope(HearthError::Validation(_))));
    }
}
