//! Tools that report server configuration rather than touch collections.

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::tool::{Tool, ToolContext, ToolDefinition, ToolError};

/// Reports the configured default owner id, if any.
pub struct DefaultOwnerTool;

#[async_trait]
impl Tool for DefaultOwnerTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "default_owner".to_string(),
            description: "Report the owner id used when a call omits one.".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {}
            }),
        }
    }

    async fn execute(&self, _input: Value, context: &ToolContext) -> Result<Value, ToolError> {
        Ok(json!({
            "ok": true,
            "owner": context.default_owner(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::test_support::test_context;
    use serde_json::json;

    #[tokio::test]
    async fn reports_configured_default() {
        let ctx = test_context(Some("alice"));
        let out = DefaultOwnerTool.execute(json!({}), &ctx).await.unwrap();
        assert_eq!(out, json!({"ok": true, "owner": "alice"}));
    }

    #[tokio::test]
    async fn reports_null_when_unconfigured() {
        let ctx = test_context(None);
        let out = DefaultOwnerTool.execute(json!({}), &ctx).await.unwrap();
        assert_eq!(out, json!({"ok": true, "owner": null}));
    }
}
