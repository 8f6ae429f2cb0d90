//! Wire types for MCP over JSON-RPC 2.0.
//!
//! Only the message shapes the planner actually produces or consumes are
//! defined here: the three request/response/notification envelopes, and
//! the result payloads for `initialize`, `tools/list`, and `tools/call`.
//! Field casing follows the MCP wire format (camelCase on result
//! payloads, untouched on the JSON-RPC envelopes).

use serde::{Deserialize, Serialize};
use serde_json::Value;

use hearth_tools::ToolDefinition;

/// The MCP protocol revision this server reports during `initialize`.
pub const PROTOCOL_VERSION: &str = "2024-11-05";

// ── JSON-RPC 2.0 envelopes ──────────────────────────────────────────

/// Request: carries an id, so the caller expects exactly one response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: String,
    pub id: RpcId,
    pub method: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
}

/// Response: exactly one of `result` / `error` is present.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    pub id: RpcId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcError {
    pub code: i64,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

/// Notification: no id, and the caller must not wait for a reply.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcNotification {
    pub jsonrpc: String,
    pub method: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
}

/// Request ids arrive as JSON numbers or strings; both round-trip
/// unchanged into the response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(untagged)]
pub enum RpcId {
    Number(i64),
    String(String),
}

/// The JSON-RPC 2.0 reserved error codes.
pub mod error_codes {
    pub const PARSE_ERROR: i64 = -32700;
    pub const INVALID_REQUEST: i64 = -32600;
    pub const METHOD_NOT_FOUND: i64 = -32601;
    pub const INVALID_PARAMS: i64 = -32602;
    pub const INTERNAL_ERROR: i64 = -32603;
}

impl JsonRpcRequest {
    pub fn new(id: RpcId, method: impl Into<String>, params: Option<Value>) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            method: method.into(),
            params,
        }
    }
}

impl JsonRpcResponse {
    pub fn success(id: RpcId, result: Value) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: Some(result),
            error: None,
        }
    }

    pub fn error(id: RpcId, code: i64, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: None,
            error: Some(JsonRpcError {
                code,
                message: message.into(),
                data: None,
            }),
        }
    }
}

impl JsonRpcNotification {
    pub fn new(method: impl Into<String>, params: Option<Value>) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            method: method.into(),
            params,
        }
    }
}

// ── initialize ──────────────────────────────────────────────────────

/// What the server advertises back to a connecting agent. The incoming
/// `initialize` params are not inspected, so no parameter type exists.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializeResult {
    pub protocol_version: String,
    pub capabilities: ServerCapabilities,
    pub server_info: ServerInfo,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerCapabilities {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tools: Option<ToolsCapability>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolsCapability {
    #[serde(default)]
    pub list_changed: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerInfo {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

// ── tools/list ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListToolsResult {
    pub tools: Vec<ToolInfo>,
}

/// One catalogue entry as the agent sees it — a [`ToolDefinition`]
/// re-cased for the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolInfo {
    pub name: String,
    pub description: String,
    pub input_schema: Value,
}

impl From<ToolDefinition> for ToolInfo {
    fn from(def: ToolDefinition) -> Self {
        Self {
            name: def.name,
            description: def.description,
            input_schema: def.input_schema,
        }
    }
}

// ── tools/call ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallToolParams {
    pub name: String,
    #[serde(default)]
    pub arguments: Value,
}

/// Tool output: text content blocks, with `isError` present on the wire
/// only when set.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallToolResult {
    pub content: Vec<ToolContent>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_error: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ToolContent {
    Text { text: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn request_envelope_round_trips_with_params() {
        let req = JsonRpcRequest::new(
            RpcId::Number(7),
            "tools/call",
            Some(json!({"name": "menu_list", "arguments": {"week_start": "2024-01-01"}})),
        );
        let parsed: JsonRpcRequest =
            serde_json::from_str(&serde_json::to_string(&req).unwrap()).unwrap();
        assert_eq!(parsed.jsonrpc, "2.0");
        assert_eq!(parsed.id, RpcId::Number(7));
        assert_eq!(parsed.method, "tools/call");
        assert_eq!(parsed.params.unwrap()["name"], json!("menu_list"));
    }

    #[test]
    fn error_response_excludes_result() {
        let resp = JsonRpcResponse::error(
            RpcId::String("req-3".to_string()),
            error_codes::INVALID_PARAMS,
            "Invalid params: missing name",
        );
        let wire = serde_json::to_value(&resp).unwrap();
        assert!(wire.get("result").is_none());
        assert_eq!(wire["error"]["code"], json!(error_codes::INVALID_PARAMS));
        assert_eq!(wire["id"], json!("req-3"));
    }

    #[test]
    fn ids_keep_their_json_type() {
        assert_eq!(serde_json::to_string(&RpcId::Number(42)).unwrap(), "42");
        let parsed: RpcId = serde_json::from_str("\"42\"").unwrap();
        assert_eq!(parsed, RpcId::String("42".to_string()));
    }

    #[test]
    fn catalogue_entry_mirrors_a_definition() {
        let def = ToolDefinition {
            name: "weight_add".to_string(),
            description: "Insert a weight entry for a date.".to_string(),
            input_schema: json!({"type": "object", "required": ["date", "weight_kg"]}),
        };
        let info = ToolInfo::from(def);
        assert_eq!(info.name, "weight_add");
        let wire = serde_json::to_value(&info).unwrap();
        assert!(wire.get("inputSchema").is_some(), "schema key is camelCased");
    }

    #[test]
    fn successful_call_omits_is_error_from_the_wire() {
        let result = CallToolResult {
            content: vec![ToolContent::Text {
                text: r#"{"ok":true,"owner":"alice","items":[]}"#.to_string(),
            }],
            is_error: false,
        };
        let wire = serde_json::to_string(&result).unwrap();
        assert!(!wire.contains("isError"));
        let parsed: CallToolResult = serde_json::from_str(&wire).unwrap();
        assert!(!parsed.is_error);
    }

    #[test]
    fn failed_call_keeps_is_error() {
        let result = CallToolResult {
            content: vec![ToolContent::Text {
                text: "validation error: day_index must be between 1 and 7, got 9".to_string(),
            }],
            is_error: true,
        };
        let parsed: CallToolResult =
            serde_json::from_str(&serde_json::to_string(&result).unwrap()).unwrap();
        assert!(parsed.is_error);
    }

    #[test]
    fn initialize_result_is_camel_cased() {
        let result = InitializeResult {
            protocol_version: PROTOCOL_VERSION.to_string(),
            capabilities: ServerCapabilities {
                tools: Some(ToolsCapability { list_changed: false }),
            },
            server_info: ServerInfo {
                name: "hearth".to_string(),
                version: Some("0.1.0".to_string()),
            },
        };
        let wire = serde_json::to_value(&result).unwrap();
        assert_eq!(wire["protocolVersion"], json!(PROTOCOL_VERSION));
        assert_eq!(wire["serverInfo"]["name"], json!("hearth"));
    }
}
