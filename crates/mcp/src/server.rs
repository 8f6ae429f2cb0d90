//! MCP server implementation.
//!
//! Wraps a `ToolRegistry` and exposes its tools over the MCP protocol.
//! Dispatch is stateless per request, so handlers take `&self` and one
//! server instance can serve stdio and HTTP callers alike.

use serde_json::Value;

use hearth_tools::{Tool, ToolContext, ToolRegistry};

use crate::error::McpError;
use crate::transport::McpTransport;
use crate::types::*;

/// MCP server that bridges a `ToolRegistry` to MCP clients.
pub struct McpServer {
    registry: ToolRegistry,
    context: ToolContext,
    server_name: String,
    server_version: String,
}

impl McpServer {
    /// Create a new MCP server wrapping the given tool registry.
    ///
    /// The context is handed to every tool call; it carries the store
    /// handle and the configured default owner.
    pub fn new(registry: ToolRegistry, context: ToolContext) -> Self {
        Self {
            registry,
            context,
            server_name: "hearth".to_string(),
            server_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// Set the server name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.server_name = name.into();
        self
    }

    /// Run the server loop, reading from and writing to the transport.
    ///
    /// Processes JSON-RPC requests until the transport is closed.
    pub async fn run<T: McpTransport>(&self, transport: &mut T) -> Result<(), McpError> {
        tracing::info!(server = %self.server_name, "MCP server starting");

        loop {
            let line = match transport.receive().await? {
                Some(line) => line,
                None => {
                    tracing::info!("Transport closed, shutting down");
                    break;
                }
            };

            tracing::debug!(message = %line, "Received message");

            // Distinguish requests (have "id") from notifications (no "id")
            // by parsing as generic Value first.
            let raw: Value = match serde_json::from_str(&line) {
                Ok(v) => v,
                Err(e) => {
                    tracing::warn!(error = %e, "Failed to parse JSON");
                    let resp = JsonRpcResponse {
                        jsonrpc: "2.0".to_string(),
                        id: RpcId::Number(0),
                        result: None,
                        error: Some(McpError::JsonParse(e).to_rpc_error()),
                    };
                    let json = serde_json::to_string(&resp)?;
                    transport.send(&json).await?;
                    continue;
                }
            };

            // If no "id" field, treat as notification
            if raw.get("id").is_none() {
                if let Ok(notif) = serde_json::from_value::<JsonRpcNotification>(raw) {
                    self.handle_notification(&notif);
                }
                continue;
            }

            // Parse as a request
            let request: JsonRpcRequest = match serde_json::from_value(raw) {
                Ok(req) => req,
                Err(e) => {
                    tracing::warn!(error = %e, "Failed to parse JSON-RPC request");
                    let resp = JsonRpcResponse {
                        jsonrpc: "2.0".to_string(),
                        id: RpcId::Number(0),
                        result: None,
                        error: Some(McpError::JsonParse(e).to_rpc_error()),
                    };
                    let json = serde_json::to_string(&resp)?;
                    transport.send(&json).await?;
                    continue;
                }
            };

            let response = self.handle_request(&request).await;
            let json = serde_json::to_string(&response)?;
            tracing::debug!(response = %json, "Sending response");
            transport.send(&json).await?;
        }

        Ok(())
    }

    /// Handle a single JSON-RPC request and produce a response.
    pub async fn handle_request(&self, request: &JsonRpcRequest) -> JsonRpcResponse {
        let id = request.id.clone();

        match request.method.as_str() {
            "initialize" => self.handle_initialize(id),
            "tools/list" => self.handle_list_tools(id),
            "tools/call" => self.handle_call_tool(id, &request.params).await,
            method => {
                tracing::warn!(method = %method, "Unknown method");
                let err = McpError::MethodNotFound(method.to_string());
                JsonRpcResponse::error(id, err.to_rpc_error().code, err.to_string())
            }
        }
    }

    /// Handle a notification. Notifications never produce a response.
    pub fn handle_notification(&self, notif: &JsonRpcNotification) {
        match notif.method.as_str() {
            "notifications/initialized" => {
                tracing::info!("Client confirmed initialization");
            }
            "notifications/cancelled" => {
                tracing::debug!("Client cancelled a request");
            }
            method => {
                tracing::debug!(method = %method, "Unknown notification, ignoring");
            }
        }
    }

    fn handle_initialize(&self, id: RpcId) -> JsonRpcResponse {
        tracing::info!("Handling initialize");

        let result = InitializeResult {
            protocol_version: PROTOCOL_VERSION.to_string(),
            capabilities: ServerCapabilities {
                tools: Some(ToolsCapability { list_changed: false }),
            },
            server_info: ServerInfo {
                name: self.server_name.clone(),
                version: Some(self.server_version.clone()),
            },
        };

        match serde_json::to_value(result) {
            Ok(val) => JsonRpcResponse::success(id, val),
            Err(e) => {
                let err = McpError::JsonParse(e);
                JsonRpcResponse::error(id, err.to_rpc_error().code, err.to_string())
            }
        }
    }

    fn handle_list_tools(&self, id: RpcId) -> JsonRpcResponse {
        tracing::debug!("Handling tools/list");

        let tools: Vec<ToolInfo> =
            self.registry.list().into_iter().map(ToolInfo::from).collect();
        let result = ListToolsResult { tools };

        match serde_json::to_value(result) {
            Ok(val) => JsonRpcResponse::success(id, val),
            Err(e) => {
                let err = McpError::JsonParse(e);
                JsonRpcResponse::error(id, err.to_rpc_error().code, err.to_string())
            }
        }
    }

    async fn handle_call_tool(&self, id: RpcId, params: &Option<Value>) -> JsonRpcResponse {
        let params = match params {
            Some(p) => p,
            None => {
                let err = McpError::InvalidParams("missing params".to_string());
                return JsonRpcResponse::error(id, err.to_rpc_error().code, err.to_string());
            }
        };

        let call_params: CallToolParams = match serde_json::from_value(params.clone()) {
            Ok(p) => p,
            Err(e) => {
                let err = McpError::InvalidParams(e.to_string());
                return JsonRpcResponse::error(id, err.to_rpc_error().code, err.to_string());
            }
        };

        tracing::debug!(tool = %call_params.name, "Handling tools/call");

        let tool = match self.registry.get(&call_params.name) {
            Some(t) => t,
            None => {
                let err = McpError::ToolNotFound(call_params.name.clone());
                return JsonRpcResponse::error(id, err.to_rpc_error().code, err.to_string());
            }
        };

        // Tool failures surface as tool-level errors inside a successful
        // JSON-RPC response, so clients can show them to the model.
        let result = match tool.execute(call_params.arguments, &self.context).await {
            Ok(envelope) => CallToolResult {
                content: vec![ToolContent::Text {
                    text: envelope.to_string(),
                }],
                is_error: false,
            },
            Err(e) => {
                tracing::warn!(tool = %call_params.name, error = %e, "Tool call failed");
                CallToolResult {
                    content: vec![ToolContent::Text {
                        text: e.to_string(),
                    }],
                    is_error: true,
                }
            }
        };

        match serde_json::to_value(result) {
            Ok(val) => JsonRpcResponse::success(id, val),
            Err(e) => {
                let err = McpError::JsonParse(e);
                JsonRpcResponse::error(id, err.to_rpc_error().code, err.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::ChannelTransport;
    use hearth_store::Store;
    use hearth_tools::register_all;
    use sqlx::postgres::PgPoolOptions;

    fn test_context() -> ToolContext {
        let pool = PgPoolOptions::new()
            .connect_lazy("postgres://nobody@localhost:1/unreachable")
            .expect("lazy pool construction");
        ToolContext::new(Store::new(pool), Some("alice".to_string()))
    }

    fn test_server() -> McpServer {
        let mut registry = ToolRegistry::new();
        register_all(&mut registry).unwrap();
        McpServer::new(registry, test_context())
    }

    #[tokio::test]
    async fn test_handle_initialize() {
        let server = test_server();
        let req = JsonRpcRequest::new(
            RpcId::Number(1),
            "initialize",
            Some(serde_json::json!({
                "protocolVersion": PROTOCOL_VERSION,
                "capabilities": {},
                "clientInfo": {"name": "test-client"}
            })),
        );

        let resp = server.handle_request(&req).await;
        assert!(resp.error.is_none());
        let result: InitializeResult =
            serde_json::from_value(resp.result.unwrap()).unwrap();
        assert_eq!(result.protocol_version, PROTOCOL_VERSION);
        assert_eq!(result.server_info.name, "hearth");
    }

    #[tokio::test]
    async fn test_handle_list_tools() {
        let server = test_server();
        let req = JsonRpcRequest::new(RpcId::Number(2), "tools/list", None);

        let resp = server.handle_request(&req).await;
        assert!(resp.error.is_none());
        let result: ListToolsResult =
            serde_json::from_value(resp.result.unwrap()).unwrap();
        assert_eq!(result.tools.len(), 17);
        assert!(result.tools.iter().any(|t| t.name == "shopping_add"));
        assert!(result.tools.iter().any(|t| t.name == "weight_upsert_by_date"));
    }

    #[tokio::test]
    async fn test_handle_call_tool() {
        let server = test_server();
        let req = JsonRpcRequest::new(
            RpcId::Number(3),
            "tools/call",
            Some(serde_json::json!({
                "name": "default_owner",
                "arguments": {}
            })),
        );

        let resp = server.handle_request(&req).await;
        assert!(resp.error.is_none());
        let result: CallToolResult =
            serde_json::from_value(resp.result.unwrap()).unwrap();
        assert!(!result.is_error);
        let ToolContent::Text { text } = &result.content[0];
        let envelope: Value = serde_json::from_str(text).unwrap();
        assert_eq!(envelope, serde_json::json!({"ok": true, "owner": "alice"}));
    }

    #[tokio::test]
    async fn test_dispatch_needs_no_prior_initialize() {
        // Each request stands alone: a tools/call with no initialize
        // beforehand dispatches normally.
        let server = test_server();
        let req = JsonRpcRequest::new(
            RpcId::Number(1),
            "tools/call",
            Some(serde_json::json!({
                "name": "default_owner",
                "arguments": {}
            })),
        );

        let resp = server.handle_request(&req).await;
        assert!(resp.error.is_none());
        let result: CallToolResult =
            serde_json::from_value(resp.result.unwrap()).unwrap();
        assert!(!result.is_error);
    }

    #[tokio::test]
    async fn test_tool_failure_is_a_tool_level_error() {
        // shopping_add with an empty name fails validation inside the tool;
        // that surfaces as is_error, not as a JSON-RPC error.
        let server = test_server();
        let req = JsonRpcRequest::new(
            RpcId::Number(4),
            "tools/call",
            Some(serde_json::json!({
                "name": "shopping_add",
                "arguments": {"name": "   "}
            })),
        );

        let resp = server.handle_request(&req).await;
        assert!(resp.error.is_none());
        let result: CallToolResult =
            serde_json::from_value(resp.result.unwrap()).unwrap();
        assert!(result.is_error);
    }

    #[tokio::test]
    async fn test_handle_call_tool_not_found() {
        let server = test_server();
        let req = JsonRpcRequest::new(
            RpcId::Number(5),
            "tools/call",
            Some(serde_json::json!({
                "name": "nonexistent",
                "arguments": {}
            })),
        );

        let resp = server.handle_request(&req).await;
        let err = resp.error.unwrap();
        assert_eq!(err.code, error_codes::INVALID_PARAMS);
    }

    #[tokio::test]
    async fn test_handle_unknown_method() {
        let server = test_server();
        let req = JsonRpcRequest::new(RpcId::Number(6), "unknown/method", None);

        let resp = server.handle_request(&req).await;
        let err = resp.error.unwrap();
        assert_eq!(err.code, error_codes::METHOD_NOT_FOUND);
    }

    #[tokio::test]
    async fn test_server_run_with_channel_transport() {
        let (mut client_side, mut server_side) = ChannelTransport::pair();
        let server = test_server();

        let server_handle = tokio::spawn(async move {
            server.run(&mut server_side).await
        });

        let init_req = JsonRpcRequest::new(
            RpcId::Number(1),
            "initialize",
            Some(serde_json::json!({
                "protocolVersion": PROTOCOL_VERSION,
                "capabilities": {},
                "clientInfo": {"name": "test"}
            })),
        );
        client_side
            .send(&serde_json::to_string(&init_req).unwrap())
            .await
            .unwrap();

        let resp_line = client_side.receive().await.unwrap().unwrap();
        let resp: JsonRpcResponse = serde_json::from_str(&resp_line).unwrap();
        assert!(resp.error.is_none());

        let call_req = JsonRpcRequest::new(
            RpcId::Number(2),
            "tools/call",
            Some(serde_json::json!({
                "name": "default_owner",
                "arguments": {}
            })),
        );
        client_side
            .send(&serde_json::to_string(&call_req).unwrap())
            .await
            .unwrap();

        let resp_line = client_side.receive().await.unwrap().unwrap();
        let resp: JsonRpcResponse = serde_json::from_str(&resp_line).unwrap();
        let result: CallToolResult =
            serde_json::from_value(resp.result.unwrap()).unwrap();
        assert!(!result.is_error);

        // Drop client side to close the transport and let server exit
        drop(client_side);
        server_handle.await.unwrap().unwrap();
    }
}
