//! Shared application state for the HTTP server.

use hearth_mcp::McpServer;

/// State shared across all request handlers.
///
/// MCP dispatch is stateless per request (`handle_request` takes
/// `&self`), so the server sits directly in the shared state with no
/// lock around it.
pub struct AppState {
    pub mcp: McpServer,
    pub server_name: String,
    pub version: &'static str,
}

impl AppState {
    pub fn new(mcp: McpServer, server_name: impl Into<String>) -> Self {
        Self {
            mcp,
            server_name: server_name.into(),
            version: env!("CARGO_PKG_VERSION"),
        }
    }
}
